use crate::backend::Device;
use crate::context::Context;
use crate::types::{Capability, FaceSelection, FaceWindingOrder};

impl<D: Device> Context<D> {
    /// Enable culling of `faces`, treating `order` as front-facing.
    pub fn culling_enable(&mut self, faces: FaceSelection, order: FaceWindingOrder) {
        let issued = self
            .state
            .set_toggle(&mut self.device, Capability::CullFace, true);
        self.record(issued);
        let issued = self.state.set_cull_faces(&mut self.device, faces);
        self.record(issued);
        let issued = self.state.set_front_face(&mut self.device, order);
        self.record(issued);
    }

    pub fn culling_disable(&mut self) {
        let issued = self
            .state
            .set_toggle(&mut self.device, Capability::CullFace, false);
        self.record(issued);
    }

    pub fn culling_is_enabled(&self) -> bool {
        self.state.is_enabled(Capability::CullFace)
    }
}

#[cfg(test)]
mod tests {
    use crate::fake::{DeviceCall, RecordingDevice};
    use crate::types::{FaceSelection, FaceWindingOrder};
    use crate::{Context, ContextConfig};

    #[test]
    fn face_and_winding_caches_survive_disable() {
        let mut ctx = Context::new(RecordingDevice::new(), &ContextConfig::default()).unwrap();

        ctx.culling_enable(FaceSelection::Front, FaceWindingOrder::Clockwise);
        ctx.culling_disable();
        ctx.culling_enable(FaceSelection::Front, FaceWindingOrder::Clockwise);

        assert!(ctx.culling_is_enabled());
        assert_eq!(
            ctx.device().calls(),
            &[
                DeviceCall::SetCapability(crate::Capability::CullFace, true),
                DeviceCall::CullFace(FaceSelection::Front),
                DeviceCall::FrontFace(FaceWindingOrder::Clockwise),
                DeviceCall::SetCapability(crate::Capability::CullFace, false),
                DeviceCall::SetCapability(crate::Capability::CullFace, true),
            ]
        );
    }

    #[test]
    fn defaults_are_not_pushed() {
        let mut ctx = Context::new(RecordingDevice::new(), &ContextConfig::default()).unwrap();
        ctx.culling_enable(FaceSelection::Back, FaceWindingOrder::CounterClockwise);

        assert_eq!(ctx.device().calls().len(), 1);
    }
}
