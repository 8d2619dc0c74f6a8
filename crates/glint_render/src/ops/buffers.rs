use crate::backend::Device;
use crate::bindings::BindingPoint;
use crate::context::Context;
use crate::error::GlError;
use crate::resources::{BufferDescriptor, Resource};
use crate::types::{BufferTarget, BufferUsage};
use glint_core::{Handle, ResourceKind};

impl<D: Device> Context<D> {
    /// Create a buffer, bind it to `target` and allocate `size` bytes of storage.
    pub fn buffer_allocate(
        &mut self,
        target: BufferTarget,
        size: u64,
        usage: BufferUsage,
    ) -> Result<Handle, GlError> {
        if size > BufferDescriptor::MAX_SIZE {
            return Err(GlError::Misconfigured(format!(
                "buffer size {size} exceeds the maximum of {} bytes",
                BufferDescriptor::MAX_SIZE
            )));
        }
        let kind = match target {
            BufferTarget::Array => ResourceKind::ArrayBuffer,
            BufferTarget::Index => ResourceKind::IndexBuffer,
        };
        let descriptor = BufferDescriptor {
            target,
            size,
            usage,
        };
        let handle = self.create(kind, Resource::Buffer(descriptor), D::create_object)?;
        self.bind_point(BindingPoint::for_buffer(target), handle)?;
        self.device.buffer_storage(target, size, usage);
        self.record(true);
        Ok(handle)
    }

    pub fn buffer_descriptor(&self, buffer: Handle) -> Result<BufferDescriptor, GlError> {
        self.resources
            .assert_kind(buffer, "buffer", ResourceKind::is_buffer)?;
        self.resources
            .metadata(buffer)?
            .buffer()
            .copied()
            .ok_or_else(|| GlError::Misconfigured(format!("{buffer} has no storage")))
    }

    /// Bind `buffer` to the target it was allocated for.
    pub fn buffer_bind(&mut self, buffer: Handle) -> Result<(), GlError> {
        let target = self.buffer_descriptor(buffer)?.target;
        self.bind_point(BindingPoint::for_buffer(target), buffer)?;
        Ok(())
    }

    pub fn buffer_unbind(&mut self, target: BufferTarget) {
        self.unbind_point(BindingPoint::for_buffer(target));
    }

    pub fn buffer_is_bound(&self, buffer: Handle) -> Result<bool, GlError> {
        let target = self.buffer_descriptor(buffer)?.target;
        Ok(self.bindings.current(BindingPoint::for_buffer(target)) == Some(buffer))
    }

    pub fn buffer_get_bound(&self, target: BufferTarget) -> Option<Handle> {
        self.bindings.current(BindingPoint::for_buffer(target))
    }

    fn bound_buffer(&self, buffer: Handle) -> Result<BufferDescriptor, GlError> {
        let descriptor = self.buffer_descriptor(buffer)?;
        if self.bindings.current(BindingPoint::for_buffer(descriptor.target)) != Some(buffer) {
            return Err(GlError::NotBound(format!("{buffer} is not bound")));
        }
        Ok(descriptor)
    }

    /// Write `data` at `offset` into a bound buffer.
    ///
    /// The written range must lie inside the buffer, so offsets never exceed
    /// [`BufferDescriptor::MAX_SIZE`].
    pub fn buffer_update(&mut self, buffer: Handle, offset: u64, data: &[u8]) -> Result<(), GlError> {
        let descriptor = self.bound_buffer(buffer)?;
        let end = offset.checked_add(data.len() as u64);
        if end.map_or(true, |end| end > descriptor.size) {
            return Err(GlError::Misconfigured(format!(
                "update of {} bytes at offset {offset} exceeds the {} byte size of {buffer}",
                data.len(),
                descriptor.size
            )));
        }
        self.device.buffer_update(descriptor.target, offset, data);
        self.record(true);
        Ok(())
    }

    /// Replace the storage of a bound buffer with fresh storage of the same size.
    pub fn buffer_reallocate(&mut self, buffer: Handle) -> Result<(), GlError> {
        let descriptor = self.bound_buffer(buffer)?;
        self.device
            .buffer_storage(descriptor.target, descriptor.size, descriptor.usage);
        self.record(true);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::fake::{DeviceCall, RecordingDevice};
    use crate::resources::BufferDescriptor;
    use crate::types::{BufferTarget, BufferUsage};
    use crate::{Context, ContextConfig, GlError};

    fn context() -> Context<RecordingDevice> {
        Context::new(RecordingDevice::new(), &ContextConfig::default()).unwrap()
    }

    #[test]
    fn allocate_binds_and_stores() {
        let mut ctx = context();
        let buffer = ctx
            .buffer_allocate(BufferTarget::Array, 256, BufferUsage::DynamicDraw)
            .unwrap();

        assert_eq!(ctx.buffer_is_bound(buffer), Ok(true));
        assert_eq!(
            ctx.device().calls(),
            &[
                DeviceCall::CreateObject(buffer),
                DeviceCall::BindBuffer(BufferTarget::Array, Some(buffer)),
                DeviceCall::BufferStorage(BufferTarget::Array, 256, BufferUsage::DynamicDraw),
            ]
        );
    }

    #[test]
    fn update_requires_binding() {
        let mut ctx = context();
        let buffer = ctx
            .buffer_allocate(BufferTarget::Index, 8, BufferUsage::StaticDraw)
            .unwrap();
        ctx.buffer_unbind(BufferTarget::Index);

        assert!(matches!(
            ctx.buffer_update(buffer, 0, &[1, 2]),
            Err(GlError::NotBound(_))
        ));
        assert!(matches!(
            ctx.buffer_reallocate(buffer),
            Err(GlError::NotBound(_))
        ));

        ctx.buffer_bind(buffer).unwrap();
        ctx.buffer_update(buffer, 6, &[1, 2]).unwrap();
        assert_eq!(
            ctx.device().calls().last(),
            Some(&DeviceCall::BufferUpdate(BufferTarget::Index, 6, vec![1, 2]))
        );
    }

    #[test]
    fn out_of_range_update_is_rejected() {
        let mut ctx = context();
        let buffer = ctx
            .buffer_allocate(BufferTarget::Array, 4, BufferUsage::StaticDraw)
            .unwrap();
        let calls = ctx.device().calls().len();

        assert!(matches!(
            ctx.buffer_update(buffer, 3, &[0, 0]),
            Err(GlError::Misconfigured(_))
        ));
        assert!(ctx.buffer_update(buffer, u64::MAX, &[0]).is_err());
        assert_eq!(ctx.device().calls().len(), calls);
    }

    #[test]
    fn oversized_buffers_are_rejected() {
        let mut ctx = context();
        let too_large = BufferDescriptor::MAX_SIZE + 1;

        assert!(matches!(
            ctx.buffer_allocate(BufferTarget::Array, too_large, BufferUsage::StaticDraw),
            Err(GlError::Misconfigured(_))
        ));
        assert!(ctx.device().calls().is_empty());
        assert_eq!(ctx.live_resources(), 0);

        let buffer = ctx
            .buffer_allocate(BufferTarget::Array, 16, BufferUsage::StaticDraw)
            .unwrap();
        assert!(matches!(
            ctx.buffer_update(buffer, BufferDescriptor::MAX_SIZE + 8, &[0]),
            Err(GlError::Misconfigured(_))
        ));
    }

    #[test]
    fn reallocate_reuses_size_and_usage() {
        let mut ctx = context();
        let buffer = ctx
            .buffer_allocate(BufferTarget::Array, 64, BufferUsage::StreamDraw)
            .unwrap();
        ctx.device_mut().clear();

        ctx.buffer_reallocate(buffer).unwrap();
        assert_eq!(
            ctx.device().calls(),
            &[DeviceCall::BufferStorage(
                BufferTarget::Array,
                64,
                BufferUsage::StreamDraw
            )]
        );
    }

    #[test]
    fn repeated_binds_elide() {
        let mut ctx = context();
        let a = ctx
            .buffer_allocate(BufferTarget::Array, 4, BufferUsage::StaticDraw)
            .unwrap();
        let b = ctx
            .buffer_allocate(BufferTarget::Array, 4, BufferUsage::StaticDraw)
            .unwrap();
        ctx.device_mut().clear();

        ctx.buffer_bind(b).unwrap();
        ctx.buffer_bind(a).unwrap();
        ctx.buffer_bind(a).unwrap();
        ctx.buffer_unbind(BufferTarget::Array);
        ctx.buffer_unbind(BufferTarget::Array);

        assert_eq!(ctx.device().calls().len(), 2);
        assert_eq!(ctx.buffer_get_bound(BufferTarget::Array), None);
    }
}
