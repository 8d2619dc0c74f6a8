use crate::backend::Device;
use crate::context::Context;
use crate::error::GlError;
use crate::types::{
    Capability, FaceSelection, StencilFunction, StencilOperation, StencilOperations, StencilTest,
};

impl<D: Device> Context<D> {
    fn check_stencil_buffer(&self) -> Result<(), GlError> {
        if self.draw_target_bits().stencil == 0 {
            return Err(GlError::NoStencilBuffer);
        }
        Ok(())
    }

    /// Stencil bits of the current draw target.
    pub fn stencil_buffer_get_bits(&self) -> u32 {
        self.draw_target_bits().stencil
    }

    pub fn stencil_buffer_enable(&mut self) -> Result<(), GlError> {
        self.check_stencil_buffer()?;
        let issued = self
            .state
            .set_toggle(&mut self.device, Capability::StencilTest, true);
        self.record(issued);
        Ok(())
    }

    pub fn stencil_buffer_disable(&mut self) -> Result<(), GlError> {
        self.check_stencil_buffer()?;
        let issued = self
            .state
            .set_toggle(&mut self.device, Capability::StencilTest, false);
        self.record(issued);
        Ok(())
    }

    pub fn stencil_buffer_is_enabled(&self) -> Result<bool, GlError> {
        self.check_stencil_buffer()?;
        Ok(self.state.is_enabled(Capability::StencilTest))
    }

    /// Set the stencil test for `faces`.
    ///
    /// A both-faces request goes to the device unless both faces already
    /// hold exactly this test.
    pub fn stencil_buffer_function(
        &mut self,
        faces: FaceSelection,
        function: StencilFunction,
        reference: i32,
        mask: u32,
    ) -> Result<(), GlError> {
        self.check_stencil_buffer()?;
        let test = StencilTest {
            function,
            reference,
            mask,
        };
        let issued = self.state.set_stencil_test(&mut self.device, faces, test);
        self.record(issued);
        Ok(())
    }

    /// Set the stencil write mask for `faces`.
    pub fn stencil_buffer_mask(&mut self, faces: FaceSelection, mask: u32) -> Result<(), GlError> {
        self.check_stencil_buffer()?;
        let issued = self.state.set_stencil_mask(&mut self.device, faces, mask);
        self.record(issued);
        Ok(())
    }

    pub fn stencil_buffer_operation(
        &mut self,
        faces: FaceSelection,
        stencil_fail: StencilOperation,
        depth_fail: StencilOperation,
        pass: StencilOperation,
    ) -> Result<(), GlError> {
        self.check_stencil_buffer()?;
        let operations = StencilOperations {
            stencil_fail,
            depth_fail,
            pass,
        };
        let issued = self
            .state
            .set_stencil_operations(&mut self.device, faces, operations);
        self.record(issued);
        Ok(())
    }
}
