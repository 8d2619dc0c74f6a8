use crate::backend::Device;
use crate::context::Context;
use crate::error::GlError;
use crate::types::{Capability, DepthFunction};

impl<D: Device> Context<D> {
    fn check_depth_buffer(&self) -> Result<(), GlError> {
        if self.draw_target_bits().depth == 0 {
            return Err(GlError::NoDepthBuffer);
        }
        Ok(())
    }

    /// Depth bits of the current draw target.
    pub fn depth_buffer_get_bits(&self) -> u32 {
        self.draw_target_bits().depth
    }

    pub fn depth_buffer_test_enable(&mut self, function: DepthFunction) -> Result<(), GlError> {
        self.check_depth_buffer()?;
        let issued = self
            .state
            .set_toggle(&mut self.device, Capability::DepthTest, true);
        self.record(issued);
        let issued = self.state.set_depth_function(&mut self.device, function);
        self.record(issued);
        Ok(())
    }

    pub fn depth_buffer_test_disable(&mut self) -> Result<(), GlError> {
        self.check_depth_buffer()?;
        let issued = self
            .state
            .set_toggle(&mut self.device, Capability::DepthTest, false);
        self.record(issued);
        Ok(())
    }

    pub fn depth_buffer_test_is_enabled(&self) -> Result<bool, GlError> {
        self.check_depth_buffer()?;
        Ok(self.state.is_enabled(Capability::DepthTest))
    }

    pub fn depth_buffer_write_enable(&mut self) -> Result<(), GlError> {
        self.check_depth_buffer()?;
        let issued = self.state.set_depth_write(&mut self.device, true);
        self.record(issued);
        Ok(())
    }

    pub fn depth_buffer_write_disable(&mut self) -> Result<(), GlError> {
        self.check_depth_buffer()?;
        let issued = self.state.set_depth_write(&mut self.device, false);
        self.record(issued);
        Ok(())
    }

    pub fn depth_buffer_write_is_enabled(&self) -> Result<bool, GlError> {
        self.check_depth_buffer()?;
        Ok(self.state.depth_write())
    }

    /// Clamp fragment depth to the near/far planes instead of clipping.
    pub fn depth_clamping_enable(&mut self) -> Result<(), GlError> {
        self.check_depth_buffer()?;
        let issued = self
            .state
            .set_toggle(&mut self.device, Capability::DepthClamp, true);
        self.record(issued);
        Ok(())
    }

    pub fn depth_clamping_disable(&mut self) -> Result<(), GlError> {
        self.check_depth_buffer()?;
        let issued = self
            .state
            .set_toggle(&mut self.device, Capability::DepthClamp, false);
        self.record(issued);
        Ok(())
    }

    pub fn depth_clamping_is_enabled(&self) -> Result<bool, GlError> {
        self.check_depth_buffer()?;
        Ok(self.state.is_enabled(Capability::DepthClamp))
    }
}
