// masking.rs - Color mask, polygon rasterization mode and scissor test

use crate::backend::Device;
use crate::context::Context;
use crate::types::{Capability, ColorMask, PolygonMode, ScissorArea};

impl<D: Device> Context<D> {
    pub fn color_buffer_mask(&mut self, red: bool, green: bool, blue: bool, alpha: bool) {
        let mask = ColorMask::new(red, green, blue, alpha);
        let issued = self.state.set_color_mask(&mut self.device, mask);
        self.record(issued);
    }

    pub fn color_buffer_mask_state(&self) -> ColorMask {
        self.state.color_mask()
    }

    pub fn polygon_set_mode(&mut self, mode: PolygonMode) {
        let issued = self.state.set_polygon_mode(&mut self.device, mode);
        self.record(issued);
    }

    pub fn polygon_get_mode(&self) -> PolygonMode {
        self.state.polygon_mode()
    }

    /// Restrict rendering to `area`.
    pub fn scissor_enable(&mut self, area: ScissorArea) {
        let issued = self
            .state
            .set_toggle(&mut self.device, Capability::ScissorTest, true);
        self.record(issued);
        let issued = self.state.set_scissor(&mut self.device, area);
        self.record(issued);
    }

    pub fn scissor_disable(&mut self) {
        let issued = self
            .state
            .set_toggle(&mut self.device, Capability::ScissorTest, false);
        self.record(issued);
    }

    pub fn scissor_is_enabled(&self) -> bool {
        self.state.is_enabled(Capability::ScissorTest)
    }
}
