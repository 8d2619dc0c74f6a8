//! Aggregate render state
//!
//! A [`RenderState`] describes the whole fixed-function pipeline at once.
//! Activating it goes through the regular typed operations, so only the
//! parts that differ from the cached state reach the device.

use crate::backend::Device;
use crate::context::Context;
use crate::error::GlError;
use crate::types::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthState {
    /// Fail instead of skipping when the draw target has no depth buffer.
    pub strict: bool,
    /// `None` disables the depth test.
    pub test: Option<DepthFunction>,
    pub write: bool,
    pub clamp: bool,
}

impl Default for DepthState {
    fn default() -> Self {
        Self {
            strict: false,
            test: None,
            write: true,
            clamp: false,
        }
    }
}

/// Stencil configuration of one face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StencilFaceState {
    pub test: StencilTest,
    pub write_mask: u32,
    pub operations: StencilOperations,
}

impl StencilFaceState {
    pub fn new(test: StencilTest, write_mask: u32, operations: StencilOperations) -> Self {
        Self {
            test,
            write_mask,
            operations,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StencilState {
    /// Fail instead of skipping when the draw target has no stencil buffer.
    pub strict: bool,
    pub enabled: bool,
    pub front: StencilFaceState,
    pub back: StencilFaceState,
}

impl Default for StencilFaceState {
    fn default() -> Self {
        Self::new(StencilTest::default(), u32::MAX, StencilOperations::default())
    }
}

impl Default for StencilState {
    fn default() -> Self {
        let face = StencilFaceState::default();
        Self {
            strict: false,
            enabled: false,
            front: face,
            back: face,
        }
    }
}

/// Complete fixed-function pipeline state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderState {
    /// `None` disables blending.
    pub blending: Option<BlendState>,
    /// `None` disables culling.
    pub culling: Option<CullingState>,
    pub color_mask: ColorMask,
    pub depth: DepthState,
    pub polygon_mode: PolygonMode,
    /// `None` disables the scissor test.
    pub scissor: Option<ScissorArea>,
    pub stencil: StencilState,
}

impl<D: Device> Context<D> {
    /// Make `state` current.
    ///
    /// Disabling depth or stencil state never fails for lack of a buffer.
    pub fn render_state_activate(&mut self, state: &RenderState) -> Result<(), GlError> {
        match state.blending {
            Some(blend) => {
                self.blending_enable_separate_with_equation_separate(blend.functions, blend.equations)?
            }
            None => self.blending_disable(),
        }

        match state.culling {
            Some(culling) => self.culling_enable(culling.faces, culling.order),
            None => self.culling_disable(),
        }

        let mask = state.color_mask;
        self.color_buffer_mask(mask.red, mask.green, mask.blue, mask.alpha);

        self.activate_depth(&state.depth)?;
        self.polygon_set_mode(state.polygon_mode);

        match state.scissor {
            Some(area) => self.scissor_enable(area),
            None => self.scissor_disable(),
        }

        self.activate_stencil(&state.stencil)
    }

    fn activate_depth(&mut self, depth: &DepthState) -> Result<(), GlError> {
        let present = self.depth_buffer_get_bits() > 0;
        // Non-strict states are silently skipped without a depth buffer.
        let enable = depth.strict || present;

        if depth.write {
            if enable {
                self.depth_buffer_write_enable()?;
            }
        } else if present {
            self.depth_buffer_write_disable()?;
        }

        if depth.clamp {
            if enable {
                self.depth_clamping_enable()?;
            }
        } else if present {
            self.depth_clamping_disable()?;
        }

        match depth.test {
            Some(function) if enable => self.depth_buffer_test_enable(function)?,
            Some(_) => {}
            None if present => self.depth_buffer_test_disable()?,
            None => {}
        }
        Ok(())
    }

    fn activate_stencil(&mut self, stencil: &StencilState) -> Result<(), GlError> {
        let present = self.stencil_buffer_get_bits() > 0;
        if !stencil.enabled {
            if present {
                self.stencil_buffer_disable()?;
            }
            return Ok(());
        }
        if !stencil.strict && !present {
            return Ok(());
        }

        self.stencil_buffer_enable()?;
        for (faces, face) in [
            (FaceSelection::Front, &stencil.front),
            (FaceSelection::Back, &stencil.back),
        ] {
            let ops = face.operations;
            self.stencil_buffer_operation(faces, ops.stencil_fail, ops.depth_fail, ops.pass)?;
            self.stencil_buffer_mask(faces, face.write_mask)?;
            let test = face.test;
            self.stencil_buffer_function(faces, test.function, test.reference, test.mask)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{DeviceCall, RecordingDevice};
    use crate::ContextConfig;

    fn context(bits: DepthStencilBits) -> Context<RecordingDevice> {
        let device = RecordingDevice::new().with_default_framebuffer(bits);
        Context::new(device, &ContextConfig::default()).unwrap()
    }

    fn full() -> DepthStencilBits {
        DepthStencilBits {
            depth: 24,
            stencil: 8,
        }
    }

    fn blended() -> RenderState {
        RenderState {
            blending: Some(BlendState {
                functions: BlendFunctions::uniform(
                    BlendFunction::SourceAlpha,
                    BlendFunction::OneMinusSourceAlpha,
                ),
                equations: BlendEquations::default(),
            }),
            culling: Some(CullingState {
                faces: FaceSelection::Back,
                order: FaceWindingOrder::CounterClockwise,
            }),
            depth: DepthState {
                test: Some(DepthFunction::LessOrEqual),
                ..DepthState::default()
            },
            ..RenderState::default()
        }
    }

    #[test]
    fn activating_twice_issues_nothing_new() {
        let mut ctx = context(full());
        let state = blended();

        ctx.render_state_activate(&state).unwrap();
        let issued = ctx.device().calls().len();
        assert!(issued > 0);
        assert!(ctx.blending_is_enabled());
        assert_eq!(ctx.depth_buffer_test_is_enabled(), Ok(true));

        ctx.render_state_activate(&state).unwrap();
        assert_eq!(ctx.device().calls().len(), issued);
    }

    #[test]
    fn switching_states_only_pushes_differences() {
        let mut ctx = context(full());
        ctx.render_state_activate(&blended()).unwrap();
        ctx.device_mut().clear();

        let opaque = RenderState {
            blending: None,
            ..blended()
        };
        ctx.render_state_activate(&opaque).unwrap();
        assert_eq!(
            ctx.device().calls(),
            &[DeviceCall::SetCapability(Capability::Blend, false)]
        );
    }

    #[test]
    fn lenient_depth_is_skipped_without_buffer() {
        let mut ctx = context(DepthStencilBits::default());
        ctx.render_state_activate(&blended()).unwrap();

        assert_eq!(
            ctx.device()
                .count(|c| *c == DeviceCall::SetCapability(Capability::DepthTest, true)),
            0
        );
    }

    #[test]
    fn strict_depth_fails_without_buffer() {
        let mut ctx = context(DepthStencilBits::default());
        let mut state = blended();
        state.depth.strict = true;

        assert_eq!(
            ctx.render_state_activate(&state),
            Err(GlError::NoDepthBuffer)
        );
    }

    #[test]
    fn disabled_stencil_never_fails() {
        let mut ctx = context(DepthStencilBits {
            depth: 24,
            stencil: 0,
        });
        let state = RenderState {
            stencil: StencilState {
                strict: true,
                ..StencilState::default()
            },
            ..RenderState::default()
        };

        assert!(ctx.render_state_activate(&state).is_ok());
    }

    #[test]
    fn stencil_faces_are_configured_separately() {
        let mut ctx = context(full());
        let mut state = RenderState::default();
        state.stencil.enabled = true;
        state.stencil.back.write_mask = 0x0f;
        state.stencil.back.operations.pass = StencilOperation::Replace;

        ctx.render_state_activate(&state).unwrap();
        assert_eq!(ctx.stencil_buffer_is_enabled(), Ok(true));
        assert_eq!(ctx.state().stencil_mask(Face::Front), Some(u32::MAX));
        assert_eq!(ctx.state().stencil_mask(Face::Back), Some(0x0f));
        assert_eq!(
            ctx.device()
                .count(|c| matches!(c, DeviceCall::StencilOperations(FaceSelection::Back, _))),
            1
        );
        assert_eq!(
            ctx.device()
                .count(|c| matches!(c, DeviceCall::StencilOperations(FaceSelection::Front, _))),
            0
        );
    }

    #[test]
    fn deserializes_with_defaults() {
        let state: RenderState =
            serde_json::from_str(r#"{ "polygon_mode": "Line", "depth": { "clamp": true } }"#)
                .unwrap();
        assert_eq!(state.polygon_mode, PolygonMode::Line);
        assert!(state.depth.clamp);
        assert!(state.depth.write);
        assert_eq!(state.blending, None);
    }
}
