//! Device abstraction
//!
//! [`Device`] is the imperative, globally-stateful machine underneath a
//! [`Context`](crate::Context). The context calls it only after validation
//! has passed and only when cached state differs from the request.
//!
//! Implementations:
//! - [`RecordingDevice`](crate::fake::RecordingDevice): records every call (tests, replay)
//! - `GlowDevice` (feature `glow-backend`): a real OpenGL context through `glow`

use crate::framebuffer::{ColorAttachment, DepthAttachment};
use crate::resources::TextureDescriptor;
use crate::types::*;
use glint_core::Handle;
use std::fmt;

/// Integer limits queried from the device once per context.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Limit {
    MaxColorAttachments,
    MaxDrawBuffers,
    MaxTextureImageUnits,
    MaxTextureSize,
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MaxColorAttachments => "GL_MAX_COLOR_ATTACHMENTS",
            Self::MaxDrawBuffers => "GL_MAX_DRAW_BUFFERS",
            Self::MaxTextureImageUnits => "GL_MAX_TEXTURE_IMAGE_UNITS",
            Self::MaxTextureSize => "GL_MAX_TEXTURE_SIZE",
        })
    }
}

/// A single-threaded graphics device session.
///
/// Methods map one-to-one onto device calls. None of them validate
/// anything: handles passed in are always live and owned by the calling
/// context.
pub trait Device {
    // Queries
    fn integer_limit(&mut self, limit: Limit) -> i32;
    fn default_framebuffer_bits(&mut self) -> DepthStencilBits;

    // Fixed-function state
    fn set_capability(&mut self, capability: Capability, enabled: bool);
    fn blend_functions(&mut self, functions: BlendFunctions);
    fn blend_equations(&mut self, equations: BlendEquations);
    fn cull_face(&mut self, faces: FaceSelection);
    fn front_face(&mut self, order: FaceWindingOrder);
    fn depth_function(&mut self, function: DepthFunction);
    fn depth_write(&mut self, enabled: bool);
    fn stencil_function(&mut self, faces: FaceSelection, test: StencilTest);
    fn stencil_mask(&mut self, faces: FaceSelection, mask: u32);
    fn stencil_operations(&mut self, faces: FaceSelection, operations: StencilOperations);
    fn color_mask(&mut self, mask: ColorMask);
    fn polygon_mode(&mut self, mode: PolygonMode);
    fn scissor(&mut self, area: ScissorArea);

    // Object lifecycle
    fn create_object(&mut self, handle: Handle) -> Result<(), String>;
    fn create_shader(&mut self, handle: Handle, stage: ShaderStage) -> Result<(), String>;
    fn delete_object(&mut self, handle: Handle);

    // Binding
    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<Handle>);
    fn bind_texture(&mut self, unit: u32, target: TextureTarget, texture: Option<Handle>);
    fn bind_framebuffer(&mut self, target: FramebufferTarget, framebuffer: Option<Handle>);
    fn use_program(&mut self, program: Option<Handle>);

    // Storage, applied to whatever is bound
    fn buffer_storage(&mut self, target: BufferTarget, size: u64, usage: BufferUsage);
    fn buffer_update(&mut self, target: BufferTarget, offset: u64, data: &[u8]);
    fn texture_storage(&mut self, target: TextureTarget, descriptor: &TextureDescriptor);

    // Programs
    fn attach_shader(&mut self, program: Handle, shader: Handle);
    fn link_program(&mut self, program: Handle);

    // Framebuffers, applied to the draw target
    fn attach_color(&mut self, point: u32, source: ColorAttachment);
    fn attach_depth(&mut self, attachment: DepthAttachment);
    fn draw_buffers(&mut self, mapping: &[Option<u32>]);
    fn framebuffer_status(&mut self, target: FramebufferTarget) -> FramebufferStatus;
}
