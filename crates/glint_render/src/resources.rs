// resources.rs - Metadata kept next to every handle in the registry

use crate::framebuffer::FramebufferLayout;
use crate::types::{BufferTarget, BufferUsage, ShaderStage};
use glint_core::Handle;
use serde::{Deserialize, Serialize};

/// What a texture can be attached as.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Renderable {
    Color,
    Depth { depth_bits: u32 },
    DepthStencil { depth_bits: u32, stencil_bits: u32 },
    NotRenderable,
}

/// Size and renderability of a texture. Pixel formats are the caller's business.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureDescriptor {
    pub width: u32,
    pub height: u32,
    pub renderable: Renderable,
}

impl TextureDescriptor {
    pub const fn new(width: u32, height: u32, renderable: Renderable) -> Self {
        Self {
            width,
            height,
            renderable,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BufferDescriptor {
    pub target: BufferTarget,
    pub size: u64,
    pub usage: BufferUsage,
}

impl BufferDescriptor {
    /// Largest buffer size a device can address with a signed 32-bit size.
    pub const MAX_SIZE: u64 = i32::MAX as u64;
}

/// Registry metadata, one variant per resource family.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Resource {
    Buffer(BufferDescriptor),
    Texture(TextureDescriptor),
    Shader(ShaderStage),
    Program { shaders: Vec<Handle> },
    Framebuffer(FramebufferLayout),
    Query,
}

impl Resource {
    pub(crate) fn buffer(&self) -> Option<&BufferDescriptor> {
        match self {
            Self::Buffer(descriptor) => Some(descriptor),
            _ => None,
        }
    }

    pub(crate) fn texture(&self) -> Option<&TextureDescriptor> {
        match self {
            Self::Texture(descriptor) => Some(descriptor),
            _ => None,
        }
    }

    pub(crate) fn framebuffer(&self) -> Option<&FramebufferLayout> {
        match self {
            Self::Framebuffer(layout) => Some(layout),
            _ => None,
        }
    }
}
