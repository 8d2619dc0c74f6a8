//! Glint Render
//!
//! A state-deduplicating front end for OpenGL-style devices:
//! - Cached pipeline state so redundant changes never reach the driver
//! - Generational handles that catch use-after-delete and cross-context use
//! - Binding tracking with feedback-loop detection for framebuffers
//! - A recording device for tests and a `glow` device for real GL
//!
//! Everything goes through a [`Context`], which owns one [`Device`].

pub mod backend;
pub mod bindings;
pub mod capabilities;
pub mod config;
pub mod context;
pub mod error;
pub mod fake;
pub mod framebuffer;
#[cfg(feature = "glow-backend")]
pub mod glow_backend;
pub mod ops;
pub mod render_state;
pub mod resources;
pub mod state;
pub mod types;

pub use backend::{Device, Limit};
pub use bindings::{BindingPoint, BindingTracker};
pub use capabilities::{Capabilities, CapabilityLimits, CapabilityProbe};
pub use config::ContextConfig;
pub use context::Context;
pub use error::GlError;
pub use fake::{DeviceCall, RecordingDevice};
pub use framebuffer::{
    AttachmentPoint, ColorAttachment, DepthAttachment, DrawBuffer, FramebufferBuilder,
    FramebufferDescriptor, FramebufferLayout,
};
#[cfg(feature = "glow-backend")]
pub use glow_backend::GlowDevice;
pub use ops::TextureUnit;
pub use render_state::{DepthState, RenderState, StencilFaceState, StencilState};
pub use resources::{BufferDescriptor, Renderable, TextureDescriptor};
pub use state::{PerFace, StateCache, StateSlot};
pub use types::*;

pub use glint_core::{ContextId, Handle, HandleError, ResourceKind};
