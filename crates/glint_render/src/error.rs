use crate::backend::Limit;
use crate::types::FramebufferStatus;
use glint_core::{Handle, HandleError};
use thiserror::Error;

/// Errors raised by context operations.
///
/// Every variant is produced before the offending call reaches the device.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GlError {
    #[error("non-compliant implementation: {limit} reported as {reported}, at least {required} required")]
    NonCompliant {
        limit: Limit,
        reported: i32,
        required: i32,
    },

    #[error(transparent)]
    Handle(#[from] HandleError),

    #[error("misconfigured: {0}")]
    Misconfigured(String),

    #[error("not bound: {0}")]
    NotBound(String),

    #[error("the current draw target has no depth buffer")]
    NoDepthBuffer,

    #[error("the current draw target has no stencil buffer")]
    NoStencilBuffer,

    #[error("feedback loop: {texture} is attached to {}", describe_framebuffer(.framebuffer))]
    FeedbackLoop {
        framebuffer: Option<Handle>,
        texture: Handle,
    },

    #[error("framebuffer is incomplete: {0:?}")]
    FramebufferIncomplete(FramebufferStatus),

    #[error("device error: {0}")]
    Backend(String),
}

fn describe_framebuffer(framebuffer: &Option<Handle>) -> String {
    match framebuffer {
        Some(handle) => handle.to_string(),
        None => "the framebuffer being allocated".to_string(),
    }
}
