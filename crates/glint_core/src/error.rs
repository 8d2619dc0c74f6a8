use crate::{ContextId, Handle, ResourceKind};
use thiserror::Error;

/// Errors raised when a handle cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandleError {
    #[error("{handle} has already been deleted")]
    Deleted { handle: Handle },

    #[error("{handle} belongs to context {owner}, not to context {context}")]
    Foreign {
        handle: Handle,
        owner: ContextId,
        context: ContextId,
    },

    #[error("{handle} is a {actual}, expected a {expected}")]
    WrongKind {
        handle: Handle,
        expected: &'static str,
        actual: ResourceKind,
    },

    #[error("{handle} was never allocated")]
    Unknown { handle: Handle },
}

impl HandleError {
    /// The handle the error is about.
    pub fn handle(&self) -> Handle {
        match self {
            Self::Deleted { handle }
            | Self::Foreign { handle, .. }
            | Self::WrongKind { handle, .. }
            | Self::Unknown { handle } => *handle,
        }
    }
}
