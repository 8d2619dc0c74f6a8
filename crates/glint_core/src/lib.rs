//! Glint Core
//!
//! Device-independent bookkeeping shared by the rest of the workspace:
//! - Generational resource handles
//! - The per-context resource registry
//! - Handle validation errors

pub mod error;
pub mod handle;
pub mod registry;

pub use error::HandleError;
pub use handle::{ContextId, Handle, ResourceKind};
pub use registry::ResourceRegistry;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
