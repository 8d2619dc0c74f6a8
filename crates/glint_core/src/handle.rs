//! Resource handle with generational index
//!
//! Handles are small copyable values that reference a slot in a
//! [`ResourceRegistry`](crate::ResourceRegistry). The generation counter
//! prevents a stale handle from aliasing whatever later reuses its slot.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Identity of the context that owns a registry.
///
/// Every handle carries the id of the context that allocated it so that a
/// handle can never be used against a different device session.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(u32);

static NEXT_CONTEXT_ID: AtomicU32 = AtomicU32::new(1);

impl ContextId {
    /// Hand out a process-unique context id.
    pub fn next() -> Self {
        Self(NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The kind of device object a handle names.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    ArrayBuffer,
    IndexBuffer,
    Texture2D,
    TextureCube,
    Shader,
    Program,
    Framebuffer,
    Query,
}

impl ResourceKind {
    pub fn is_buffer(self) -> bool {
        matches!(self, Self::ArrayBuffer | Self::IndexBuffer)
    }

    pub fn is_texture(self) -> bool {
        matches!(self, Self::Texture2D | Self::TextureCube)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::ArrayBuffer => "array buffer",
            Self::IndexBuffer => "index buffer",
            Self::Texture2D => "2D texture",
            Self::TextureCube => "cube texture",
            Self::Shader => "shader",
            Self::Program => "program",
            Self::Framebuffer => "framebuffer",
            Self::Query => "query",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resource handle (generation-indexed for safety)
///
/// - Index: position in the registry slot array
/// - Generation: incremented when the resource is deleted
/// - Kind: what the handle refers to, fixed at allocation
/// - Context: the owning context
///
/// Example:
/// ```ignore
/// let buffer = ctx.buffer_allocate(BufferTarget::Array, 64, BufferUsage::StaticDraw)?;
/// ctx.delete(buffer)?;
/// // buffer is now permanently invalid (generation mismatch)
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Handle {
    index: u32,
    generation: u32,
    kind: ResourceKind,
    context: ContextId,
}

impl Handle {
    pub(crate) const fn new(
        index: u32,
        generation: u32,
        kind: ResourceKind,
        context: ContextId,
    ) -> Self {
        Self {
            index,
            generation,
            kind,
            context,
        }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn context(&self) -> ContextId {
        self.context
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}v{} (context {})",
            self.kind, self.index, self.generation, self.context
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_ids_are_unique() {
        let a = ContextId::next();
        let b = ContextId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn kind_families() {
        assert!(ResourceKind::ArrayBuffer.is_buffer());
        assert!(ResourceKind::IndexBuffer.is_buffer());
        assert!(!ResourceKind::Texture2D.is_buffer());
        assert!(ResourceKind::TextureCube.is_texture());
        assert!(!ResourceKind::Framebuffer.is_texture());
    }

    #[test]
    fn display_names_kind_and_identity() {
        let context = ContextId::next();
        let handle = Handle::new(3, 1, ResourceKind::Texture2D, context);
        let text = handle.to_string();
        assert!(text.starts_with("2D texture 3v1"));
    }
}
