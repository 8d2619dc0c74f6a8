// registry.rs - Generational arena owning every device object of a context
//
// Slots are reused after deletion, but only under a new generation, so a
// stale handle can never name the object that took its place.

use crate::{ContextId, Handle, HandleError, ResourceKind};

/// Owner of the allocate/delete lifecycle for one context's resources.
///
/// `M` is the per-resource metadata the caller wants to keep next to the
/// handle (buffer sizes, texture descriptors, framebuffer attachments...).
pub struct ResourceRegistry<M> {
    context: ContextId,
    slots: Vec<Slot<M>>,
    free: Vec<u32>,
    live: usize,
}

struct Slot<M> {
    generation: u32,
    entry: Option<Entry<M>>,
}

struct Entry<M> {
    kind: ResourceKind,
    metadata: M,
}

impl<M> ResourceRegistry<M> {
    /// Create an empty registry owned by `context`.
    pub fn new(context: ContextId) -> Self {
        Self {
            context,
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    pub fn context(&self) -> ContextId {
        self.context
    }

    /// Allocate a fresh handle.
    ///
    /// Freed slots are recycled under their bumped generation, so the
    /// returned handle is never equal to any handle handed out before.
    pub fn allocate(&mut self, kind: ResourceKind, metadata: M) -> Handle {
        let entry = Entry { kind, metadata };
        self.live += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entry = Some(entry);
            return Handle::new(index, slot.generation, kind, self.context);
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            entry: Some(entry),
        });
        Handle::new(index, 0, kind, self.context)
    }

    /// Fail unless `handle` names a live resource of this registry.
    pub fn assert_live(&self, handle: Handle) -> Result<(), HandleError> {
        self.entry(handle).map(|_| ())
    }

    /// Like [`assert_live`](Self::assert_live), additionally checking the kind.
    pub fn assert_kind(
        &self,
        handle: Handle,
        expected: &'static str,
        accept: impl Fn(ResourceKind) -> bool,
    ) -> Result<(), HandleError> {
        let entry = self.entry(handle)?;
        if accept(entry.kind) {
            Ok(())
        } else {
            Err(HandleError::WrongKind {
                handle,
                expected,
                actual: entry.kind,
            })
        }
    }

    pub fn metadata(&self, handle: Handle) -> Result<&M, HandleError> {
        self.entry(handle).map(|entry| &entry.metadata)
    }

    pub fn metadata_mut(&mut self, handle: Handle) -> Result<&mut M, HandleError> {
        self.check_owner(handle)?;
        let slot = self
            .slots
            .get_mut(handle.index() as usize)
            .ok_or(HandleError::Unknown { handle })?;
        match slot.entry.as_mut() {
            Some(entry) if slot.generation == handle.generation() => Ok(&mut entry.metadata),
            _ => Err(HandleError::Deleted { handle }),
        }
    }

    /// Delete a live resource, returning its metadata.
    ///
    /// Deleting twice fails with [`HandleError::Deleted`] and changes nothing.
    pub fn delete(&mut self, handle: Handle) -> Result<M, HandleError> {
        self.assert_live(handle)?;

        let index = handle.index();
        let slot = &mut self.slots[index as usize];
        let entry = slot.entry.take().ok_or(HandleError::Deleted { handle })?;
        self.live -= 1;

        // A slot whose generation would wrap is retired for good.
        match slot.generation.checked_add(1) {
            Some(next) => {
                slot.generation = next;
                self.free.push(index);
            }
            None => {
                tracing::debug!(index, "registry slot exhausted its generations; retiring it");
            }
        }

        Ok(entry.metadata)
    }

    /// True when `handle` belongs to this registry but no longer names a live resource.
    pub fn is_deleted(&self, handle: Handle) -> bool {
        matches!(self.assert_live(handle), Err(HandleError::Deleted { .. }))
    }

    /// Number of live resources.
    pub fn live_count(&self) -> usize {
        self.live
    }

    /// Iterate over every live resource.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &M)> + '_ {
        let context = self.context;
        self.slots.iter().enumerate().filter_map(move |(index, slot)| {
            slot.entry.as_ref().map(|entry| {
                (
                    Handle::new(index as u32, slot.generation, entry.kind, context),
                    &entry.metadata,
                )
            })
        })
    }

    fn check_owner(&self, handle: Handle) -> Result<(), HandleError> {
        if handle.context() == self.context {
            Ok(())
        } else {
            Err(HandleError::Foreign {
                handle,
                owner: handle.context(),
                context: self.context,
            })
        }
    }

    fn entry(&self, handle: Handle) -> Result<&Entry<M>, HandleError> {
        self.check_owner(handle)?;
        let slot = self
            .slots
            .get(handle.index() as usize)
            .ok_or(HandleError::Unknown { handle })?;
        match slot.entry.as_ref() {
            Some(entry) if slot.generation == handle.generation() => Ok(entry),
            _ => Err(HandleError::Deleted { handle }),
        }
    }
}
