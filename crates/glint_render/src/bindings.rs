//! Binding point tracking
//!
//! Remembers which handle occupies every binding point so redundant binds
//! and unbinds never reach the device, and so deleting a handle can clear
//! every point still holding it.

use crate::backend::Device;
use crate::error::GlError;
use crate::types::{BufferTarget, FramebufferTarget, TextureTarget};
use glint_core::{Handle, ResourceKind, ResourceRegistry};

/// A place a handle can be bound to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BindingPoint {
    ArrayBuffer,
    IndexBuffer,
    Texture { unit: u32, target: TextureTarget },
    DrawFramebuffer,
    ReadFramebuffer,
    Program,
}

impl BindingPoint {
    const FIXED: [BindingPoint; 5] = [
        Self::ArrayBuffer,
        Self::IndexBuffer,
        Self::DrawFramebuffer,
        Self::ReadFramebuffer,
        Self::Program,
    ];

    pub fn for_buffer(target: BufferTarget) -> Self {
        match target {
            BufferTarget::Array => Self::ArrayBuffer,
            BufferTarget::Index => Self::IndexBuffer,
        }
    }

    pub fn for_framebuffer(target: FramebufferTarget) -> Self {
        match target {
            FramebufferTarget::Draw => Self::DrawFramebuffer,
            FramebufferTarget::Read => Self::ReadFramebuffer,
        }
    }

    /// The kind of resource this point accepts.
    pub fn accepts(self) -> ResourceKind {
        match self {
            Self::ArrayBuffer => ResourceKind::ArrayBuffer,
            Self::IndexBuffer => ResourceKind::IndexBuffer,
            Self::Texture {
                target: TextureTarget::Texture2D,
                ..
            } => ResourceKind::Texture2D,
            Self::Texture {
                target: TextureTarget::TextureCube,
                ..
            } => ResourceKind::TextureCube,
            Self::DrawFramebuffer | Self::ReadFramebuffer => ResourceKind::Framebuffer,
            Self::Program => ResourceKind::Program,
        }
    }

    fn fixed_index(self) -> Option<usize> {
        match self {
            Self::ArrayBuffer => Some(0),
            Self::IndexBuffer => Some(1),
            Self::DrawFramebuffer => Some(2),
            Self::ReadFramebuffer => Some(3),
            Self::Program => Some(4),
            Self::Texture { .. } => None,
        }
    }

    fn issue<D: Device>(self, device: &mut D, handle: Option<Handle>) {
        match self {
            Self::ArrayBuffer => device.bind_buffer(BufferTarget::Array, handle),
            Self::IndexBuffer => device.bind_buffer(BufferTarget::Index, handle),
            Self::Texture { unit, target } => device.bind_texture(unit, target, handle),
            Self::DrawFramebuffer => device.bind_framebuffer(FramebufferTarget::Draw, handle),
            Self::ReadFramebuffer => device.bind_framebuffer(FramebufferTarget::Read, handle),
            Self::Program => device.use_program(handle),
        }
    }
}

/// Current occupant of every binding point of a context.
#[derive(Debug, Clone)]
pub struct BindingTracker {
    fixed: [Option<Handle>; 5],
    units: Vec<[Option<Handle>; TextureTarget::COUNT]>,
}

impl BindingTracker {
    pub fn new(texture_units: u32) -> Self {
        Self {
            fixed: [None; 5],
            units: vec![[None; TextureTarget::COUNT]; texture_units as usize],
        }
    }

    pub fn texture_units(&self) -> u32 {
        self.units.len() as u32
    }

    pub fn current(&self, point: BindingPoint) -> Option<Handle> {
        match point {
            BindingPoint::Texture { unit, target } => self
                .units
                .get(unit as usize)
                .and_then(|unit| unit[target.index()]),
            other => other.fixed_index().and_then(|i| self.fixed[i]),
        }
    }

    fn slot_mut(&mut self, point: BindingPoint) -> Option<&mut Option<Handle>> {
        match point {
            BindingPoint::Texture { unit, target } => self
                .units
                .get_mut(unit as usize)
                .map(|unit| &mut unit[target.index()]),
            other => other.fixed_index().map(|i| &mut self.fixed[i]),
        }
    }

    /// Bind `handle` to `point`. Returns whether a device call was issued.
    ///
    /// Fails without touching the device if the handle is stale, foreign or
    /// of a kind the point does not accept, or if the point names a texture
    /// unit this tracker does not have.
    pub fn bind<D: Device, M>(
        &mut self,
        device: &mut D,
        registry: &ResourceRegistry<M>,
        point: BindingPoint,
        handle: Handle,
    ) -> Result<bool, GlError> {
        let accepts = point.accepts();
        registry.assert_kind(handle, accepts.name(), |kind| kind == accepts)?;

        let Some(slot) = self.slot_mut(point) else {
            return Err(GlError::Misconfigured(format!("no binding point {point:?}")));
        };
        if *slot == Some(handle) {
            tracing::trace!(?point, %handle, "redundant bind ignored");
            return Ok(false);
        }
        *slot = Some(handle);
        point.issue(device, Some(handle));
        tracing::trace!(?point, %handle, "bound");
        Ok(true)
    }

    /// Clear `point`. Returns whether a device call was issued.
    pub fn unbind<D: Device>(&mut self, device: &mut D, point: BindingPoint) -> bool {
        let Some(slot) = self.slot_mut(point) else {
            return false;
        };
        if slot.is_none() {
            tracing::trace!(?point, "redundant unbind ignored");
            return false;
        }
        *slot = None;
        point.issue(device, None);
        tracing::trace!(?point, "unbound");
        true
    }

    /// Every point currently holding `handle`.
    pub fn points_holding(&self, handle: Handle) -> Vec<BindingPoint> {
        let fixed = BindingPoint::FIXED
            .into_iter()
            .filter(|point| self.current(*point) == Some(handle));
        let textures = self.units.iter().enumerate().flat_map(move |(unit, slots)| {
            TextureTarget::ALL
                .into_iter()
                .filter(move |target| slots[target.index()] == Some(handle))
                .map(move |target| BindingPoint::Texture {
                    unit: unit as u32,
                    target,
                })
        });
        fixed.chain(textures).collect()
    }

    /// Unbind `handle` from every point holding it. Returns the number of
    /// device calls issued.
    pub fn release<D: Device>(&mut self, device: &mut D, handle: Handle) -> usize {
        self.points_holding(handle)
            .into_iter()
            .filter(|point| self.unbind(device, *point))
            .count()
    }

    pub fn texture_is_bound_anywhere(&self, texture: Handle) -> bool {
        self.units
            .iter()
            .any(|slots| slots.iter().any(|slot| *slot == Some(texture)))
    }
}
