//! Texture units and texture objects
//!
//! Each unit has one binding slot per texture target. Binding checks both
//! directions of the framebuffer feedback rule before reaching the device.

use crate::backend::Device;
use crate::bindings::BindingPoint;
use crate::context::Context;
use crate::error::GlError;
use crate::resources::{Resource, TextureDescriptor};
use crate::types::TextureTarget;
use glint_core::{ContextId, Handle, ResourceKind};

/// A texture image unit of one context.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureUnit {
    index: u32,
    context: ContextId,
}

impl TextureUnit {
    pub(crate) fn new(index: u32, context: ContextId) -> Self {
        Self { index, context }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn context(&self) -> ContextId {
        self.context
    }
}

fn target_of(kind: ResourceKind) -> Option<TextureTarget> {
    match kind {
        ResourceKind::Texture2D => Some(TextureTarget::Texture2D),
        ResourceKind::TextureCube => Some(TextureTarget::TextureCube),
        _ => None,
    }
}

impl<D: Device> Context<D> {
    /// Every texture unit, in index order.
    pub fn texture_units(&self) -> &[TextureUnit] {
        &self.texture_units
    }

    pub fn texture_maximum_size(&self) -> u32 {
        self.capabilities.texture_size.clamped
    }

    fn check_unit(&self, unit: TextureUnit) -> Result<(), GlError> {
        if unit.context != self.id || unit.index >= self.bindings.texture_units() {
            return Err(GlError::Misconfigured(format!(
                "texture unit {} does not belong to context {}",
                unit.index, self.id
            )));
        }
        Ok(())
    }

    fn texture_target(&self, texture: Handle) -> Result<TextureTarget, GlError> {
        self.resources
            .assert_kind(texture, "texture", ResourceKind::is_texture)?;
        target_of(texture.kind())
            .ok_or_else(|| GlError::Misconfigured(format!("{texture} is not a texture")))
    }

    pub fn texture_descriptor(&self, texture: Handle) -> Result<TextureDescriptor, GlError> {
        self.texture_target(texture)?;
        self.resources
            .metadata(texture)?
            .texture()
            .copied()
            .ok_or_else(|| GlError::Misconfigured(format!("{texture} has no storage")))
    }

    /// Allocate a 2D texture and leave it bound to `unit`.
    pub fn texture_2d_allocate(
        &mut self,
        unit: TextureUnit,
        descriptor: TextureDescriptor,
    ) -> Result<Handle, GlError> {
        self.texture_allocate(unit, TextureTarget::Texture2D, descriptor)
    }

    /// Allocate a cube texture with six square faces and leave it bound to `unit`.
    pub fn texture_cube_allocate(
        &mut self,
        unit: TextureUnit,
        descriptor: TextureDescriptor,
    ) -> Result<Handle, GlError> {
        if descriptor.width != descriptor.height {
            return Err(GlError::Misconfigured(format!(
                "cube faces must be square, got {}x{}",
                descriptor.width, descriptor.height
            )));
        }
        self.texture_allocate(unit, TextureTarget::TextureCube, descriptor)
    }

    fn texture_allocate(
        &mut self,
        unit: TextureUnit,
        target: TextureTarget,
        descriptor: TextureDescriptor,
    ) -> Result<Handle, GlError> {
        self.check_unit(unit)?;
        let max = self.texture_maximum_size();
        if descriptor.width == 0
            || descriptor.height == 0
            || descriptor.width > max
            || descriptor.height > max
        {
            return Err(GlError::Misconfigured(format!(
                "texture size {}x{} outside 1..={max}",
                descriptor.width, descriptor.height
            )));
        }

        let kind = match target {
            TextureTarget::Texture2D => ResourceKind::Texture2D,
            TextureTarget::TextureCube => ResourceKind::TextureCube,
        };
        let handle = self.create(kind, Resource::Texture(descriptor), D::create_object)?;
        self.bind_point(
            BindingPoint::Texture {
                unit: unit.index,
                target,
            },
            handle,
        )?;
        self.device.texture_storage(target, &descriptor);
        self.record(true);
        Ok(handle)
    }

    /// Bind `texture` to `unit`, replacing whatever held the same target there.
    ///
    /// Fails with [`GlError::FeedbackLoop`] if the texture is attached to
    /// the current draw framebuffer.
    pub fn texture_bind(&mut self, unit: TextureUnit, texture: Handle) -> Result<(), GlError> {
        self.check_unit(unit)?;
        let target = self.texture_target(texture)?;

        if let Some(framebuffer) = self.bindings.current(BindingPoint::DrawFramebuffer) {
            if self.framebuffer_layout(framebuffer)?.references(texture) {
                return Err(GlError::FeedbackLoop {
                    framebuffer: Some(framebuffer),
                    texture,
                });
            }
        }

        self.bind_point(
            BindingPoint::Texture {
                unit: unit.index,
                target,
            },
            texture,
        )?;
        Ok(())
    }

    /// Clear every target of `unit`.
    pub fn texture_unit_unbind(&mut self, unit: TextureUnit) -> Result<(), GlError> {
        self.check_unit(unit)?;
        for target in TextureTarget::ALL {
            self.unbind_point(BindingPoint::Texture {
                unit: unit.index,
                target,
            });
        }
        Ok(())
    }

    pub fn texture_is_bound(&self, unit: TextureUnit, texture: Handle) -> Result<bool, GlError> {
        self.check_unit(unit)?;
        let target = self.texture_target(texture)?;
        Ok(self.bindings.current(BindingPoint::Texture {
            unit: unit.index,
            target,
        }) == Some(texture))
    }

    pub fn texture_is_bound_anywhere(&self, texture: Handle) -> Result<bool, GlError> {
        self.texture_target(texture)?;
        Ok(self.bindings.texture_is_bound_anywhere(texture))
    }
}
