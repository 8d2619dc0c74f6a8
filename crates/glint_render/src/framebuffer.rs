//! Framebuffers
//!
//! A [`FramebufferBuilder`] collects attachments against the context's
//! attachment points and draw buffers. [`Context::framebuffer_allocate`]
//! validates everything it references, pushes the attachments to the device
//! and only hands back a [`FramebufferDescriptor`] once the device reports
//! the result complete.
//!
//! Draw and read targets are bound independently.

use crate::backend::Device;
use crate::bindings::BindingPoint;
use crate::context::Context;
use crate::error::GlError;
use crate::resources::{Renderable, Resource};
use crate::types::{CubeFace, DepthStencilBits, FramebufferStatus, FramebufferTarget};
use glint_core::{ContextId, Handle, ResourceKind};
use std::collections::BTreeMap;

/// A color attachment point (`GL_COLOR_ATTACHMENTi`) of one context.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttachmentPoint {
    index: u32,
    context: ContextId,
}

impl AttachmentPoint {
    pub(crate) fn new(index: u32, context: ContextId) -> Self {
        Self { index, context }
    }

    pub fn index(&self) -> u32 {
        self.index
    }
}

/// A fragment shader output slot (`GL_DRAW_BUFFERi`) of one context.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DrawBuffer {
    index: u32,
    context: ContextId,
}

impl DrawBuffer {
    pub(crate) fn new(index: u32, context: ContextId) -> Self {
        Self { index, context }
    }

    pub fn index(&self) -> u32 {
        self.index
    }
}

/// Image attached to a color attachment point.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ColorAttachment {
    Texture2D(Handle),
    CubeFace(Handle, CubeFace),
}

impl ColorAttachment {
    pub fn texture(&self) -> Handle {
        match self {
            Self::Texture2D(texture) | Self::CubeFace(texture, _) => *texture,
        }
    }

    fn expected_kind(&self) -> ResourceKind {
        match self {
            Self::Texture2D(_) => ResourceKind::Texture2D,
            Self::CubeFace(..) => ResourceKind::TextureCube,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DepthAttachment {
    Depth(Handle),
    DepthStencil(Handle),
}

impl DepthAttachment {
    pub fn texture(&self) -> Handle {
        match self {
            Self::Depth(texture) | Self::DepthStencil(texture) => *texture,
        }
    }
}

/// Pending attachments for a framebuffer.
#[derive(Debug, Clone)]
pub struct FramebufferBuilder {
    context: ContextId,
    colors: BTreeMap<AttachmentPoint, ColorAttachment>,
    draw_buffers: BTreeMap<DrawBuffer, AttachmentPoint>,
    depth: Option<DepthAttachment>,
}

impl FramebufferBuilder {
    fn new(context: ContextId) -> Self {
        Self {
            context,
            colors: BTreeMap::new(),
            draw_buffers: BTreeMap::new(),
            depth: None,
        }
    }

    /// Attach `source` at `point`, routed from the draw buffer with the same index.
    pub fn attach_color(&mut self, point: AttachmentPoint, source: ColorAttachment) -> &mut Self {
        let buffer = DrawBuffer::new(point.index, point.context);
        self.attach_color_at(point, buffer, source)
    }

    /// Attach `source` at `point`, routed from `buffer`.
    pub fn attach_color_at(
        &mut self,
        point: AttachmentPoint,
        buffer: DrawBuffer,
        source: ColorAttachment,
    ) -> &mut Self {
        self.draw_buffers.retain(|_, routed| *routed != point);
        self.colors.insert(point, source);
        self.draw_buffers.insert(buffer, point);
        self
    }

    pub fn detach_color(&mut self, point: AttachmentPoint) -> &mut Self {
        self.colors.remove(&point);
        self.draw_buffers.retain(|_, routed| *routed != point);
        self
    }

    pub fn attach_depth(&mut self, texture: Handle) -> &mut Self {
        self.depth = Some(DepthAttachment::Depth(texture));
        self
    }

    pub fn attach_depth_stencil(&mut self, texture: Handle) -> &mut Self {
        self.depth = Some(DepthAttachment::DepthStencil(texture));
        self
    }

    pub fn detach_depth(&mut self) -> &mut Self {
        self.depth = None;
        self
    }
}

/// Attachments of an allocated framebuffer.
#[derive(Debug, Clone, PartialEq)]
pub struct FramebufferLayout {
    colors: BTreeMap<AttachmentPoint, ColorAttachment>,
    draw_buffers: Vec<Option<AttachmentPoint>>,
    depth: Option<DepthAttachment>,
    bits: DepthStencilBits,
}

impl FramebufferLayout {
    pub fn bits(&self) -> DepthStencilBits {
        self.bits
    }

    pub fn color_attachment(&self, point: AttachmentPoint) -> Option<ColorAttachment> {
        self.colors.get(&point).copied()
    }

    pub fn draw_buffer(&self, buffer: DrawBuffer) -> Option<AttachmentPoint> {
        self.draw_buffers
            .get(buffer.index as usize)
            .copied()
            .flatten()
    }

    pub fn depth_attachment(&self) -> Option<DepthAttachment> {
        self.depth
    }

    /// Every attached texture.
    pub fn textures(&self) -> impl Iterator<Item = Handle> + '_ {
        self.colors
            .values()
            .map(ColorAttachment::texture)
            .chain(self.depth.iter().map(DepthAttachment::texture))
    }

    pub fn references(&self, texture: Handle) -> bool {
        self.textures().any(|attached| attached == texture)
    }
}

/// A complete framebuffer.
#[derive(Debug, Clone, PartialEq)]
pub struct FramebufferDescriptor {
    handle: Handle,
    layout: FramebufferLayout,
}

impl FramebufferDescriptor {
    pub fn handle(&self) -> Handle {
        self.handle
    }

    pub fn layout(&self) -> &FramebufferLayout {
        &self.layout
    }

    /// Depth bits, 0 without a depth attachment.
    pub fn depth_bits(&self) -> u32 {
        self.layout.bits.depth
    }

    /// Stencil bits, 0 without a depth-stencil attachment.
    pub fn stencil_bits(&self) -> u32 {
        self.layout.bits.stencil
    }
}

impl<D: Device> Context<D> {
    pub fn framebuffer_color_attachment_points(&self) -> &[AttachmentPoint] {
        &self.attachment_points
    }

    pub fn framebuffer_draw_buffers(&self) -> &[DrawBuffer] {
        &self.draw_buffers
    }

    pub fn framebuffer_new_builder(&self) -> FramebufferBuilder {
        FramebufferBuilder::new(self.id)
    }

    pub fn framebuffer_descriptor(&self, framebuffer: Handle) -> Result<FramebufferDescriptor, GlError> {
        Ok(FramebufferDescriptor {
            handle: framebuffer,
            layout: self.framebuffer_layout(framebuffer)?.clone(),
        })
    }

    /// Renderability of a texture about to be attached, after checking it
    /// is live, of the right kind and not bound to any unit.
    fn attachable(&self, texture: Handle, kind: ResourceKind) -> Result<Renderable, GlError> {
        self.resources
            .assert_kind(texture, kind.name(), |actual| actual == kind)?;
        if self.bindings.texture_is_bound_anywhere(texture) {
            return Err(GlError::FeedbackLoop {
                framebuffer: None,
                texture,
            });
        }
        self.resources
            .metadata(texture)?
            .texture()
            .map(|descriptor| descriptor.renderable)
            .ok_or_else(|| GlError::Misconfigured(format!("{texture} has no storage")))
    }

    fn check_color_slot(&self, index: u32, context: ContextId, what: &str) -> Result<(), GlError> {
        if context != self.id || index as usize >= self.attachment_points.len() {
            return Err(GlError::Misconfigured(format!(
                "{what} {index} does not belong to context {}",
                self.id
            )));
        }
        Ok(())
    }

    /// Validate `builder` against this context.
    fn validate_builder(&self, builder: &FramebufferBuilder) -> Result<FramebufferLayout, GlError> {
        if builder.context != self.id {
            return Err(GlError::Misconfigured(format!(
                "framebuffer builder belongs to context {}, not {}",
                builder.context, self.id
            )));
        }

        for (point, source) in &builder.colors {
            self.check_color_slot(point.index, point.context, "attachment point")?;
            let renderable = self.attachable(source.texture(), source.expected_kind())?;
            if renderable != Renderable::Color {
                return Err(GlError::Misconfigured(format!(
                    "{} is not color-renderable",
                    source.texture()
                )));
            }
        }

        let mut draw_buffers = vec![None; self.draw_buffers.len()];
        for (buffer, point) in &builder.draw_buffers {
            self.check_color_slot(buffer.index, buffer.context, "draw buffer")?;
            draw_buffers[buffer.index as usize] = Some(*point);
        }

        let bits = match builder.depth {
            None => DepthStencilBits::default(),
            Some(DepthAttachment::Depth(texture)) => {
                match self.attachable(texture, ResourceKind::Texture2D)? {
                    Renderable::Depth { depth_bits } => DepthStencilBits {
                        depth: depth_bits,
                        stencil: 0,
                    },
                    _ => {
                        return Err(GlError::Misconfigured(format!(
                            "{texture} is not depth-renderable"
                        )))
                    }
                }
            }
            Some(DepthAttachment::DepthStencil(texture)) => {
                match self.attachable(texture, ResourceKind::Texture2D)? {
                    Renderable::DepthStencil {
                        depth_bits,
                        stencil_bits,
                    } => DepthStencilBits {
                        depth: depth_bits,
                        stencil: stencil_bits,
                    },
                    _ => {
                        return Err(GlError::Misconfigured(format!(
                            "{texture} is not depth-stencil-renderable"
                        )))
                    }
                }
            }
        };

        Ok(FramebufferLayout {
            colors: builder.colors.clone(),
            draw_buffers,
            depth: builder.depth,
            bits,
        })
    }

    /// Create a framebuffer from `builder`.
    ///
    /// The new framebuffer is left bound as the draw target. If the device
    /// reports it incomplete it is deleted again and
    /// [`GlError::FramebufferIncomplete`] is returned.
    pub fn framebuffer_allocate(
        &mut self,
        builder: &FramebufferBuilder,
    ) -> Result<FramebufferDescriptor, GlError> {
        let layout = self.validate_builder(builder)?;
        let handle = self.create(
            ResourceKind::Framebuffer,
            Resource::Framebuffer(layout.clone()),
            D::create_object,
        )?;
        self.bind_point(BindingPoint::DrawFramebuffer, handle)?;

        if let Some(depth) = layout.depth {
            self.device.attach_depth(depth);
            self.record(true);
        }
        for (point, source) in &layout.colors {
            self.device.attach_color(point.index, *source);
            self.record(true);
        }
        let mapping: Vec<Option<u32>> = layout
            .draw_buffers
            .iter()
            .map(|point| point.map(|point| point.index))
            .collect();
        self.device.draw_buffers(&mapping);
        self.record(true);

        let status = self.device.framebuffer_status(FramebufferTarget::Draw);
        self.record(true);
        if status != FramebufferStatus::Complete {
            tracing::warn!(%handle, ?status, "framebuffer incomplete, deleting it");
            self.delete(handle)?;
            return Err(GlError::FramebufferIncomplete(status));
        }

        tracing::debug!(
            %handle,
            colors = layout.colors.len(),
            depth_bits = layout.bits.depth,
            stencil_bits = layout.bits.stencil,
            "framebuffer allocated"
        );
        Ok(FramebufferDescriptor { handle, layout })
    }

    /// Bind `framebuffer` as the draw target.
    ///
    /// Fails with [`GlError::FeedbackLoop`] if one of its textures is bound
    /// to a texture unit.
    pub fn framebuffer_draw_bind(&mut self, framebuffer: Handle) -> Result<(), GlError> {
        let layout = self.framebuffer_layout(framebuffer)?;
        if self.bindings.current(BindingPoint::DrawFramebuffer) != Some(framebuffer) {
            if let Some(texture) = layout
                .textures()
                .find(|texture| self.bindings.texture_is_bound_anywhere(*texture))
            {
                return Err(GlError::FeedbackLoop {
                    framebuffer: Some(framebuffer),
                    texture,
                });
            }
        }
        self.bind_point(BindingPoint::DrawFramebuffer, framebuffer)?;
        Ok(())
    }

    pub fn framebuffer_draw_unbind(&mut self) {
        self.unbind_point(BindingPoint::DrawFramebuffer);
    }

    pub fn framebuffer_draw_is_bound(&self, framebuffer: Handle) -> Result<bool, GlError> {
        self.framebuffer_layout(framebuffer)?;
        Ok(self.bindings.current(BindingPoint::DrawFramebuffer) == Some(framebuffer))
    }

    pub fn framebuffer_draw_any_is_bound(&self) -> bool {
        self.bindings.current(BindingPoint::DrawFramebuffer).is_some()
    }

    pub fn framebuffer_draw_get_bound(&self) -> Option<Handle> {
        self.bindings.current(BindingPoint::DrawFramebuffer)
    }

    /// Ask the device for the completeness of the bound draw framebuffer.
    pub fn framebuffer_draw_validate(&mut self) -> Result<FramebufferStatus, GlError> {
        self.validate_target(FramebufferTarget::Draw)
    }

    pub fn framebuffer_read_bind(&mut self, framebuffer: Handle) -> Result<(), GlError> {
        self.bind_point(BindingPoint::ReadFramebuffer, framebuffer)?;
        Ok(())
    }

    pub fn framebuffer_read_unbind(&mut self) {
        self.unbind_point(BindingPoint::ReadFramebuffer);
    }

    pub fn framebuffer_read_is_bound(&self, framebuffer: Handle) -> Result<bool, GlError> {
        self.framebuffer_layout(framebuffer)?;
        Ok(self.bindings.current(BindingPoint::ReadFramebuffer) == Some(framebuffer))
    }

    pub fn framebuffer_read_any_is_bound(&self) -> bool {
        self.bindings.current(BindingPoint::ReadFramebuffer).is_some()
    }

    pub fn framebuffer_read_get_bound(&self) -> Option<Handle> {
        self.bindings.current(BindingPoint::ReadFramebuffer)
    }

    pub fn framebuffer_read_validate(&mut self) -> Result<FramebufferStatus, GlError> {
        self.validate_target(FramebufferTarget::Read)
    }

    fn validate_target(&mut self, target: FramebufferTarget) -> Result<FramebufferStatus, GlError> {
        if self
            .bindings
            .current(BindingPoint::for_framebuffer(target))
            .is_none()
        {
            return Err(GlError::NotBound(format!("no {target:?} framebuffer is bound")));
        }
        let status = self.device.framebuffer_status(target);
        self.record(true);
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{DeviceCall, RecordingDevice};
    use crate::resources::TextureDescriptor;
    use crate::types::DepthFunction;
    use crate::ContextConfig;
    use glint_core::HandleError;

    fn context() -> Context<RecordingDevice> {
        Context::new(RecordingDevice::new(), &ContextConfig::default()).unwrap()
    }

    /// Allocate a texture and leave no unit holding it.
    fn texture(ctx: &mut Context<RecordingDevice>, renderable: Renderable) -> Handle {
        let unit = ctx.texture_units()[0];
        let texture = ctx
            .texture_2d_allocate(unit, TextureDescriptor::new(256, 256, renderable))
            .unwrap();
        ctx.texture_unit_unbind(unit).unwrap();
        texture
    }

    fn color_and_depth(ctx: &mut Context<RecordingDevice>) -> (Handle, Handle, FramebufferBuilder) {
        let color = texture(ctx, Renderable::Color);
        let depth = texture(
            ctx,
            Renderable::DepthStencil {
                depth_bits: 24,
                stencil_bits: 8,
            },
        );
        let point = ctx.framebuffer_color_attachment_points()[0];
        let mut builder = ctx.framebuffer_new_builder();
        builder
            .attach_color(point, ColorAttachment::Texture2D(color))
            .attach_depth_stencil(depth);
        (color, depth, builder)
    }

    #[test]
    fn allocate_binds_attaches_and_reports_bits() {
        let mut ctx = context();
        let (_, _, builder) = color_and_depth(&mut ctx);
        ctx.device_mut().clear();

        let fb = ctx.framebuffer_allocate(&builder).unwrap();
        let handle = fb.handle();
        assert_eq!(fb.depth_bits(), 24);
        assert_eq!(fb.stencil_bits(), 8);

        let device = ctx.device();
        assert_eq!(
            device.count(|c| matches!(c, DeviceCall::BindFramebuffer(FramebufferTarget::Draw, _))),
            1
        );
        assert_eq!(device.count(|c| matches!(c, DeviceCall::AttachColor(..))), 1);
        assert_eq!(device.count(|c| matches!(c, DeviceCall::AttachDepth(_))), 1);
        assert_eq!(device.count(|c| matches!(c, DeviceCall::DrawBuffers(_))), 1);

        // Already bound as the draw target by allocation.
        ctx.framebuffer_draw_bind(handle).unwrap();
        assert_eq!(
            ctx.device()
                .count(|c| matches!(c, DeviceCall::BindFramebuffer(FramebufferTarget::Draw, _))),
            1
        );
        assert_eq!(ctx.framebuffer_draw_get_bound(), Some(handle));
    }

    #[test]
    fn draw_buffer_mapping_follows_builder() {
        let mut ctx = context();
        let color = texture(&mut ctx, Renderable::Color);
        let point = ctx.framebuffer_color_attachment_points()[2];
        let buffer = ctx.framebuffer_draw_buffers()[0];
        let mut builder = ctx.framebuffer_new_builder();
        builder.attach_color_at(point, buffer, ColorAttachment::Texture2D(color));

        let fb = ctx.framebuffer_allocate(&builder).unwrap();
        assert_eq!(fb.layout().draw_buffer(buffer), Some(point));
        assert_eq!(fb.depth_bits(), 0);

        let mut expected = vec![None; ctx.framebuffer_draw_buffers().len()];
        expected[0] = Some(2);
        assert_eq!(
            ctx.device()
                .count(|c| *c == DeviceCall::DrawBuffers(expected.clone())),
            1
        );
    }

    #[test]
    fn detach_removes_pending_attachments() {
        let mut ctx = context();
        let (color, _, mut builder) = color_and_depth(&mut ctx);
        let point = ctx.framebuffer_color_attachment_points()[0];
        builder.detach_color(point).detach_depth();

        let fb = ctx.framebuffer_allocate(&builder).unwrap();
        assert!(!fb.layout().references(color));
        assert_eq!(fb.layout().depth_attachment(), None);
        assert_eq!(ctx.device().count(|c| matches!(c, DeviceCall::AttachColor(..))), 0);
    }

    #[test]
    fn draw_and_read_targets_are_independent() {
        let mut ctx = context();
        let (_, _, builder) = color_and_depth(&mut ctx);
        let fb = ctx.framebuffer_allocate(&builder).unwrap().handle();
        let binds = |ctx: &Context<RecordingDevice>, target| {
            ctx.device()
                .count(|c| *c == DeviceCall::BindFramebuffer(target, Some(fb)))
        };

        ctx.framebuffer_draw_unbind();
        assert!(!ctx.framebuffer_draw_any_is_bound());

        ctx.framebuffer_read_bind(fb).unwrap();
        assert_eq!(binds(&ctx, FramebufferTarget::Read), 1);
        ctx.framebuffer_read_bind(fb).unwrap();
        assert_eq!(binds(&ctx, FramebufferTarget::Read), 1);
        assert_eq!(ctx.framebuffer_read_is_bound(fb), Ok(true));
        assert_eq!(ctx.framebuffer_draw_is_bound(fb), Ok(false));

        ctx.framebuffer_read_unbind();
        ctx.framebuffer_read_unbind();
        assert_eq!(
            ctx.device()
                .count(|c| *c == DeviceCall::BindFramebuffer(FramebufferTarget::Read, None)),
            1
        );
        assert_eq!(ctx.framebuffer_read_get_bound(), None);
        assert!(!ctx.framebuffer_read_any_is_bound());
    }

    #[test]
    fn validate_requires_a_binding() {
        let mut ctx = context();
        assert!(matches!(
            ctx.framebuffer_draw_validate(),
            Err(GlError::NotBound(_))
        ));
        assert!(matches!(
            ctx.framebuffer_read_validate(),
            Err(GlError::NotBound(_))
        ));

        let (_, _, builder) = color_and_depth(&mut ctx);
        ctx.framebuffer_allocate(&builder).unwrap();
        assert_eq!(
            ctx.framebuffer_draw_validate(),
            Ok(FramebufferStatus::Complete)
        );
    }

    #[test]
    fn incomplete_framebuffer_is_deleted() {
        let device =
            RecordingDevice::new().with_framebuffer_status(FramebufferStatus::MissingAttachment);
        let mut ctx = Context::new(device, &ContextConfig::default()).unwrap();
        let builder = ctx.framebuffer_new_builder();
        let before = ctx.live_resources();

        assert_eq!(
            ctx.framebuffer_allocate(&builder),
            Err(GlError::FramebufferIncomplete(
                FramebufferStatus::MissingAttachment
            ))
        );
        assert_eq!(ctx.live_resources(), before);
        assert!(!ctx.framebuffer_draw_any_is_bound());
    }

    #[test]
    fn bits_follow_the_draw_target() {
        let device = RecordingDevice::new().with_default_framebuffer(DepthStencilBits {
            depth: 0,
            stencil: 0,
        });
        let mut ctx = Context::new(device, &ContextConfig::default()).unwrap();
        assert_eq!(
            ctx.depth_buffer_test_enable(DepthFunction::Less),
            Err(GlError::NoDepthBuffer)
        );

        let (_, _, builder) = color_and_depth(&mut ctx);
        ctx.framebuffer_allocate(&builder).unwrap();
        assert_eq!(ctx.depth_buffer_get_bits(), 24);
        assert_eq!(ctx.stencil_buffer_get_bits(), 8);
        assert!(ctx.depth_buffer_test_enable(DepthFunction::Less).is_ok());
        assert!(ctx.stencil_buffer_enable().is_ok());

        ctx.framebuffer_draw_unbind();
        assert_eq!(ctx.stencil_buffer_enable(), Err(GlError::NoStencilBuffer));
    }

    #[test]
    fn texture_bound_to_unit_cannot_be_attached() {
        let mut ctx = context();
        let unit = ctx.texture_units()[0];
        let color = ctx
            .texture_2d_allocate(unit, TextureDescriptor::new(4, 4, Renderable::Color))
            .unwrap();
        let point = ctx.framebuffer_color_attachment_points()[0];
        let mut builder = ctx.framebuffer_new_builder();
        builder.attach_color(point, ColorAttachment::Texture2D(color));

        assert_eq!(
            ctx.framebuffer_allocate(&builder),
            Err(GlError::FeedbackLoop {
                framebuffer: None,
                texture: color,
            })
        );
        assert_eq!(ctx.live_resources(), 1);
    }

    #[test]
    fn feedback_loops_are_rejected_both_ways() {
        let mut ctx = context();
        let (color, _, builder) = color_and_depth(&mut ctx);
        let fb = ctx.framebuffer_allocate(&builder).unwrap().handle();
        let unit = ctx.texture_units()[1];

        assert_eq!(
            ctx.texture_bind(unit, color),
            Err(GlError::FeedbackLoop {
                framebuffer: Some(fb),
                texture: color,
            })
        );

        ctx.framebuffer_draw_unbind();
        ctx.texture_bind(unit, color).unwrap();
        assert_eq!(
            ctx.framebuffer_draw_bind(fb),
            Err(GlError::FeedbackLoop {
                framebuffer: Some(fb),
                texture: color,
            })
        );
    }

    #[test]
    fn attachments_must_be_renderable_and_live() {
        let mut ctx = context();
        let depth_only = texture(&mut ctx, Renderable::Depth { depth_bits: 16 });
        let plain = texture(&mut ctx, Renderable::NotRenderable);
        let point = ctx.framebuffer_color_attachment_points()[0];

        let mut builder = ctx.framebuffer_new_builder();
        builder.attach_color(point, ColorAttachment::Texture2D(depth_only));
        assert!(matches!(
            ctx.framebuffer_allocate(&builder),
            Err(GlError::Misconfigured(_))
        ));

        let mut builder = ctx.framebuffer_new_builder();
        builder.attach_depth_stencil(depth_only);
        assert!(matches!(
            ctx.framebuffer_allocate(&builder),
            Err(GlError::Misconfigured(_))
        ));

        let mut builder = ctx.framebuffer_new_builder();
        builder.attach_color(point, ColorAttachment::CubeFace(plain, CubeFace::PositiveX));
        assert!(matches!(
            ctx.framebuffer_allocate(&builder),
            Err(GlError::Handle(HandleError::WrongKind { .. }))
        ));

        ctx.delete(plain).unwrap();
        let mut builder = ctx.framebuffer_new_builder();
        builder.attach_depth(plain);
        assert_eq!(
            ctx.framebuffer_allocate(&builder),
            Err(GlError::Handle(HandleError::Deleted { handle: plain }))
        );
    }

    #[test]
    fn builders_of_other_contexts_are_rejected() {
        let mut ours = context();
        let theirs = context();
        let builder = theirs.framebuffer_new_builder();

        assert!(matches!(
            ours.framebuffer_allocate(&builder),
            Err(GlError::Misconfigured(_))
        ));
    }

    #[test]
    fn deleting_a_bound_framebuffer_clears_both_targets() {
        let mut ctx = context();
        let (_, _, builder) = color_and_depth(&mut ctx);
        let fb = ctx.framebuffer_allocate(&builder).unwrap().handle();
        ctx.framebuffer_read_bind(fb).unwrap();

        ctx.delete(fb).unwrap();
        assert!(!ctx.framebuffer_draw_any_is_bound());
        assert!(!ctx.framebuffer_read_any_is_bound());
        assert!(ctx.framebuffer_draw_bind(fb).is_err());
    }
}
