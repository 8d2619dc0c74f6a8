//! Device context
//!
//! A [`Context`] owns one device together with every cache kept for it:
//! probed capabilities, pipeline state, binding points and the resource
//! registry. All typed operations are methods on it and live in the
//! `ops` and `framebuffer` modules.

use crate::backend::Device;
use crate::bindings::{BindingPoint, BindingTracker};
use crate::capabilities::{Capabilities, CapabilityProbe};
use crate::config::ContextConfig;
use crate::error::GlError;
use crate::framebuffer::{AttachmentPoint, DrawBuffer, FramebufferLayout};
use crate::ops::TextureUnit;
use crate::resources::Resource;
use crate::state::StateCache;
use crate::types::DepthStencilBits;
use glint_core::{ContextId, Handle, ResourceKind, ResourceRegistry};
use glint_metrics::{Counter, ELIDED, ISSUED};
use std::marker::PhantomData;

/// A validated, state-deduplicating view of one device session.
///
/// Contexts are bound to the thread that created the device and are
/// neither `Send` nor `Sync`.
pub struct Context<D: Device> {
    pub(crate) id: ContextId,
    pub(crate) device: D,
    pub(crate) capabilities: Capabilities,
    pub(crate) state: StateCache,
    pub(crate) bindings: BindingTracker,
    pub(crate) resources: ResourceRegistry<Resource>,
    pub(crate) attachment_points: Vec<AttachmentPoint>,
    pub(crate) draw_buffers: Vec<DrawBuffer>,
    pub(crate) texture_units: Vec<TextureUnit>,
    pub(crate) default_bits: DepthStencilBits,
    counters: Counter,
    _thread_affine: PhantomData<*const ()>,
}

impl<D: Device> Context<D> {
    /// Probe `device` and wrap it.
    ///
    /// Fails with [`GlError::NonCompliant`] if any limit is below its
    /// mandated minimum; no context exists in that case.
    pub fn new(mut device: D, config: &ContextConfig) -> Result<Self, GlError> {
        let capabilities = CapabilityProbe::new(&mut device).probe(config)?;
        let default_bits = device.default_framebuffer_bits();
        let id = ContextId::next();

        let color_slots = capabilities.color_slots();
        let units = capabilities.texture_units.clamped;
        tracing::debug!(
            context = %id,
            color_slots,
            texture_units = units,
            max_texture_size = capabilities.texture_size.clamped,
            depth_bits = default_bits.depth,
            stencil_bits = default_bits.stencil,
            "context created"
        );

        Ok(Self {
            id,
            device,
            capabilities,
            state: StateCache::new(),
            bindings: BindingTracker::new(units),
            resources: ResourceRegistry::new(id),
            attachment_points: (0..color_slots)
                .map(|index| AttachmentPoint::new(index, id))
                .collect(),
            draw_buffers: (0..color_slots)
                .map(|index| DrawBuffer::new(index, id))
                .collect(),
            texture_units: (0..units).map(|index| TextureUnit::new(index, id)).collect(),
            default_bits,
            counters: Counter::new(),
            _thread_affine: PhantomData,
        })
    }

    pub fn id(&self) -> ContextId {
        self.id
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    /// Direct device access. Calls made through it bypass the caches.
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn into_device(self) -> D {
        self.device
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Cached pipeline state.
    pub fn state(&self) -> &StateCache {
        &self.state
    }

    /// Issued and elided device call counts.
    pub fn counters(&self) -> &Counter {
        &self.counters
    }

    /// Number of live resources.
    pub fn live_resources(&self) -> usize {
        self.resources.live_count()
    }

    /// Delete any resource.
    ///
    /// Every binding point still holding the handle is cleared first.
    /// Deleting twice fails and changes nothing.
    pub fn delete(&mut self, handle: Handle) -> Result<(), GlError> {
        self.resources.assert_live(handle)?;

        let released = self.bindings.release(&mut self.device, handle);
        self.counters.increment(ISSUED, released as u64);

        self.device.delete_object(handle);
        self.record(true);
        self.resources.delete(handle)?;
        tracing::debug!(%handle, released, "deleted");
        Ok(())
    }

    /// True if `handle` was allocated by this context and has since been deleted.
    pub fn is_deleted(&self, handle: Handle) -> bool {
        self.resources.is_deleted(handle)
    }

    pub(crate) fn record(&mut self, issued: bool) -> bool {
        self.counters
            .increment(if issued { ISSUED } else { ELIDED }, 1);
        issued
    }

    /// Register a resource and create its device object.
    pub(crate) fn create(
        &mut self,
        kind: ResourceKind,
        resource: Resource,
        make: impl FnOnce(&mut D, Handle) -> Result<(), String>,
    ) -> Result<Handle, GlError> {
        let handle = self.resources.allocate(kind, resource);
        if let Err(reason) = make(&mut self.device, handle) {
            self.resources.delete(handle)?;
            tracing::warn!(%handle, %reason, "device refused to create object");
            return Err(GlError::Backend(reason));
        }
        self.record(true);
        tracing::debug!(%handle, "allocated");
        Ok(handle)
    }

    pub(crate) fn bind_point(&mut self, point: BindingPoint, handle: Handle) -> Result<bool, GlError> {
        let issued = self
            .bindings
            .bind(&mut self.device, &self.resources, point, handle)?;
        Ok(self.record(issued))
    }

    pub(crate) fn unbind_point(&mut self, point: BindingPoint) -> bool {
        let issued = self.bindings.unbind(&mut self.device, point);
        self.record(issued)
    }

    pub(crate) fn framebuffer_layout(&self, framebuffer: Handle) -> Result<&FramebufferLayout, GlError> {
        self.resources.assert_kind(framebuffer, "framebuffer", |kind| {
            kind == ResourceKind::Framebuffer
        })?;
        self.resources
            .metadata(framebuffer)?
            .framebuffer()
            .ok_or_else(|| GlError::Misconfigured(format!("{framebuffer} has no attachments")))
    }

    /// Depth and stencil bits of the current draw target.
    pub(crate) fn draw_target_bits(&self) -> DepthStencilBits {
        self.bindings
            .current(BindingPoint::DrawFramebuffer)
            .and_then(|framebuffer| self.framebuffer_layout(framebuffer).ok())
            .map(FramebufferLayout::bits)
            .unwrap_or(self.default_bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Limit;
    use crate::fake::{DeviceCall, RecordingDevice};
    use crate::types::BufferTarget;
    use crate::{BufferUsage, GlError};
    use glint_core::HandleError;

    fn context() -> Context<RecordingDevice> {
        Context::new(RecordingDevice::new(), &ContextConfig::default()).unwrap()
    }

    #[test]
    fn non_compliant_device_yields_no_context() {
        let device = RecordingDevice::new().with_limit(Limit::MaxColorAttachments, 1);
        let err = Context::new(device, &ContextConfig::default()).err();
        assert!(matches!(err, Some(GlError::NonCompliant { reported: 1, .. })));
    }

    #[test]
    fn ceiling_below_minimum_yields_no_context() {
        let config = ContextConfig {
            texture_unit_ceiling: 0,
            ..ContextConfig::default()
        };
        let err = Context::new(RecordingDevice::new(), &config).err();
        assert!(matches!(err, Some(GlError::Misconfigured(_))));
    }

    #[test]
    fn limits_are_clamped_to_configured_ceilings() {
        let device = RecordingDevice::new()
            .with_limit(Limit::MaxColorAttachments, 4096)
            .with_limit(Limit::MaxDrawBuffers, 4096)
            .with_limit(Limit::MaxTextureImageUnits, 4096);
        let ctx = Context::new(device, &ContextConfig::default()).unwrap();

        assert_eq!(ctx.capabilities().color_attachments.clamped, 1024);
        assert_eq!(ctx.capabilities().texture_units.clamped, 1024);
        assert_eq!(ctx.texture_units().len(), 1024);
    }

    #[test]
    fn double_delete_fails_and_leaves_others_alone() {
        let mut ctx = context();
        let a = ctx
            .buffer_allocate(BufferTarget::Array, 16, BufferUsage::StaticDraw)
            .unwrap();
        let b = ctx
            .buffer_allocate(BufferTarget::Index, 16, BufferUsage::StaticDraw)
            .unwrap();

        ctx.delete(a).unwrap();
        let calls = ctx.device().calls().len();
        assert_eq!(
            ctx.delete(a),
            Err(GlError::Handle(HandleError::Deleted { handle: a }))
        );
        assert_eq!(ctx.device().calls().len(), calls);
        assert!(ctx.is_deleted(a));
        assert!(!ctx.is_deleted(b));
        assert_eq!(ctx.buffer_get_bound(BufferTarget::Index), Some(b));
    }

    #[test]
    fn deleting_a_bound_handle_clears_its_binding() {
        let mut ctx = context();
        let buffer = ctx
            .buffer_allocate(BufferTarget::Array, 16, BufferUsage::StaticDraw)
            .unwrap();
        ctx.device_mut().clear();

        ctx.delete(buffer).unwrap();
        assert_eq!(ctx.buffer_get_bound(BufferTarget::Array), None);
        assert_eq!(
            ctx.device().calls(),
            &[
                DeviceCall::BindBuffer(BufferTarget::Array, None),
                DeviceCall::DeleteObject(buffer),
            ]
        );
    }

    #[test]
    fn foreign_handles_are_rejected() {
        let mut ours = context();
        let mut theirs = context();
        let foreign = theirs
            .buffer_allocate(BufferTarget::Array, 4, BufferUsage::StaticDraw)
            .unwrap();
        ours.device_mut().clear();

        assert!(matches!(
            ours.buffer_bind(foreign),
            Err(GlError::Handle(HandleError::Foreign { .. }))
        ));
        assert!(matches!(
            ours.delete(foreign),
            Err(GlError::Handle(HandleError::Foreign { .. }))
        ));
        assert!(ours.device().calls().is_empty());
    }

    #[test]
    fn refused_creation_leaves_nothing_behind() {
        let mut ctx = Context::new(
            RecordingDevice::new().refusing_creation(),
            &ContextConfig::default(),
        )
        .unwrap();

        let err = ctx.query_allocate().unwrap_err();
        assert!(matches!(err, GlError::Backend(_)));
        assert_eq!(ctx.live_resources(), 0);
    }

    #[test]
    fn counters_track_issued_and_elided() {
        let mut ctx = context();
        ctx.culling_enable(
            crate::FaceSelection::Back,
            crate::FaceWindingOrder::CounterClockwise,
        );
        ctx.culling_enable(
            crate::FaceSelection::Back,
            crate::FaceWindingOrder::CounterClockwise,
        );

        #[cfg(feature = "metrics")]
        {
            // First call: toggle issued, both tuples already at defaults.
            assert_eq!(ctx.counters().get(ISSUED), 1);
            assert_eq!(ctx.counters().get(ELIDED), 5);
        }
    }
}
