//! Recording device
//!
//! A [`Device`] that performs nothing and remembers every call it receives.
//! Limits, default framebuffer bits and the reported framebuffer status are
//! configurable so that every context code path can be driven without a GPU.
//!
//! Queries (`integer_limit`, `default_framebuffer_bits`) are answered but
//! not recorded.

use crate::backend::{Device, Limit};
use crate::framebuffer::{ColorAttachment, DepthAttachment};
use crate::resources::TextureDescriptor;
use crate::types::*;
use glint_core::Handle;
use std::collections::HashMap;

/// One recorded device call.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    SetCapability(Capability, bool),
    BlendFunctions(BlendFunctions),
    BlendEquations(BlendEquations),
    CullFace(FaceSelection),
    FrontFace(FaceWindingOrder),
    DepthFunction(DepthFunction),
    DepthWrite(bool),
    StencilFunction(FaceSelection, StencilTest),
    StencilMask(FaceSelection, u32),
    StencilOperations(FaceSelection, StencilOperations),
    ColorMask(ColorMask),
    PolygonMode(PolygonMode),
    Scissor(ScissorArea),
    CreateObject(Handle),
    CreateShader(Handle, ShaderStage),
    DeleteObject(Handle),
    BindBuffer(BufferTarget, Option<Handle>),
    BindTexture(u32, TextureTarget, Option<Handle>),
    BindFramebuffer(FramebufferTarget, Option<Handle>),
    UseProgram(Option<Handle>),
    BufferStorage(BufferTarget, u64, BufferUsage),
    BufferUpdate(BufferTarget, u64, Vec<u8>),
    TextureStorage(TextureTarget, TextureDescriptor),
    AttachShader(Handle, Handle),
    LinkProgram(Handle),
    AttachColor(u32, ColorAttachment),
    AttachDepth(DepthAttachment),
    DrawBuffers(Vec<Option<u32>>),
    FramebufferStatus(FramebufferTarget),
}

/// Device double that records calls instead of executing them.
#[derive(Debug, Clone)]
pub struct RecordingDevice {
    limits: HashMap<Limit, i32>,
    default_bits: DepthStencilBits,
    status: FramebufferStatus,
    refuse_creation: bool,
    calls: Vec<DeviceCall>,
}

impl Default for RecordingDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingDevice {
    /// A compliant device with a 24/8 default framebuffer.
    pub fn new() -> Self {
        let limits = HashMap::from([
            (Limit::MaxColorAttachments, 8),
            (Limit::MaxDrawBuffers, 8),
            (Limit::MaxTextureImageUnits, 16),
            (Limit::MaxTextureSize, 8192),
        ]);
        Self {
            limits,
            default_bits: DepthStencilBits {
                depth: 24,
                stencil: 8,
            },
            status: FramebufferStatus::Complete,
            refuse_creation: false,
            calls: Vec::new(),
        }
    }

    pub fn with_limit(mut self, limit: Limit, value: i32) -> Self {
        self.limits.insert(limit, value);
        self
    }

    pub fn with_default_framebuffer(mut self, bits: DepthStencilBits) -> Self {
        self.default_bits = bits;
        self
    }

    /// Status reported for every framebuffer completeness query.
    pub fn with_framebuffer_status(mut self, status: FramebufferStatus) -> Self {
        self.status = status;
        self
    }

    /// Fail every object creation.
    pub fn refusing_creation(mut self) -> Self {
        self.refuse_creation = true;
        self
    }

    pub fn calls(&self) -> &[DeviceCall] {
        &self.calls
    }

    /// Number of recorded calls matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&DeviceCall) -> bool) -> usize {
        self.calls.iter().filter(|call| predicate(call)).count()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    fn push(&mut self, call: DeviceCall) {
        tracing::trace!(?call, "device call");
        self.calls.push(call);
    }

    fn create(&mut self, call: DeviceCall) -> Result<(), String> {
        if self.refuse_creation {
            return Err("object creation refused".to_string());
        }
        self.push(call);
        Ok(())
    }
}

impl Device for RecordingDevice {
    fn integer_limit(&mut self, limit: Limit) -> i32 {
        self.limits.get(&limit).copied().unwrap_or(0)
    }

    fn default_framebuffer_bits(&mut self) -> DepthStencilBits {
        self.default_bits
    }

    fn set_capability(&mut self, capability: Capability, enabled: bool) {
        self.push(DeviceCall::SetCapability(capability, enabled));
    }

    fn blend_functions(&mut self, functions: BlendFunctions) {
        self.push(DeviceCall::BlendFunctions(functions));
    }

    fn blend_equations(&mut self, equations: BlendEquations) {
        self.push(DeviceCall::BlendEquations(equations));
    }

    fn cull_face(&mut self, faces: FaceSelection) {
        self.push(DeviceCall::CullFace(faces));
    }

    fn front_face(&mut self, order: FaceWindingOrder) {
        self.push(DeviceCall::FrontFace(order));
    }

    fn depth_function(&mut self, function: DepthFunction) {
        self.push(DeviceCall::DepthFunction(function));
    }

    fn depth_write(&mut self, enabled: bool) {
        self.push(DeviceCall::DepthWrite(enabled));
    }

    fn stencil_function(&mut self, faces: FaceSelection, test: StencilTest) {
        self.push(DeviceCall::StencilFunction(faces, test));
    }

    fn stencil_mask(&mut self, faces: FaceSelection, mask: u32) {
        self.push(DeviceCall::StencilMask(faces, mask));
    }

    fn stencil_operations(&mut self, faces: FaceSelection, operations: StencilOperations) {
        self.push(DeviceCall::StencilOperations(faces, operations));
    }

    fn color_mask(&mut self, mask: ColorMask) {
        self.push(DeviceCall::ColorMask(mask));
    }

    fn polygon_mode(&mut self, mode: PolygonMode) {
        self.push(DeviceCall::PolygonMode(mode));
    }

    fn scissor(&mut self, area: ScissorArea) {
        self.push(DeviceCall::Scissor(area));
    }

    fn create_object(&mut self, handle: Handle) -> Result<(), String> {
        self.create(DeviceCall::CreateObject(handle))
    }

    fn create_shader(&mut self, handle: Handle, stage: ShaderStage) -> Result<(), String> {
        self.create(DeviceCall::CreateShader(handle, stage))
    }

    fn delete_object(&mut self, handle: Handle) {
        self.push(DeviceCall::DeleteObject(handle));
    }

    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<Handle>) {
        self.push(DeviceCall::BindBuffer(target, buffer));
    }

    fn bind_texture(&mut self, unit: u32, target: TextureTarget, texture: Option<Handle>) {
        self.push(DeviceCall::BindTexture(unit, target, texture));
    }

    fn bind_framebuffer(&mut self, target: FramebufferTarget, framebuffer: Option<Handle>) {
        self.push(DeviceCall::BindFramebuffer(target, framebuffer));
    }

    fn use_program(&mut self, program: Option<Handle>) {
        self.push(DeviceCall::UseProgram(program));
    }

    fn buffer_storage(&mut self, target: BufferTarget, size: u64, usage: BufferUsage) {
        self.push(DeviceCall::BufferStorage(target, size, usage));
    }

    fn buffer_update(&mut self, target: BufferTarget, offset: u64, data: &[u8]) {
        self.push(DeviceCall::BufferUpdate(target, offset, data.to_vec()));
    }

    fn texture_storage(&mut self, target: TextureTarget, descriptor: &TextureDescriptor) {
        self.push(DeviceCall::TextureStorage(target, *descriptor));
    }

    fn attach_shader(&mut self, program: Handle, shader: Handle) {
        self.push(DeviceCall::AttachShader(program, shader));
    }

    fn link_program(&mut self, program: Handle) {
        self.push(DeviceCall::LinkProgram(program));
    }

    fn attach_color(&mut self, point: u32, source: ColorAttachment) {
        self.push(DeviceCall::AttachColor(point, source));
    }

    fn attach_depth(&mut self, attachment: DepthAttachment) {
        self.push(DeviceCall::AttachDepth(attachment));
    }

    fn draw_buffers(&mut self, mapping: &[Option<u32>]) {
        self.push(DeviceCall::DrawBuffers(mapping.to_vec()));
    }

    fn framebuffer_status(&mut self, target: FramebufferTarget) -> FramebufferStatus {
        self.push(DeviceCall::FramebufferStatus(target));
        self.status
    }
}
