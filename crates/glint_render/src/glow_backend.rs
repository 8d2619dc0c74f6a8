//! OpenGL backend via `glow`
//!
//! [`GlowDevice`] issues the real GL calls for a context that is already
//! current on the calling thread. Handles are mapped to native GL objects
//! as they are created.
//!
//! All GL calls are `unsafe`; the context only reaches them with live
//! handles it owns.

use crate::backend::{Device, Limit};
use crate::framebuffer::{ColorAttachment, DepthAttachment};
use crate::resources::{Renderable, TextureDescriptor};
use crate::types::*;
use glint_core::{Handle, ResourceKind};
use glow::HasContext;
use std::collections::HashMap;

enum Object<G: HasContext> {
    Buffer(G::Buffer),
    Texture(G::Texture),
    Framebuffer(G::Framebuffer),
    Shader(G::Shader),
    Program(G::Program),
    Query(G::Query),
}

/// A [`Device`] backed by a `glow` context.
pub struct GlowDevice<G: HasContext> {
    gl: G,
    objects: HashMap<Handle, Object<G>>,
    active_unit: Option<u32>,
}

impl<G: HasContext> GlowDevice<G> {
    pub fn new(gl: G) -> Self {
        Self {
            gl,
            objects: HashMap::new(),
            active_unit: None,
        }
    }

    pub fn gl(&self) -> &G {
        &self.gl
    }

    /// Give the GL context back. Native objects still alive are leaked.
    pub fn into_gl(self) -> G {
        self.gl
    }

    fn buffer(&self, handle: Option<Handle>) -> Option<G::Buffer> {
        match self.objects.get(&handle?) {
            Some(Object::Buffer(buffer)) => Some(*buffer),
            _ => None,
        }
    }

    fn texture(&self, handle: Option<Handle>) -> Option<G::Texture> {
        match self.objects.get(&handle?) {
            Some(Object::Texture(texture)) => Some(*texture),
            _ => None,
        }
    }

    fn framebuffer(&self, handle: Option<Handle>) -> Option<G::Framebuffer> {
        match self.objects.get(&handle?) {
            Some(Object::Framebuffer(framebuffer)) => Some(*framebuffer),
            _ => None,
        }
    }

    fn shader(&self, handle: Handle) -> Option<G::Shader> {
        match self.objects.get(&handle) {
            Some(Object::Shader(shader)) => Some(*shader),
            _ => None,
        }
    }

    fn program(&self, handle: Option<Handle>) -> Option<G::Program> {
        match self.objects.get(&handle?) {
            Some(Object::Program(program)) => Some(*program),
            _ => None,
        }
    }

    fn select_unit(&mut self, unit: u32) {
        if self.active_unit != Some(unit) {
            unsafe { self.gl.active_texture(glow::TEXTURE0 + unit) };
            self.active_unit = Some(unit);
        }
    }
}

impl<G: HasContext> Device for GlowDevice<G> {
    fn integer_limit(&mut self, limit: Limit) -> i32 {
        let parameter = match limit {
            Limit::MaxColorAttachments => glow::MAX_COLOR_ATTACHMENTS,
            Limit::MaxDrawBuffers => glow::MAX_DRAW_BUFFERS,
            Limit::MaxTextureImageUnits => glow::MAX_TEXTURE_IMAGE_UNITS,
            Limit::MaxTextureSize => glow::MAX_TEXTURE_SIZE,
        };
        unsafe { self.gl.get_parameter_i32(parameter) }
    }

    fn default_framebuffer_bits(&mut self) -> DepthStencilBits {
        let query = |attachment, parameter| unsafe {
            self.gl
                .get_framebuffer_attachment_parameter_i32(glow::FRAMEBUFFER, attachment, parameter)
        };
        let depth = query(glow::DEPTH, glow::FRAMEBUFFER_ATTACHMENT_DEPTH_SIZE);
        let stencil = query(glow::STENCIL, glow::FRAMEBUFFER_ATTACHMENT_STENCIL_SIZE);
        DepthStencilBits {
            depth: u32::try_from(depth).unwrap_or(0),
            stencil: u32::try_from(stencil).unwrap_or(0),
        }
    }

    fn set_capability(&mut self, capability: Capability, enabled: bool) {
        let parameter = match capability {
            Capability::Blend => glow::BLEND,
            Capability::CullFace => glow::CULL_FACE,
            Capability::DepthTest => glow::DEPTH_TEST,
            Capability::DepthClamp => glow::DEPTH_CLAMP,
            Capability::StencilTest => glow::STENCIL_TEST,
            Capability::ScissorTest => glow::SCISSOR_TEST,
        };
        unsafe {
            if enabled {
                self.gl.enable(parameter);
            } else {
                self.gl.disable(parameter);
            }
        }
    }

    fn blend_functions(&mut self, f: BlendFunctions) {
        unsafe {
            self.gl.blend_func_separate(
                blend_factor(f.source_rgb),
                blend_factor(f.destination_rgb),
                blend_factor(f.source_alpha),
                blend_factor(f.destination_alpha),
            )
        }
    }

    fn blend_equations(&mut self, e: BlendEquations) {
        unsafe {
            self.gl
                .blend_equation_separate(blend_equation(e.rgb), blend_equation(e.alpha))
        }
    }

    fn cull_face(&mut self, faces: FaceSelection) {
        unsafe { self.gl.cull_face(face(faces)) }
    }

    fn front_face(&mut self, order: FaceWindingOrder) {
        let mode = match order {
            FaceWindingOrder::Clockwise => glow::CW,
            FaceWindingOrder::CounterClockwise => glow::CCW,
        };
        unsafe { self.gl.front_face(mode) }
    }

    fn depth_function(&mut self, function: DepthFunction) {
        let func = match function {
            DepthFunction::Never => glow::NEVER,
            DepthFunction::Less => glow::LESS,
            DepthFunction::LessOrEqual => glow::LEQUAL,
            DepthFunction::Greater => glow::GREATER,
            DepthFunction::GreaterOrEqual => glow::GEQUAL,
            DepthFunction::Equal => glow::EQUAL,
            DepthFunction::NotEqual => glow::NOTEQUAL,
            DepthFunction::Always => glow::ALWAYS,
        };
        unsafe { self.gl.depth_func(func) }
    }

    fn depth_write(&mut self, enabled: bool) {
        unsafe { self.gl.depth_mask(enabled) }
    }

    fn stencil_function(&mut self, faces: FaceSelection, test: StencilTest) {
        unsafe {
            self.gl.stencil_func_separate(
                face(faces),
                stencil_function(test.function),
                test.reference,
                test.mask,
            )
        }
    }

    fn stencil_mask(&mut self, faces: FaceSelection, mask: u32) {
        unsafe { self.gl.stencil_mask_separate(face(faces), mask) }
    }

    fn stencil_operations(&mut self, faces: FaceSelection, ops: StencilOperations) {
        unsafe {
            self.gl.stencil_op_separate(
                face(faces),
                stencil_operation(ops.stencil_fail),
                stencil_operation(ops.depth_fail),
                stencil_operation(ops.pass),
            )
        }
    }

    fn color_mask(&mut self, mask: ColorMask) {
        unsafe {
            self.gl
                .color_mask(mask.red, mask.green, mask.blue, mask.alpha)
        }
    }

    fn polygon_mode(&mut self, mode: PolygonMode) {
        let mode = match mode {
            PolygonMode::Point => glow::POINT,
            PolygonMode::Line => glow::LINE,
            PolygonMode::Fill => glow::FILL,
        };
        unsafe { self.gl.polygon_mode(glow::FRONT_AND_BACK, mode) }
    }

    fn scissor(&mut self, area: ScissorArea) {
        let width = i32::try_from(area.size.x).unwrap_or(i32::MAX);
        let height = i32::try_from(area.size.y).unwrap_or(i32::MAX);
        unsafe {
            self.gl
                .scissor(area.origin.x, area.origin.y, width, height)
        }
    }

    fn create_object(&mut self, handle: Handle) -> Result<(), String> {
        let object = unsafe {
            match handle.kind() {
                ResourceKind::ArrayBuffer | ResourceKind::IndexBuffer => {
                    Object::Buffer(self.gl.create_buffer()?)
                }
                ResourceKind::Texture2D | ResourceKind::TextureCube => {
                    Object::Texture(self.gl.create_texture()?)
                }
                ResourceKind::Framebuffer => Object::Framebuffer(self.gl.create_framebuffer()?),
                ResourceKind::Program => Object::Program(self.gl.create_program()?),
                ResourceKind::Query => Object::Query(self.gl.create_query()?),
                ResourceKind::Shader => {
                    return Err("shaders are created with create_shader".to_string())
                }
            }
        };
        self.objects.insert(handle, object);
        Ok(())
    }

    fn create_shader(&mut self, handle: Handle, stage: ShaderStage) -> Result<(), String> {
        let kind = match stage {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Geometry => glow::GEOMETRY_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        };
        let shader = unsafe { self.gl.create_shader(kind)? };
        self.objects.insert(handle, Object::Shader(shader));
        Ok(())
    }

    fn delete_object(&mut self, handle: Handle) {
        let Some(object) = self.objects.remove(&handle) else {
            tracing::warn!(%handle, "deleting a handle with no GL object");
            return;
        };
        unsafe {
            match object {
                Object::Buffer(buffer) => self.gl.delete_buffer(buffer),
                Object::Texture(texture) => self.gl.delete_texture(texture),
                Object::Framebuffer(framebuffer) => self.gl.delete_framebuffer(framebuffer),
                Object::Shader(shader) => self.gl.delete_shader(shader),
                Object::Program(program) => self.gl.delete_program(program),
                Object::Query(query) => self.gl.delete_query(query),
            }
        }
    }

    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<Handle>) {
        let buffer = self.buffer(buffer);
        unsafe { self.gl.bind_buffer(buffer_target(target), buffer) }
    }

    fn bind_texture(&mut self, unit: u32, target: TextureTarget, texture: Option<Handle>) {
        self.select_unit(unit);
        let texture = self.texture(texture);
        unsafe { self.gl.bind_texture(texture_target(target), texture) }
    }

    fn bind_framebuffer(&mut self, target: FramebufferTarget, framebuffer: Option<Handle>) {
        let framebuffer = self.framebuffer(framebuffer);
        unsafe {
            self.gl
                .bind_framebuffer(framebuffer_target(target), framebuffer)
        }
    }

    fn use_program(&mut self, program: Option<Handle>) {
        let program = self.program(program);
        unsafe { self.gl.use_program(program) }
    }

    fn buffer_storage(&mut self, target: BufferTarget, size: u64, usage: BufferUsage) {
        // The context bounds sizes by BufferDescriptor::MAX_SIZE.
        let size = i32::try_from(size).unwrap_or(i32::MAX);
        unsafe {
            self.gl
                .buffer_data_size(buffer_target(target), size, buffer_usage(usage))
        }
    }

    fn buffer_update(&mut self, target: BufferTarget, offset: u64, data: &[u8]) {
        // Offsets lie inside a buffer, so they are bounded the same way.
        let offset = i32::try_from(offset).unwrap_or(i32::MAX);
        unsafe {
            self.gl
                .buffer_sub_data_u8_slice(buffer_target(target), offset, data)
        }
    }

    fn texture_storage(&mut self, target: TextureTarget, descriptor: &TextureDescriptor) {
        let width = i32::try_from(descriptor.width).unwrap_or(i32::MAX);
        let height = i32::try_from(descriptor.height).unwrap_or(i32::MAX);
        unsafe {
            self.gl.tex_storage_2d(
                texture_target(target),
                1,
                internal_format(descriptor.renderable),
                width,
                height,
            )
        }
    }

    fn attach_shader(&mut self, program: Handle, shader: Handle) {
        if let (Some(program), Some(shader)) = (self.program(Some(program)), self.shader(shader)) {
            unsafe { self.gl.attach_shader(program, shader) }
        }
    }

    fn link_program(&mut self, program: Handle) {
        if let Some(program) = self.program(Some(program)) {
            unsafe { self.gl.link_program(program) }
        }
    }

    fn attach_color(&mut self, point: u32, source: ColorAttachment) {
        let (texture_target, texture) = match source {
            ColorAttachment::Texture2D(texture) => (glow::TEXTURE_2D, texture),
            ColorAttachment::CubeFace(texture, face) => (cube_face(face), texture),
        };
        let texture = self.texture(Some(texture));
        unsafe {
            self.gl.framebuffer_texture_2d(
                glow::DRAW_FRAMEBUFFER,
                glow::COLOR_ATTACHMENT0 + point,
                texture_target,
                texture,
                0,
            )
        }
    }

    fn attach_depth(&mut self, attachment: DepthAttachment) {
        let point = match attachment {
            DepthAttachment::Depth(_) => glow::DEPTH_ATTACHMENT,
            DepthAttachment::DepthStencil(_) => glow::DEPTH_STENCIL_ATTACHMENT,
        };
        let texture = self.texture(Some(attachment.texture()));
        unsafe {
            self.gl
                .framebuffer_texture_2d(glow::DRAW_FRAMEBUFFER, point, glow::TEXTURE_2D, texture, 0)
        }
    }

    fn draw_buffers(&mut self, mapping: &[Option<u32>]) {
        let buffers: Vec<u32> = mapping
            .iter()
            .map(|point| point.map_or(glow::NONE, |point| glow::COLOR_ATTACHMENT0 + point))
            .collect();
        unsafe { self.gl.draw_buffers(&buffers) }
    }

    fn framebuffer_status(&mut self, target: FramebufferTarget) -> FramebufferStatus {
        let status = unsafe { self.gl.check_framebuffer_status(framebuffer_target(target)) };
        framebuffer_status(status)
    }
}

fn blend_factor(function: BlendFunction) -> u32 {
    match function {
        BlendFunction::Zero => glow::ZERO,
        BlendFunction::One => glow::ONE,
        BlendFunction::SourceColor => glow::SRC_COLOR,
        BlendFunction::OneMinusSourceColor => glow::ONE_MINUS_SRC_COLOR,
        BlendFunction::DestinationColor => glow::DST_COLOR,
        BlendFunction::OneMinusDestinationColor => glow::ONE_MINUS_DST_COLOR,
        BlendFunction::SourceAlpha => glow::SRC_ALPHA,
        BlendFunction::OneMinusSourceAlpha => glow::ONE_MINUS_SRC_ALPHA,
        BlendFunction::DestinationAlpha => glow::DST_ALPHA,
        BlendFunction::OneMinusDestinationAlpha => glow::ONE_MINUS_DST_ALPHA,
        BlendFunction::ConstantColor => glow::CONSTANT_COLOR,
        BlendFunction::OneMinusConstantColor => glow::ONE_MINUS_CONSTANT_COLOR,
        BlendFunction::ConstantAlpha => glow::CONSTANT_ALPHA,
        BlendFunction::OneMinusConstantAlpha => glow::ONE_MINUS_CONSTANT_ALPHA,
        BlendFunction::SourceAlphaSaturate => glow::SRC_ALPHA_SATURATE,
    }
}

fn blend_equation(equation: BlendEquation) -> u32 {
    match equation {
        BlendEquation::Add => glow::FUNC_ADD,
        BlendEquation::Subtract => glow::FUNC_SUBTRACT,
        BlendEquation::ReverseSubtract => glow::FUNC_REVERSE_SUBTRACT,
        BlendEquation::Minimum => glow::MIN,
        BlendEquation::Maximum => glow::MAX,
    }
}

fn face(faces: FaceSelection) -> u32 {
    match faces {
        FaceSelection::Front => glow::FRONT,
        FaceSelection::Back => glow::BACK,
        FaceSelection::FrontAndBack => glow::FRONT_AND_BACK,
    }
}

fn stencil_function(function: StencilFunction) -> u32 {
    match function {
        StencilFunction::Never => glow::NEVER,
        StencilFunction::Less => glow::LESS,
        StencilFunction::LessOrEqual => glow::LEQUAL,
        StencilFunction::Greater => glow::GREATER,
        StencilFunction::GreaterOrEqual => glow::GEQUAL,
        StencilFunction::Equal => glow::EQUAL,
        StencilFunction::NotEqual => glow::NOTEQUAL,
        StencilFunction::Always => glow::ALWAYS,
    }
}

fn stencil_operation(operation: StencilOperation) -> u32 {
    match operation {
        StencilOperation::Keep => glow::KEEP,
        StencilOperation::Zero => glow::ZERO,
        StencilOperation::Replace => glow::REPLACE,
        StencilOperation::Increment => glow::INCR,
        StencilOperation::IncrementWrap => glow::INCR_WRAP,
        StencilOperation::Decrement => glow::DECR,
        StencilOperation::DecrementWrap => glow::DECR_WRAP,
        StencilOperation::Invert => glow::INVERT,
    }
}

fn buffer_target(target: BufferTarget) -> u32 {
    match target {
        BufferTarget::Array => glow::ARRAY_BUFFER,
        BufferTarget::Index => glow::ELEMENT_ARRAY_BUFFER,
    }
}

fn buffer_usage(usage: BufferUsage) -> u32 {
    match usage {
        BufferUsage::StreamDraw => glow::STREAM_DRAW,
        BufferUsage::StreamRead => glow::STREAM_READ,
        BufferUsage::StreamCopy => glow::STREAM_COPY,
        BufferUsage::StaticDraw => glow::STATIC_DRAW,
        BufferUsage::StaticRead => glow::STATIC_READ,
        BufferUsage::StaticCopy => glow::STATIC_COPY,
        BufferUsage::DynamicDraw => glow::DYNAMIC_DRAW,
        BufferUsage::DynamicRead => glow::DYNAMIC_READ,
        BufferUsage::DynamicCopy => glow::DYNAMIC_COPY,
    }
}

fn texture_target(target: TextureTarget) -> u32 {
    match target {
        TextureTarget::Texture2D => glow::TEXTURE_2D,
        TextureTarget::TextureCube => glow::TEXTURE_CUBE_MAP,
    }
}

fn cube_face(face: CubeFace) -> u32 {
    match face {
        CubeFace::PositiveX => glow::TEXTURE_CUBE_MAP_POSITIVE_X,
        CubeFace::NegativeX => glow::TEXTURE_CUBE_MAP_NEGATIVE_X,
        CubeFace::PositiveY => glow::TEXTURE_CUBE_MAP_POSITIVE_Y,
        CubeFace::NegativeY => glow::TEXTURE_CUBE_MAP_NEGATIVE_Y,
        CubeFace::PositiveZ => glow::TEXTURE_CUBE_MAP_POSITIVE_Z,
        CubeFace::NegativeZ => glow::TEXTURE_CUBE_MAP_NEGATIVE_Z,
    }
}

fn framebuffer_target(target: FramebufferTarget) -> u32 {
    match target {
        FramebufferTarget::Draw => glow::DRAW_FRAMEBUFFER,
        FramebufferTarget::Read => glow::READ_FRAMEBUFFER,
    }
}

fn internal_format(renderable: Renderable) -> u32 {
    match renderable {
        Renderable::Color | Renderable::NotRenderable => glow::RGBA8,
        Renderable::Depth { depth_bits } => match depth_bits {
            0..=16 => glow::DEPTH_COMPONENT16,
            17..=24 => glow::DEPTH_COMPONENT24,
            _ => glow::DEPTH_COMPONENT32F,
        },
        Renderable::DepthStencil { depth_bits, .. } if depth_bits > 24 => glow::DEPTH32F_STENCIL8,
        Renderable::DepthStencil { .. } => glow::DEPTH24_STENCIL8,
    }
}

fn framebuffer_status(status: u32) -> FramebufferStatus {
    match status {
        glow::FRAMEBUFFER_COMPLETE => FramebufferStatus::Complete,
        glow::FRAMEBUFFER_INCOMPLETE_ATTACHMENT => FramebufferStatus::IncompleteAttachment,
        glow::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT => FramebufferStatus::MissingAttachment,
        glow::FRAMEBUFFER_INCOMPLETE_DRAW_BUFFER => FramebufferStatus::IncompleteDrawBuffer,
        glow::FRAMEBUFFER_INCOMPLETE_READ_BUFFER => FramebufferStatus::IncompleteReadBuffer,
        glow::FRAMEBUFFER_UNSUPPORTED => FramebufferStatus::Unsupported,
        _ => FramebufferStatus::Unknown,
    }
}
