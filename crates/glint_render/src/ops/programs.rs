// programs.rs - Shaders, programs and queries

use crate::backend::Device;
use crate::bindings::BindingPoint;
use crate::context::Context;
use crate::error::GlError;
use crate::resources::Resource;
use crate::types::ShaderStage;
use glint_core::{Handle, ResourceKind};

impl<D: Device> Context<D> {
    pub fn shader_allocate(&mut self, stage: ShaderStage) -> Result<Handle, GlError> {
        self.create(ResourceKind::Shader, Resource::Shader(stage), |device, handle| {
            device.create_shader(handle, stage)
        })
    }

    /// Create a program from `shaders` and link it.
    ///
    /// At least one vertex and one fragment shader are required, and every
    /// shader must be live.
    pub fn program_allocate(&mut self, shaders: &[Handle]) -> Result<Handle, GlError> {
        let mut stages = Vec::with_capacity(shaders.len());
        for shader in shaders {
            self.resources
                .assert_kind(*shader, "shader", |kind| kind == ResourceKind::Shader)?;
            if let Resource::Shader(stage) = self.resources.metadata(*shader)? {
                stages.push(*stage);
            }
        }
        for required in [ShaderStage::Vertex, ShaderStage::Fragment] {
            if !stages.contains(&required) {
                return Err(GlError::Misconfigured(format!(
                    "program requires a {required:?} shader"
                )));
            }
        }

        let program = self.create(
            ResourceKind::Program,
            Resource::Program {
                shaders: shaders.to_vec(),
            },
            D::create_object,
        )?;
        for shader in shaders {
            self.device.attach_shader(program, *shader);
            self.record(true);
        }
        self.device.link_program(program);
        self.record(true);
        Ok(program)
    }

    /// Shaders a program was linked from.
    pub fn program_shaders(&self, program: Handle) -> Result<&[Handle], GlError> {
        self.resources
            .assert_kind(program, "program", |kind| kind == ResourceKind::Program)?;
        match self.resources.metadata(program)? {
            Resource::Program { shaders } => Ok(shaders.as_slice()),
            _ => Err(GlError::Misconfigured(format!("{program} has no shaders"))),
        }
    }

    pub fn program_use(&mut self, program: Handle) -> Result<(), GlError> {
        self.bind_point(BindingPoint::Program, program)?;
        Ok(())
    }

    pub fn program_unuse(&mut self) {
        self.unbind_point(BindingPoint::Program);
    }

    pub fn program_get_current(&self) -> Option<Handle> {
        self.bindings.current(BindingPoint::Program)
    }

    pub fn query_allocate(&mut self) -> Result<Handle, GlError> {
        self.create(ResourceKind::Query, Resource::Query, D::create_object)
    }
}

#[cfg(test)]
mod tests {
    use crate::fake::{DeviceCall, RecordingDevice};
    use crate::types::ShaderStage;
    use crate::{Context, ContextConfig, GlError};
    use glint_core::HandleError;

    fn context() -> Context<RecordingDevice> {
        Context::new(RecordingDevice::new(), &ContextConfig::default()).unwrap()
    }

    #[test]
    fn program_links_live_shaders() {
        let mut ctx = context();
        let vertex = ctx.shader_allocate(ShaderStage::Vertex).unwrap();
        let fragment = ctx.shader_allocate(ShaderStage::Fragment).unwrap();

        let program = ctx.program_allocate(&[vertex, fragment]).unwrap();
        assert_eq!(ctx.program_shaders(program), Ok(&[vertex, fragment][..]));
        assert_eq!(
            ctx.device()
                .count(|c| matches!(c, DeviceCall::AttachShader(p, _) if *p == program)),
            2
        );
        assert_eq!(
            ctx.device()
                .count(|c| *c == DeviceCall::LinkProgram(program)),
            1
        );
    }

    #[test]
    fn program_rejects_deleted_or_missing_shaders() {
        let mut ctx = context();
        let vertex = ctx.shader_allocate(ShaderStage::Vertex).unwrap();
        let fragment = ctx.shader_allocate(ShaderStage::Fragment).unwrap();

        assert!(matches!(
            ctx.program_allocate(&[vertex]),
            Err(GlError::Misconfigured(_))
        ));

        ctx.delete(fragment).unwrap();
        assert_eq!(
            ctx.program_allocate(&[vertex, fragment]),
            Err(GlError::Handle(HandleError::Deleted { handle: fragment }))
        );
        assert_eq!(ctx.live_resources(), 1);
    }

    #[test]
    fn use_and_unuse_elide_repeats() {
        let mut ctx = context();
        let vertex = ctx.shader_allocate(ShaderStage::Vertex).unwrap();
        let fragment = ctx.shader_allocate(ShaderStage::Fragment).unwrap();
        let program = ctx.program_allocate(&[vertex, fragment]).unwrap();
        ctx.device_mut().clear();

        ctx.program_use(program).unwrap();
        ctx.program_use(program).unwrap();
        assert_eq!(ctx.program_get_current(), Some(program));
        ctx.program_unuse();
        ctx.program_unuse();

        assert_eq!(
            ctx.device().calls(),
            &[DeviceCall::UseProgram(Some(program)), DeviceCall::UseProgram(None)]
        );
    }

    #[test]
    fn deleting_the_current_program_clears_it() {
        let mut ctx = context();
        let vertex = ctx.shader_allocate(ShaderStage::Vertex).unwrap();
        let fragment = ctx.shader_allocate(ShaderStage::Fragment).unwrap();
        let program = ctx.program_allocate(&[vertex, fragment]).unwrap();
        ctx.program_use(program).unwrap();

        ctx.delete(program).unwrap();
        assert_eq!(ctx.program_get_current(), None);
        assert!(ctx.program_use(program).is_err());
    }

    #[test]
    fn queries_are_plain_resources() {
        let mut ctx = context();
        let query = ctx.query_allocate().unwrap();
        assert_eq!(query.kind(), glint_core::ResourceKind::Query);
        ctx.delete(query).unwrap();
        assert!(ctx.delete(query).is_err());
    }
}
