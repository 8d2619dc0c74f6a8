use crate::backend::Device;
use crate::context::Context;
use crate::error::GlError;
use crate::types::{BlendEquation, BlendEquations, BlendFunction, BlendFunctions, Capability};

impl<D: Device> Context<D> {
    /// Enable blending with `source`/`destination` factors and additive equations.
    pub fn blending_enable(
        &mut self,
        source: BlendFunction,
        destination: BlendFunction,
    ) -> Result<(), GlError> {
        self.blending_enable_separate_with_equation_separate(
            BlendFunctions::uniform(source, destination),
            BlendEquations::uniform(BlendEquation::Add),
        )
    }

    pub fn blending_enable_separate(
        &mut self,
        source_rgb: BlendFunction,
        source_alpha: BlendFunction,
        destination_rgb: BlendFunction,
        destination_alpha: BlendFunction,
    ) -> Result<(), GlError> {
        self.blending_enable_separate_with_equation_separate(
            BlendFunctions {
                source_rgb,
                source_alpha,
                destination_rgb,
                destination_alpha,
            },
            BlendEquations::uniform(BlendEquation::Add),
        )
    }

    pub fn blending_enable_with_equation(
        &mut self,
        source: BlendFunction,
        destination: BlendFunction,
        equation: BlendEquation,
    ) -> Result<(), GlError> {
        self.blending_enable_separate_with_equation_separate(
            BlendFunctions::uniform(source, destination),
            BlendEquations::uniform(equation),
        )
    }

    pub fn blending_enable_with_equation_separate(
        &mut self,
        source: BlendFunction,
        destination: BlendFunction,
        equation_rgb: BlendEquation,
        equation_alpha: BlendEquation,
    ) -> Result<(), GlError> {
        self.blending_enable_separate_with_equation_separate(
            BlendFunctions::uniform(source, destination),
            BlendEquations {
                rgb: equation_rgb,
                alpha: equation_alpha,
            },
        )
    }

    /// Enable blending with fully separate factors and equations.
    ///
    /// The toggle, the factor tuple and the equation tuple are compared
    /// separately; each goes to the device only if it changed.
    pub fn blending_enable_separate_with_equation_separate(
        &mut self,
        functions: BlendFunctions,
        equations: BlendEquations,
    ) -> Result<(), GlError> {
        if functions.destination_rgb == BlendFunction::SourceAlphaSaturate
            || functions.destination_alpha == BlendFunction::SourceAlphaSaturate
        {
            return Err(GlError::Misconfigured(
                "SourceAlphaSaturate is only valid as a source factor".to_string(),
            ));
        }

        let issued = self
            .state
            .set_toggle(&mut self.device, Capability::Blend, true);
        self.record(issued);
        let issued = self.state.set_blend_functions(&mut self.device, functions);
        self.record(issued);
        let issued = self.state.set_blend_equations(&mut self.device, equations);
        self.record(issued);
        Ok(())
    }

    pub fn blending_disable(&mut self) {
        let issued = self
            .state
            .set_toggle(&mut self.device, Capability::Blend, false);
        self.record(issued);
    }

    pub fn blending_is_enabled(&self) -> bool {
        self.state.is_enabled(Capability::Blend)
    }
}
