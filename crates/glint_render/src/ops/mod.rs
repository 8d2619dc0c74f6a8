//! Typed context operations, one module per pipeline feature.

mod blending;
mod buffers;
mod culling;
mod depth;
mod masking;
mod programs;
mod stencil;
mod textures;

pub use textures::TextureUnit;
