//! Typed device enumerants
//!
//! Every value that crosses into the device is one of these enums, never a
//! raw integer. Backends translate them to native constants.

use glam::{IVec2, UVec2};
use serde::{Deserialize, Serialize};

/// Blend factor applied to the source or destination color.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlendFunction {
    Zero,
    One,
    SourceColor,
    OneMinusSourceColor,
    DestinationColor,
    OneMinusDestinationColor,
    SourceAlpha,
    OneMinusSourceAlpha,
    DestinationAlpha,
    OneMinusDestinationAlpha,
    ConstantColor,
    OneMinusConstantColor,
    ConstantAlpha,
    OneMinusConstantAlpha,
    /// Only valid as a source factor.
    SourceAlphaSaturate,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlendEquation {
    Add,
    Subtract,
    ReverseSubtract,
    Minimum,
    Maximum,
}

/// The four blend factors, always pushed to the device together.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlendFunctions {
    pub source_rgb: BlendFunction,
    pub source_alpha: BlendFunction,
    pub destination_rgb: BlendFunction,
    pub destination_alpha: BlendFunction,
}

impl BlendFunctions {
    /// Same factors for the color and alpha channels.
    pub const fn uniform(source: BlendFunction, destination: BlendFunction) -> Self {
        Self {
            source_rgb: source,
            source_alpha: source,
            destination_rgb: destination,
            destination_alpha: destination,
        }
    }
}

/// The color and alpha blend equations, always pushed to the device together.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlendEquations {
    pub rgb: BlendEquation,
    pub alpha: BlendEquation,
}

impl BlendEquations {
    pub const fn uniform(equation: BlendEquation) -> Self {
        Self {
            rgb: equation,
            alpha: equation,
        }
    }
}

impl Default for BlendEquations {
    fn default() -> Self {
        Self::uniform(BlendEquation::Add)
    }
}

/// A complete blending configuration.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlendState {
    pub functions: BlendFunctions,
    pub equations: BlendEquations,
}

/// One face of a polygon.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Face {
    Front = 0,
    Back = 1,
}

impl Face {
    pub const COUNT: usize = 2;

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Which faces a face-directional operation applies to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaceSelection {
    Front,
    Back,
    FrontAndBack,
}

impl FaceSelection {
    pub fn faces(self) -> &'static [Face] {
        match self {
            Self::Front => &[Face::Front],
            Self::Back => &[Face::Back],
            Self::FrontAndBack => &[Face::Front, Face::Back],
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaceWindingOrder {
    Clockwise,
    CounterClockwise,
}

/// A complete culling configuration.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CullingState {
    pub faces: FaceSelection,
    pub order: FaceWindingOrder,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DepthFunction {
    Never,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    Equal,
    NotEqual,
    Always,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StencilFunction {
    Never,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    Equal,
    NotEqual,
    Always,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StencilOperation {
    Keep,
    Zero,
    Replace,
    Increment,
    IncrementWrap,
    Decrement,
    DecrementWrap,
    Invert,
}

/// Stencil test function, reference value and comparison mask for one face.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StencilTest {
    pub function: StencilFunction,
    pub reference: i32,
    pub mask: u32,
}

impl Default for StencilTest {
    fn default() -> Self {
        Self {
            function: StencilFunction::Always,
            reference: 0,
            mask: u32::MAX,
        }
    }
}

/// Stencil operations for one face.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StencilOperations {
    pub stencil_fail: StencilOperation,
    pub depth_fail: StencilOperation,
    pub pass: StencilOperation,
}

impl Default for StencilOperations {
    fn default() -> Self {
        Self {
            stencil_fail: StencilOperation::Keep,
            depth_fail: StencilOperation::Keep,
            pass: StencilOperation::Keep,
        }
    }
}

/// Per-channel color write mask.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorMask {
    pub red: bool,
    pub green: bool,
    pub blue: bool,
    pub alpha: bool,
}

impl ColorMask {
    pub const ALL: Self = Self::new(true, true, true, true);

    pub const fn new(red: bool, green: bool, blue: bool, alpha: bool) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }
}

impl Default for ColorMask {
    fn default() -> Self {
        Self::ALL
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PolygonMode {
    Point,
    Line,
    #[default]
    Fill,
}

/// Scissor rectangle in window coordinates.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScissorArea {
    pub origin: IVec2,
    pub size: UVec2,
}

impl ScissorArea {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            origin: IVec2::new(x, y),
            size: UVec2::new(width, height),
        }
    }
}

/// Device features switched with a plain enable/disable call.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Capability {
    Blend = 0,
    CullFace = 1,
    DepthTest = 2,
    DepthClamp = 3,
    StencilTest = 4,
    ScissorTest = 5,
}

impl Capability {
    pub const COUNT: usize = 6;

    pub const ALL: [Capability; Self::COUNT] = [
        Self::Blend,
        Self::CullFace,
        Self::DepthTest,
        Self::DepthClamp,
        Self::StencilTest,
        Self::ScissorTest,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BufferTarget {
    Array,
    Index,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BufferUsage {
    StreamDraw,
    StreamRead,
    StreamCopy,
    StaticDraw,
    StaticRead,
    StaticCopy,
    DynamicDraw,
    DynamicRead,
    DynamicCopy,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TextureTarget {
    Texture2D = 0,
    TextureCube = 1,
}

impl TextureTarget {
    pub const COUNT: usize = 2;
    pub const ALL: [TextureTarget; Self::COUNT] = [Self::Texture2D, Self::TextureCube];

    pub const fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CubeFace {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        Self::PositiveX,
        Self::NegativeX,
        Self::PositiveY,
        Self::NegativeY,
        Self::PositiveZ,
        Self::NegativeZ,
    ];
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Geometry,
    Fragment,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FramebufferTarget {
    Draw,
    Read,
}

/// Completeness status reported by the device for a framebuffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FramebufferStatus {
    Complete,
    IncompleteAttachment,
    MissingAttachment,
    IncompleteDrawBuffer,
    IncompleteReadBuffer,
    Unsupported,
    Unknown,
}

/// Depth and stencil precision of a render target, in bits.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct DepthStencilBits {
    pub depth: u32,
    pub stencil: u32,
}
