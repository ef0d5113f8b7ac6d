//! CPU reference of the textured, tinted quad stage pair.
//!
//! Data flows one way: host vertex attributes → [`vertex_stage`] →
//! rasterizer interpolation → [`fragment_stage`] → framebuffer. Both stages
//! are pure functions of their explicit inputs; the draw-scoped uniforms
//! (matrix, tint, texture binding) are parameters, never globals.
//!
//! The GPU program in `render/shaders/sprite.wgsl` performs the same
//! arithmetic. This module exists so the contract can be exercised without a
//! device, and so hosts can reason about what a draw will produce.

mod fragment;
mod precision;
mod raster;
mod vertex;

pub use fragment::{fragment_stage, fragment_stage_with, FragmentInput, Sampler};
pub use precision::{quantize_mediump, Precision};
pub use raster::{interpolate, Framebuffer, Rasterizer};
pub use vertex::{vertex_stage, VertexInput, VertexOutput};

use crate::coords::{Mat3, Vec2};
use crate::paint::Color;

/// Uniforms that stay constant for a whole draw.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawUniforms {
    /// `matrix`: object space → clip space.
    pub matrix: Mat3,
    /// `colors`: multiplicative tint.
    pub colors: Color,
}

impl DrawUniforms {
    #[inline]
    pub const fn new(matrix: Mat3, colors: Color) -> Self {
        Self { matrix, colors }
    }
}

impl Default for DrawUniforms {
    fn default() -> Self {
        Self::new(Mat3::IDENTITY, Color::white())
    }
}

/// Unit quad with texture coordinates equal to positions.
pub const UNIT_QUAD: [VertexInput; 4] = [
    VertexInput::new(Vec2::new(0.0, 0.0), Vec2::new(0.0, 0.0)),
    VertexInput::new(Vec2::new(1.0, 0.0), Vec2::new(1.0, 0.0)),
    VertexInput::new(Vec2::new(1.0, 1.0), Vec2::new(1.0, 1.0)),
    VertexInput::new(Vec2::new(0.0, 1.0), Vec2::new(0.0, 1.0)),
];

/// Two triangles over four quad corners.
pub const QUAD_INDICES: [u16; 6] = [0, 1, 2, 2, 3, 0];
