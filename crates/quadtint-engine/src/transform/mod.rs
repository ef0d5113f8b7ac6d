//! Host-side construction of the draw uniforms.
//!
//! Sprites are positioned with 2D affine transforms and colored with a chain
//! of multiply/add color transforms. Both are composed down a sprite
//! hierarchy, then flattened into the two uniforms the stage pair reads:
//! the `matrix` (after the viewport mapping) and the `colors` tint.

mod affine;
mod color;
mod sprite;

pub use affine::Affine2;
pub use color::ColorTransform;
pub use sprite::{viewport_transform, SpriteTransform, DEFAULT_BASE_SCALE};
