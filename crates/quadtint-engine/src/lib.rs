//! Quadtint engine crate.
//!
//! A textured, tinted quad pipeline: a vertex stage that maps a 2D position
//! through a 3×3 matrix into clip space, and a fragment stage that multiplies
//! a texture sample by a tint. [`pipeline`] is the CPU reference of that
//! stage pair; [`render`] runs the same program on the GPU through wgpu.
//!
//! Host-side helpers build the per-draw uniforms: [`transform`] composes
//! sprite transforms and color transforms, [`texture`] holds texel data and
//! sampling state.

pub mod coords;
pub mod paint;
pub mod pipeline;
pub mod texture;
pub mod transform;

pub mod core;
pub mod device;
pub mod logging;
pub mod render;
pub mod time;
pub mod window;
