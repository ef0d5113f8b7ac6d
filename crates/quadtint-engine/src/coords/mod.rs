//! Coordinate and matrix types shared by the stage pair, the host-side
//! uniform setup and the GPU renderer.
//!
//! Conventions:
//! - object space is whatever the host authored; the vertex stage maps it to
//!   clip space with a 3×3 matrix
//! - clip space is GL/WGSL NDC (+Y up, `[-1, 1]²` visible)
//! - matrices are stored column-major, the order WGSL expects for `mat3x3`

mod mat3;
mod vec2;
mod viewport;

pub use mat3::Mat3;
pub use vec2::Vec2;
pub use viewport::Viewport;
