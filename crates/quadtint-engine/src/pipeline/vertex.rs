use bytemuck::{Pod, Zeroable};

use crate::coords::{Mat3, Vec2};

/// One vertex as authored by the host.
///
/// The same layout is uploaded to the GPU: `position` at location 0,
/// `tex_coords` at location 1.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct VertexInput {
    /// Object-space position.
    pub position: Vec2,
    /// Texture coordinate. Values outside `[0, 1]` are allowed; the sampler
    /// decides what they mean.
    pub tex_coords: Vec2,
}

impl VertexInput {
    #[inline]
    pub const fn new(position: Vec2, tex_coords: Vec2) -> Self {
        Self { position, tex_coords }
    }
}

/// What the vertex stage hands to the rasterizer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VertexOutput {
    /// Homogeneous clip position; `z` is always 0 and `w` always 1.
    pub clip_position: [f32; 4],
    /// The varying, equal to the input `tex_coords`.
    pub tex_coords: Vec2,
}

/// Transforms one vertex.
///
/// `h = M · (p.x, p.y, 1)`, emitted as `(h.x, h.y, 0, 1)`. The third
/// component of `h` is dropped, so a projective bottom row in `M` has no
/// effect on the output. A singular `M` collapses geometry; that is not an
/// error.
#[inline]
pub fn vertex_stage(input: VertexInput, matrix: &Mat3) -> VertexOutput {
    let [x, y, _] = matrix.transform_point(input.position);
    VertexOutput {
        clip_position: [x, y, 0.0, 1.0],
        tex_coords: input.tex_coords,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(px: f32, py: f32, u: f32, t: f32) -> VertexInput {
        VertexInput::new(Vec2::new(px, py), Vec2::new(u, t))
    }

    #[test]
    fn emits_top_two_rows_of_product() {
        let m = Mat3::from_rows([0.5, -2.0, 0.25], [3.0, 1.0, -1.0], [0.0, 0.0, 1.0]);
        let points = [(0.0, 0.0), (1.0, 2.0), (-3.5, 0.75), (100.0, -42.0)];
        for (px, py) in points {
            let out = vertex_stage(v(px, py, 0.0, 0.0), &m);
            let h = m.transform_point(Vec2::new(px, py));
            assert_eq!(out.clip_position, [h[0], h[1], 0.0, 1.0]);
        }
    }

    #[test]
    fn identity_matrix_keeps_position() {
        let out = vertex_stage(v(0.3, -0.7, 0.0, 0.0), &Mat3::IDENTITY);
        assert_eq!(out.clip_position, [0.3, -0.7, 0.0, 1.0]);
    }

    #[test]
    fn tex_coords_pass_through_untouched() {
        let m = Mat3::from_rows([9.0, 1.0, 4.0], [2.0, -6.0, 3.0], [0.0, 0.0, 1.0]);
        for (u, t) in [(0.0, 1.0), (-0.5, 2.25), (1e-7, 1e7), (0.1, 0.9)] {
            let out = vertex_stage(v(1.0, 1.0, u, t), &m);
            assert_eq!(out.tex_coords, Vec2::new(u, t));
        }
    }

    #[test]
    fn projective_row_does_not_change_w() {
        let m = Mat3::from_rows([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.5, 0.5, 2.0]);
        let out = vertex_stage(v(2.0, 4.0, 0.0, 0.0), &m);
        assert_eq!(out.clip_position, [2.0, 4.0, 0.0, 1.0]);
    }

    #[test]
    fn singular_matrix_collapses_without_failing() {
        let m = Mat3::from_rows([0.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
        let out = vertex_stage(v(5.0, -5.0, 0.2, 0.8), &m);
        assert_eq!(out.clip_position, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(out.tex_coords, Vec2::new(0.2, 0.8));
    }
}
