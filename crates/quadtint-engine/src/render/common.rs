//! GPU data layouts shared by the sprite pipeline.

use bytemuck::{Pod, Zeroable};

use crate::coords::Mat3;
use crate::pipeline::{DrawUniforms, VertexInput};

// ── blend ─────────────────────────────────────────────────────────────────

/// `src + dst * (1 - src.a)`: the over operator for premultiplied texels.
pub(super) fn premul_alpha_blend() -> wgpu::BlendState {
    let component = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    };
    wgpu::BlendState {
        color: component,
        alpha: component,
    }
}

// ── uniform block ─────────────────────────────────────────────────────────

/// Host-side image of `SpriteUniforms` in `sprite.wgsl`.
///
/// `mat3x3<f32>` is laid out as three `vec3` columns, each padded to 16
/// bytes; `colors` follows at offset 48.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SpriteUniform {
    pub matrix: [[f32; 4]; 3],
    pub colors: [f32; 4],
}

impl SpriteUniform {
    pub const SIZE: u64 = std::mem::size_of::<SpriteUniform>() as u64;

    pub fn new(uniforms: &DrawUniforms) -> Self {
        Self {
            matrix: pad_columns(&uniforms.matrix),
            colors: uniforms.colors.to_array(),
        }
    }

    pub(super) fn min_binding_size() -> std::num::NonZeroU64 {
        std::num::NonZeroU64::new(Self::SIZE).expect("SpriteUniform has non-zero size by construction")
    }
}

fn pad_columns(m: &Mat3) -> [[f32; 4]; 3] {
    m.cols.map(|[x, y, z]| [x, y, z, 0.0])
}

// ── vertex layout ─────────────────────────────────────────────────────────

const VERTEX_ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
    0 => Float32x2, // position
    1 => Float32x2  // tex_coords
];

pub(super) fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<VertexInput>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Color;

    #[test]
    fn uniform_block_is_64_bytes() {
        assert_eq!(SpriteUniform::SIZE, 64);
        assert_eq!(std::mem::offset_of!(SpriteUniform, colors), 48);
    }

    #[test]
    fn matrix_columns_are_padded() {
        let m = Mat3::from_cols([1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]);
        let u = SpriteUniform::new(&DrawUniforms::new(m, Color::new(0.1, 0.2, 0.3, 0.4)));
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&u));
        assert_eq!(
            floats,
            &[1.0, 2.0, 3.0, 0.0, 4.0, 5.0, 6.0, 0.0, 7.0, 8.0, 9.0, 0.0, 0.1, 0.2, 0.3, 0.4]
        );
    }

    #[test]
    fn vertex_layout_matches_vertex_input() {
        let layout = vertex_layout();
        assert_eq!(layout.array_stride, 16);
        assert_eq!(layout.attributes[0].offset, 0);
        assert_eq!(layout.attributes[1].offset, 8);
        assert_eq!(layout.attributes[1].shader_location, 1);
    }
}
