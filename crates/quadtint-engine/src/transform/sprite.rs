use crate::coords::Viewport;
use crate::pipeline::DrawUniforms;

use super::{Affine2, ColorTransform};

/// Sprite units per half viewport at the default zoom.
pub const DEFAULT_BASE_SCALE: f32 = 4.0;

/// Maps sprite space (pixels, +Y down) into clip space.
///
/// `base_scale` sets how many screen pixels one sprite unit covers, halved:
/// with the default of 4, a sprite unit spans 2 pixels.
pub fn viewport_transform(viewport: Viewport, base_scale: f32) -> Affine2 {
    let width = viewport.width.max(1.0);
    let height = viewport.height.max(1.0);
    Affine2::scale(base_scale / width, -base_scale / height)
}

/// Position and color transform of one sprite node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpriteTransform {
    pub position: Affine2,
    pub color: ColorTransform,
}

impl SpriteTransform {
    #[inline]
    pub fn identity() -> Self {
        Self::default()
    }

    #[inline]
    pub fn translate(x: f32, y: f32) -> Self {
        Self {
            position: Affine2::translation(x, y),
            color: ColorTransform::identity(),
        }
    }

    /// Linear part as stored in animation data (rotation and scale baked).
    #[inline]
    pub fn rotate(m11: f32, m12: f32, m21: f32, m22: f32) -> Self {
        Self {
            position: Affine2::from_linear(m11, m12, m21, m22),
            color: ColorTransform::identity(),
        }
    }

    #[inline]
    pub fn scale(sx: f32, sy: f32) -> Self {
        Self {
            position: Affine2::scale(sx, sy),
            color: ColorTransform::identity(),
        }
    }

    #[inline]
    pub fn color_multiply(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            position: Affine2::IDENTITY,
            color: ColorTransform::multiply(r, g, b, a),
        }
    }

    #[inline]
    pub fn color_add(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            position: Affine2::IDENTITY,
            color: ColorTransform::add(r, g, b, a),
        }
    }

    /// `self` (a child) placed under `parent`.
    pub fn combine(self, parent: SpriteTransform) -> SpriteTransform {
        SpriteTransform {
            position: self.position.then(&parent.position),
            color: self.color.combine(parent.color),
        }
    }

    /// Flattens into the draw uniforms for a given viewport.
    pub fn uniforms(&self, viewport: Viewport, base_scale: f32) -> DrawUniforms {
        let matrix = self
            .position
            .then(&viewport_transform(viewport, base_scale))
            .to_mat3();
        DrawUniforms::new(matrix, self.color.tint())
    }
}
