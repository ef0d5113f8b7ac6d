use crate::coords::{Mat3, Vec2};

/// 2D affine transform, row-vector convention.
///
/// A point maps as `[x y 1] · | m11 m12 0 |`
///                            `| m21 m22 0 |`
///                            `| m31 m32 1 |`
/// so `(m31, m32)` is the translation and [`then`](Self::then) composes left
/// to right.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Affine2 {
    pub m11: f32,
    pub m12: f32,
    pub m21: f32,
    pub m22: f32,
    pub m31: f32,
    pub m32: f32,
}

impl Affine2 {
    pub const IDENTITY: Affine2 = Affine2::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    #[inline]
    pub const fn new(m11: f32, m12: f32, m21: f32, m22: f32, m31: f32, m32: f32) -> Self {
        Self { m11, m12, m21, m22, m31, m32 }
    }

    #[inline]
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    #[inline]
    pub const fn translation(x: f32, y: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, x, y)
    }

    #[inline]
    pub const fn scale(sx: f32, sy: f32) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Counter-clockwise rotation (with +Y up) by `radians`.
    #[inline]
    pub fn rotation(radians: f32) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Raw 2×2 linear part (rotation, scale and skew baked together), as
    /// stored in animation data.
    #[inline]
    pub const fn from_linear(m11: f32, m12: f32, m21: f32, m22: f32) -> Self {
        Self::new(m11, m12, m21, m22, 0.0, 0.0)
    }

    /// `self` followed by `other`.
    pub fn then(&self, other: &Affine2) -> Affine2 {
        Affine2::new(
            self.m11 * other.m11 + self.m12 * other.m21,
            self.m11 * other.m12 + self.m12 * other.m22,
            self.m21 * other.m11 + self.m22 * other.m21,
            self.m21 * other.m12 + self.m22 * other.m22,
            self.m31 * other.m11 + self.m32 * other.m21 + other.m31,
            self.m31 * other.m12 + self.m32 * other.m22 + other.m32,
        )
    }

    #[inline]
    pub fn transform_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x * self.m11 + p.y * self.m21 + self.m31,
            p.x * self.m12 + p.y * self.m22 + self.m32,
        )
    }

    /// Packs into the `matrix` uniform.
    ///
    /// Column-major `[m11, m12, 0, m21, m22, 0, m31, m32, 1]`, so that
    /// `M · (x, y, 1)` in the vertex stage equals [`transform_point`](Self::transform_point).
    #[inline]
    pub const fn to_mat3(&self) -> Mat3 {
        Mat3::from_cols_array([
            self.m11, self.m12, 0.0, //
            self.m21, self.m22, 0.0, //
            self.m31, self.m32, 1.0,
        ])
    }
}

impl Default for Affine2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-5 && (a.y - b.y).abs() < 1e-5
    }

    #[test]
    fn then_applies_left_first() {
        let t = Affine2::scale(2.0, 3.0).then(&Affine2::translation(1.0, -1.0));
        assert_eq!(t.transform_point(Vec2::new(1.0, 1.0)), Vec2::new(3.0, 2.0));

        let t = Affine2::translation(1.0, -1.0).then(&Affine2::scale(2.0, 3.0));
        assert_eq!(t.transform_point(Vec2::new(1.0, 1.0)), Vec2::new(4.0, 0.0));
    }

    #[test]
    fn rotation_quarter_turn() {
        let r = Affine2::rotation(std::f32::consts::FRAC_PI_2);
        assert!(close(r.transform_point(Vec2::new(1.0, 0.0)), Vec2::new(0.0, 1.0)));
        assert!(close(r.transform_point(Vec2::new(0.0, 1.0)), Vec2::new(-1.0, 0.0)));
    }

    #[test]
    fn mat3_matches_point_transform() {
        let t = Affine2::from_linear(0.5, 0.25, -0.75, 2.0).then(&Affine2::translation(3.0, 4.0));
        let m = t.to_mat3();
        for p in [Vec2::new(0.0, 0.0), Vec2::new(1.0, -2.0), Vec2::new(7.5, 0.125)] {
            let [x, y, w] = m.transform_point(p);
            assert!(close(Vec2::new(x, y), t.transform_point(p)));
            assert_eq!(w, 1.0);
        }
    }

    #[test]
    fn mat3_packing_order() {
        let m = Affine2::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0).to_mat3();
        assert_eq!(m.to_cols_array(), [1.0, 2.0, 0.0, 3.0, 4.0, 0.0, 5.0, 6.0, 1.0]);
    }
}
