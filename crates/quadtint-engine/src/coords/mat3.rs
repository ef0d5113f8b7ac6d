use core::ops::Mul;

use super::Vec2;

/// 3×3 matrix for 2D homogeneous coordinates.
///
/// Storage is column-major: `cols[c][r]` is row `r` of column `c`. This is the
/// layout `mat3x3<f32>` uses in WGSL (minus the per-column padding, which the
/// uniform packing adds).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat3 {
    pub cols: [[f32; 3]; 3],
}

impl Mat3 {
    pub const IDENTITY: Mat3 = Mat3 {
        cols: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    #[inline]
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    #[inline]
    pub const fn from_cols(c0: [f32; 3], c1: [f32; 3], c2: [f32; 3]) -> Self {
        Self { cols: [c0, c1, c2] }
    }

    /// Builds a matrix from rows, the order matrices are usually written in.
    #[inline]
    pub const fn from_rows(r0: [f32; 3], r1: [f32; 3], r2: [f32; 3]) -> Self {
        Self {
            cols: [
                [r0[0], r1[0], r2[0]],
                [r0[1], r1[1], r2[1]],
                [r0[2], r1[2], r2[2]],
            ],
        }
    }

    /// Builds a matrix from 9 column-major scalars (the GL `uniformMatrix3fv`
    /// order with `transpose = false`).
    #[inline]
    pub const fn from_cols_array(m: [f32; 9]) -> Self {
        Self::from_cols([m[0], m[1], m[2]], [m[3], m[4], m[5]], [m[6], m[7], m[8]])
    }

    #[inline]
    pub const fn to_cols_array(&self) -> [f32; 9] {
        let [c0, c1, c2] = self.cols;
        [c0[0], c0[1], c0[2], c1[0], c1[1], c1[2], c2[0], c2[1], c2[2]]
    }

    #[inline]
    pub const fn col(&self, c: usize) -> [f32; 3] {
        self.cols[c]
    }

    #[inline]
    pub const fn row(&self, r: usize) -> [f32; 3] {
        [self.cols[0][r], self.cols[1][r], self.cols[2][r]]
    }

    /// `M · v`.
    #[inline]
    pub fn mul_vec3(&self, v: [f32; 3]) -> [f32; 3] {
        let [c0, c1, c2] = self.cols;
        [
            c0[0] * v[0] + c1[0] * v[1] + c2[0] * v[2],
            c0[1] * v[0] + c1[1] * v[1] + c2[1] * v[2],
            c0[2] * v[0] + c1[2] * v[1] + c2[2] * v[2],
        ]
    }

    /// Lifts `p` to `(p.x, p.y, 1)` and returns `M · (p.x, p.y, 1)`.
    ///
    /// No divide by the third component happens here.
    #[inline]
    pub fn transform_point(&self, p: Vec2) -> [f32; 3] {
        self.mul_vec3([p.x, p.y, 1.0])
    }

    pub fn determinant(&self) -> f32 {
        let [a, b, c] = self.cols;
        a[0] * (b[1] * c[2] - c[1] * b[2]) - b[0] * (a[1] * c[2] - c[1] * a[2])
            + c[0] * (a[1] * b[2] - b[1] * a[2])
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.cols.iter().flatten().all(|v| v.is_finite())
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Mat3 {
    type Output = Mat3;

    fn mul(self, rhs: Mat3) -> Mat3 {
        Mat3::from_cols(
            self.mul_vec3(rhs.cols[0]),
            self.mul_vec3(rhs.cols[1]),
            self.mul_vec3(rhs.cols[2]),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_transposes_into_columns() {
        let m = Mat3::from_rows([1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]);
        assert_eq!(m.col(0), [1.0, 4.0, 7.0]);
        assert_eq!(m.row(0), [1.0, 2.0, 3.0]);
        assert_eq!(m.to_cols_array(), [1.0, 4.0, 7.0, 2.0, 5.0, 8.0, 3.0, 6.0, 9.0]);
    }

    #[test]
    fn transform_point_uses_third_column_as_translation() {
        let m = Mat3::from_rows([2.0, 0.0, 5.0], [0.0, 3.0, -1.0], [0.0, 0.0, 1.0]);
        assert_eq!(m.transform_point(Vec2::new(1.0, 2.0)), [7.0, 5.0, 1.0]);
    }

    #[test]
    fn identity_is_neutral_for_product() {
        let m = Mat3::from_rows([1.0, 2.0, 3.0], [0.0, 1.0, 4.0], [5.0, 6.0, 0.0]);
        assert_eq!(m * Mat3::IDENTITY, m);
        assert_eq!(Mat3::IDENTITY * m, m);
    }

    #[test]
    fn product_applies_right_operand_first() {
        let translate = Mat3::from_rows([1.0, 0.0, 10.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]);
        let scale = Mat3::from_rows([2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 1.0]);
        let p = Vec2::new(1.0, 1.0);
        assert_eq!((translate * scale).transform_point(p), [12.0, 2.0, 1.0]);
        assert_eq!((scale * translate).transform_point(p), [22.0, 2.0, 1.0]);
    }

    #[test]
    fn determinant_of_singular_matrix_is_zero() {
        let m = Mat3::from_rows([1.0, 2.0, 0.0], [2.0, 4.0, 0.0], [0.0, 0.0, 1.0]);
        assert_eq!(m.determinant(), 0.0);
        assert_eq!(Mat3::IDENTITY.determinant(), 1.0);
    }
}
