use core::ops::{Add, Mul, Sub};

use bytemuck::{Pod, Zeroable};

/// 2D vector.
///
/// Used for object-space positions, texture coordinates and the interpolated
/// varying. `#[repr(C)]` so it can live directly inside GPU vertex data.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    #[inline]
    pub const fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }

    /// 2D cross product `self.x * rhs.y - self.y * rhs.x`: twice the signed
    /// area of the triangle `(0, self, rhs)`.
    #[inline]
    pub fn perp_dot(self, rhs: Vec2) -> f32 {
        self.x * rhs.y - self.y * rhs.x
    }

    #[inline]
    pub fn lerp(self, rhs: Vec2, t: f32) -> Vec2 {
        self + (rhs - self) * t
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f32; 2]> for Vec2 {
    #[inline]
    fn from([x, y]: [f32; 2]) -> Self {
        Vec2::new(x, y)
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_two_packed_floats() {
        assert_eq!(std::mem::size_of::<Vec2>(), 8);
        let v = Vec2::new(1.5, -2.0);
        assert_eq!(bytemuck::cast::<Vec2, [f32; 2]>(v), v.to_array());
    }

    #[test]
    fn perp_dot_sign_follows_winding() {
        let x = Vec2::new(1.0, 0.0);
        let y = Vec2::new(0.0, 1.0);
        assert_eq!(x.perp_dot(y), 1.0);
        assert_eq!(y.perp_dot(x), -1.0);
        assert_eq!(x.perp_dot(x * 3.0), 0.0);
    }

    #[test]
    fn lerp_hits_endpoints() {
        let a = Vec2::new(0.0, 4.0);
        let b = Vec2::new(2.0, 0.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Vec2::new(1.0, 2.0));
    }
}
