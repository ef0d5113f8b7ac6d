use crate::paint::Color;

/// Color transform accumulated down the sprite hierarchy.
///
/// Adjacent transforms of the same kind collapse into one; mixed chains keep
/// their order and are applied left to right.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorTransform {
    Multiply(Color),
    Add(Color),
    Combine(Box<ColorTransform>, Box<ColorTransform>),
}

impl ColorTransform {
    #[inline]
    pub fn identity() -> Self {
        ColorTransform::Add(Color::transparent())
    }

    #[inline]
    pub fn multiply(r: f32, g: f32, b: f32, a: f32) -> Self {
        ColorTransform::Multiply(Color::new(r, g, b, a))
    }

    #[inline]
    pub fn add(r: f32, g: f32, b: f32, a: f32) -> Self {
        ColorTransform::Add(Color::new(r, g, b, a))
    }

    /// `self` followed by `other`.
    pub fn combine(self, other: ColorTransform) -> ColorTransform {
        match (self, other) {
            (ColorTransform::Multiply(l), ColorTransform::Multiply(r)) => {
                ColorTransform::Multiply(l.modulate(r))
            }
            (ColorTransform::Add(l), ColorTransform::Add(r)) => ColorTransform::Add(Color::new(
                l.r + r.r,
                l.g + r.g,
                l.b + r.b,
                l.a + r.a,
            )),
            (l, r) => ColorTransform::Combine(Box::new(l), Box::new(r)),
        }
    }

    /// Applies the transform to `color`. No clamping.
    pub fn fold(&self, color: Color) -> Color {
        match self {
            ColorTransform::Multiply(m) => color.modulate(*m),
            ColorTransform::Add(a) => Color::new(
                color.r + a.r,
                color.g + a.g,
                color.b + a.b,
                color.a + a.a,
            ),
            ColorTransform::Combine(l, r) => r.fold(l.fold(color)),
        }
    }

    /// The `colors` uniform: the transform applied to opaque white.
    #[inline]
    pub fn tint(&self) -> Color {
        self.fold(Color::white())
    }
}

impl Default for ColorTransform {
    fn default() -> Self {
        Self::identity()
    }
}
