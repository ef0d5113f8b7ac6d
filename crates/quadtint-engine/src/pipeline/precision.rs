/// Declared arithmetic precision of the fragment stage.
///
/// The GPU program only promises medium precision for coordinate and color
/// math. WGSL has no portable `mediump`, so the shader computes in `f32`;
/// `Medium` lets the reference pipeline reproduce the weaker guarantee.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum Precision {
    #[default]
    Full,
    /// 10 explicit mantissa bits, the `mediump` / half-float class.
    Medium,
}

impl Precision {
    #[inline]
    pub fn apply(self, value: f32) -> f32 {
        match self {
            Precision::Full => value,
            Precision::Medium => quantize_mediump(value),
        }
    }

    /// Relative error bound of one rounding step at this precision.
    #[inline]
    pub fn epsilon(self) -> f32 {
        match self {
            Precision::Full => f32::EPSILON,
            Precision::Medium => 1.0 / 1024.0,
        }
    }
}

const DROPPED_BITS: u32 = 23 - 10;

/// Rounds `value` to 10 mantissa bits, nearest with ties away from zero.
///
/// Exponent range is left at `f32`; only the mantissa shrinks. Non-finite
/// inputs are returned unchanged.
pub fn quantize_mediump(value: f32) -> f32 {
    if !value.is_finite() {
        return value;
    }
    let bits = value.to_bits();
    let half = 1u32 << (DROPPED_BITS - 1);
    let mask = !((1u32 << DROPPED_BITS) - 1);
    // A carry out of the mantissa bumps the exponent, which is the correct
    // rounding; it can only overflow to infinity for values near f32::MAX.
    f32::from_bits(bits.wrapping_add(half) & mask)
}
