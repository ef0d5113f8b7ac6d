use crate::coords::Vec2;
use crate::paint::Color;

use super::Precision;

/// Opaque texture sampling capability.
///
/// Wrap and filter behaviour belong to the implementor; the fragment stage
/// only asks for a color at a coordinate.
pub trait Sampler {
    fn sample(&self, uv: Vec2) -> Color;
}

impl<F> Sampler for F
where
    F: Fn(Vec2) -> Color,
{
    #[inline]
    fn sample(&self, uv: Vec2) -> Color {
        self(uv)
    }
}

/// Per-fragment input: the interpolated texture coordinate.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct FragmentInput {
    pub tex_coords: Vec2,
}

/// Samples `tex` at the fragment's coordinate and multiplies by `colors`.
///
/// `out = sample(tex, t') ⊙ colors`, componentwise and unclamped.
#[inline]
pub fn fragment_stage<S>(input: FragmentInput, tex: &S, colors: Color) -> Color
where
    S: Sampler + ?Sized,
{
    tex.sample(input.tex_coords).modulate(colors)
}

/// [`fragment_stage`] evaluated at a declared precision.
///
/// Under [`Precision::Medium`] the coordinate, texel, tint and product are
/// each rounded to 10 mantissa bits.
pub fn fragment_stage_with<S>(
    input: FragmentInput,
    tex: &S,
    colors: Color,
    precision: Precision,
) -> Color
where
    S: Sampler + ?Sized,
{
    if precision == Precision::Full {
        return fragment_stage(input, tex, colors);
    }

    let p = |v: f32| precision.apply(v);
    let pc = |c: Color| Color::new(p(c.r), p(c.g), p(c.b), p(c.a));

    let uv = Vec2::new(p(input.tex_coords.x), p(input.tex_coords.y));
    let texel = pc(tex.sample(uv));
    pc(texel.modulate(pc(colors)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(u: f32, v: f32) -> FragmentInput {
        FragmentInput { tex_coords: Vec2::new(u, v) }
    }

    fn gradient(uv: Vec2) -> Color {
        Color::new(uv.x, uv.y, 0.5, 1.0 - uv.x * 0.5)
    }

    #[test]
    fn output_is_texel_times_tint() {
        let tint = Color::new(0.5, 2.0, 0.0, 0.75);
        for (u, v) in [(0.0, 0.0), (0.25, 0.5), (1.0, 1.0)] {
            let s = gradient(Vec2::new(u, v));
            let out = fragment_stage(frag(u, v), &gradient, tint);
            assert_eq!(out, Color::new(s.r * 0.5, s.g * 2.0, s.b * 0.0, s.a * 0.75));
        }
    }

    #[test]
    fn identity_tint_returns_texel() {
        let out = fragment_stage(frag(0.3, 0.6), &gradient, Color::white());
        assert_eq!(out, gradient(Vec2::new(0.3, 0.6)));
    }

    #[test]
    fn zero_tint_is_transparent_black() {
        let out = fragment_stage(frag(0.9, 0.1), &gradient, Color::transparent());
        assert_eq!(out, Color::transparent());
    }

    #[test]
    fn coordinate_reaches_sampler_unchanged() {
        let echo = |uv: Vec2| Color::new(uv.x, uv.y, 0.0, 1.0);
        let out = fragment_stage(frag(-3.5, 7.25), &echo, Color::white());
        assert_eq!((out.r, out.g), (-3.5, 7.25));
    }

    #[test]
    fn medium_precision_stays_close_to_full() {
        let tint = Color::new(0.8, 0.6, 0.4, 0.9);
        let eps = Precision::Medium.epsilon();
        for i in 0..=16 {
            let u = i as f32 / 16.0 + 0.003;
            let full = fragment_stage_with(frag(u, 1.0 - u), &gradient, tint, Precision::Full);
            let med = fragment_stage_with(frag(u, 1.0 - u), &gradient, tint, Precision::Medium);
            for (a, b) in full.to_array().into_iter().zip(med.to_array()) {
                assert!((a - b).abs() <= 4.0 * eps, "{a} vs {b}");
            }
        }
    }

    #[test]
    fn medium_precision_keeps_identity_and_zero_tint_exact() {
        let texel = Color::new(1.0, 0.5, 0.25, 1.0);
        let solid = move |_: Vec2| texel;
        let med = |c| fragment_stage_with(frag(0.4, 0.4), &solid, c, Precision::Medium);
        assert_eq!(med(Color::white()), texel);
        assert_eq!(med(Color::transparent()), Color::transparent());
    }
}
