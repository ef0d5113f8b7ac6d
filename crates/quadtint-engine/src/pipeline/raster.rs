use crate::coords::Vec2;
use crate::paint::Color;

use super::{
    fragment_stage_with, vertex_stage, DrawUniforms, FragmentInput, Precision, Sampler,
    VertexInput, VertexOutput,
};

/// Linear interpolation of a per-vertex value at barycentric `(a, b, c)`.
///
/// Clip `w` is always 1 for this pipeline, so perspective-correct and screen
/// linear interpolation coincide.
#[inline]
pub fn interpolate(values: [Vec2; 3], barycentric: [f32; 3]) -> Vec2 {
    let [a, b, c] = barycentric;
    values[0] * a + values[1] * b + values[2] * c
}

/// Color target for the reference rasterizer. Row 0 is the top row.
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32, clear: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![clear; width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(self.index(x, y)).copied()
    }

    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Reference rasterizer: runs the stage pair over a triangle list.
///
/// Fragments are generated at pixel centers covered by a triangle. Centers
/// lying exactly on an edge follow the top-left rule, so a center on an edge
/// shared by two triangles is shaded exactly once. Output is written without
/// blending.
#[derive(Debug, Copy, Clone, Default)]
pub struct Rasterizer {
    precision: Precision,
}

impl Rasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_precision(precision: Precision) -> Self {
        Self { precision }
    }

    /// Draws `indices` (triangle list) over `vertices` into `target`.
    ///
    /// Returns the number of fragments shaded. Triangles referencing missing
    /// vertices and zero-area triangles are skipped.
    pub fn draw_indexed<S>(
        &self,
        target: &mut Framebuffer,
        vertices: &[VertexInput],
        indices: &[u16],
        uniforms: &DrawUniforms,
        tex: &S,
    ) -> usize
    where
        S: Sampler + ?Sized,
    {
        let transformed: Vec<VertexOutput> = vertices
            .iter()
            .map(|v| vertex_stage(*v, &uniforms.matrix))
            .collect();

        let mut shaded = 0;
        for tri in indices.chunks_exact(3) {
            let fetch = |i: u16| transformed.get(i as usize).copied();
            let (Some(a), Some(b), Some(c)) = (fetch(tri[0]), fetch(tri[1]), fetch(tri[2])) else {
                log::debug!("Rasterizer: triangle {tri:?} references a missing vertex; skipped");
                continue;
            };
            shaded += self.draw_triangle(target, [a, b, c], uniforms, tex);
        }
        shaded
    }

    fn draw_triangle<S>(
        &self,
        target: &mut Framebuffer,
        verts: [VertexOutput; 3],
        uniforms: &DrawUniforms,
        tex: &S,
    ) -> usize
    where
        S: Sampler + ?Sized,
    {
        let (w, h) = (target.width as f32, target.height as f32);
        let [a, mut b, mut c] = verts.map(|v| to_window(v.clip_position, w, h));
        let mut varyings = verts.map(|v| v.tex_coords);

        let mut area = edge(a, b, c);
        if area == 0.0 || !area.is_finite() {
            return 0;
        }
        // Coverage tests below assume a positive area.
        if area < 0.0 {
            std::mem::swap(&mut b, &mut c);
            varyings.swap(1, 2);
            area = -area;
        }

        let min_x = a.x.min(b.x).min(c.x).floor().max(0.0) as u32;
        let min_y = a.y.min(b.y).min(c.y).floor().max(0.0) as u32;
        let max_x = (a.x.max(b.x).max(c.x).ceil().min(w)) as u32;
        let max_y = (a.y.max(b.y).max(c.y).ceil().min(h)) as u32;

        let edges = [(b, c), (c, a), (a, b)];
        let mut shaded = 0;

        for py in min_y..max_y {
            for px in min_x..max_x {
                let p = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
                let weights = edges.map(|(from, to)| canonical_edge(from, to, p));
                let covered = edges
                    .iter()
                    .zip(weights)
                    .all(|(&(from, to), e)| e > 0.0 || (e == 0.0 && is_top_left(from, to)));
                if !covered {
                    continue;
                }
                let bary = weights.map(|e| e / area);

                let input = FragmentInput {
                    tex_coords: interpolate(varyings, bary),
                };
                let color = fragment_stage_with(input, tex, uniforms.colors, self.precision);
                let i = target.index(px, py);
                target.pixels[i] = color;
                shaded += 1;
            }
        }
        shaded
    }
}

/// Clip space → window pixels, +Y down.
#[inline]
fn to_window(clip: [f32; 4], width: f32, height: f32) -> Vec2 {
    Vec2::new((clip[0] * 0.5 + 0.5) * width, (0.5 - clip[1] * 0.5) * height)
}

#[inline]
fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b - a).perp_dot(p - a)
}

/// [`edge`] evaluated from the lexicographically smaller endpoint, so both
/// triangles sharing an edge get bit-identical magnitudes with opposite sign.
#[inline]
fn canonical_edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    if (b.x, b.y) < (a.x, a.y) { -edge(b, a, p) } else { edge(a, b, p) }
}

/// Top or left edge of a positive-area triangle in +Y-down window space.
#[inline]
fn is_top_left(a: Vec2, b: Vec2) -> bool {
    let d = b - a;
    d.y < 0.0 || (d.y == 0.0 && d.x > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Mat3;
    use crate::pipeline::{QUAD_INDICES, UNIT_QUAD};
    use crate::texture::{SamplerConfig, TextureImage};

    fn echo(uv: Vec2) -> Color {
        Color::new(uv.x, uv.y, 0.0, 1.0)
    }

    #[test]
    fn interpolate_is_barycentric_combination() {
        let t = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 2.0)];
        assert_eq!(interpolate(t, [1.0, 0.0, 0.0]), t[0]);
        assert_eq!(interpolate(t, [0.0, 0.0, 1.0]), t[2]);
        assert_eq!(interpolate(t, [0.5, 0.25, 0.25]), Vec2::new(0.25, 0.5));
    }

    #[test]
    fn red_tint_over_white_quad_fills_covered_pixels() {
        let white = TextureImage::solid(4, 4, Color::white());
        let tex = white.bind(SamplerConfig::default());
        let uniforms = DrawUniforms::new(Mat3::IDENTITY, Color::new(1.0, 0.0, 0.0, 1.0));
        let clear = Color::new(0.1, 0.1, 0.1, 1.0);
        let mut fb = Framebuffer::new(8, 8, clear);

        let shaded = Rasterizer::new().draw_indexed(&mut fb, &UNIT_QUAD, &QUAD_INDICES, &uniforms, &tex);
        assert_eq!(shaded, 16);

        // The unit quad covers clip x, y in [0, 1]: the top-right quarter.
        for y in 0..8 {
            for x in 0..8 {
                let expected = if x >= 4 && y < 4 { Color::new(1.0, 0.0, 0.0, 1.0) } else { clear };
                assert_eq!(fb.pixel(x, y), Some(expected), "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn varying_is_linear_across_the_quad() {
        // With the unit quad and identity matrix, tex_coords equal clip
        // positions, so each fragment must see its own clip coordinate.
        let mut fb = Framebuffer::new(16, 16, Color::transparent());
        let uniforms = DrawUniforms::default();
        Rasterizer::new().draw_indexed(&mut fb, &UNIT_QUAD, &QUAD_INDICES, &uniforms, &echo);

        for y in 0..8u32 {
            for x in 8..16u32 {
                let c = fb.pixel(x, y).unwrap();
                let clip_x = (x as f32 + 0.5) / 16.0 * 2.0 - 1.0;
                let clip_y = 1.0 - (y as f32 + 0.5) / 16.0 * 2.0;
                assert!((c.r - clip_x).abs() < 1e-5, "u at ({x}, {y}): {}", c.r);
                assert!((c.g - clip_y).abs() < 1e-5, "v at ({x}, {y}): {}", c.g);
            }
        }
    }

    #[test]
    fn fullscreen_quad_with_matrix_covers_everything() {
        // Maps the unit quad onto [-1, 1]².
        let m = Mat3::from_rows([2.0, 0.0, -1.0], [0.0, 2.0, -1.0], [0.0, 0.0, 1.0]);
        let uniforms = DrawUniforms::new(m, Color::new(0.5, 0.5, 0.5, 0.5));
        let mut fb = Framebuffer::new(5, 3, Color::transparent());
        let tex = |_: Vec2| Color::white();
        Rasterizer::new().draw_indexed(&mut fb, &UNIT_QUAD, &QUAD_INDICES, &uniforms, &tex);
        assert!(fb.pixels().iter().all(|&c| c == Color::new(0.5, 0.5, 0.5, 0.5)));
    }

    #[test]
    fn zero_tint_writes_transparent_black() {
        let m = Mat3::from_rows([2.0, 0.0, -1.0], [0.0, 2.0, -1.0], [0.0, 0.0, 1.0]);
        let uniforms = DrawUniforms::new(m, Color::transparent());
        let mut fb = Framebuffer::new(4, 4, Color::white());
        Rasterizer::new().draw_indexed(&mut fb, &UNIT_QUAD, &QUAD_INDICES, &uniforms, &echo);
        assert!(fb.pixels().iter().all(|&c| c == Color::transparent()));
    }

    #[test]
    fn singular_matrix_produces_no_fragments() {
        let m = Mat3::from_rows([1.0, 1.0, 0.0], [1.0, 1.0, 0.0], [0.0, 0.0, 1.0]);
        let uniforms = DrawUniforms::new(m, Color::white());
        let mut fb = Framebuffer::new(8, 8, Color::black());
        let shaded = Rasterizer::new().draw_indexed(&mut fb, &UNIT_QUAD, &QUAD_INDICES, &uniforms, &echo);
        assert_eq!(shaded, 0);
        assert!(fb.pixels().iter().all(|&c| c == Color::black()));
    }

    #[test]
    fn winding_does_not_matter() {
        let reversed = [0u16, 2, 1, 0, 3, 2];
        let mut a = Framebuffer::new(8, 8, Color::transparent());
        let mut b = Framebuffer::new(8, 8, Color::transparent());
        let uniforms = DrawUniforms::default();
        Rasterizer::new().draw_indexed(&mut a, &UNIT_QUAD, &QUAD_INDICES, &uniforms, &echo);
        Rasterizer::new().draw_indexed(&mut b, &UNIT_QUAD, &reversed, &uniforms, &echo);
        assert_eq!(
            a.pixels().iter().filter(|c| c.a > 0.0).count(),
            b.pixels().iter().filter(|c| c.a > 0.0).count()
        );
    }

    /// Draws the unit quad under `[[a, -b, tx], [b, a, ty]]` and checks that
    /// every center inside the mapped quad is shaded exactly once.
    fn assert_watertight(a: f32, b: f32, tx: f32, ty: f32, w: u32, h: u32) {
        let m = Mat3::from_rows([a, -b, tx], [b, a, ty], [0.0, 0.0, 1.0]);
        let red = Color::new(1.0, 0.0, 0.0, 1.0);
        let mut fb = Framebuffer::new(w, h, Color::transparent());
        let tex = |_: Vec2| Color::white();
        let shaded = Rasterizer::new().draw_indexed(
            &mut fb,
            &UNIT_QUAD,
            &QUAD_INDICES,
            &DrawUniforms::new(m, red),
            &tex,
        );

        let det = a * a + b * b;
        let mut painted = 0;
        for py in 0..h {
            for px in 0..w {
                let dx = (px as f32 + 0.5) / w as f32 * 2.0 - 1.0 - tx;
                let dy = 1.0 - (py as f32 + 0.5) / h as f32 * 2.0 - ty;
                let u = (a * dx + b * dy) / det;
                let v = (a * dy - b * dx) / det;
                let inside = [u, v].iter().all(|&t| t > 1e-3 && t < 1.0 - 1e-3);
                let hit = fb.pixel(px, py) == Some(red);
                if hit {
                    painted += 1;
                }
                if inside {
                    assert!(hit, "hole at ({px}, {py}) in {w}x{h}");
                }
            }
        }
        assert_eq!(shaded, painted, "double-shaded centers in {w}x{h}");
    }

    #[test]
    fn shared_diagonal_leaves_no_holes() {
        assert_watertight(1.9, 0.0, -0.95, -0.95, 2, 22);
        for w in 1..=24 {
            for h in 1..=24 {
                assert_watertight(1.9, 0.0, -0.95, -0.95, w, h);
                assert_watertight(1.3, 0.6, -0.4, -0.9, w, h);
            }
        }
    }

    #[test]
    fn center_on_the_diagonal_is_shaded_once() {
        // 5x3 puts the center (2.5, 1.5) exactly on the shared diagonal.
        let m = Mat3::from_rows([2.0, 0.0, -1.0], [0.0, 2.0, -1.0], [0.0, 0.0, 1.0]);
        let mut fb = Framebuffer::new(5, 3, Color::transparent());
        let shaded = Rasterizer::new().draw_indexed(
            &mut fb,
            &UNIT_QUAD,
            &QUAD_INDICES,
            &DrawUniforms::new(m, Color::white()),
            &echo,
        );
        assert_eq!(shaded, 15);
    }

    #[test]
    fn missing_vertices_are_skipped() {
        let mut fb = Framebuffer::new(4, 4, Color::transparent());
        let shaded = Rasterizer::new().draw_indexed(
            &mut fb,
            &UNIT_QUAD,
            &[0, 1, 9],
            &DrawUniforms::default(),
            &echo,
        );
        assert_eq!(shaded, 0);
    }

    #[test]
    fn offscreen_geometry_is_clipped() {
        let m = Mat3::from_rows([1.0, 0.0, 5.0], [0.0, 1.0, 5.0], [0.0, 0.0, 1.0]);
        let mut fb = Framebuffer::new(4, 4, Color::transparent());
        let shaded = Rasterizer::new().draw_indexed(
            &mut fb,
            &UNIT_QUAD,
            &QUAD_INDICES,
            &DrawUniforms::new(m, Color::white()),
            &echo,
        );
        assert_eq!(shaded, 0);
    }
}
