//! What the viewer draws: one image quad, spinning and breathing.

use std::path::Path;

use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use quadtint_engine::coords::{Vec2, Viewport};
use quadtint_engine::paint::Color;
use quadtint_engine::pipeline::VertexInput;
use quadtint_engine::render::SpriteDraw;
use quadtint_engine::texture::AddressMode;
use quadtint_engine::transform::{Affine2, ColorTransform, SpriteTransform};

/// Share of the smaller viewport side the quad is fitted into.
const FILL: f32 = 0.6;
const SPIN_RADIANS_PER_SEC: f32 = 0.6;
const PULSE_HZ: f32 = 0.5;
const PULSE_AMPLITUDE: f32 = 0.08;

/// Decodes `path` into premultiplied RGBA8.
pub fn load_image(path: &Path) -> Result<RgbaImage> {
    let mut image = image::open(path)
        .with_context(|| format!("failed to load image {}", path.display()))?
        .to_rgba8();
    premultiply(&mut image);
    log::info!("loaded {} ({}x{})", path.display(), image.width(), image.height());
    Ok(image)
}

/// Two-tone checkerboard with `cell`-pixel squares and a transparent border.
pub fn checkerboard(size: u32, cell: u32) -> RgbaImage {
    let cell = cell.max(1);
    RgbaImage::from_fn(size, size, |x, y| {
        if x == 0 || y == 0 || x + 1 == size || y + 1 == size {
            Rgba([0, 0, 0, 0])
        } else if (x / cell + y / cell) % 2 == 0 {
            Rgba([235, 235, 235, 255])
        } else {
            Rgba([70, 110, 200, 255])
        }
    })
}

/// Straight alpha → premultiplied, in place.
///
/// The texture is sampled as sRGB and blended in linear space, so color is
/// decoded, scaled by alpha and re-encoded.
pub fn premultiply(image: &mut RgbaImage) {
    for Rgba([r, g, b, a]) in image.pixels_mut() {
        let alpha = *a as f32 / 255.0;
        let scale = |c: u8| {
            let linear = srgb_to_linear(c as f32 / 255.0) * alpha;
            (linear_to_srgb(linear) * 255.0).round() as u8
        };
        *r = scale(*r);
        *g = scale(*g);
        *b = scale(*b);
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) }
}

fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.003_130_8 { c * 12.92 } else { 1.055 * c.powf(1.0 / 2.4) - 0.055 }
}

/// Sprite-space size of an image fitted into `FILL` of the viewport.
///
/// A viewport spans `2 * size / base_scale` sprite units on each axis.
pub fn fit_size(image: (u32, u32), viewport: Viewport, base_scale: f32) -> Vec2 {
    let (iw, ih) = (image.0.max(1) as f32, image.1.max(1) as f32);
    let max_w = FILL * 2.0 * viewport.width / base_scale;
    let max_h = FILL * 2.0 * viewport.height / base_scale;
    let s = (max_w / iw).min(max_h / ih);
    Vec2::new(iw * s, ih * s)
}

/// Quad centered on the sprite origin. The top edge (negative y) samples
/// `v = 0`; `uv_span` > 1 tiles the image to show the wrap mode.
pub fn quad_vertices(size: Vec2, uv_span: f32) -> [VertexInput; 4] {
    let (hw, hh) = (size.x * 0.5, size.y * 0.5);
    // Tiles are centered so mirror and repeat are symmetric.
    let lo = 0.5 - uv_span * 0.5;
    let hi = 0.5 + uv_span * 0.5;
    [
        VertexInput::new(Vec2::new(-hw, -hh), Vec2::new(lo, lo)),
        VertexInput::new(Vec2::new(hw, -hh), Vec2::new(hi, lo)),
        VertexInput::new(Vec2::new(hw, hh), Vec2::new(hi, hi)),
        VertexInput::new(Vec2::new(-hw, hh), Vec2::new(lo, hi)),
    ]
}

pub fn uv_span(mode: AddressMode) -> f32 {
    match mode {
        AddressMode::ClampToEdge => 1.0,
        AddressMode::Repeat | AddressMode::MirrorRepeat => 3.0,
    }
}

/// Animated sprite node: a spinning, pulsing child under the tinted root.
#[derive(Debug, Clone)]
pub struct Scene {
    pub image_size: (u32, u32),
    pub tint: Color,
    pub base_scale: f32,
    pub uv_span: f32,
}

impl Scene {
    pub fn transform_at(&self, elapsed: f32) -> SpriteTransform {
        let angle = elapsed * SPIN_RADIANS_PER_SEC;
        let pulse = 1.0 + PULSE_AMPLITUDE * (elapsed * PULSE_HZ * std::f32::consts::TAU).sin();

        let spin = SpriteTransform {
            position: Affine2::scale(pulse, pulse).then(&Affine2::rotation(angle)),
            color: ColorTransform::identity(),
        };
        let root = SpriteTransform {
            position: Affine2::IDENTITY,
            color: ColorTransform::Multiply(self.tint),
        };
        spin.combine(root)
    }

    pub fn draw_at(&self, elapsed: f32, viewport: Viewport) -> SpriteDraw {
        let size = fit_size(self.image_size, viewport, self.base_scale);
        let uniforms = self
            .transform_at(elapsed)
            .uniforms(viewport, self.base_scale);
        SpriteDraw::new(quad_vertices(size, self.uv_span), uniforms)
    }
}
