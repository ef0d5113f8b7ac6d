use crate::coords::Vec2;
use crate::paint::Color;
use crate::pipeline::Sampler;

use super::{AddressMode, FilterMode, SamplerConfig};

/// CPU-side RGBA image, row-major with the first row at `v = 0`.
///
/// This mirrors what the host uploads to the GPU so the reference pipeline can
/// sample the same data.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    width: u32,
    height: u32,
    texels: Vec<Color>,
}

impl TextureImage {
    /// Returns `None` for zero-sized images or a texel count mismatch.
    pub fn new(width: u32, height: u32, texels: Vec<Color>) -> Option<Self> {
        if width == 0 || height == 0 || texels.len() != width as usize * height as usize {
            return None;
        }
        Some(Self { width, height, texels })
    }

    /// Single-color image of the given size (clamped to at least 1×1).
    pub fn solid(width: u32, height: u32, color: Color) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        Self {
            width,
            height,
            texels: vec![color; width as usize * height as usize],
        }
    }

    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Color) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        let mut texels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                texels.push(f(x, y));
            }
        }
        Self { width, height, texels }
    }

    /// Converts a decoded 8-bit image; channels are normalized, not converted
    /// between color spaces. Returns `None` for an empty image.
    pub fn from_rgba_image(image: &::image::RgbaImage) -> Option<Self> {
        let texels = image.pixels().map(|p| Color::from_rgba8(p.0)).collect();
        Self::new(image.width(), image.height(), texels)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Texel at integer coordinates, `None` when out of bounds.
    #[inline]
    pub fn texel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.texels.get(y as usize * self.width as usize + x as usize).copied()
    }

    /// Pairs the image with sampler state, producing a [`Sampler`].
    #[inline]
    pub fn bind(&self, config: SamplerConfig) -> BoundTexture<'_> {
        BoundTexture { image: self, config }
    }

    fn fetch(&self, x: i64, y: i64, mode: AddressMode) -> Color {
        let x = mode.resolve(x, self.width);
        let y = mode.resolve(y, self.height);
        self.texels[y as usize * self.width as usize + x as usize]
    }
}

/// A texture together with its sampler state: the `tex` binding of a draw.
#[derive(Debug, Copy, Clone)]
pub struct BoundTexture<'a> {
    image: &'a TextureImage,
    config: SamplerConfig,
}

impl BoundTexture<'_> {
    #[inline]
    pub fn config(&self) -> SamplerConfig {
        self.config
    }
}

impl Sampler for BoundTexture<'_> {
    fn sample(&self, uv: Vec2) -> Color {
        let img = self.image;
        let mode = self.config.address_mode;
        let x = uv.x * img.width as f32;
        let y = uv.y * img.height as f32;

        match self.config.filter {
            FilterMode::Nearest => {
                let x = mode.reduce(x, img.width).floor() as i64;
                let y = mode.reduce(y, img.height).floor() as i64;
                img.fetch(x, y, mode)
            }
            FilterMode::Linear => {
                // Texel centers sit at (i + 0.5) / size.
                let x = mode.reduce(x - 0.5, img.width);
                let y = mode.reduce(y - 0.5, img.height);
                let x0 = x.floor();
                let y0 = y.floor();
                let tx = x - x0;
                let ty = y - y0;
                let (x0, y0) = (x0 as i64, y0 as i64);

                let top = lerp(img.fetch(x0, y0, mode), img.fetch(x0 + 1, y0, mode), tx);
                let bottom = lerp(img.fetch(x0, y0 + 1, mode), img.fetch(x0 + 1, y0 + 1, mode), tx);
                lerp(top, bottom, ty)
            }
        }
    }
}

#[inline]
fn lerp(a: Color, b: Color, t: f32) -> Color {
    Color::new(
        a.r + (b.r - a.r) * t,
        a.g + (b.g - a.g) * t,
        a.b + (b.b - a.b) * t,
        a.a + (b.a - a.a) * t,
    )
}
