/// Drawable size in pixels.
///
/// The host uses it to build the viewport transform that maps sprite space
/// into clip space; the stage pair itself never sees it.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }
}

impl From<(u32, u32)> for Viewport {
    #[inline]
    fn from((width, height): (u32, u32)) -> Self {
        Viewport::new(width as f32, height as f32)
    }
}
