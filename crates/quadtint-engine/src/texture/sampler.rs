/// How coordinates outside `[0, 1]` are resolved.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum AddressMode {
    #[default]
    ClampToEdge,
    Repeat,
    MirrorRepeat,
}

impl AddressMode {
    /// Resolves an integer texel index against a texture dimension `size`.
    ///
    /// `size` must be non-zero.
    pub fn resolve(self, index: i64, size: u32) -> u32 {
        let n = size as i64;
        let i = match self {
            AddressMode::ClampToEdge => index.clamp(0, n - 1),
            AddressMode::Repeat => index.rem_euclid(n),
            AddressMode::MirrorRepeat => {
                let m = index.rem_euclid(2 * n);
                if m < n { m } else { 2 * n - 1 - m }
            }
        };
        i as u32
    }

    /// Folds a continuous texel-space coordinate into one period of the mode
    /// so it can be floored to an index without overflow.
    ///
    /// Repeat and mirror keep the position within the pattern, clamp pins it
    /// to one texel past either edge. Non-finite input that has no meaningful
    /// position (NaN, or infinity under a wrapping mode) lands on 0.
    pub fn reduce(self, coord: f32, size: u32) -> f32 {
        let n = size as f32;
        let c = match self {
            AddressMode::ClampToEdge => coord.clamp(-1.0, n),
            AddressMode::Repeat => coord.rem_euclid(n),
            AddressMode::MirrorRepeat => coord.rem_euclid(2.0 * n),
        };
        if c.is_nan() { 0.0 } else { c }
    }
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum FilterMode {
    Nearest,
    #[default]
    Linear,
}

/// Sampler state for the bound texture.
///
/// The default (clamp to edge, linear min/mag) is what sprite atlases use:
/// neighbouring atlas regions must not bleed in through wrapping.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct SamplerConfig {
    pub address_mode: AddressMode,
    pub filter: FilterMode,
}

impl SamplerConfig {
    #[inline]
    pub const fn new(address_mode: AddressMode, filter: FilterMode) -> Self {
        Self { address_mode, filter }
    }

    #[inline]
    pub const fn nearest(address_mode: AddressMode) -> Self {
        Self::new(address_mode, FilterMode::Nearest)
    }
}
