use std::path::PathBuf;

use anyhow::{bail, ensure, Context, Result};
use clap::{Parser, ValueEnum};
use quadtint_engine::paint::Color;
use quadtint_engine::texture::{AddressMode, FilterMode, SamplerConfig};
use quadtint_engine::transform::DEFAULT_BASE_SCALE;

/// Viewer options, from the command line.
#[derive(Debug, Clone, PartialEq, Parser)]
#[command(name = "quadtint-viewer")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Draws one image as a textured, tinted quad", long_about = None)]
pub struct ViewerConfig {
    /// PNG/JPEG/BMP/GIF to draw (default: checkerboard)
    #[arg(value_name = "IMAGE")]
    pub image: Option<PathBuf>,

    /// Multiplicative tint `r,g,b[,a]`, premultiplied
    #[arg(long, value_name = "R,G,B[,A]", default_value = "1,1,1,1", value_parser = parse_tint)]
    pub tint: Color,

    /// Screen pixels per two sprite units
    #[arg(long = "scale", value_name = "S", default_value_t = DEFAULT_BASE_SCALE, value_parser = parse_scale)]
    pub base_scale: f32,

    /// Texture address mode
    #[arg(long, value_enum, default_value_t = WrapArg::Clamp)]
    pub wrap: WrapArg,

    /// Texture filter
    #[arg(long, value_enum, default_value_t = FilterArg::Linear)]
    pub filter: FilterArg,

    /// Window title
    #[arg(long, default_value = "quadtint viewer")]
    pub title: String,

    /// Present without waiting for vblank
    #[arg(long)]
    pub no_vsync: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum WrapArg {
    Clamp,
    Repeat,
    Mirror,
}

impl From<WrapArg> for AddressMode {
    fn from(arg: WrapArg) -> Self {
        match arg {
            WrapArg::Clamp => AddressMode::ClampToEdge,
            WrapArg::Repeat => AddressMode::Repeat,
            WrapArg::Mirror => AddressMode::MirrorRepeat,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum FilterArg {
    Nearest,
    Linear,
}

impl From<FilterArg> for FilterMode {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::Nearest => FilterMode::Nearest,
            FilterArg::Linear => FilterMode::Linear,
        }
    }
}

impl ViewerConfig {
    pub fn sampler(&self) -> SamplerConfig {
        SamplerConfig::new(self.wrap.into(), self.filter.into())
    }

    pub fn vsync(&self) -> bool {
        !self.no_vsync
    }
}

fn parse_tint(s: &str) -> Result<Color> {
    let parts = s
        .split(',')
        .map(|p| {
            p.trim()
                .parse::<f32>()
                .with_context(|| format!("bad tint component `{p}`"))
        })
        .collect::<Result<Vec<f32>>>()?;

    let color = match parts[..] {
        [r, g, b] => Color::new(r, g, b, 1.0),
        [r, g, b, a] => Color::new(r, g, b, a),
        _ => bail!("tint needs 3 or 4 components, got {}", parts.len()),
    };
    ensure!(color.is_finite(), "tint must be finite");
    Ok(color)
}

fn parse_scale(s: &str) -> Result<f32> {
    let scale: f32 = s.parse().with_context(|| format!("bad scale `{s}`"))?;
    ensure!(scale.is_finite() && scale > 0.0, "scale must be positive, got {scale}");
    Ok(scale)
}
