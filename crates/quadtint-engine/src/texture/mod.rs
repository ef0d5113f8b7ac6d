//! Texture data and sampling policy.
//!
//! The fragment stage treats sampling as an opaque capability. Wrap and filter
//! behaviour is configuration owned by the host: this module holds that
//! configuration and a CPU implementation of it, used by the reference
//! pipeline. The GPU path maps the same [`SamplerConfig`] onto a wgpu sampler.

mod sampler;
mod texels;

pub use sampler::{AddressMode, FilterMode, SamplerConfig};
pub use texels::{BoundTexture, TextureImage};
