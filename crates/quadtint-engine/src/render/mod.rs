//! GPU rendering of the sprite pipeline.
//!
//! The `pipeline` module describes what each stage computes; this module
//! runs the same stage pair on the GPU through wgpu.
//!
//! Convention:
//! - Quad vertices are given in whatever space the draw's `matrix` expects;
//!   the matrix output is clip space directly.
//! - Texels are premultiplied; blending is `src + dst * (1 - src.a)`.

mod common;
mod ctx;
pub mod shader;
mod sprite;
mod texture;

pub use common::SpriteUniform;
pub use ctx::{RenderCtx, RenderTarget};
pub use sprite::{SpriteDraw, SpriteRenderer};
pub use texture::{SpriteTexture, SpriteTextureDesc};
