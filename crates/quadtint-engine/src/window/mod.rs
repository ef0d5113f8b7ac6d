//! Window and event loop.
//!
//! Owns the `winit` event loop and the window, and binds the GPU surface to
//! it.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
