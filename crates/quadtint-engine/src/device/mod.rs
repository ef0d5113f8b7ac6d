//! Device, queue and window surface.
//!
//! Owns the wgpu objects the sprite renderer records into, and turns surface
//! failures into a decision the frame loop can act on.

mod context;
mod error;
mod frame;
mod init;
mod surface;

pub use context::Gpu;
pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use init::GpuInit;
