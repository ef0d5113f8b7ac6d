//! Color model for texels, tints and fragment output.

pub mod color;

pub use color::Color;
