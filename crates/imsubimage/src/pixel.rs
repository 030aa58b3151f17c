//! Pixel element types supported by the sub-image pipeline.

use core::fmt;

use num_complex::Complex32;

/// The numeric family of a pixel type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelKind {
    /// Single-precision real values.
    Float,
    /// Single-precision complex values.
    Complex,
}

impl fmt::Display for PixelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixelKind::Float => write!(f, "float"),
            PixelKind::Complex => write!(f, "complex"),
        }
    }
}

/// An element type an image may hold.
pub trait Pixel: Clone + fmt::Debug + Send + Sync + 'static {
    const KIND: PixelKind;
}

impl Pixel for f32 {
    const KIND: PixelKind = PixelKind::Float;
}

impl Pixel for Complex32 {
    const KIND: PixelKind = PixelKind::Complex;
}
