//! Sub-image extraction for N-dimensional astronomical images.
//!
//! The pipeline is three pure stages: a region selection over the pixel and
//! mask data ([`region`]), mask conforming with optional stretching of
//! degenerate mask axes ([`conform`]), and removal of degenerate axes
//! ([`reduce`]). [`subimage()`] runs all three.

pub mod conform;
pub mod error;
pub mod image;
pub mod options;
pub mod pixel;
pub mod reduce;
pub mod region;
pub mod subimage;

pub use error::{Error, RegionFault, Result};
pub use image::{MaskedImage, SubImage};
pub use options::{DegenerateAxes, SubimageOptions};
pub use pixel::{Pixel, PixelKind};
pub use region::{AxisRange, BoxRegion, RegionSpec};
pub use subimage::subimage;

pub use num_complex::Complex32;
