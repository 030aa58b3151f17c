//! Where input images come from.

use std::path::Path;

use imsubimage::MaskedImage;

use crate::error::Result;
use crate::image::read_primary_image;

/// Loads an image by name.
pub trait ImageSource {
    fn load(&self, path: &Path) -> Result<MaskedImage<f32>>;
}

/// Reads the primary HDU of a FITS file on disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FitsFileSource;

impl ImageSource for FitsFileSource {
    fn load(&self, path: &Path) -> Result<MaskedImage<f32>> {
        let data = std::fs::read(path)?;
        log::debug!("read {} bytes from {}", data.len(), path.display());
        let image = read_primary_image(&data)?;
        log::debug!(
            "{}: shape {:?}, {}",
            path.display(),
            image.shape(),
            if image.mask().is_some() {
                "with pixel mask"
            } else {
                "no undefined pixels"
            }
        );
        Ok(image)
    }
}
