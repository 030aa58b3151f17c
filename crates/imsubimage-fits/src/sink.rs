//! Where output images go.

use std::path::Path;

use imsubimage::SubImage;

use crate::error::{Error, Result};
use crate::image::write_primary_image;

/// Persists a finished sub-image.
pub trait ImageSink {
    /// Write `sub` to `path`. An existing file is replaced only when
    /// `overwrite` is set.
    fn write(&self, path: &Path, sub: &SubImage<f32>, overwrite: bool) -> Result<()>;
}

/// Writes a single-HDU FITS file.
#[derive(Debug, Clone, Default)]
pub struct FitsFileSink {
    history: Vec<String>,
}

impl FitsFileSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// HISTORY cards added to every file written.
    pub fn with_history(mut self, lines: impl IntoIterator<Item = String>) -> Self {
        self.history.extend(lines);
        self
    }
}

impl ImageSink for FitsFileSink {
    fn write(&self, path: &Path, sub: &SubImage<f32>, overwrite: bool) -> Result<()> {
        if !overwrite && path.exists() {
            return Err(Error::FileExists(path.to_path_buf()));
        }
        let bytes = write_primary_image(sub, &self.history)?;
        std::fs::write(path, &bytes).map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}
