use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// All errors raised while loading, evaluating or writing FITS images.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed FITS header block.
    #[error("invalid FITS header: {0}")]
    InvalidHeader(&'static str),
    /// Premature end of data while reading.
    #[error("unexpected end of file")]
    UnexpectedEof,
    /// Unrecognized BITPIX value.
    #[error("invalid BITPIX value: {0}")]
    InvalidBitpix(i64),
    /// Malformed keyword name in a header card.
    #[error("invalid keyword name")]
    InvalidKeyword,
    /// A required keyword was not found in the header.
    #[error("missing required keyword: {0}")]
    MissingKeyword(&'static str),
    /// The primary HDU carries no pixels.
    #[error("primary HDU has no image data")]
    NoImageData,
    #[error("invalid mask expression: {0:?}")]
    InvalidMaskExpr(String),
    #[error(transparent)]
    Subimage(#[from] imsubimage::Error),
    #[error("output file {} exists and overwrite is not set", .0.display())]
    FileExists(PathBuf),
    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
