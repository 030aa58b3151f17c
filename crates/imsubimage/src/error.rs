/// All errors that can occur while extracting a sub-image.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The region does not fit the image.
    #[error("invalid region: {0}")]
    InvalidRegion(RegionFault),
    /// The region selects no pixels along an axis.
    #[error("region selects zero pixels along axis {axis}")]
    EmptySelection { axis: usize },
    /// A mask axis can neither be matched nor stretched onto the image axis.
    #[error("mask axis {axis} has length {mask_len}, which does not conform to image length {image_len}")]
    NonConformingMask {
        axis: usize,
        mask_len: usize,
        image_len: usize,
    },
    /// The mask has more axes than the image.
    #[error("mask has {mask_rank} axes but the image only has {image_rank}")]
    MaskRankTooHigh { mask_rank: usize, image_rank: usize },
    /// A degenerate axis to keep does not exist.
    #[error("axis {axis} to keep does not exist in a {rank}-axis image")]
    InvalidKeepAxis { axis: usize, rank: usize },
    /// Pixel data length did not match the requested shape.
    #[error("array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

/// The reason a region was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegionFault {
    /// The number of axis ranges differs from the image rank.
    #[error("{found} axis ranges given for a {rank}-axis image")]
    RankMismatch { rank: usize, found: usize },
    /// A range extends past the end of its axis.
    #[error("axis {axis} range {start}..{end} exceeds axis length {len}")]
    OutOfBounds {
        axis: usize,
        start: usize,
        end: usize,
        len: usize,
    },
    /// A range ends before it starts.
    #[error("axis {axis} range {start}..{end} ends before it starts")]
    Reversed { axis: usize, start: usize, end: usize },
    /// A box needs at least two image axes.
    #[error("a box selects axes 0 and 1 but the image has {rank} axes")]
    BoxNeedsTwoAxes { rank: usize },
    /// Region text could not be parsed.
    #[error("malformed region '{0}'")]
    Syntax(String),
}

impl From<RegionFault> for Error {
    fn from(fault: RegionFault) -> Self {
        Error::InvalidRegion(fault)
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
