//! Configuration for a sub-image extraction.

use std::collections::BTreeSet;

/// What to do with degenerate (length-1) axes of the selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DegenerateAxes {
    /// Keep every axis.
    #[default]
    Keep,
    /// Drop degenerate axes except those listed, by pre-removal axis index.
    /// Listing a non-degenerate axis has no effect.
    Drop { keep: BTreeSet<usize> },
}

impl DegenerateAxes {
    /// Drop every degenerate axis.
    pub fn drop_all() -> Self {
        DegenerateAxes::Drop {
            keep: BTreeSet::new(),
        }
    }

    /// Drop degenerate axes other than `keep`.
    pub fn drop_except(keep: impl IntoIterator<Item = usize>) -> Self {
        DegenerateAxes::Drop {
            keep: keep.into_iter().collect(),
        }
    }

    pub fn drops(&self) -> bool {
        matches!(self, DegenerateAxes::Drop { .. })
    }
}

/// Options controlling [`subimage`](crate::subimage()).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubimageOptions {
    /// Stretch length-1 axes of an external mask over longer image axes.
    /// Has no effect without an external mask.
    pub stretch: bool,
    pub degenerate: DegenerateAxes,
}

impl SubimageOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stretch(mut self, stretch: bool) -> Self {
        self.stretch = stretch;
        self
    }

    pub fn degenerate(mut self, degenerate: DegenerateAxes) -> Self {
        self.degenerate = degenerate;
        self
    }
}
