//! Pixel-index regions and region selection.
//!
//! A region holds one half-open `[start, end)` range per image axis.
//! Selection never copies: it narrows a view of the source array.

use core::fmt;
use core::str::FromStr;

use ndarray::{ArrayViewD, Slice};

use crate::error::{Error, RegionFault, Result};

/// A half-open index range `[start, end)` along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisRange {
    pub start: usize,
    pub end: usize,
}

impl AxisRange {
    pub const fn new(start: usize, end: usize) -> Self {
        AxisRange { start, end }
    }

    /// The whole of an axis of length `len`.
    pub const fn full(len: usize) -> Self {
        AxisRange { start: 0, end: len }
    }

    /// Number of indices selected (zero for a reversed range).
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for AxisRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

/// One [`AxisRange`] per axis of the source image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSpec {
    ranges: Vec<AxisRange>,
}

impl RegionSpec {
    pub fn new(ranges: Vec<AxisRange>) -> Self {
        RegionSpec { ranges }
    }

    /// A region covering every pixel of an image of the given shape.
    pub fn full(shape: &[usize]) -> Self {
        RegionSpec {
            ranges: shape.iter().map(|&len| AxisRange::full(len)).collect(),
        }
    }

    /// Parse comma-separated `start:end` items against an image shape.
    ///
    /// An empty item, or `:`, covers the whole axis; either bound may be
    /// omitted. Axes beyond the last item are covered entirely.
    pub fn parse_for_shape(text: &str, shape: &[usize]) -> Result<Self> {
        let parsed: RegionText = text.parse()?;
        parsed.resolve(shape)
    }

    pub fn ranges(&self) -> &[AxisRange] {
        &self.ranges
    }

    pub fn ndim(&self) -> usize {
        self.ranges.len()
    }

    /// Replace the range of a single axis.
    pub fn with_axis(mut self, axis: usize, range: AxisRange) -> Result<Self> {
        let rank = self.ranges.len();
        let slot = self.ranges.get_mut(axis).ok_or(RegionFault::RankMismatch {
            rank,
            found: axis + 1,
        })?;
        *slot = range;
        Ok(self)
    }

    /// Shape of the selection.
    pub fn selected_shape(&self) -> Vec<usize> {
        self.ranges.iter().map(AxisRange::len).collect()
    }

    /// Check the region against the shape of the image it will cut.
    ///
    /// Every range must lie within its axis, and none may be empty.
    pub fn validate(&self, shape: &[usize]) -> Result<()> {
        if self.ranges.len() != shape.len() {
            return Err(RegionFault::RankMismatch {
                rank: shape.len(),
                found: self.ranges.len(),
            }
            .into());
        }
        for (axis, (range, &len)) in self.ranges.iter().zip(shape).enumerate() {
            if range.start > range.end {
                return Err(RegionFault::Reversed {
                    axis,
                    start: range.start,
                    end: range.end,
                }
                .into());
            }
            if range.end > len {
                return Err(RegionFault::OutOfBounds {
                    axis,
                    start: range.start,
                    end: range.end,
                    len,
                }
                .into());
            }
        }
        if let Some(axis) = self.ranges.iter().position(AxisRange::is_empty) {
            return Err(Error::EmptySelection { axis });
        }
        Ok(())
    }

    /// Returns `true` if the region covers every pixel of `shape`.
    pub fn is_full(&self, shape: &[usize]) -> bool {
        self.ranges.len() == shape.len()
            && self
                .ranges
                .iter()
                .zip(shape)
                .all(|(r, &len)| r.start == 0 && r.end == len)
    }
}

impl fmt::Display for RegionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, range) in self.ranges.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{range}")?;
        }
        Ok(())
    }
}

/// Narrow `array` to `region`, which must already be validated against
/// `array.shape()`.
pub fn select<'a, T>(array: ArrayViewD<'a, T>, region: &RegionSpec) -> ArrayViewD<'a, T> {
    let mut view = array;
    view.slice_each_axis_inplace(|ax| {
        let range = region.ranges[ax.axis.index()];
        Slice::from(range.start..range.end)
    });
    view
}

/// Narrow a mask to `region`, axis by axis from axis 0.
///
/// Each range is clipped to the mask's own extent on that axis, so a
/// length-1 mask axis always keeps its single element. Axes beyond the
/// region's rank are left whole.
pub fn select_mask<'a>(mask: ArrayViewD<'a, bool>, region: &RegionSpec) -> ArrayViewD<'a, bool> {
    let mut view = mask;
    view.slice_each_axis_inplace(|ax| match region.ranges.get(ax.axis.index()) {
        Some(_) if ax.len == 1 => Slice::from(0..1),
        Some(range) => {
            let end = range.end.min(ax.len);
            Slice::from(range.start.min(end)..end)
        }
        None => Slice::from(..),
    });
    view
}

// ── Text forms ──

/// Unresolved `start:end` items, each bound optional.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RegionText {
    items: Vec<(Option<usize>, Option<usize>)>,
}

impl RegionText {
    fn resolve(&self, shape: &[usize]) -> Result<RegionSpec> {
        if self.items.len() > shape.len() {
            return Err(RegionFault::RankMismatch {
                rank: shape.len(),
                found: self.items.len(),
            }
            .into());
        }
        let ranges = shape
            .iter()
            .enumerate()
            .map(|(axis, &len)| match self.items.get(axis) {
                Some(&(start, end)) => AxisRange::new(start.unwrap_or(0), end.unwrap_or(len)),
                None => AxisRange::full(len),
            })
            .collect();
        Ok(RegionSpec { ranges })
    }
}

fn parse_bound(text: &str, whole: &str) -> core::result::Result<Option<usize>, RegionFault> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse::<usize>()
        .map(Some)
        .map_err(|_| RegionFault::Syntax(whole.to_string()))
}

impl FromStr for RegionText {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().is_empty() {
            return Ok(RegionText { items: Vec::new() });
        }
        let items = s
            .split(',')
            .map(|item| {
                let item = item.trim();
                if item.is_empty() {
                    return Ok((None, None));
                }
                let (start, end) = item
                    .split_once(':')
                    .ok_or_else(|| RegionFault::Syntax(s.to_string()))?;
                Ok((parse_bound(start, s)?, parse_bound(end, s)?))
            })
            .collect::<core::result::Result<Vec<_>, RegionFault>>()?;
        Ok(RegionText { items })
    }
}

/// A rectangle on the first two axes given by inclusive pixel corners,
/// written `blcx,blcy,trcx,trcy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxRegion {
    pub blc: [usize; 2],
    pub trc: [usize; 2],
}

impl BoxRegion {
    /// Restrict axes 0 and 1 of `region` to this box.
    pub fn apply(&self, region: RegionSpec) -> Result<RegionSpec> {
        let rank = region.ndim();
        if rank < 2 {
            return Err(RegionFault::BoxNeedsTwoAxes { rank }.into());
        }
        region
            .with_axis(0, AxisRange::new(self.blc[0], self.trc[0] + 1))?
            .with_axis(1, AxisRange::new(self.blc[1], self.trc[1] + 1))
    }
}

impl FromStr for BoxRegion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let syntax = || Error::InvalidRegion(RegionFault::Syntax(s.to_string()));
        let corners = s
            .split(',')
            .map(|v| v.trim().parse::<usize>())
            .collect::<core::result::Result<Vec<_>, _>>()
            .map_err(|_| syntax())?;
        match corners.as_slice() {
            &[blcx, blcy, trcx, trcy] if blcx <= trcx && blcy <= trcy => Ok(BoxRegion {
                blc: [blcx, blcy],
                trc: [trcx, trcy],
            }),
            _ => Err(syntax()),
        }
    }
}
