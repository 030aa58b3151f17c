//! Degenerate-axis removal.

use std::collections::BTreeSet;

use ndarray::{ArrayD, Axis};

use crate::error::{Error, Result};
use crate::image::SubImage;
use crate::options::DegenerateAxes;
use crate::pixel::Pixel;

/// Axes of `shape` that would be removed: length 1 and not in `keep`.
///
/// Returned in ascending order.
pub fn removable_axes(shape: &[usize], keep: &BTreeSet<usize>) -> Vec<usize> {
    shape
        .iter()
        .enumerate()
        .filter(|&(axis, &len)| len == 1 && !keep.contains(&axis))
        .map(|(axis, _)| axis)
        .collect()
}

/// Check that every axis to keep exists in an image of rank `rank`.
pub fn check_keep_axes(keep: &BTreeSet<usize>, rank: usize) -> Result<()> {
    match keep.iter().find(|&&axis| axis >= rank) {
        Some(&axis) => Err(Error::InvalidKeepAxis { axis, rank }),
        None => Ok(()),
    }
}

fn remove_axes<A>(mut array: ArrayD<A>, ascending: &[usize]) -> ArrayD<A> {
    // Highest first so the remaining indices stay valid.
    for &axis in ascending.iter().rev() {
        array = array.index_axis_move(Axis(axis), 0);
    }
    array
}

/// Apply the degenerate-axis policy to a sub-image.
///
/// Removing a length-1 axis never reorders elements, so pixels and mask keep
/// their flat order. Dropping every axis of an all-degenerate image leaves a
/// rank-0 array.
pub fn reduce<T: Pixel>(sub: SubImage<T>, policy: &DegenerateAxes) -> Result<SubImage<T>> {
    let keep = match policy {
        DegenerateAxes::Keep => return Ok(sub),
        DegenerateAxes::Drop { keep } => keep,
    };
    check_keep_axes(keep, sub.ndim())?;

    let axes = removable_axes(sub.shape(), keep);
    if axes.is_empty() {
        return Ok(sub);
    }
    let (pixels, mask) = sub.into_parts();
    SubImage::new(remove_axes(pixels, &axes), remove_axes(mask, &axes))
}
