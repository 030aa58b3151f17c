//! Mask conforming.
//!
//! A mask conforms to an image when every axis it has either matches the
//! image axis or has length 1. Trailing axes the mask lacks are appended with
//! length 1 and always replicated; a length-1 axis the mask does have is only
//! replicated ("stretched") when the caller allows it.

use ndarray::{ArrayD, ArrayViewD, Axis, ErrorKind, IxDyn, ShapeError, Zip};

use crate::error::{Error, Result};

/// How a mask shape maps onto an image shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConformPlan {
    /// Axes present in the mask whose single value is replicated.
    pub stretched: Vec<usize>,
    /// Number of trailing length-1 axes appended to the mask.
    pub inserted: usize,
}

impl ConformPlan {
    /// Returns `true` if the mask already has the image shape.
    pub fn is_identity(&self) -> bool {
        self.stretched.is_empty() && self.inserted == 0
    }
}

/// Work out how `mask_shape` conforms to `image_shape` without touching data.
///
/// Fails on the lowest offending axis.
pub fn plan(image_shape: &[usize], mask_shape: &[usize], stretch: bool) -> Result<ConformPlan> {
    let image_rank = image_shape.len();
    let mask_rank = mask_shape.len();
    if mask_rank > image_rank {
        return Err(Error::MaskRankTooHigh {
            mask_rank,
            image_rank,
        });
    }

    let mut stretched = Vec::new();
    for (axis, (&mask_len, &image_len)) in mask_shape.iter().zip(image_shape).enumerate() {
        if mask_len == image_len {
            continue;
        }
        if mask_len == 1 && stretch {
            stretched.push(axis);
            continue;
        }
        return Err(Error::NonConformingMask {
            axis,
            mask_len,
            image_len,
        });
    }

    Ok(ConformPlan {
        stretched,
        inserted: image_rank - mask_rank,
    })
}

/// Produce a dense mask of exactly `image_shape` from `mask`.
pub fn conform(
    mask: ArrayViewD<'_, bool>,
    image_shape: &[usize],
    stretch: bool,
) -> Result<ArrayD<bool>> {
    let plan = plan(image_shape, mask.shape(), stretch)?;
    if plan.is_identity() {
        return Ok(mask.to_owned());
    }

    let mut expanded = mask;
    for _ in 0..plan.inserted {
        let next = expanded.ndim();
        expanded = expanded.insert_axis(Axis(next));
    }

    let replicated = expanded
        .broadcast(IxDyn(image_shape))
        .ok_or_else(|| ShapeError::from_kind(ErrorKind::IncompatibleShape))?;
    Ok(replicated.to_owned())
}

/// Clear every element of `target` that is `false` in `other`.
///
/// Both masks must already have the same shape.
pub fn intersect(target: &mut ArrayD<bool>, other: &ArrayD<bool>) -> Result<()> {
    if target.shape() != other.shape() {
        return Err(ShapeError::from_kind(ErrorKind::IncompatibleShape).into());
    }
    Zip::from(target.view_mut())
        .and(other.view())
        .for_each(|valid, &keep| *valid = *valid && keep);
    Ok(())
}
