//! Pixel arrays paired with their boolean masks.
//!
//! Mask elements are `true` where the pixel is valid.

use ndarray::{ArrayD, ErrorKind, IxDyn, ShapeError};

use crate::conform;
use crate::error::Result;
use crate::pixel::Pixel;

/// An image's pixels together with its default pixel mask, if any.
///
/// The mask may have fewer axes than the pixels, and may have length 1 on
/// axes where the pixels are longer; mask axes line up with pixel axes from
/// axis 0.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskedImage<T> {
    pixels: ArrayD<T>,
    mask: Option<ArrayD<bool>>,
}

impl<T: Pixel> MaskedImage<T> {
    /// Pair `pixels` with `mask`, rejecting a mask that cannot line up with
    /// the pixel axes.
    pub fn new(pixels: ArrayD<T>, mask: Option<ArrayD<bool>>) -> Result<Self> {
        if let Some(mask) = &mask {
            conform::plan(pixels.shape(), mask.shape(), true)?;
        }
        Ok(MaskedImage { pixels, mask })
    }

    /// An image with no pixel mask.
    pub fn unmasked(pixels: ArrayD<T>) -> Self {
        MaskedImage { pixels, mask: None }
    }

    /// Build an unmasked image from row-major data.
    pub fn from_shape_vec(shape: &[usize], data: Vec<T>) -> Result<Self> {
        let pixels = ArrayD::from_shape_vec(IxDyn(shape), data)?;
        Ok(Self::unmasked(pixels))
    }

    /// Replace the pixel mask.
    pub fn with_mask(self, mask: ArrayD<bool>) -> Result<Self> {
        Self::new(self.pixels, Some(mask))
    }

    pub fn shape(&self) -> &[usize] {
        self.pixels.shape()
    }

    pub fn ndim(&self) -> usize {
        self.pixels.ndim()
    }

    pub fn pixels(&self) -> &ArrayD<T> {
        &self.pixels
    }

    pub fn mask(&self) -> Option<&ArrayD<bool>> {
        self.mask.as_ref()
    }

    pub fn into_parts(self) -> (ArrayD<T>, Option<ArrayD<bool>>) {
        (self.pixels, self.mask)
    }
}

/// The result of a sub-image extraction: pixels and a mask of the same shape.
#[derive(Debug, Clone, PartialEq)]
pub struct SubImage<T> {
    pixels: ArrayD<T>,
    mask: ArrayD<bool>,
}

impl<T: Pixel> SubImage<T> {
    /// Pair `pixels` with a mask of identical shape.
    pub fn new(pixels: ArrayD<T>, mask: ArrayD<bool>) -> Result<Self> {
        if pixels.shape() != mask.shape() {
            return Err(ShapeError::from_kind(ErrorKind::IncompatibleShape).into());
        }
        Ok(SubImage { pixels, mask })
    }

    pub fn shape(&self) -> &[usize] {
        self.pixels.shape()
    }

    pub fn ndim(&self) -> usize {
        self.pixels.ndim()
    }

    pub fn pixels(&self) -> &ArrayD<T> {
        &self.pixels
    }

    pub fn mask(&self) -> &ArrayD<bool> {
        &self.mask
    }

    /// Number of pixels flagged invalid by the mask.
    pub fn masked_count(&self) -> usize {
        self.mask.iter().filter(|&&valid| !valid).count()
    }

    pub fn into_parts(self) -> (ArrayD<T>, ArrayD<bool>) {
        (self.pixels, self.mask)
    }

    /// Turn the result into an input image, so it can be cut again.
    pub fn into_masked_image(self) -> MaskedImage<T> {
        MaskedImage {
            pixels: self.pixels,
            mask: Some(self.mask),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::Complex32;

    #[test]
    fn from_shape_vec_checks_length() {
        assert!(MaskedImage::<f32>::from_shape_vec(&[2, 3], vec![0.0; 6]).is_ok());
        let err = MaskedImage::<f32>::from_shape_vec(&[2, 3], vec![0.0; 5]).unwrap_err();
        assert!(matches!(err, Error::Shape(_)));
    }

    #[test]
    fn new_accepts_lower_rank_mask() {
        let pixels = ArrayD::<f32>::zeros(IxDyn(&[4, 5, 6]));
        let mask = ArrayD::from_elem(IxDyn(&[4, 5]), true);
        let img = MaskedImage::new(pixels, Some(mask)).unwrap();
        assert_eq!(img.mask().unwrap().shape(), &[4, 5]);
    }

    #[test]
    fn new_accepts_degenerate_mask_axis() {
        let pixels = ArrayD::<f32>::zeros(IxDyn(&[4, 5, 6]));
        let mask = ArrayD::from_elem(IxDyn(&[4, 1, 6]), true);
        assert!(MaskedImage::new(pixels, Some(mask)).is_ok());
    }

    #[test]
    fn new_rejects_misaligned_mask() {
        let pixels = ArrayD::<f32>::zeros(IxDyn(&[4, 5]));
        let mask = ArrayD::from_elem(IxDyn(&[5]), true);
        let err = MaskedImage::new(pixels, Some(mask)).unwrap_err();
        assert!(matches!(
            err,
            Error::NonConformingMask {
                axis: 0,
                mask_len: 5,
                image_len: 4
            }
        ));
    }

    #[test]
    fn new_rejects_higher_rank_mask() {
        let pixels = ArrayD::<f32>::zeros(IxDyn(&[4]));
        let mask = ArrayD::from_elem(IxDyn(&[4, 2]), true);
        let err = MaskedImage::new(pixels, Some(mask)).unwrap_err();
        assert!(matches!(err, Error::MaskRankTooHigh { .. }));
    }

    #[test]
    fn complex_pixels() {
        let data = vec![Complex32::new(1.0, -1.0); 4];
        let img = MaskedImage::from_shape_vec(&[2, 2], data).unwrap();
        assert_eq!(img.pixels()[[1, 1]], Complex32::new(1.0, -1.0));
        assert!(img.mask().is_none());
    }

    #[test]
    fn subimage_requires_matching_shapes() {
        let pixels = ArrayD::<f32>::zeros(IxDyn(&[2, 2]));
        let mask = ArrayD::from_elem(IxDyn(&[2]), true);
        assert!(SubImage::new(pixels, mask).is_err());
    }

    #[test]
    fn masked_count() {
        let pixels = ArrayD::<f32>::zeros(IxDyn(&[3]));
        let mask = ndarray::arr1(&[true, false, false]).into_dyn();
        let sub = SubImage::new(pixels, mask).unwrap();
        assert_eq!(sub.masked_count(), 2);
        let img = sub.into_masked_image();
        assert_eq!(img.shape(), &[3]);
        assert!(img.mask().is_some());
    }
}
