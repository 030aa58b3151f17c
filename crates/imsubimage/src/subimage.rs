//! The sub-image pipeline: region selection, mask conforming, axis removal.

use ndarray::{ArrayD, ArrayViewD, IxDyn};

use crate::conform::{self, conform};
use crate::error::Result;
use crate::image::{MaskedImage, SubImage};
use crate::options::{DegenerateAxes, SubimageOptions};
use crate::pixel::Pixel;
use crate::reduce;
use crate::region::{self, RegionSpec};

/// Cut `region` out of `image`.
///
/// The external mask is narrowed by the same region, then conformed to the
/// selected shape. The output mask is the logical AND of the image's own
/// pixel mask and that conformed mask; pixels with neither are all valid.
/// Every check runs before any pixel data is copied.
pub fn subimage<T: Pixel>(
    image: &MaskedImage<T>,
    region: &RegionSpec,
    external_mask: Option<ArrayViewD<'_, bool>>,
    options: &SubimageOptions,
) -> Result<SubImage<T>> {
    region.validate(image.shape())?;
    if let DegenerateAxes::Drop { keep } = &options.degenerate {
        reduce::check_keep_axes(keep, image.ndim())?;
    }

    let selected_shape = region.selected_shape();
    let external_mask = external_mask.map(|mask| region::select_mask(mask, region));
    if let Some(mask) = &external_mask {
        conform::plan(&selected_shape, mask.shape(), options.stretch)?;
    }

    let pixels = region::select(image.pixels().view(), region);
    // The image's own mask always stretches: it belongs to these pixels.
    let mut mask = match image.mask() {
        Some(own) => conform(
            region::select_mask(own.view(), region),
            &selected_shape,
            true,
        )?,
        None => ArrayD::from_elem(IxDyn(&selected_shape), true),
    };
    if let Some(external) = external_mask {
        let external = conform(external, &selected_shape, options.stretch)?;
        conform::intersect(&mut mask, &external)?;
    }

    let sub = SubImage::new(pixels.to_owned(), mask)?;
    reduce::reduce(sub, &options.degenerate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, RegionFault};
    use crate::region::AxisRange;
    use crate::Complex32;
    use ndarray::{arr1, s, Array};

    fn ramp(shape: &[usize]) -> MaskedImage<f32> {
        let n: usize = shape.iter().product();
        MaskedImage::from_shape_vec(shape, (0..n).map(|i| i as f32).collect()).unwrap()
    }

    #[test]
    fn full_region_is_identity() {
        let img = ramp(&[4, 3, 2]);
        let out = subimage(
            &img,
            &RegionSpec::full(img.shape()),
            None,
            &SubimageOptions::new(),
        )
        .unwrap();
        assert_eq!(out.pixels(), img.pixels());
        assert!(out.mask().iter().all(|&v| v));
    }

    #[test]
    fn output_shape_follows_region() {
        let img = ramp(&[6, 5, 4]);
        let region = RegionSpec::new(vec![
            AxisRange::new(1, 4),
            AxisRange::new(2, 3),
            AxisRange::new(0, 4),
        ]);
        let out = subimage(&img, &region, None, &SubimageOptions::new()).unwrap();
        assert_eq!(out.shape(), &[3, 1, 4]);
        assert_eq!(out.pixels()[[0, 0, 0]], img.pixels()[[1, 2, 0]]);
    }

    #[test]
    fn stretch_external_mask() {
        let img = ramp(&[10, 20, 10]);
        let ext = Array::from_shape_fn(IxDyn(&[10, 20, 1]), |idx| idx[0] < 5);
        let opts = SubimageOptions::new().stretch(true);
        let out = subimage(&img, &RegionSpec::full(img.shape()), Some(ext.view()), &opts).unwrap();
        assert_eq!(out.mask().shape(), &[10, 20, 10]);
        for k in 0..10 {
            assert_eq!(out.mask().slice(s![.., .., k]), ext.slice(s![.., .., 0]));
        }
        assert_eq!(out.masked_count(), 5 * 20 * 10);
    }

    #[test]
    fn stretch_failure_reports_selected_lengths() {
        let img = ramp(&[10, 20, 10]);
        let ext = ArrayD::from_elem(IxDyn(&[10, 20, 2]), true);
        let opts = SubimageOptions::new().stretch(true);
        let region = RegionSpec::new(vec![
            AxisRange::new(0, 5),
            AxisRange::full(20),
            AxisRange::new(0, 3),
        ]);
        let err = subimage(&img, &region, Some(ext.view()), &opts).unwrap_err();
        assert!(matches!(
            err,
            Error::NonConformingMask {
                axis: 2,
                mask_len: 2,
                image_len: 3
            }
        ));
    }

    #[test]
    fn stretch_failure_on_full_region() {
        let img = ramp(&[10, 20, 10]);
        let ext = ArrayD::from_elem(IxDyn(&[10, 20, 2]), true);
        let opts = SubimageOptions::new().stretch(true);
        let err = subimage(&img, &RegionSpec::full(img.shape()), Some(ext.view()), &opts)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::NonConformingMask {
                axis: 2,
                mask_len: 2,
                image_len: 10
            }
        ));
    }

    #[test]
    fn degenerate_mask_matches_single_plane_selection() {
        let img = ramp(&[4, 4, 10]);
        let ext = Array::from_shape_fn(IxDyn(&[4, 4, 1]), |idx| idx[0] != idx[1]);
        let region = RegionSpec::new(vec![
            AxisRange::full(4),
            AxisRange::full(4),
            AxisRange::new(5, 6),
        ]);
        let out = subimage(&img, &region, Some(ext.view()), &SubimageOptions::new()).unwrap();
        assert_eq!(out.shape(), &[4, 4, 1]);
        assert_eq!(out.mask(), &ext);
        assert_eq!(out.pixels()[[1, 2, 0]], img.pixels()[[1, 2, 5]]);
    }

    #[test]
    fn mask_matching_selection_not_source() {
        let img = ramp(&[8, 6]);
        let ext = Array::from_shape_fn(IxDyn(&[3, 6]), |idx| idx[0] == 1);
        let region = RegionSpec::new(vec![AxisRange::new(0, 3), AxisRange::full(6)]);
        let out = subimage(&img, &region, Some(ext.view()), &SubimageOptions::new()).unwrap();
        assert_eq!(out.mask(), &ext);
    }

    #[test]
    fn mask_rank_too_high() {
        let img = ramp(&[3, 2]);
        let ext = ArrayD::from_elem(IxDyn(&[3, 2, 2]), true);
        let err = subimage(
            &img,
            &RegionSpec::full(img.shape()),
            Some(ext.view()),
            &SubimageOptions::new(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::MaskRankTooHigh {
                mask_rank: 3,
                image_rank: 2
            }
        ));
    }

    #[test]
    fn degenerate_external_mask_without_stretch_fails() {
        let img = ramp(&[4, 4, 3]);
        let ext = ArrayD::from_elem(IxDyn(&[4, 4, 1]), true);
        let err = subimage(
            &img,
            &RegionSpec::full(img.shape()),
            Some(ext.view()),
            &SubimageOptions::new(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::NonConformingMask { axis: 2, .. }));
    }

    #[test]
    fn lower_rank_external_mask_is_extended() {
        let img = ramp(&[3, 2, 4]);
        let ext = Array::from_shape_fn(IxDyn(&[3, 2]), |idx| idx[1] == 0);
        let region = RegionSpec::new(vec![
            AxisRange::new(1, 3),
            AxisRange::full(2),
            AxisRange::new(1, 3),
        ]);
        let out = subimage(&img, &region, Some(ext.view()), &SubimageOptions::new()).unwrap();
        assert_eq!(out.mask().shape(), &[2, 2, 2]);
        assert!(out.mask().slice(s![.., 0, ..]).iter().all(|&v| v));
        assert!(out.mask().slice(s![.., 1, ..]).iter().all(|&v| !v));
    }

    #[test]
    fn external_mask_follows_region() {
        let img = ramp(&[6]);
        let ext = arr1(&[true, false, true, false, true, false]).into_dyn();
        let region = RegionSpec::new(vec![AxisRange::new(2, 5)]);
        let out = subimage(&img, &region, Some(ext.view()), &SubimageOptions::new()).unwrap();
        assert_eq!(out.mask(), &arr1(&[true, false, true]).into_dyn());
    }

    #[test]
    fn masks_combine_with_and() {
        let pixels = ArrayD::<f32>::zeros(IxDyn(&[2]));
        let own = arr1(&[true, false]).into_dyn();
        let img = MaskedImage::new(pixels, Some(own)).unwrap();
        let ext = arr1(&[true, true]).into_dyn();
        let out = subimage(
            &img,
            &RegionSpec::full(&[2]),
            Some(ext.view()),
            &SubimageOptions::new(),
        )
        .unwrap();
        assert_eq!(out.mask(), &arr1(&[true, false]).into_dyn());
    }

    #[test]
    fn own_degenerate_mask_is_stretched_implicitly() {
        let img = ramp(&[3, 4])
            .with_mask(arr1(&[true, false, true]).into_dyn())
            .unwrap();
        let region = RegionSpec::new(vec![AxisRange::new(1, 3), AxisRange::new(0, 2)]);
        let out = subimage(&img, &region, None, &SubimageOptions::new()).unwrap();
        assert_eq!(out.mask().shape(), &[2, 2]);
        assert!(out.mask().slice(s![0, ..]).iter().all(|&v| !v));
        assert!(out.mask().slice(s![1, ..]).iter().all(|&v| v));
    }

    #[test]
    fn dropdeg_with_keepaxes() {
        let img = ramp(&[50, 1, 30, 1]);
        let opts = SubimageOptions::new().degenerate(DegenerateAxes::drop_except([1]));
        let out = subimage(&img, &RegionSpec::full(img.shape()), None, &opts).unwrap();
        assert_eq!(out.shape(), &[50, 1, 30]);
        assert_eq!(out.mask().shape(), &[50, 1, 30]);
    }

    #[test]
    fn dropdeg_after_selection() {
        let img = ramp(&[5, 6, 7]);
        let region = RegionSpec::new(vec![
            AxisRange::new(2, 3),
            AxisRange::full(6),
            AxisRange::new(4, 5),
        ]);
        let opts = SubimageOptions::new().degenerate(DegenerateAxes::drop_all());
        let out = subimage(&img, &region, None, &opts).unwrap();
        assert_eq!(out.shape(), &[6]);
        assert_eq!(out.pixels()[[0]], img.pixels()[[2, 0, 4]]);
    }

    #[test]
    fn all_degenerate_to_scalar() {
        let img = ramp(&[1, 1, 1]);
        let opts = SubimageOptions::new().degenerate(DegenerateAxes::drop_all());
        let out = subimage(&img, &RegionSpec::full(img.shape()), None, &opts).unwrap();
        assert_eq!(out.ndim(), 0);
        assert_eq!(out.pixels().len(), 1);
    }

    #[test]
    fn keepaxes_ignored_when_not_dropping() {
        let img = ramp(&[2, 1]);
        let out = subimage(
            &img,
            &RegionSpec::full(img.shape()),
            None,
            &SubimageOptions::new(),
        )
        .unwrap();
        assert_eq!(out.shape(), &[2, 1]);
    }

    #[test]
    fn invalid_keep_axis_fails_before_copy() {
        let img = ramp(&[2, 1]);
        let opts = SubimageOptions::new().degenerate(DegenerateAxes::drop_except([7]));
        let err = subimage(&img, &RegionSpec::full(img.shape()), None, &opts).unwrap_err();
        assert!(matches!(err, Error::InvalidKeepAxis { axis: 7, rank: 2 }));
    }

    #[test]
    fn region_rank_mismatch() {
        let img = ramp(&[2, 2, 2, 2]);
        let region = RegionSpec::new(vec![AxisRange::full(2); 3]);
        let err = subimage(&img, &region, None, &SubimageOptions::new()).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidRegion(RegionFault::RankMismatch { rank: 4, found: 3 })
        ));
    }

    #[test]
    fn complex_image() {
        let data: Vec<Complex32> = (0..6).map(|i| Complex32::new(i as f32, -(i as f32))).collect();
        let img = MaskedImage::from_shape_vec(&[2, 3], data).unwrap();
        let region = RegionSpec::new(vec![AxisRange::new(1, 2), AxisRange::new(0, 3)]);
        let opts = SubimageOptions::new().degenerate(DegenerateAxes::drop_all());
        let out = subimage(&img, &region, None, &opts).unwrap();
        assert_eq!(out.shape(), &[3]);
        assert_eq!(out.pixels()[[2]], Complex32::new(5.0, -5.0));
    }
}
