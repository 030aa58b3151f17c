//! Primary-HDU image decoding and encoding.
//!
//! Reading converts every BITPIX type to `f32` physical values
//! (`bzero + bscale * raw`) and records undefined pixels (integer `BLANK`,
//! floating-point NaN) as `false` in the pixel mask. Writing always produces
//! a BITPIX -32 image with masked pixels stored as NaN.

use bytemuck::{pod_collect_to_vec, Pod};
use imsubimage::{MaskedImage, SubImage};
use ndarray::{ArrayD, IxDyn, ShapeBuilder};

use crate::block::{pad_to_block, DATA_PAD_BYTE};
use crate::error::{Error, Result};
use crate::header::{parse_header_blocks, serialize_header, Card, Header};
use crate::value::Value;

const VALID_BITPIX: [i64; 6] = [8, 16, 32, 64, -32, -64];

const NAXIS_KEYWORDS: [&str; 9] = [
    "NAXIS1", "NAXIS2", "NAXIS3", "NAXIS4", "NAXIS5", "NAXIS6", "NAXIS7", "NAXIS8", "NAXIS9",
];

/// Bytes per stored pixel for a valid BITPIX.
pub fn bytes_per_pixel(bitpix: i64) -> Result<usize> {
    if VALID_BITPIX.contains(&bitpix) {
        Ok(bitpix.unsigned_abs() as usize / 8)
    } else {
        Err(Error::InvalidBitpix(bitpix))
    }
}

/// Axis lengths `[NAXIS1, NAXIS2, ...]` of a primary header.
pub fn image_dimensions(header: &Header) -> Result<Vec<usize>> {
    let naxis = header.required_integer("NAXIS")?;
    if !(0..=NAXIS_KEYWORDS.len() as i64).contains(&naxis) {
        return Err(Error::InvalidHeader("NAXIS out of range"));
    }
    NAXIS_KEYWORDS[..naxis as usize]
        .iter()
        .map(|&name| {
            let len = header.required_integer(name)?;
            usize::try_from(len).map_err(|_| Error::InvalidHeader("negative NAXISn"))
        })
        .collect()
}

/// Big-endian integers to physical values, with BLANK tracking.
fn scale_integers<I>(
    raw: &[u8],
    from_be: fn(I) -> I,
    blank: Option<i64>,
    scale: (f64, f64),
) -> (Vec<f32>, Vec<bool>)
where
    I: Pod + Into<i64>,
{
    let (bscale, bzero) = scale;
    pod_collect_to_vec::<u8, I>(raw)
        .into_iter()
        .map(|v| {
            let v: i64 = from_be(v).into();
            if Some(v) == blank {
                (f32::NAN, false)
            } else {
                ((bzero + bscale * v as f64) as f32, true)
            }
        })
        .unzip()
}

fn scale_floats(values: impl Iterator<Item = f64>, scale: (f64, f64)) -> (Vec<f32>, Vec<bool>) {
    let (bscale, bzero) = scale;
    values
        .map(|v| {
            if v.is_nan() {
                (f32::NAN, false)
            } else {
                ((bzero + bscale * v) as f32, true)
            }
        })
        .unzip()
}

fn decode(
    raw: &[u8],
    bitpix: i64,
    blank: Option<i64>,
    scale: (f64, f64),
) -> Result<(Vec<f32>, Vec<bool>)> {
    Ok(match bitpix {
        8 => scale_integers::<u8>(raw, |v| v, blank, scale),
        16 => scale_integers::<i16>(raw, i16::from_be, blank, scale),
        32 => scale_integers::<i32>(raw, i32::from_be, blank, scale),
        64 => scale_integers::<i64>(raw, i64::from_be, blank, scale),
        -32 => {
            let values: Vec<u32> = pod_collect_to_vec(raw);
            scale_floats(
                values.into_iter().map(|b| f32::from_bits(u32::from_be(b)) as f64),
                scale,
            )
        }
        -64 => {
            let values: Vec<u64> = pod_collect_to_vec(raw);
            scale_floats(
                values.into_iter().map(|b| f64::from_bits(u64::from_be(b))),
                scale,
            )
        }
        other => return Err(Error::InvalidBitpix(other)),
    })
}

/// Read the primary image of a FITS byte stream.
///
/// Array axis `i` is `NAXIS{i+1}`. The returned mask is `None` when every
/// pixel is defined.
pub fn read_primary_image(data: &[u8]) -> Result<MaskedImage<f32>> {
    let header = parse_header_blocks(data)?;
    if header.find("SIMPLE").is_none() {
        return Err(Error::MissingKeyword("SIMPLE"));
    }
    let bitpix = header.required_integer("BITPIX")?;
    let pixel_bytes = bytes_per_pixel(bitpix)?;
    let naxes = image_dimensions(&header)?;
    let overflow = || Error::InvalidHeader("image size overflows");
    let count = naxes
        .iter()
        .try_fold(1usize, |acc, &len| acc.checked_mul(len))
        .ok_or_else(overflow)?;
    if naxes.is_empty() || count == 0 {
        return Err(Error::NoImageData);
    }

    let start = header.byte_len;
    let end = count
        .checked_mul(pixel_bytes)
        .and_then(|len| len.checked_add(start))
        .ok_or_else(overflow)?;
    let raw = data.get(start..end).ok_or(Error::UnexpectedEof)?;
    let blank = header.value("BLANK").and_then(Value::as_integer);
    let scale = (header.float_or("BSCALE", 1.0), header.float_or("BZERO", 0.0));
    let (pixels, valid) = decode(raw, bitpix, blank, scale)?;

    // NAXIS1 varies fastest on disk.
    let pixels = ArrayD::from_shape_vec(IxDyn(&naxes).f(), pixels)?;
    let mask = if valid.iter().all(|&v| v) {
        None
    } else {
        Some(ArrayD::from_shape_vec(IxDyn(&naxes).f(), valid)?)
    };
    Ok(MaskedImage::new(pixels, mask)?)
}

/// Encode a sub-image as a complete single-HDU FITS file.
///
/// Each entry of `history` becomes one or more HISTORY cards. A rank-0 sub-image is
/// written as a one-pixel, one-axis image.
pub fn write_primary_image(sub: &SubImage<f32>, history: &[String]) -> Result<Vec<u8>> {
    let naxes: Vec<usize> = if sub.ndim() == 0 {
        vec![1]
    } else {
        sub.shape().to_vec()
    };
    if naxes.len() > NAXIS_KEYWORDS.len() {
        return Err(Error::InvalidHeader("too many axes"));
    }

    let mut cards = vec![
        Card::new("SIMPLE", Value::Logical(true)).with_comment("conforms to FITS standard"),
        Card::new("BITPIX", Value::Integer(-32)).with_comment("bits per data value"),
        Card::new("NAXIS", Value::Integer(naxes.len() as i64)).with_comment("number of axes"),
    ];
    for (name, &len) in NAXIS_KEYWORDS.iter().zip(&naxes) {
        cards.push(Card::new(name, Value::Integer(len as i64)));
    }
    cards.extend(history.iter().flat_map(|line| Card::history_lines(line)));

    let mut out = serialize_header(&cards);
    let data_start = out.len();
    out.reserve(sub.pixels().len() * 4);
    // Reversed axes iterate axis 0 fastest, the FITS order.
    for (&value, &valid) in sub.pixels().t().iter().zip(sub.mask().t().iter()) {
        let value = if valid { value } else { f32::NAN };
        out.extend_from_slice(&value.to_be_bytes());
    }
    log::debug!(
        "encoded {:?} image: {} header bytes, {} data bytes",
        naxes,
        data_start,
        out.len() - data_start
    );
    pad_to_block(&mut out, DATA_PAD_BYTE);
    Ok(out)
}
