//! Header card values.

use std::str;

/// A parsed FITS header value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Logical(bool),
    Integer(i64),
    Float(f64),
    /// Content between single quotes, trailing spaces removed.
    String(String),
}

impl Value {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric value of an integer or float card.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }
}

/// Position of the ` /` comment separator in `field`, if any.
fn comment_start(field: &[u8]) -> Option<usize> {
    field.windows(2).position(|w| w == b" /")
}

/// Text after a ` /` separator at `sep`, skipping one optional space.
fn comment_at(field: &[u8], sep: usize) -> Option<&str> {
    let mut start = sep + 2;
    if field.get(start) == Some(&b' ') {
        start += 1;
    }
    str::from_utf8(field.get(start..)?)
        .ok()
        .map(str::trim_end)
        .filter(|s| !s.is_empty())
}

fn parse_string(field: &[u8]) -> (Value, Option<&str>) {
    let mut text = String::new();
    let mut i = 1;
    while i < field.len() {
        if field[i] == b'\'' {
            if field.get(i + 1) == Some(&b'\'') {
                text.push('\'');
                i += 2;
                continue;
            }
            i += 1;
            break;
        }
        text.push(field[i] as char);
        i += 1;
    }
    let rest = &field[i.min(field.len())..];
    let comment = comment_start(rest).and_then(|sep| comment_at(rest, sep));
    (Value::String(text.trim_end().to_string()), comment)
}

/// Parse a float, accepting the FITS `D` exponent.
fn parse_float(text: &str) -> Option<f64> {
    text.replace(['D', 'd'], "E").parse::<f64>().ok()
}

/// Parse the value field of a card (bytes 10..80).
///
/// Returns the value and the trailing comment. `None` means the field holds
/// no value.
pub fn parse_value(field: &[u8]) -> Option<(Value, Option<&str>)> {
    let lead = field.iter().position(|&b| b != b' ')?;
    let field = &field[lead..];
    if field[0] == b'\'' {
        return Some(parse_string(field));
    }

    let (text, comment) = match comment_start(field) {
        Some(sep) => (&field[..sep], comment_at(field, sep)),
        None => (field, None),
    };
    let text = str::from_utf8(text).ok()?.trim();
    let value = match text {
        "" => return None,
        "T" => Value::Logical(true),
        "F" => Value::Logical(false),
        _ if !text.contains(['.', 'E', 'e', 'D', 'd']) => Value::Integer(text.parse().ok()?),
        _ => Value::Float(parse_float(text)?),
    };
    Some((value, comment))
}

/// Serialize `value` into a 70-byte field for bytes 10..80 of a card.
///
/// Numbers and logicals are right-justified in the first 20 bytes; strings
/// start at byte 0 with a quote and are padded to at least 8 characters.
pub fn format_value(value: &Value) -> [u8; 70] {
    let mut buf = [b' '; 70];
    match value {
        Value::Logical(b) => buf[19] = if *b { b'T' } else { b'F' },
        Value::Integer(n) => right_justify(n.to_string().as_bytes(), &mut buf[..20]),
        Value::Float(f) => right_justify(format_float(*f).as_bytes(), &mut buf[..20]),
        Value::String(s) => write_string(s, &mut buf),
    }
    buf
}

fn right_justify(src: &[u8], dest: &mut [u8]) {
    let len = src.len().min(dest.len());
    let start = dest.len() - len;
    dest[start..].copy_from_slice(&src[..len]);
}

/// Shortest `E` notation within 20 characters.
fn format_float(f: f64) -> String {
    if f == 0.0 {
        return "0.0".to_string();
    }
    (0..=15)
        .rev()
        .map(|prec| format!("{f:.prec$E}"))
        .find(|s| s.len() <= 20)
        .unwrap_or_else(|| format!("{f:E}"))
}

fn write_string(s: &str, buf: &mut [u8; 70]) {
    buf[0] = b'\'';
    let mut pos = 1;
    for ch in s.bytes() {
        let width = if ch == b'\'' { 2 } else { 1 };
        if pos + width >= 70 {
            break;
        }
        buf[pos] = ch;
        if ch == b'\'' {
            buf[pos + 1] = b'\'';
        }
        pos += width;
    }
    buf[pos.max(9)] = b'\'';
}
