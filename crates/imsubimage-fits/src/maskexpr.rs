//! Boolean mask expressions over another image.
//!
//! Supported forms are a bare image name, meaning "pixel is nonzero", and
//! a single comparison such as `"other.fits" > 0.5`. Undefined pixels of the
//! referenced image are always masked out.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use imsubimage::conform::conform;
use ndarray::{ArrayD, Zip};

use crate::error::{Error, Result};
use crate::source::ImageSource;

/// Comparison operator of a mask expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Gt,
    Ge,
    Lt,
    Le,
    Eq,
    Ne,
}

impl CompareOp {
    /// Two-character operators first so `>=` is not read as `>`.
    const TOKENS: [(&'static str, CompareOp); 6] = [
        (">=", CompareOp::Ge),
        ("<=", CompareOp::Le),
        ("==", CompareOp::Eq),
        ("!=", CompareOp::Ne),
        (">", CompareOp::Gt),
        ("<", CompareOp::Lt),
    ];

    pub fn as_str(self) -> &'static str {
        Self::TOKENS
            .iter()
            .find(|(_, op)| *op == self)
            .map_or("?", |&(token, _)| token)
    }

    pub fn holds(self, lhs: f32, rhs: f32) -> bool {
        match self {
            CompareOp::Gt => lhs > rhs,
            CompareOp::Ge => lhs >= rhs,
            CompareOp::Lt => lhs < rhs,
            CompareOp::Le => lhs <= rhs,
            CompareOp::Eq => lhs == rhs,
            CompareOp::Ne => lhs != rhs,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed mask expression.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskExpr {
    pub image: PathBuf,
    /// `None` for a bare image name.
    pub condition: Option<(CompareOp, f32)>,
}

impl MaskExpr {
    /// Evaluate against the referenced image.
    ///
    /// The result has the referenced image's shape; conforming it to the
    /// target image is left to the sub-image engine.
    pub fn evaluate(&self, source: &dyn ImageSource) -> Result<ArrayD<bool>> {
        let image = source.load(&self.image)?;
        let (op, rhs) = self.condition.unwrap_or((CompareOp::Ne, 0.0));
        let valid = match image.mask() {
            Some(own) => conform(own.view(), image.shape(), true)?,
            None => ArrayD::from_elem(image.pixels().raw_dim(), true),
        };
        Ok(Zip::from(image.pixels())
            .and(&valid)
            .map_collect(|&value, &ok| ok && op.holds(value, rhs)))
    }
}

impl FromStr for MaskExpr {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidMaskExpr(s.to_string());
        let text = s.trim();

        let (image, rest) = match text.strip_prefix('"') {
            Some(quoted) => {
                let close = quoted.find('"').ok_or_else(invalid)?;
                (&quoted[..close], &quoted[close + 1..])
            }
            None => {
                let split = text.find(['>', '<', '=', '!']).unwrap_or(text.len());
                (text[..split].trim_end(), &text[split..])
            }
        };
        if image.is_empty() {
            return Err(invalid());
        }

        let rest = rest.trim();
        let condition = if rest.is_empty() {
            None
        } else {
            let (op, number) = CompareOp::TOKENS
                .iter()
                .find_map(|&(token, op)| rest.strip_prefix(token).map(|n| (op, n)))
                .ok_or_else(invalid)?;
            let rhs = number.trim().parse::<f32>().map_err(|_| invalid())?;
            Some((op, rhs))
        };
        Ok(MaskExpr {
            image: PathBuf::from(image),
            condition,
        })
    }
}

impl fmt::Display for MaskExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.image.display())?;
        if let Some((op, rhs)) = self.condition {
            write!(f, " {op} {rhs}")?;
        }
        Ok(())
    }
}
