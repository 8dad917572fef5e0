#![forbid(unsafe_code)]

//! Run-level errors.
//!
//! Only problems with the request itself are errors. A word that cannot be
//! measured or finds no free space is dropped from the output instead; see
//! [`crate::engine::DropReason`].

use std::fmt;

/// Rejection of a layout request before any word is placed.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// Font sizes must be positive, finite and ordered `min <= max`.
    InvalidFontSizeRange { min: f64, max: f64 },
    /// Rotation angles must be finite and ordered `lo <= hi`.
    InvalidRotationRange { lo: f64, hi: f64 },
    /// A discrete rotation count of zero leaves nothing to sample.
    InvalidRotationCount,
    /// Padding must be finite and non-negative.
    InvalidPadding(f64),
    /// Canvas dimensions must be finite and positive.
    InvalidCanvas { width: f64, height: f64 },
    /// Scale name not recognized.
    UnknownScale(String),
    /// Spiral name not recognized.
    UnknownSpiral(String),
    /// Word values must be finite and non-negative.
    InvalidValue { index: usize, value: f64 },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFontSizeRange { min, max } => {
                write!(f, "invalid font size range [{min}, {max}]")
            }
            Self::InvalidRotationRange { lo, hi } => {
                write!(f, "invalid rotation range [{lo}, {hi}]")
            }
            Self::InvalidRotationCount => write!(f, "rotation count must be at least 1"),
            Self::InvalidPadding(padding) => write!(f, "invalid padding {padding}"),
            Self::InvalidCanvas { width, height } => {
                write!(f, "invalid canvas size {width}x{height}")
            }
            Self::UnknownScale(name) => write!(f, "unknown scale {name:?}"),
            Self::UnknownSpiral(name) => write!(f, "unknown spiral {name:?}"),
            Self::InvalidValue { index, value } => {
                write!(f, "word {index} has invalid value {value}")
            }
        }
    }
}

impl std::error::Error for LayoutError {}
