#![forbid(unsafe_code)]

//! Word records at each stage of a run.

use serde::{Deserialize, Serialize};
use wcloud_core::geometry::Footprint;

/// Input word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    pub value: f64,
}

impl Word {
    #[must_use]
    pub fn new(text: impl Into<String>, value: f64) -> Self {
        Self {
            text: text.into(),
            value,
        }
    }
}

/// A retained word with its derived font size and rotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaledWord {
    /// Position in the caller's input slice; breaks priority ties.
    pub index: usize,
    pub text: String,
    pub value: f64,
    pub font_size: f64,
    /// Degrees.
    pub rotation: f64,
}

/// A committed placement.
///
/// `(x, y)` is the word's center in canvas coordinates. `width` and `height`
/// are the measured, unpadded and unrotated text extent; `footprint` is the
/// padded rotated rectangle that was reserved for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedWord {
    pub text: String,
    pub value: f64,
    pub font_size: f64,
    pub rotation: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub footprint: Footprint,
}
