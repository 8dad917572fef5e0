#![forbid(unsafe_code)]

//! Text measurement seam.
//!
//! The layout engine never rasterizes glyphs. It asks a [`TextMetrics`]
//! implementation for the extent of a word at a given font size and treats
//! that rectangle as the word's shape. Implementations must be deterministic:
//! the same text, font and size always yield the same extent.
//!
//! [`CharCellMetrics`] is a dependency-light provider that approximates
//! proportional fonts from Unicode display widths. Hosts with access to real
//! font data plug in their own provider.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Font selection passed through to the metrics provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSpec {
    pub family: String,
    pub style: String,
    pub weight: String,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: "times new roman".to_string(),
            style: "normal".to_string(),
            weight: "normal".to_string(),
        }
    }
}

impl FontSpec {
    #[must_use]
    pub fn family(mut self, family: impl Into<String>) -> Self {
        self.family = family.into();
        self
    }

    #[must_use]
    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    #[must_use]
    pub fn weight(mut self, weight: impl Into<String>) -> Self {
        self.weight = weight.into();
        self
    }

    /// True for `bold`, `bolder` and numeric weights of 600 and above.
    pub fn is_bold(&self) -> bool {
        let weight = self.weight.trim().to_ascii_lowercase();
        match weight.as_str() {
            "bold" | "bolder" => true,
            other => other.parse::<u16>().is_ok_and(|w| w >= 600),
        }
    }
}

/// Unrotated rendered extent of a word.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextExtent {
    pub width: f64,
    pub height: f64,
}

impl TextExtent {
    #[inline]
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Reasons a word cannot be measured.
#[derive(Debug, Clone, PartialEq)]
pub enum MeasureError {
    /// The word has no characters.
    EmptyText,
    /// The word consists only of zero-width or control characters.
    NoVisibleGlyphs(String),
    /// Font size is not a positive finite number.
    InvalidFontSize(f64),
    /// Provider-specific failure.
    Backend(String),
}

impl fmt::Display for MeasureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyText => write!(f, "cannot measure empty text"),
            Self::NoVisibleGlyphs(text) => write!(f, "no visible glyphs in {text:?}"),
            Self::InvalidFontSize(size) => write!(f, "invalid font size {size}"),
            Self::Backend(msg) => write!(f, "measurement backend error: {msg}"),
        }
    }
}

impl std::error::Error for MeasureError {}

/// Measures the rendered footprint of a word.
pub trait TextMetrics {
    /// Extent of `text` set in `font` at `font_size`.
    fn measure(
        &self,
        text: &str,
        font: &FontSpec,
        font_size: f64,
    ) -> Result<TextExtent, MeasureError>;
}

impl<T: TextMetrics + ?Sized> TextMetrics for &T {
    fn measure(
        &self,
        text: &str,
        font: &FontSpec,
        font_size: f64,
    ) -> Result<TextExtent, MeasureError> {
        (**self).measure(text, font, font_size)
    }
}

impl<T: TextMetrics + ?Sized> TextMetrics for Box<T> {
    fn measure(
        &self,
        text: &str,
        font: &FontSpec,
        font_size: f64,
    ) -> Result<TextExtent, MeasureError> {
        (**self).measure(text, font, font_size)
    }
}

impl<T: TextMetrics + ?Sized> TextMetrics for Arc<T> {
    fn measure(
        &self,
        text: &str,
        font: &FontSpec,
        font_size: f64,
    ) -> Result<TextExtent, MeasureError> {
        (**self).measure(text, font, font_size)
    }
}

/// Display width of `text` in character cells, summed per grapheme cluster.
#[must_use]
pub fn display_width(text: &str) -> usize {
    if text.is_ascii() {
        return text.bytes().filter(|b| (0x20..=0x7E).contains(b)).count();
    }
    text.graphemes(true).map(UnicodeWidthStr::width).sum()
}

/// Approximate metrics derived from Unicode display widths.
///
/// A narrow cell advances `advance_ratio * font_size`; wide (CJK, emoji)
/// graphemes count as two cells. Bold weights widen the advance by
/// `bold_factor`. Height is `line_height * font_size`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CharCellMetrics {
    pub advance_ratio: f64,
    pub line_height: f64,
    pub bold_factor: f64,
}

impl Default for CharCellMetrics {
    fn default() -> Self {
        Self {
            advance_ratio: 0.6,
            line_height: 1.0,
            bold_factor: 1.1,
        }
    }
}

impl TextMetrics for CharCellMetrics {
    fn measure(
        &self,
        text: &str,
        font: &FontSpec,
        font_size: f64,
    ) -> Result<TextExtent, MeasureError> {
        if !(font_size.is_finite() && font_size > 0.0) {
            return Err(MeasureError::InvalidFontSize(font_size));
        }
        if text.is_empty() {
            return Err(MeasureError::EmptyText);
        }
        let cells = display_width(text);
        if cells == 0 {
            return Err(MeasureError::NoVisibleGlyphs(text.to_string()));
        }
        let mut advance = self.advance_ratio * font_size;
        if font.is_bold() {
            advance *= self.bold_factor;
        }
        Ok(TextExtent::new(
            cells as f64 * advance,
            self.line_height * font_size,
        ))
    }
}
