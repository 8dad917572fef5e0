#![forbid(unsafe_code)]

//! Value scaler: raw word values to font sizes.
//!
//! Built-in scales map a transformed value linearly from the observed domain
//! onto the configured font range:
//!
//! | scale    | transform      |
//! |----------|----------------|
//! | `linear` | `v`            |
//! | `sqrt`   | `sqrt(v)`      |
//! | `log`    | `ln(v + 1)`    |
//!
//! When every retained word has the same transformed value the domain is
//! degenerate and every word receives the range maximum.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::FontSizeRange;
use crate::error::LayoutError;
use crate::word::{ScaledWord, Word};

/// Observed `[min, max]` of the values being scaled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueDomain {
    pub min: f64,
    pub max: f64,
}

impl ValueDomain {
    /// Extent of `values`, or `None` when empty.
    pub fn of(values: &[f64]) -> Option<Self> {
        let (&first, rest) = values.split_first()?;
        Some(rest.iter().fold(
            Self {
                min: first,
                max: first,
            },
            |d, &v| Self {
                min: d.min.min(v),
                max: d.max.max(v),
            },
        ))
    }

    #[inline]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.span() <= 0.0
    }
}

type CustomScaleFn = dyn Fn(f64, ValueDomain, FontSizeRange) -> f64 + Send + Sync;

/// Caller-supplied mapping from a raw value to a font size.
///
/// Receives the raw value, the raw value domain and the font range. The
/// result is clamped into the range. It is called for degenerate domains
/// too, where `domain.span()` is zero.
#[derive(Clone)]
pub struct CustomScale(Arc<CustomScaleFn>);

impl CustomScale {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(f64, ValueDomain, FontSizeRange) -> f64 + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    #[inline]
    fn call(&self, value: f64, domain: ValueDomain, range: FontSizeRange) -> f64 {
        (self.0)(value, domain, range)
    }
}

impl fmt::Debug for CustomScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomScale(..)")
    }
}

/// Scaling function selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Scale {
    Linear,
    #[default]
    Sqrt,
    Log,
    Custom(CustomScale),
}

impl Scale {
    /// Wrap a closure as a custom scale.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(f64, ValueDomain, FontSizeRange) -> f64 + Send + Sync + 'static,
    {
        Self::Custom(CustomScale::new(f))
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Sqrt => "sqrt",
            Self::Log => "log",
            Self::Custom(_) => "custom",
        }
    }

    #[inline]
    fn transform(&self, value: f64) -> f64 {
        match self {
            Self::Linear | Self::Custom(_) => value,
            Self::Sqrt => value.sqrt(),
            Self::Log => value.ln_1p(),
        }
    }

    /// Font size for every value, in input order.
    pub fn font_sizes(&self, values: &[f64], range: FontSizeRange) -> Vec<f64> {
        let transformed: Vec<f64> = values.iter().map(|&v| self.transform(v)).collect();
        let Some(domain) = ValueDomain::of(&transformed) else {
            return Vec::new();
        };
        if let Self::Custom(f) = self {
            return values
                .iter()
                .map(|&v| range.clamp(f.call(v, domain, range)))
                .collect();
        }
        if domain.is_degenerate() {
            return vec![range.max; values.len()];
        }
        transformed
            .iter()
            .map(|&t| range.clamp(range.min + (t - domain.min) / domain.span() * range.span()))
            .collect()
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scale {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "sqrt" => Ok(Self::Sqrt),
            "log" => Ok(Self::Log),
            _ => Err(LayoutError::UnknownScale(s.to_string())),
        }
    }
}

impl TryFrom<String> for Scale {
    type Error = LayoutError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Scale> for String {
    fn from(scale: Scale) -> Self {
        scale.as_str().to_string()
    }
}

/// Scale a batch of `(input index, word)` pairs.
///
/// `rotate` is called once per word, in iteration order, to draw its
/// rotation.
pub fn scale_words<'w, I>(
    words: I,
    range: FontSizeRange,
    scale: &Scale,
    mut rotate: impl FnMut() -> f64,
) -> Vec<ScaledWord>
where
    I: IntoIterator<Item = (usize, &'w Word)>,
{
    let words: Vec<(usize, &Word)> = words.into_iter().collect();
    let values: Vec<f64> = words.iter().map(|(_, w)| w.value).collect();
    let sizes = scale.font_sizes(&values, range);
    words
        .into_iter()
        .zip(sizes)
        .map(|((index, word), font_size)| ScaledWord {
            index,
            text: word.text.clone(),
            value: word.value,
            font_size,
            rotation: rotate(),
        })
        .collect()
}
