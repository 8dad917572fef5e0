#![forbid(unsafe_code)]

//! Layout configuration.
//!
//! A [`LayoutConfig`] is an immutable value built once and passed by
//! reference into each run. Defaults mirror the classic word cloud
//! component: font sizes 4..32, rotations across -90..90 degrees, a
//! square-root scale, rectangular spiral, one unit of padding and at most
//! 100 words.
//!
//! # Example
//!
//! ```
//! use wcloud_layout::{LayoutConfig, Scale, SpiralShape};
//!
//! let config = LayoutConfig::default()
//!     .font_sizes(10.0, 60.0)
//!     .rotation_angles(0.0, 90.0)
//!     .rotations(2)
//!     .scale(Scale::Log)
//!     .spiral(SpiralShape::Archimedean)
//!     .deterministic(true);
//! assert!(config.validate().is_ok());
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use wcloud_core::text_width::FontSpec;

use crate::error::LayoutError;
use crate::scale::Scale;
use crate::spiral::SpiralShape;

/// Seed used for every run with `deterministic = true`.
pub const DETERMINISTIC_SEED: u64 = 0x5EED_C10D;

/// Inclusive font size bounds. Serialized as `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct FontSizeRange {
    pub min: f64,
    pub max: f64,
}

impl FontSizeRange {
    #[inline]
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Clamp into the range; NaN maps to `min`.
    #[inline]
    pub fn clamp(&self, size: f64) -> f64 {
        if size.is_nan() {
            self.min
        } else {
            size.clamp(self.min, self.max)
        }
    }

    #[inline]
    pub fn contains(&self, size: f64) -> bool {
        size >= self.min && size <= self.max
    }
}

impl From<[f64; 2]> for FontSizeRange {
    fn from([min, max]: [f64; 2]) -> Self {
        Self { min, max }
    }
}

impl From<FontSizeRange> for [f64; 2] {
    fn from(range: FontSizeRange) -> Self {
        [range.min, range.max]
    }
}

/// Inclusive rotation bounds in degrees. Serialized as `[lo, hi]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct RotationRange {
    pub lo: f64,
    pub hi: f64,
}

impl RotationRange {
    #[inline]
    #[must_use]
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    /// Draw one rotation.
    ///
    /// With `steps = Some(n)` the result is one of `n` evenly spaced angles
    /// from `lo` to `hi`; `Some(1)` always yields `lo`. With `None` the angle
    /// is uniform over the whole range.
    pub fn sample<R: Rng + ?Sized>(&self, steps: Option<u32>, rng: &mut R) -> f64 {
        match steps {
            Some(0 | 1) => self.lo,
            Some(n) => {
                let k = rng.random_range(0..n);
                self.lo + (self.hi - self.lo) * f64::from(k) / f64::from(n - 1)
            }
            None if self.lo == self.hi => self.lo,
            None => rng.random_range(self.lo..=self.hi),
        }
    }

    #[inline]
    pub fn contains(&self, angle: f64) -> bool {
        angle >= self.lo && angle <= self.hi
    }
}

impl From<[f64; 2]> for RotationRange {
    fn from([lo, hi]: [f64; 2]) -> Self {
        Self { lo, hi }
    }
}

impl From<RotationRange> for [f64; 2] {
    fn from(range: RotationRange) -> Self {
        [range.lo, range.hi]
    }
}

/// Options for one layout run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub font_sizes: FontSizeRange,
    pub rotation_angles: RotationRange,
    /// Number of discrete angles to draw from; `None` samples continuously.
    pub rotations: Option<u32>,
    pub spiral: SpiralShape,
    pub scale: Scale,
    pub padding: f64,
    pub deterministic: bool,
    pub max_words: usize,
    pub font: FontSpec,
    /// Seed for non-deterministic runs; ignored when `deterministic` is set.
    pub seed: Option<u64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            font_sizes: FontSizeRange::new(4.0, 32.0),
            rotation_angles: RotationRange::new(-90.0, 90.0),
            rotations: None,
            spiral: SpiralShape::Rectangular,
            scale: Scale::Sqrt,
            padding: 1.0,
            deterministic: false,
            max_words: 100,
            font: FontSpec::default(),
            seed: None,
        }
    }
}

impl LayoutConfig {
    #[must_use]
    pub fn font_sizes(mut self, min: f64, max: f64) -> Self {
        self.font_sizes = FontSizeRange::new(min, max);
        self
    }

    #[must_use]
    pub fn rotation_angles(mut self, lo: f64, hi: f64) -> Self {
        self.rotation_angles = RotationRange::new(lo, hi);
        self
    }

    #[must_use]
    pub fn rotations(mut self, count: u32) -> Self {
        self.rotations = Some(count);
        self
    }

    #[must_use]
    pub fn spiral(mut self, spiral: SpiralShape) -> Self {
        self.spiral = spiral;
        self
    }

    #[must_use]
    pub fn scale(mut self, scale: Scale) -> Self {
        self.scale = scale;
        self
    }

    #[must_use]
    pub fn padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn deterministic(mut self, deterministic: bool) -> Self {
        self.deterministic = deterministic;
        self
    }

    #[must_use]
    pub fn max_words(mut self, max_words: usize) -> Self {
        self.max_words = max_words;
        self
    }

    #[must_use]
    pub fn font(mut self, font: FontSpec) -> Self {
        self.font = font;
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject ranges and values the engine cannot honor.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let FontSizeRange { min, max } = self.font_sizes;
        if !(min.is_finite() && max.is_finite() && min > 0.0 && min <= max) {
            return Err(LayoutError::InvalidFontSizeRange { min, max });
        }
        let RotationRange { lo, hi } = self.rotation_angles;
        // The span must be finite too: uniform sampling needs `hi - lo`.
        if !(lo.is_finite() && hi.is_finite() && lo <= hi && (hi - lo).is_finite()) {
            return Err(LayoutError::InvalidRotationRange { lo, hi });
        }
        if self.rotations == Some(0) {
            return Err(LayoutError::InvalidRotationCount);
        }
        if !(self.padding.is_finite() && self.padding >= 0.0) {
            return Err(LayoutError::InvalidPadding(self.padding));
        }
        Ok(())
    }

    /// Random source for one run.
    pub(crate) fn rng(&self) -> StdRng {
        if self.deterministic {
            return StdRng::seed_from_u64(DETERMINISTIC_SEED);
        }
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        }
    }
}
