#![forbid(unsafe_code)]

//! Word cloud layout engine.
//!
//! Given weighted words, a canvas size and a [`LayoutConfig`], computes a
//! non-overlapping placement for every word that fits:
//!
//! - [`scale`]: value to font size (linear, sqrt, log, custom).
//! - [`spiral`]: lazy candidate positions around the canvas center.
//! - [`collision`]: grid-bucketed occupancy of placed footprints.
//! - [`engine`]: priority ordering, spiral search and the drop policy.
//!
//! The engine performs no I/O. Text is measured through the injected
//! [`TextMetrics`](wcloud_core::TextMetrics) provider, so the same run can
//! drive an SVG, canvas or terminal renderer.
//!
//! # Example
//!
//! ```
//! use wcloud_core::{CharCellMetrics, Size};
//! use wcloud_layout::{LayoutConfig, Word, layout};
//!
//! let words = vec![Word::new("rust", 40.0), Word::new("layout", 12.0)];
//! let config = LayoutConfig::default().deterministic(true);
//! let placed = layout(&words, Size::new(300.0, 300.0), &config, &CharCellMetrics::default())
//!     .expect("valid request");
//! assert_eq!(placed[0].text, "rust");
//! ```

pub mod collision;
pub mod config;
pub mod engine;
pub mod error;
pub mod scale;
pub mod spiral;
pub mod word;

pub use collision::{CollisionConfig, CollisionIndex, IndexStats};
pub use config::{DETERMINISTIC_SEED, FontSizeRange, LayoutConfig, RotationRange};
pub use engine::{
    DropReason, DroppedWord, LayoutReport, LayoutStats, layout, layout_report, prioritize,
};
pub use error::LayoutError;
pub use scale::{CustomScale, Scale, ValueDomain, scale_words};
pub use spiral::{Spiral, SpiralDirection, SpiralShape, step_size};
pub use word::{PlacedWord, ScaledWord, Word};
