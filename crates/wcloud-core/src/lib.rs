#![forbid(unsafe_code)]

//! Core: geometry and text measurement for wcloud.
//!
//! # Role in wcloud
//! `wcloud-core` holds the leaf types every other crate builds on: canvas
//! geometry with rotated-rectangle intersection, and the [`TextMetrics`]
//! seam through which the layout engine learns how large a word is.
//!
//! # How it fits in the system
//! `wcloud-layout` consumes [`Footprint`] and [`TextMetrics`] to pack words;
//! `wcloud-runtime` reuses [`Footprint::contains_point`] for pointer hit
//! testing over a finished layout.

pub mod geometry;
pub mod text_width;

pub use geometry::{Aabb, Footprint, Point, Size};
pub use text_width::{CharCellMetrics, FontSpec, MeasureError, TextExtent, TextMetrics};
