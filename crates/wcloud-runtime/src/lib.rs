#![forbid(unsafe_code)]

//! Host-side glue around the wcloud layout engine.
//!
//! - [`debounce`]: coalesce bursts of input changes into one layout run.
//! - [`interaction`]: hover, click selection, tooltips and value badges.
//! - [`palette`]: color assignment for placed words.

pub mod debounce;
pub mod interaction;
pub mod palette;

pub use debounce::{DEFAULT_DEBOUNCE, Debouncer, LayoutRequest, RelayoutScheduler};
pub use interaction::{Badge, Callbacks, CloudView, TooltipFormatter, WordCallback, default_tooltip};
pub use palette::{DEFAULT_COLORS, assign_colors, default_colors};
