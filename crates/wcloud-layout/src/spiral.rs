#![forbid(unsafe_code)]

//! Spiral generator: candidate centers around an ideal position.
//!
//! A [`Spiral`] is an infinite iterator. Its first point is the center
//! itself; subsequent points move outward along either a rectangular walk
//! (segments of length 1, 1, 2, 2, 3, 3, ...) or an Archimedean curve
//! `r = a * theta` sampled at a constant angular step. Both shapes are
//! stretched along the canvas's longer axis by its aspect ratio so they fill
//! non-square canvases evenly; the shorter axis always advances by `step`.
//!
//! # Invariants
//!
//! 1. The sequence is a pure function of `(center, shape, step, canvas
//!    aspect, direction)`; there is no hidden random state.
//! 2. [`SpiralShape::candidate_budget`] points are enough for the spiral to
//!    sweep the whole canvas from its center, so a search bounded by it
//!    terminates without leaving unexplored canvas behind.

use std::f64::consts::{SQRT_2, TAU};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use wcloud_core::geometry::{Point, Size};

use crate::error::LayoutError;

/// Angular increment of the Archimedean spiral, in radians.
pub const ARCHIMEDEAN_ANGLE_STEP: f64 = 0.1;

/// Canvas side length (geometric mean) covered per unit of step size.
const STEP_DIVISOR: f64 = 100.0;

/// Ring spacing for a canvas: one unit up to 100x100, coarser beyond.
#[must_use]
pub fn step_size(canvas: Size) -> f64 {
    (canvas.area().sqrt() / STEP_DIVISOR).max(1.0)
}

/// Spiral shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SpiralShape {
    /// Expanding rectangular rings; cheap, blockier packing.
    #[default]
    Rectangular,
    /// Constant angular step along `r = a * theta`; rounder packing.
    Archimedean,
}

impl SpiralShape {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rectangular => "rectangular",
            Self::Archimedean => "archimedean",
        }
    }

    /// Candidates needed to sweep `canvas` from its center at `step`.
    ///
    /// Depends only on the shorter side, so a canvas and its transpose get
    /// the same budget.
    #[must_use]
    pub fn candidate_budget(self, canvas: Size, step: f64) -> usize {
        let short = canvas.width.min(canvas.height);
        match self {
            Self::Rectangular => {
                // Ring k reaches k*step along the short axis and k*step*stretch
                // along the long one.
                let rings = ((short / (2.0 * step)).ceil() as usize).saturating_add(1);
                rings
                    .saturating_mul(2)
                    .saturating_add(1)
                    .saturating_pow(2)
            }
            Self::Archimedean => {
                // Corners sit at radius short/sqrt(2) once the long axis is
                // divided by the stretch.
                let radius = short / SQRT_2;
                let theta = radius * TAU / step;
                ((theta / ARCHIMEDEAN_ANGLE_STEP).ceil() as usize)
                    .saturating_add((TAU / ARCHIMEDEAN_ANGLE_STEP).ceil() as usize)
            }
        }
    }
}

impl fmt::Display for SpiralShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpiralShape {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rectangular" => Ok(Self::Rectangular),
            "archimedean" => Ok(Self::Archimedean),
            _ => Err(LayoutError::UnknownSpiral(s.to_string())),
        }
    }
}

impl TryFrom<String> for SpiralShape {
    type Error = LayoutError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SpiralShape> for String {
    fn from(shape: SpiralShape) -> Self {
        shape.as_str().to_string()
    }
}

/// Turning direction on screen (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpiralDirection {
    #[default]
    Clockwise,
    CounterClockwise,
}

impl SpiralDirection {
    #[inline]
    fn y_sign(self) -> f64 {
        match self {
            Self::Clockwise => 1.0,
            Self::CounterClockwise => -1.0,
        }
    }
}

/// Lattice walk for the rectangular spiral.
#[derive(Debug, Clone, Default)]
struct RectWalk {
    x: i64,
    y: i64,
    heading: u8,
    run: u32,
    taken: u32,
    legs: u32,
    started: bool,
}

impl RectWalk {
    fn new() -> Self {
        Self {
            run: 1,
            ..Self::default()
        }
    }

    fn advance(&mut self) -> (i64, i64) {
        if !self.started {
            self.started = true;
            return (0, 0);
        }
        match self.heading {
            0 => self.x += 1,
            1 => self.y += 1,
            2 => self.x -= 1,
            _ => self.y -= 1,
        }
        self.taken += 1;
        if self.taken == self.run {
            self.taken = 0;
            self.heading = (self.heading + 1) % 4;
            self.legs += 1;
            if self.legs % 2 == 0 {
                self.run += 1;
            }
        }
        (self.x, self.y)
    }
}

#[derive(Debug, Clone)]
enum Walk {
    Rectangular(RectWalk),
    Archimedean { i: u64 },
}

/// Per-axis stretch: the longer axis is scaled by the aspect ratio.
///
/// Capped at `f64::MAX` so the center offset `0 * stretch` stays zero on
/// degenerate aspect ratios.
fn stretch(canvas: Size) -> (f64, f64) {
    if canvas.width >= canvas.height {
        (canvas.aspect().min(f64::MAX), 1.0)
    } else {
        (1.0, (canvas.height / canvas.width).min(f64::MAX))
    }
}

/// Lazy candidate sequence around a center.
#[derive(Debug, Clone)]
pub struct Spiral {
    center: Point,
    step: f64,
    stretch: (f64, f64),
    y_sign: f64,
    walk: Walk,
}

impl Spiral {
    /// Spiral around `center` on a canvas of the given dimensions.
    pub fn new(
        center: Point,
        shape: SpiralShape,
        step: f64,
        canvas: Size,
        direction: SpiralDirection,
    ) -> Self {
        let walk = match shape {
            SpiralShape::Rectangular => Walk::Rectangular(RectWalk::new()),
            SpiralShape::Archimedean => Walk::Archimedean { i: 0 },
        };
        Self {
            center,
            step,
            stretch: stretch(canvas),
            y_sign: direction.y_sign(),
            walk,
        }
    }
}

impl Iterator for Spiral {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        let (ux, uy) = match &mut self.walk {
            Walk::Rectangular(walk) => {
                let (ux, uy) = walk.advance();
                (ux as f64 * self.step, uy as f64 * self.step)
            }
            Walk::Archimedean { i } => {
                let theta = *i as f64 * ARCHIMEDEAN_ANGLE_STEP;
                *i += 1;
                let r = self.step / TAU * theta;
                (r * theta.cos(), r * theta.sin())
            }
        };
        let (sx, sy) = self.stretch;
        Some(self.center.offset(ux * sx, self.y_sign * uy * sy))
    }
}
