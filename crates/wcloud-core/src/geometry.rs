#![forbid(unsafe_code)]

//! Planar geometry for word placement.
//!
//! Coordinates are canvas units with the origin at the top-left corner, x
//! growing to the right and y growing down. Rotations are in degrees,
//! positive clockwise on screen.
//!
//! # Invariants
//!
//! 1. A [`Footprint`]'s half extents already include padding; two footprints
//!    that merely touch do not intersect.
//! 2. [`Footprint::aabb`] always contains every corner of the footprint, so an
//!    AABB miss is a valid early rejection for the separating-axis test.

use serde::{Deserialize, Serialize};

/// Tolerance for contact tests. Overlap thinner than this is treated as touching.
pub const CONTACT_EPSILON: f64 = 1e-9;

/// A point in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// This point shifted by `(dx, dy)`.
    #[inline]
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    #[inline]
    fn dot(self, axis: (f64, f64)) -> f64 {
        self.x * axis.0 + self.y * axis.1
    }
}

/// Canvas dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[inline]
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when both dimensions are finite and strictly positive.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Length of the diagonal.
    #[inline]
    pub fn diagonal(&self) -> f64 {
        self.width.hypot(self.height)
    }

    /// Width divided by height.
    #[inline]
    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }

    #[inline]
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Whether `aabb` lies fully inside `0..width` x `0..height`.
    #[inline]
    pub fn contains_aabb(&self, aabb: &Aabb) -> bool {
        aabb.min_x >= 0.0
            && aabb.min_y >= 0.0
            && aabb.max_x <= self.width
            && aabb.max_y <= self.height
    }

    /// Whether a box of the given dimensions could fit the canvas at all.
    #[inline]
    pub fn admits(&self, aabb: &Aabb) -> bool {
        aabb.width() <= self.width && aabb.height() <= self.height
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Aabb {
    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Strict overlap: boxes sharing only an edge do not intersect.
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min_x < other.max_x - CONTACT_EPSILON
            && other.min_x < self.max_x - CONTACT_EPSILON
            && self.min_y < other.max_y - CONTACT_EPSILON
            && other.min_y < self.max_y - CONTACT_EPSILON
    }
}

/// The padded, possibly rotated rectangle a word occupies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Footprint {
    /// Rotation pivot and rectangle center.
    pub center: Point,
    /// Half of the padded width, measured along the text baseline.
    pub half_width: f64,
    /// Half of the padded height, perpendicular to the baseline.
    pub half_height: f64,
    /// Rotation in degrees.
    pub rotation: f64,
}

impl Footprint {
    /// Build a footprint from an unpadded text extent, inflating every side by `padding`.
    #[must_use]
    pub fn new(center: Point, width: f64, height: f64, rotation: f64, padding: f64) -> Self {
        Self {
            center,
            half_width: width / 2.0 + padding,
            half_height: height / 2.0 + padding,
            rotation,
        }
    }

    /// The same footprint re-anchored at `center`.
    #[inline]
    #[must_use]
    pub fn at(self, center: Point) -> Self {
        Self { center, ..self }
    }

    /// Unit vectors along the baseline and its normal.
    #[inline]
    fn axes(&self) -> [(f64, f64); 2] {
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        [(cos, sin), (-sin, cos)]
    }

    /// Radius of the projection of this rectangle onto `axis`.
    #[inline]
    fn projected_radius(&self, axis: (f64, f64)) -> f64 {
        let [u, v] = self.axes();
        self.half_width * (u.0 * axis.0 + u.1 * axis.1).abs()
            + self.half_height * (v.0 * axis.0 + v.1 * axis.1).abs()
    }

    /// Corners in clockwise order starting at the top-left of the unrotated box.
    #[must_use]
    pub fn corners(&self) -> [Point; 4] {
        let [u, v] = self.axes();
        let (hw, hh) = (self.half_width, self.half_height);
        let corner = |su: f64, sv: f64| {
            self.center
                .offset(u.0 * hw * su + v.0 * hh * sv, u.1 * hw * su + v.1 * hh * sv)
        };
        [
            corner(-1.0, -1.0),
            corner(1.0, -1.0),
            corner(1.0, 1.0),
            corner(-1.0, 1.0),
        ]
    }

    /// Tight axis-aligned bounds of the rotated rectangle.
    #[must_use]
    pub fn aabb(&self) -> Aabb {
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        let (sin, cos) = (sin.abs(), cos.abs());
        let ex = self.half_width * cos + self.half_height * sin;
        let ey = self.half_width * sin + self.half_height * cos;
        Aabb {
            min_x: self.center.x - ex,
            min_y: self.center.y - ey,
            max_x: self.center.x + ex,
            max_y: self.center.y + ey,
        }
    }

    /// Whether `point` falls inside the rectangle (edges included).
    pub fn contains_point(&self, point: Point) -> bool {
        let d = Point::new(point.x - self.center.x, point.y - self.center.y);
        let [u, v] = self.axes();
        d.dot(u).abs() <= self.half_width && d.dot(v).abs() <= self.half_height
    }

    /// Separating-axis overlap test between two rotated rectangles.
    ///
    /// Returns `false` for rectangles that only touch.
    pub fn intersects(&self, other: &Footprint) -> bool {
        if !self.aabb().intersects(&other.aabb()) {
            return false;
        }
        let d = Point::new(other.center.x - self.center.x, other.center.y - self.center.y);
        let [a0, a1] = self.axes();
        let [b0, b1] = other.axes();
        for axis in [a0, a1, b0, b1] {
            let reach = self.projected_radius(axis) + other.projected_radius(axis);
            if d.dot(axis).abs() >= reach - CONTACT_EPSILON {
                return false;
            }
        }
        true
    }
}
