#![forbid(unsafe_code)]

//! Collision index over placed word footprints.
//!
//! Answers "does this candidate overlap anything already placed" in
//! near-constant time for the word counts a cloud deals with (tens to a few
//! hundred) by bucketing footprints into a uniform grid.
//!
//! # Design
//!
//! - **Uniform grid**: the canvas is divided into square cells; every
//!   footprint is listed in each cell its bounding box touches.
//! - **Broad phase**: a query visits only the cells under the candidate's
//!   bounding box.
//! - **Dedup stamps**: a footprint spanning several visited cells is tested
//!   once per query, tracked with a per-query generation counter.
//! - **Narrow phase**: bounding-box rejection, then a separating-axis test on
//!   the rotated rectangles.
//!
//! # Invariants
//!
//! 1. The index only grows; there is no removal.
//! 2. A query reports a collision iff the candidate intersects at least one
//!    inserted footprint, exactly as [`Footprint::intersects`] defines it.
//! 3. Footprints partly outside the canvas are clamped into the edge cells,
//!    so the answer does not depend on grid coverage.

use wcloud_core::geometry::{Aabb, Footprint, Size};

/// Smallest grid cell, in canvas units.
pub const MIN_CELL_SIZE: f64 = 8.0;

/// Cells along the longer canvas side before the minimum cell size applies.
const TARGET_CELLS: f64 = 32.0;

/// Grid configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionConfig {
    /// Edge length of one grid cell.
    pub cell_size: f64,
}

impl CollisionConfig {
    /// Cell size scaled to the canvas.
    #[must_use]
    pub fn for_canvas(canvas: Size) -> Self {
        Self {
            cell_size: (canvas.width.max(canvas.height) / TARGET_CELLS).max(MIN_CELL_SIZE),
        }
    }
}

/// Query counters for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Calls to [`CollisionIndex::collides`].
    pub queries: u64,
    /// Footprint pairs that reached the narrow phase.
    pub narrow_tests: u64,
    /// Queries that reported a collision.
    pub hits: u64,
}

#[derive(Debug, Clone, Default)]
struct Bucket {
    entries: Vec<u32>,
}

/// Grid-bucketed occupancy of one layout run.
#[derive(Debug)]
pub struct CollisionIndex {
    config: CollisionConfig,
    grid_width: usize,
    grid_height: usize,
    footprints: Vec<Footprint>,
    buckets: Vec<Bucket>,
    /// Last query generation that tested each footprint.
    stamps: Vec<u32>,
    generation: u32,
    stats: IndexStats,
}

impl CollisionIndex {
    pub fn new(canvas: Size, config: CollisionConfig) -> Self {
        let cell_size = config.cell_size.max(1.0);
        let grid_width = ((canvas.width / cell_size).ceil() as usize).max(1);
        let grid_height = ((canvas.height / cell_size).ceil() as usize).max(1);
        Self {
            config: CollisionConfig { cell_size },
            grid_width,
            grid_height,
            footprints: Vec::with_capacity(128),
            buckets: vec![Bucket::default(); grid_width * grid_height],
            stamps: Vec::with_capacity(128),
            generation: 0,
            stats: IndexStats::default(),
        }
    }

    /// Index with a cell size derived from the canvas.
    pub fn for_canvas(canvas: Size) -> Self {
        Self::new(canvas, CollisionConfig::for_canvas(canvas))
    }

    /// Whether `candidate` overlaps any inserted footprint.
    ///
    /// Takes `&mut self` for the dedup stamps and counters; the set of
    /// footprints is not modified.
    pub fn collides(&mut self, candidate: &Footprint) -> bool {
        self.stats.queries += 1;
        if self.footprints.is_empty() {
            return false;
        }

        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            self.stamps.fill(0);
            self.generation = 1;
        }

        let (bx_start, by_start, bx_end, by_end) = self.bucket_range(&candidate.aabb());
        for by in by_start..=by_end {
            for bx in bx_start..=bx_end {
                let bucket = &self.buckets[by * self.grid_width + bx];
                for &entry in &bucket.entries {
                    let stamp = &mut self.stamps[entry as usize];
                    if *stamp == self.generation {
                        continue;
                    }
                    *stamp = self.generation;
                    self.stats.narrow_tests += 1;
                    if self.footprints[entry as usize].intersects(candidate) {
                        self.stats.hits += 1;
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Record a placed footprint.
    pub fn insert(&mut self, footprint: Footprint) {
        let entry = self.footprints.len() as u32;
        let (bx_start, by_start, bx_end, by_end) = self.bucket_range(&footprint.aabb());
        for by in by_start..=by_end {
            for bx in bx_start..=bx_end {
                self.buckets[by * self.grid_width + bx].entries.push(entry);
            }
        }
        self.footprints.push(footprint);
        self.stamps.push(0);
    }

    /// Number of inserted footprints.
    #[inline]
    pub fn len(&self) -> usize {
        self.footprints.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.footprints.is_empty()
    }

    /// Inserted footprints in insertion order.
    #[inline]
    pub fn footprints(&self) -> &[Footprint] {
        &self.footprints
    }

    pub fn stats(&self) -> IndexStats {
        self.stats
    }

    /// Inclusive cell range covered by `aabb`, clamped to the grid.
    fn bucket_range(&self, aabb: &Aabb) -> (usize, usize, usize, usize) {
        let cell = self.config.cell_size;
        let clamp = |v: f64, len: usize| -> usize {
            let idx = (v / cell).floor();
            if idx.is_nan() || idx <= 0.0 {
                0
            } else {
                (idx as usize).min(len - 1)
            }
        };
        (
            clamp(aabb.min_x, self.grid_width),
            clamp(aabb.min_y, self.grid_height),
            clamp(aabb.max_x, self.grid_width),
            clamp(aabb.max_y, self.grid_height),
        )
    }
}
