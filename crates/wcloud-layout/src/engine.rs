#![forbid(unsafe_code)]

//! Placement engine.
//!
//! Turns a word list into non-overlapping placements:
//!
//! 1. Validate the configuration, canvas and word values.
//! 2. Keep the `max_words` highest-valued words (input order breaks ties).
//! 3. Scale the retained words to font sizes and draw their rotations.
//! 4. Visit words largest font first, input order breaking ties.
//! 5. For each word, measure it, then walk a spiral out from the canvas
//!    center until a candidate is inside the canvas and clear of every
//!    placed footprint. The first such candidate is committed.
//! 6. A word whose search exhausts the candidate budget, or that cannot be
//!    measured, is dropped. Dropping is not an error and is never retried.
//!
//! # Determinism
//!
//! All randomness (rotations, spiral direction) comes from one `StdRng` per
//! run. With `deterministic = true` it is seeded with
//! [`DETERMINISTIC_SEED`](crate::config::DETERMINISTIC_SEED), so identical
//! requests produce identical layouts.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, trace};
use wcloud_core::geometry::{Footprint, Size};
use wcloud_core::text_width::{MeasureError, TextMetrics};

use crate::collision::CollisionIndex;
use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::scale::scale_words;
use crate::spiral::{Spiral, SpiralDirection, step_size};
use crate::word::{PlacedWord, ScaledWord, Word};

/// Why a requested word is missing from the output.
#[derive(Debug, Clone, PartialEq)]
pub enum DropReason {
    /// Cut by `max_words` before scaling.
    Truncated,
    /// The metrics provider could not measure it.
    Measure(MeasureError),
    /// No in-bounds, collision-free position within the candidate budget.
    NoSpace,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated => write!(f, "truncated by max words"),
            Self::Measure(err) => write!(f, "measurement failed: {err}"),
            Self::NoSpace => write!(f, "no space"),
        }
    }
}

/// A requested word that was not placed.
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedWord {
    /// Position in the caller's input slice.
    pub index: usize,
    pub text: String,
    pub value: f64,
    pub reason: DropReason,
}

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutStats {
    /// Spiral candidates examined across all words.
    pub candidates: u64,
    /// Collision index queries.
    pub queries: u64,
    /// Narrow-phase footprint tests.
    pub narrow_tests: u64,
}

/// Full result of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutReport {
    /// Placements in priority order.
    pub placed: Vec<PlacedWord>,
    /// Words that were requested but not placed, in the order they were given up on.
    pub dropped: Vec<DroppedWord>,
    pub stats: LayoutStats,
}

/// Lay out `words` on a canvas of `size`.
///
/// Returns the placed words in priority order. Words that do not fit are
/// simply absent; use [`layout_report`] to learn which and why.
pub fn layout<M>(
    words: &[Word],
    size: Size,
    config: &LayoutConfig,
    metrics: &M,
) -> Result<Vec<PlacedWord>, LayoutError>
where
    M: TextMetrics + ?Sized,
{
    layout_report(words, size, config, metrics).map(|report| report.placed)
}

/// Lay out `words` and report placements, drops and counters.
pub fn layout_report<M>(
    words: &[Word],
    size: Size,
    config: &LayoutConfig,
    metrics: &M,
) -> Result<LayoutReport, LayoutError>
where
    M: TextMetrics + ?Sized,
{
    config.validate()?;
    if !size.is_valid() {
        return Err(LayoutError::InvalidCanvas {
            width: size.width,
            height: size.height,
        });
    }
    if let Some((index, word)) = words
        .iter()
        .enumerate()
        .find(|(_, w)| !(w.value.is_finite() && w.value >= 0.0))
    {
        return Err(LayoutError::InvalidValue {
            index,
            value: word.value,
        });
    }

    let _span = debug_span!(
        "wordcloud_layout",
        words = words.len(),
        width = size.width,
        height = size.height,
        spiral = %config.spiral,
        deterministic = config.deterministic,
    )
    .entered();

    let mut rng = config.rng();
    let mut dropped = Vec::new();

    // Stable sort: equal values keep input order.
    let mut by_value: Vec<usize> = (0..words.len()).collect();
    by_value.sort_by(|&a, &b| words[b].value.total_cmp(&words[a].value));
    let cut = by_value.split_off(config.max_words.min(by_value.len()));
    dropped.extend(cut.into_iter().map(|index| DroppedWord {
        index,
        text: words[index].text.clone(),
        value: words[index].value,
        reason: DropReason::Truncated,
    }));

    let mut scaled = scale_words(
        by_value.iter().map(|&i| (i, &words[i])),
        config.font_sizes,
        &config.scale,
        || config.rotation_angles.sample(config.rotations, &mut rng),
    );
    prioritize(&mut scaled);

    let mut placer = Placer::new(size, config);
    let mut placed = Vec::with_capacity(scaled.len());
    for word in scaled {
        let direction = if rng.random_bool(0.5) {
            SpiralDirection::Clockwise
        } else {
            SpiralDirection::CounterClockwise
        };
        match placer.place(&word, metrics, direction) {
            Ok(p) => placed.push(p),
            Err(reason) => {
                trace!(text = %word.text, font_size = word.font_size, %reason, "word dropped");
                dropped.push(DroppedWord {
                    index: word.index,
                    text: word.text,
                    value: word.value,
                    reason,
                });
            }
        }
    }

    let index = placer.index.stats();
    let stats = LayoutStats {
        candidates: placer.candidates,
        queries: index.queries,
        narrow_tests: index.narrow_tests,
    };
    debug!(
        placed = placed.len(),
        dropped = dropped.len(),
        candidates = stats.candidates,
        narrow_tests = stats.narrow_tests,
        "layout finished"
    );

    Ok(LayoutReport {
        placed,
        dropped,
        stats,
    })
}

/// Order words largest font first; equal sizes keep input order.
pub fn prioritize(words: &mut [ScaledWord]) {
    words.sort_by(|a, b| {
        b.font_size
            .total_cmp(&a.font_size)
            .then_with(|| a.index.cmp(&b.index))
    });
}

/// Per-run placement state.
struct Placer<'c> {
    canvas: Size,
    config: &'c LayoutConfig,
    index: CollisionIndex,
    step: f64,
    budget: usize,
    candidates: u64,
}

impl<'c> Placer<'c> {
    fn new(canvas: Size, config: &'c LayoutConfig) -> Self {
        let step = step_size(canvas);
        Self {
            canvas,
            config,
            index: CollisionIndex::for_canvas(canvas),
            step,
            budget: config.spiral.candidate_budget(canvas, step),
            candidates: 0,
        }
    }

    fn place<M>(
        &mut self,
        word: &ScaledWord,
        metrics: &M,
        direction: SpiralDirection,
    ) -> Result<PlacedWord, DropReason>
    where
        M: TextMetrics + ?Sized,
    {
        let extent = metrics
            .measure(&word.text, &self.config.font, word.font_size)
            .map_err(DropReason::Measure)?;
        if !(extent.width.is_finite()
            && extent.height.is_finite()
            && extent.width >= 0.0
            && extent.height >= 0.0)
        {
            return Err(DropReason::Measure(MeasureError::Backend(format!(
                "unusable extent {}x{}",
                extent.width, extent.height
            ))));
        }

        let center = self.canvas.center();
        let shape = Footprint::new(
            center,
            extent.width,
            extent.height,
            word.rotation,
            self.config.padding,
        );
        if !self.canvas.admits(&shape.aabb()) {
            return Err(DropReason::NoSpace);
        }

        let spiral = Spiral::new(center, self.config.spiral, self.step, self.canvas, direction);
        for point in spiral.take(self.budget) {
            self.candidates += 1;
            let candidate = shape.at(point);
            if !self.canvas.contains_aabb(&candidate.aabb()) || self.index.collides(&candidate) {
                continue;
            }
            self.index.insert(candidate);
            return Ok(PlacedWord {
                text: word.text.clone(),
                value: word.value,
                font_size: word.font_size,
                rotation: word.rotation,
                x: point.x,
                y: point.y,
                width: extent.width,
                height: extent.height,
                footprint: candidate,
            });
        }
        Err(DropReason::NoSpace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spiral::SpiralShape;
    use wcloud_core::text_width::{CharCellMetrics, FontSpec, TextExtent};

    fn words(pairs: &[(&str, f64)]) -> Vec<Word> {
        pairs.iter().map(|&(t, v)| Word::new(t, v)).collect()
    }

    fn flat() -> LayoutConfig {
        LayoutConfig::default()
            .rotation_angles(0.0, 0.0)
            .deterministic(true)
    }

    /// Provider that refuses one specific word.
    struct Picky;

    impl TextMetrics for Picky {
        fn measure(
            &self,
            text: &str,
            font: &FontSpec,
            font_size: f64,
        ) -> Result<TextExtent, MeasureError> {
            if text == "bad" {
                return Err(MeasureError::Backend("no glyphs".into()));
            }
            CharCellMetrics::default().measure(text, font, font_size)
        }
    }

    #[test]
    fn larger_value_is_larger_and_first() {
        let input = words(&[("b", 1.0), ("a", 10.0)]);
        let placed = layout(
            &input,
            Size::new(300.0, 300.0),
            &LayoutConfig::default().deterministic(true),
            &CharCellMetrics::default(),
        )
        .unwrap();
        assert_eq!(placed.len(), 2);
        assert_eq!(placed[0].text, "a");
        assert_eq!(placed[1].text, "b");
        assert!(placed[0].font_size > placed[1].font_size);
    }

    #[test]
    fn first_word_lands_at_center() {
        let placed = layout(
            &words(&[("hello", 5.0)]),
            Size::new(200.0, 100.0),
            &flat(),
            &CharCellMetrics::default(),
        )
        .unwrap();
        assert_eq!((placed[0].x, placed[0].y), (100.0, 50.0));
    }

    #[test]
    fn max_words_keeps_highest_values() {
        let input = words(&[("c", 3.0), ("e", 5.0), ("a", 1.0), ("d", 4.0), ("b", 2.0)]);
        let report = layout_report(
            &input,
            Size::new(300.0, 300.0),
            &flat().max_words(1),
            &CharCellMetrics::default(),
        )
        .unwrap();
        assert_eq!(report.placed.len(), 1);
        assert_eq!(report.placed[0].text, "e");
        assert_eq!(report.dropped.len(), 4);
        assert!(
            report
                .dropped
                .iter()
                .all(|d| d.reason == DropReason::Truncated)
        );
    }

    #[test]
    fn max_words_zero_places_nothing() {
        let placed = layout(
            &words(&[("a", 1.0)]),
            Size::new(100.0, 100.0),
            &flat().max_words(0),
            &CharCellMetrics::default(),
        )
        .unwrap();
        assert!(placed.is_empty());
    }

    #[test]
    fn oversized_word_is_dropped() {
        let config = LayoutConfig::default()
            .font_sizes(80.0, 80.0)
            .deterministic(true);
        let report = layout_report(
            &words(&[("enormous", 1.0)]),
            Size::new(100.0, 100.0),
            &config,
            &CharCellMetrics::default(),
        )
        .unwrap();
        assert!(report.placed.is_empty());
        assert_eq!(report.dropped[0].reason, DropReason::NoSpace);
    }

    #[test]
    fn measurement_failure_drops_only_that_word() {
        let report = layout_report(
            &words(&[("good", 3.0), ("bad", 2.0), ("fine", 1.0)]),
            Size::new(200.0, 200.0),
            &flat(),
            &Picky,
        )
        .unwrap();
        let texts: Vec<_> = report.placed.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, ["good", "fine"]);
        assert!(matches!(
            report.dropped[0].reason,
            DropReason::Measure(MeasureError::Backend(_))
        ));
        assert_eq!(report.dropped[0].index, 1);
    }

    #[test]
    fn empty_text_is_dropped_not_fatal() {
        let placed = layout(
            &words(&[("", 2.0), ("ok", 1.0)]),
            Size::new(100.0, 100.0),
            &flat(),
            &CharCellMetrics::default(),
        )
        .unwrap();
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].text, "ok");
    }

    #[test]
    fn invalid_requests_are_rejected() {
        let metrics = CharCellMetrics::default();
        let ok = words(&[("a", 1.0)]);
        assert_eq!(
            layout(&ok, Size::new(0.0, 10.0), &flat(), &metrics),
            Err(LayoutError::InvalidCanvas {
                width: 0.0,
                height: 10.0
            })
        );
        assert_eq!(
            layout(&words(&[("a", 1.0), ("b", -2.0)]), Size::new(10.0, 10.0), &flat(), &metrics),
            Err(LayoutError::InvalidValue {
                index: 1,
                value: -2.0
            })
        );
        assert!(matches!(
            layout(&ok, Size::new(10.0, 10.0), &flat().padding(f64::NAN), &metrics),
            Err(LayoutError::InvalidPadding(_))
        ));
        assert!(matches!(
            layout(&ok, Size::new(100.0, 100.0), &flat().rotation_angles(-1e308, 1e308), &metrics),
            Err(LayoutError::InvalidRotationRange { .. })
        ));
    }

    #[test]
    fn extreme_canvases_terminate_without_panicking() {
        let metrics = CharCellMetrics::default();
        let input = words(&[("a", 1.0), ("b", 2.0)]);
        for shape in [SpiralShape::Rectangular, SpiralShape::Archimedean] {
            for canvas in [
                Size::new(1e-300, 1e300),
                Size::new(1e300, 1e-300),
                Size::new(1.0, 1e20),
            ] {
                let report =
                    layout_report(&input, canvas, &flat().spiral(shape), &metrics).unwrap();
                assert_eq!(report.placed.len() + report.dropped.len(), 2);
            }
        }
    }

    #[test]
    fn transposed_canvases_search_alike() {
        let metrics = CharCellMetrics::default();
        let input: Vec<Word> = (0..40).map(|i| Word::new(format!("w{i}"), 1.0)).collect();
        let config = flat().font_sizes(8.0, 8.0);
        let tall = layout_report(&input, Size::new(40.0, 2000.0), &config, &metrics).unwrap();
        let wide = layout_report(&input, Size::new(2000.0, 40.0), &config, &metrics).unwrap();
        let budget = SpiralShape::Rectangular
            .candidate_budget(Size::new(40.0, 2000.0), step_size(Size::new(40.0, 2000.0)));
        assert!(budget < 1_000, "{budget}");
        assert!(tall.stats.candidates <= (budget * input.len()) as u64);
        assert!(wide.stats.candidates <= (budget * input.len()) as u64);
    }

    #[test]
    fn equal_font_sizes_keep_input_order() {
        let mut scaled: Vec<ScaledWord> = [(0, 10.0), (1, 20.0), (2, 10.0), (3, 20.0)]
            .into_iter()
            .map(|(index, font_size)| ScaledWord {
                index,
                text: index.to_string(),
                value: 0.0,
                font_size,
                rotation: 0.0,
            })
            .collect();
        prioritize(&mut scaled);
        let order: Vec<_> = scaled.iter().map(|w| w.index).collect();
        assert_eq!(order, [1, 3, 0, 2]);
    }

    #[test]
    fn placements_do_not_overlap() {
        let input: Vec<Word> = (0..60)
            .map(|i| Word::new(format!("word{i}"), (i * 7 % 23) as f64))
            .collect();
        let placed = layout(
            &input,
            Size::new(400.0, 300.0),
            &LayoutConfig::default().deterministic(true),
            &CharCellMetrics::default(),
        )
        .unwrap();
        assert!(!placed.is_empty());
        for (i, a) in placed.iter().enumerate() {
            for b in &placed[i + 1..] {
                assert!(!a.footprint.intersects(&b.footprint), "{} vs {}", a.text, b.text);
            }
        }
    }

    #[test]
    fn deterministic_runs_repeat() {
        let input = words(&[("alpha", 9.0), ("beta", 4.0), ("gamma", 4.0), ("delta", 1.0)]);
        let config = LayoutConfig::default().deterministic(true);
        let metrics = CharCellMetrics::default();
        let size = Size::new(240.0, 160.0);
        let first = layout(&input, size, &config, &metrics).unwrap();
        let second = layout(&input, size, &config, &metrics).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn explicit_seed_reproduces_random_layout() {
        let input = words(&[("alpha", 9.0), ("beta", 4.0), ("gamma", 2.0)]);
        let config = LayoutConfig::default().seed(42);
        let metrics = CharCellMetrics::default();
        let size = Size::new(240.0, 160.0);
        assert_eq!(
            layout(&input, size, &config, &metrics).unwrap(),
            layout(&input, size, &config, &metrics).unwrap()
        );
    }

    #[test]
    fn report_counts_candidates() {
        let report = layout_report(
            &words(&[("one", 2.0), ("two", 1.0)]),
            Size::new(100.0, 100.0),
            &flat(),
            &CharCellMetrics::default(),
        )
        .unwrap();
        assert!(report.stats.candidates >= 2);
        assert!(report.stats.queries <= report.stats.candidates);
        assert_eq!(report.placed.len(), 2);
    }

    #[tracing_test::traced_test]
    #[test]
    fn dropped_words_are_traced() {
        let config = LayoutConfig::default()
            .font_sizes(80.0, 80.0)
            .deterministic(true);
        let _ = layout(
            &words(&[("enormous", 1.0)]),
            Size::new(100.0, 100.0),
            &config,
            &CharCellMetrics::default(),
        );
        assert!(logs_contain("word dropped"));
        assert!(logs_contain("layout finished"));
    }
}
