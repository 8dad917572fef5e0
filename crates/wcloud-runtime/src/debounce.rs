#![forbid(unsafe_code)]

//! Debounced re-layout.
//!
//! Rapid changes to words, canvas size or options should trigger one layout
//! run once they settle, not one per change. [`Debouncer`] holds the latest
//! request and releases it after a quiet period with no newer request;
//! [`RelayoutScheduler`] wraps it around a single call into the layout
//! engine.
//!
//! Both are poll-driven: the host loop calls `poll`/`tick` when it wakes and
//! can use `time_until_*` to choose its sleep. Every time-dependent method
//! has an `_at` variant taking an explicit `Instant` for tests.

use std::time::{Duration, Instant};

use tracing::debug;
use wcloud_core::geometry::Size;
use wcloud_core::text_width::TextMetrics;
use wcloud_layout::{LayoutConfig, LayoutError, LayoutReport, Word, layout_report};

/// Quiet period used by [`RelayoutScheduler::new`].
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

/// Cancellable delayed delivery of the most recent request.
#[derive(Debug)]
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Option<T>,
    last_request: Option<Instant>,
    coalesced: u32,
}

impl<T> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
            last_request: None,
            coalesced: 0,
        }
    }

    #[inline]
    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    /// Replace any pending request and restart the quiet period.
    pub fn schedule(&mut self, request: T) {
        self.schedule_at(request, Instant::now());
    }

    /// [`schedule`](Self::schedule) at an explicit time.
    pub fn schedule_at(&mut self, request: T, now: Instant) {
        if self.pending.replace(request).is_some() {
            self.coalesced += 1;
        }
        self.last_request = Some(now);
    }

    /// Drop the pending request, returning it.
    pub fn cancel(&mut self) -> Option<T> {
        self.last_request = None;
        self.coalesced = 0;
        self.pending.take()
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Requests replaced by a newer one since the last delivery.
    #[inline]
    pub fn coalesced(&self) -> u32 {
        self.coalesced
    }

    /// Release the pending request if the quiet period has elapsed.
    pub fn tick(&mut self) -> Option<T> {
        self.tick_at(Instant::now())
    }

    /// [`tick`](Self::tick) at an explicit time.
    pub fn tick_at(&mut self, now: Instant) -> Option<T> {
        let last = self.last_request?;
        if now.saturating_duration_since(last) < self.quiet {
            return None;
        }
        self.last_request = None;
        self.coalesced = 0;
        self.pending.take()
    }

    /// Time left before the pending request is released.
    pub fn time_until_fire(&self, now: Instant) -> Option<Duration> {
        self.pending.as_ref()?;
        let last = self.last_request?;
        Some(self.quiet.saturating_sub(now.saturating_duration_since(last)))
    }
}

/// Inputs of one layout run.
#[derive(Debug, Clone)]
pub struct LayoutRequest {
    pub words: Vec<Word>,
    pub size: Size,
    pub config: LayoutConfig,
}

/// Runs the layout engine once per settled burst of requests.
#[derive(Debug)]
pub struct RelayoutScheduler<M> {
    metrics: M,
    debouncer: Debouncer<LayoutRequest>,
    runs: u64,
}

impl<M: TextMetrics> RelayoutScheduler<M> {
    /// Scheduler with the default 100 ms quiet period.
    pub fn new(metrics: M) -> Self {
        Self::with_debounce(metrics, DEFAULT_DEBOUNCE)
    }

    pub fn with_debounce(metrics: M, quiet: Duration) -> Self {
        Self {
            metrics,
            debouncer: Debouncer::new(quiet),
            runs: 0,
        }
    }

    /// Queue a run, superseding any request still waiting.
    pub fn request(&mut self, words: Vec<Word>, size: Size, config: LayoutConfig) {
        self.request_at(words, size, config, Instant::now());
    }

    pub fn request_at(&mut self, words: Vec<Word>, size: Size, config: LayoutConfig, now: Instant) {
        self.debouncer
            .schedule_at(LayoutRequest { words, size, config }, now);
    }

    /// Abandon the waiting request, if any.
    pub fn cancel(&mut self) -> bool {
        self.debouncer.cancel().is_some()
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Completed runs.
    #[inline]
    pub fn runs(&self) -> u64 {
        self.runs
    }

    pub fn time_until_run(&self, now: Instant) -> Option<Duration> {
        self.debouncer.time_until_fire(now)
    }

    /// Run the settled request, if one is due.
    pub fn poll(&mut self) -> Option<Result<LayoutReport, LayoutError>> {
        self.poll_at(Instant::now())
    }

    pub fn poll_at(&mut self, now: Instant) -> Option<Result<LayoutReport, LayoutError>> {
        let coalesced = self.debouncer.coalesced();
        let request = self.debouncer.tick_at(now)?;
        self.runs += 1;
        debug!(
            run = self.runs,
            coalesced,
            words = request.words.len(),
            "relayout fired"
        );
        Some(layout_report(
            &request.words,
            request.size,
            &request.config,
            &self.metrics,
        ))
    }
}
