//! Predictive Search Engine
//!
//! Finds the record containing a timestamp with as few point queries as
//! possible. Instead of bisecting blindly, each probe is aimed by linear
//! extrapolation from the nearest known edge of the window, using the
//! running mean record duration as the expected time span per index.
//!
//! # Window
//!
//! Candidate indices are `[lower, upper)`. An undershooting probe at `i`
//! moves `lower` to `i + 1` and anchors the left edge at `record.end`; an
//! overshooting probe moves `upper` to `i` and anchors the right edge at
//! `record.start`. Predictions are clamped into the window, so every probe
//! removes at least one candidate and a search over `count` records issues
//! at most `count` probes.
//!
//! ```text
//!   left anchor (i, end)          right anchor (j, start)
//!          |  lower ............ upper-1  |
//!   ───────┼──[ candidates                ]┼──────────
//! ```

use crate::search::stats::{DurationStats, StatsSnapshot};
use crate::store::{describe, DatasetRange, Record, RecordSource, StoreResult};
use std::sync::Arc;

/// Tuning for the probe loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchConfig {
    /// Probe the window midpoint after this many consecutive clamped
    /// predictions. `0` keeps clamping forever.
    pub bisect_after_clamps: u32,
}

/// Result of a lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The record whose interval contains the target
    Found(Record),
    /// The target lies outside the dataset, or in a gap between records
    NotFound,
}

impl SearchOutcome {
    pub fn record(&self) -> Option<&Record> {
        match self {
            SearchOutcome::Found(record) => Some(record),
            SearchOutcome::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }
}

/// Indices probed by one lookup, in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchTrace {
    pub probes: Vec<u64>,
}

impl SearchTrace {
    pub fn probe_count(&self) -> usize {
        self.probes.len()
    }
}

/// Per-search window of candidate indices
#[derive(Debug, Clone, Copy)]
struct SearchBounds {
    /// Lowest index that may hold the target
    lower: u64,
    /// One past the highest index that may hold the target
    upper: u64,
    /// Index and timestamp the left edge is anchored at
    left: Option<(u64, i64)>,
    /// Index and timestamp the right edge is anchored at (`None` = +inf)
    right: Option<(u64, i64)>,
}

impl SearchBounds {
    fn new(count: u64, lowest_start: Option<i64>) -> Self {
        Self {
            lower: 0,
            upper: count,
            left: lowest_start.map(|start| (0, start)),
            right: None,
        }
    }

    fn is_exhausted(&self) -> bool {
        self.lower >= self.upper
    }

    fn overshot(&mut self, index: u64, start: i64) {
        self.upper = index;
        self.right = Some((index, start));
    }

    fn undershot(&mut self, index: u64, end: i64) {
        self.lower = index + 1;
        self.left = Some((index, end));
    }

    fn look_right(&self, target: i64, average: f64) -> Option<f64> {
        let (index, value) = self.left?;
        if average <= 0.0 {
            return None;
        }
        Some(index as f64 + (target as f64 - value as f64) / average)
    }

    fn look_left(&self, target: i64, average: f64) -> Option<f64> {
        let (index, value) = self.right?;
        if average <= 0.0 {
            return None;
        }
        Some(index as f64 - (value as f64 - target as f64) / average)
    }

    /// Round a prediction and pull it into the window. The flag reports
    /// whether the rounded value landed outside.
    fn clamp(&self, prediction: f64) -> (u64, bool) {
        let first = self.lower;
        let last = self.upper - 1;
        let rounded = prediction.round();

        if rounded.is_nan() {
            (self.midpoint(), true)
        } else if rounded < first as f64 {
            (first, true)
        } else if rounded > last as f64 {
            (last, true)
        } else {
            (rounded as u64, false)
        }
    }

    fn midpoint(&self) -> u64 {
        self.lower + (self.upper - self.lower) / 2
    }
}

/// Interpolation search over a [`RecordSource`]
///
/// The engine owns no learned state itself: the duration estimate is handed
/// in as a shared [`DurationStats`], so several engines (or tests) can share
/// or isolate it as needed.
pub struct SearchEngine<S> {
    source: S,
    stats: Arc<DurationStats>,
    config: SearchConfig,
}

impl<S: RecordSource> SearchEngine<S> {
    pub fn new(source: S, stats: Arc<DurationStats>) -> Self {
        Self {
            source,
            stats,
            config: SearchConfig::default(),
        }
    }

    /// Builder: set search tuning
    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn stats(&self) -> &Arc<DurationStats> {
        &self.stats
    }

    pub fn config(&self) -> SearchConfig {
        self.config
    }

    /// Fetch the dataset descriptor from the underlying source
    pub async fn describe(&self) -> StoreResult<DatasetRange> {
        describe(&self.source).await
    }

    /// Find the record containing `target` among the first `count` records
    pub async fn locate(&self, target: i64, count: u64) -> StoreResult<SearchOutcome> {
        let (outcome, _) = self.locate_traced(target, count).await?;
        Ok(outcome)
    }

    /// Like [`locate`](Self::locate), also reporting every index probed
    pub async fn locate_traced(
        &self,
        target: i64,
        count: u64,
    ) -> StoreResult<(SearchOutcome, SearchTrace)> {
        let mut trace = SearchTrace::default();
        if count == 0 {
            return Ok((SearchOutcome::NotFound, trace));
        }

        let seed = self.stats.snapshot();
        let mut bounds = SearchBounds::new(count, seed.lowest_start);
        let mut clamps = 0;

        let mut index = if seed.has_estimate() {
            let prediction = bounds.look_right(target, seed.average_duration);
            match prediction {
                Some(_) => self.next_index(&bounds, prediction, &mut clamps),
                None => 0,
            }
        } else {
            0
        };

        loop {
            trace.probes.push(index);
            let record = match self.source.get(index).await? {
                Some(record) => record,
                None => {
                    tracing::warn!(
                        "Index {} missing from store (known length {}), treating as not found",
                        index,
                        count
                    );
                    return Ok((SearchOutcome::NotFound, trace));
                }
            };

            let estimate: StatsSnapshot = self.stats.observe(&record);
            tracing::trace!(
                index,
                start = record.start,
                end = record.end,
                average = estimate.average_duration,
                "probe"
            );

            if record.contains(target) {
                return Ok((SearchOutcome::Found(record), trace));
            }

            let prediction = if record.start > target {
                bounds.overshot(index, record.start);
                bounds.look_left(target, estimate.average_duration)
            } else {
                bounds.undershot(index, record.end);
                bounds.look_right(target, estimate.average_duration)
            };

            if bounds.is_exhausted() {
                return Ok((SearchOutcome::NotFound, trace));
            }

            index = self.next_index(&bounds, prediction, &mut clamps);
        }
    }

    fn next_index(&self, bounds: &SearchBounds, prediction: Option<f64>, clamps: &mut u32) -> u64 {
        let limit = self.config.bisect_after_clamps;
        match prediction {
            Some(p) if limit == 0 || *clamps < limit => {
                let (index, clamped) = bounds.clamp(p);
                if clamped {
                    *clamps += 1;
                } else {
                    *clamps = 0;
                }
                index
            }
            _ => {
                *clamps = 0;
                bounds.midpoint()
            }
        }
    }
}
