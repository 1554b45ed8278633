//! Running statistics shared by every search
//!
//! Two pieces of learned state live here for the lifetime of the process:
//! the streaming mean of observed record durations, and the start of
//! record 0. Both only ever get more accurate; nothing resets them.
//!
//! Every update is a single read-modify-write under a short mutex. The lock
//! is never held across an `.await`.

use crate::store::Record;
use serde::Serialize;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Point-in-time copy of the running statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StatsSnapshot {
    /// Mean duration of every record probed so far (ms)
    pub average_duration: f64,
    /// Number of durations folded into the mean
    pub samples: u64,
    /// Start of record 0, once any search has probed it
    pub lowest_start: Option<i64>,
}

impl StatsSnapshot {
    /// Whether the mean is usable for interpolation
    pub fn has_estimate(&self) -> bool {
        self.samples > 0 && self.average_duration > 0.0
    }
}

/// Process-wide duration estimate and lowest-start cache
#[derive(Debug, Default)]
pub struct DurationStats {
    inner: Mutex<StatsSnapshot>,
}

impl DurationStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a known state (useful for warm restarts and tests)
    pub fn seeded(average_duration: f64, samples: u64, lowest_start: Option<i64>) -> Self {
        Self {
            inner: Mutex::new(StatsSnapshot {
                average_duration,
                samples,
                lowest_start,
            }),
        }
    }

    // The snapshot is plain data and every update leaves it consistent, so a
    // poisoned lock still holds a valid value.
    fn lock(&self) -> MutexGuard<'_, StatsSnapshot> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current values
    pub fn snapshot(&self) -> StatsSnapshot {
        *self.lock()
    }

    /// Apply everything one probe teaches us, as a single update: the
    /// record's duration joins the mean, and the start of record 0 is
    /// cached the first time it is seen.
    pub fn observe(&self, record: &Record) -> StatsSnapshot {
        let mut stats = self.lock();
        if record.index == 0 && stats.lowest_start.is_none() {
            stats.lowest_start = Some(record.start);
        }
        fold_duration(&mut stats, record.duration);
        *stats
    }
}

fn fold_duration(stats: &mut StatsSnapshot, duration: i64) {
    let n = stats.samples as f64;
    stats.average_duration = (stats.average_duration * n + duration as f64) / (n + 1.0);
    stats.samples += 1;
}
