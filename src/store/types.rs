//! Core record types shared by the record store, the search engine and the
//! HTTP layers.
//!
//! - `Record`: one time-ranged media segment
//! - `DatasetRange`: overall extent and record count of a store

use serde::{Deserialize, Serialize};

/// A single time-ranged record (one media segment)
///
/// Records are immutable once created. Within a store they are contiguous:
/// `record[i].end == record[i + 1].start`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    /// Length of the segment in milliseconds
    pub duration: i64,
    /// Start timestamp (Unix ms)
    pub start: i64,
    /// End timestamp (Unix ms)
    pub end: i64,
    /// Position of the record in the store, 0-based
    pub index: u64,
}

impl Record {
    /// Create a record covering `[start, start + duration]`
    pub fn new(index: u64, start: i64, duration: i64) -> Self {
        Self {
            duration,
            start,
            end: start + duration,
            index,
        }
    }

    /// Whether `timestamp` falls inside this record.
    ///
    /// Both edges are inclusive, so a timestamp sitting exactly on a boundary
    /// is contained by the two records that share it.
    pub fn contains(&self, timestamp: i64) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }
}

/// Overall extent of a record store
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatasetRange {
    /// Start of the first record
    pub start: i64,
    /// End of the last record
    pub end: i64,
    /// Number of records
    pub length: u64,
}

impl DatasetRange {
    /// Mean record duration over the whole dataset
    pub fn mean_duration(&self) -> Option<f64> {
        if self.length == 0 {
            return None;
        }
        Some((self.end - self.start) as f64 / self.length as f64)
    }
}
