//! Sharded in-memory record store
//!
//! Records live in fixed-size shards: index `i` is held in shard
//! `i / shard_size` at slot `i % shard_size`. Every query waits for a
//! configurable latency before answering, standing in for disk and network
//! cost of a real store.

use crate::store::error::{StoreError, StoreResult};
use crate::store::source::RecordSource;
use crate::store::types::{DatasetRange, Record};
use async_trait::async_trait;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Default number of records per shard
pub const DEFAULT_SHARD_SIZE: usize = 9000;

/// Options for generating a fake dataset
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Number of records to create
    pub record_count: u64,
    /// Records per shard
    pub shard_size: usize,
    /// Shortest record duration (ms, inclusive)
    pub min_duration_ms: i64,
    /// Longest record duration (ms, inclusive)
    pub max_duration_ms: i64,
    /// Start of the first record; `None` means now
    pub timeline_start: Option<i64>,
    /// RNG seed for reproducible datasets
    pub seed: Option<u64>,
    /// Simulated per-query latency
    pub latency: Duration,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            record_count: 100_000,
            shard_size: DEFAULT_SHARD_SIZE,
            min_duration_ms: 5000,
            max_duration_ms: 10_000,
            timeline_start: None,
            seed: None,
            latency: Duration::from_millis(10),
        }
    }
}

/// In-memory record store split into fixed-size shards
#[derive(Debug)]
pub struct ShardedStore {
    shards: Vec<Vec<Record>>,
    shard_size: usize,
    len: u64,
    latency: Duration,
    queries: AtomicU64,
}

impl ShardedStore {
    /// Create an empty store
    pub fn new(shard_size: usize) -> StoreResult<Self> {
        if shard_size == 0 {
            return Err(StoreError::Config("shard_size must be positive".to_string()));
        }

        Ok(Self {
            shards: Vec::new(),
            shard_size,
            len: 0,
            latency: Duration::ZERO,
            queries: AtomicU64::new(0),
        })
    }

    /// Generate contiguous records with uniformly random durations
    pub fn generate(options: &GenerateOptions) -> StoreResult<Self> {
        if options.min_duration_ms < 0 || options.min_duration_ms > options.max_duration_ms {
            return Err(StoreError::Config(format!(
                "invalid duration range {}..={}",
                options.min_duration_ms, options.max_duration_ms
            )));
        }

        let mut rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut store = Self::new(options.shard_size)?.with_latency(options.latency);
        let mut cursor = options
            .timeline_start
            .unwrap_or_else(|| Utc::now().timestamp_millis());

        for _ in 0..options.record_count {
            let duration = rng.random_range(options.min_duration_ms..=options.max_duration_ms);
            store.push(cursor, duration);
            cursor += duration;
        }

        let mean = store
            .extent()
            .and_then(|extent| extent.mean_duration())
            .unwrap_or_default();
        tracing::info!(
            "Created {} shards, {} records, mean duration {:.1} ms",
            store.shard_count(),
            store.len(),
            mean
        );

        Ok(store)
    }

    /// Build a store from explicit durations, starting at `start`
    pub fn from_durations(start: i64, durations: &[i64], shard_size: usize) -> StoreResult<Self> {
        if let Some(d) = durations.iter().find(|d| **d < 0) {
            return Err(StoreError::Config(format!("negative duration {}", d)));
        }

        let mut store = Self::new(shard_size)?;
        let mut cursor = start;
        for &duration in durations {
            store.push(cursor, duration);
            cursor += duration;
        }
        Ok(store)
    }

    /// Builder: set simulated per-query latency
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    fn push(&mut self, start: i64, duration: i64) {
        let needs_shard = self
            .shards
            .last()
            .map(|shard| shard.len() >= self.shard_size)
            .unwrap_or(true);
        if needs_shard {
            self.shards.push(Vec::with_capacity(self.shard_size));
        }

        let record = Record::new(self.len, start, duration);
        if let Some(shard) = self.shards.last_mut() {
            shard.push(record);
            self.len += 1;
        }
    }

    /// Number of records
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of shards in use
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Shard and slot holding `index`
    pub fn slot(&self, index: u64) -> Option<(usize, usize)> {
        if index >= self.len {
            return None;
        }
        let shard_size = self.shard_size as u64;
        Some(((index / shard_size) as usize, (index % shard_size) as usize))
    }

    /// Record at `index`, without simulated latency
    pub fn record(&self, index: u64) -> Option<&Record> {
        let (shard, slot) = self.slot(index)?;
        self.shards.get(shard)?.get(slot)
    }

    /// Iterate over all records in index order
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.shards.iter().flatten()
    }

    /// Overall extent, without simulated latency
    pub fn extent(&self) -> Option<DatasetRange> {
        let first = self.shards.first()?.first()?;
        let last = self.shards.last()?.last()?;
        Some(DatasetRange {
            start: first.start,
            end: last.end,
            length: self.len,
        })
    }

    /// Number of point queries served so far
    pub fn queries(&self) -> u64 {
        self.queries.load(Ordering::Relaxed)
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl RecordSource for ShardedStore {
    async fn range(&self) -> StoreResult<Option<DatasetRange>> {
        self.simulate_latency().await;
        Ok(self.extent())
    }

    async fn get(&self, index: u64) -> StoreResult<Option<Record>> {
        self.queries.fetch_add(1, Ordering::Relaxed);
        if let Some((shard, slot)) = self.slot(index) {
            tracing::debug!("getting index: {}, shard {}, slot: {}", index, shard, slot);
        }
        self.simulate_latency().await;
        Ok(self.record(index).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> ShardedStore {
        ShardedStore::from_durations(0, &[100, 150, 120, 90, 200], 2).unwrap()
    }

    #[test]
    fn test_shard_layout() {
        let store = sample_store();
        assert_eq!(store.len(), 5);
        assert_eq!(store.shard_count(), 3);
        assert_eq!(store.slot(0), Some((0, 0)));
        assert_eq!(store.slot(3), Some((1, 1)));
        assert_eq!(store.slot(4), Some((2, 0)));
        assert_eq!(store.slot(5), None);
    }

    #[test]
    fn test_records_are_contiguous() {
        let store = sample_store();
        let records: Vec<_> = store.records().copied().collect();
        assert_eq!(records.len(), 5);
        for pair in records.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
            assert_eq!(pair[0].index + 1, pair[1].index);
        }
        assert_eq!(records[2], Record::new(2, 250, 120));
    }

    #[test]
    fn test_extent() {
        let store = sample_store();
        assert_eq!(
            store.extent(),
            Some(DatasetRange {
                start: 0,
                end: 660,
                length: 5
            })
        );

        let empty = ShardedStore::new(10).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.extent(), None);
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(ShardedStore::new(0), Err(StoreError::Config(_))));
        assert!(ShardedStore::from_durations(0, &[10, -1], 4).is_err());

        let options = GenerateOptions {
            min_duration_ms: 10,
            max_duration_ms: 5,
            ..Default::default()
        };
        assert!(ShardedStore::generate(&options).is_err());
    }

    #[test]
    fn test_generate_seeded() {
        let options = GenerateOptions {
            record_count: 20_000,
            timeline_start: Some(1_000_000),
            seed: Some(42),
            latency: Duration::ZERO,
            ..Default::default()
        };

        let store = ShardedStore::generate(&options).unwrap();
        assert_eq!(store.len(), 20_000);
        assert_eq!(store.shard_count(), 3);

        let extent = store.extent().unwrap();
        assert_eq!(extent.start, 1_000_000);

        let mut cursor = extent.start;
        for record in store.records() {
            assert_eq!(record.start, cursor);
            assert!((5000..=10_000).contains(&record.duration));
            cursor = record.end;
        }
        assert_eq!(cursor, extent.end);

        let again = ShardedStore::generate(&options).unwrap();
        assert_eq!(again.extent(), store.extent());
    }

    #[tokio::test]
    async fn test_record_source_queries() {
        let store = sample_store();

        let range = store.range().await.unwrap().unwrap();
        assert_eq!(range.length, 5);

        let record = store.get(1).await.unwrap().unwrap();
        assert_eq!((record.start, record.end), (100, 250));

        assert_eq!(store.get(5).await.unwrap(), None);
        assert_eq!(store.queries(), 2);
    }

    #[tokio::test]
    async fn test_simulated_latency() {
        let store = sample_store().with_latency(Duration::from_millis(20));
        let started = std::time::Instant::now();
        store.get(0).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(20));
    }
}
