//! Predictive search
//!
//! - **stats**: the process-wide running duration estimate and the cached
//!   start of record 0
//! - **engine**: the interpolation search that drives probes against a
//!   [`RecordSource`](crate::store::RecordSource)
//!
//! # Example
//!
//! ```rust,no_run
//! use mediaseek::search::{DurationStats, SearchEngine};
//! use mediaseek::store::{GenerateOptions, ShardedStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = ShardedStore::generate(&GenerateOptions::default())?;
//!     let engine = SearchEngine::new(store, Arc::new(DurationStats::new()));
//!
//!     let range = engine.describe().await?;
//!     let outcome = engine.locate(range.start + 60_000, range.length).await?;
//!     println!("{:?}", outcome.record());
//!     Ok(())
//! }
//! ```

pub mod engine;
pub mod stats;

pub use engine::{SearchConfig, SearchEngine, SearchOutcome, SearchTrace};
pub use stats::{DurationStats, StatsSnapshot};
