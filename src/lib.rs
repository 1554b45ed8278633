//! # Mediaseek
//!
//! Finds the media segment covering a timestamp inside a large ordered
//! collection that can only be read one index at a time over the network.
//!
//! Every lookup costs round trips, so the search predicts where the segment
//! should be from a running estimate of segment duration instead of
//! bisecting blindly. The estimate is shared across all lookups and keeps
//! improving as the process runs.
//!
//! ## Modules
//!
//! - [`store`]: Record store: sharded in-memory store, remote client, the
//!   `RecordSource` boundary
//! - [`search`]: Predictive search engine and running statistics
//! - [`api`]: HTTP servers (record store and gateway) with Axum
//! - [`config`]: TOML + environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mediaseek::search::{DurationStats, SearchEngine, SearchOutcome};
//! use mediaseek::store::{GenerateOptions, ShardedStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = ShardedStore::generate(&GenerateOptions::default())?;
//!     let engine = SearchEngine::new(store, Arc::new(DurationStats::new()));
//!
//!     let range = engine.describe().await?;
//!     match engine.locate(range.start + 3_600_000, range.length).await? {
//!         SearchOutcome::Found(segment) => println!("segment {}", segment.index),
//!         SearchOutcome::NotFound => println!("no segment"),
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod search;
pub mod store;

pub use store::{
    DatasetRange, GenerateOptions, Record, RecordSource, RemoteStore, ShardedStore, StoreError,
    StoreResult,
};

pub use search::{DurationStats, SearchConfig, SearchEngine, SearchOutcome, SearchTrace, StatsSnapshot};

pub use api::{build_gateway_router, build_store_router, serve, ApiError, GatewayState, StoreState};

pub use config::{Config, ConfigError, GatewayConfig, LoggingConfig, SearchSettings, StoreConfig};
