//! Application State
//!
//! Shared state for the gateway and record store handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use crate::config::GatewayConfig;
use crate::search::{DurationStats, SearchConfig, SearchEngine};
use crate::store::{RecordSource, ShardedStore, StoreResult};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

/// Shared state of the gateway
pub struct GatewayState {
    /// Search engine over the record store
    pub engine: SearchEngine<Arc<dyn RecordSource>>,
    /// Gateway configuration
    pub config: Arc<GatewayConfig>,
    /// Record count last reported by the store
    known_length: RwLock<Option<u64>>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl GatewayState {
    pub fn new(
        source: Arc<dyn RecordSource>,
        stats: Arc<DurationStats>,
        search: SearchConfig,
        config: GatewayConfig,
    ) -> Self {
        Self {
            engine: SearchEngine::new(source, stats).with_config(search),
            config: Arc::new(config),
            known_length: RwLock::new(None),
            start_time: Instant::now(),
        }
    }

    /// Record count seen by the last range query, if any
    pub async fn known_length(&self) -> Option<u64> {
        *self.known_length.read().await
    }

    /// Remember the record count reported by the store
    pub async fn remember_length(&self, length: u64) {
        *self.known_length.write().await = Some(length);
    }

    /// Known record count, asking the store when none is known yet
    pub async fn resolve_length(&self) -> StoreResult<u64> {
        if let Some(length) = self.known_length().await {
            return Ok(length);
        }

        let range = self.engine.describe().await?;
        self.remember_length(range.length).await;
        Ok(range.length)
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// Shared state of the record store server
pub struct StoreState {
    pub store: Arc<ShardedStore>,
}

impl StoreState {
    pub fn new(store: Arc<ShardedStore>) -> Self {
        Self { store }
    }
}
