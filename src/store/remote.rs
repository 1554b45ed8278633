//! Remote record store client
//!
//! HTTP client for a record store server (see [`crate::api::build_store_router`]).
//! Every call is one GET; there are no retries.

use crate::api::dto::ResultEnvelope;
use crate::store::error::{StoreError, StoreResult};
use crate::store::source::RecordSource;
use crate::store::types::{DatasetRange, Record};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Record source backed by a record store server
#[derive(Debug, Clone)]
pub struct RemoteStore {
    client: Client,
    base_url: String,
}

impl RemoteStore {
    /// Create a client for the store at `base_url` (e.g. "http://localhost:8901")
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> StoreResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Base URL of the store
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> StoreResult<Option<T>> {
        let url = format!("{}{}", self.base_url, path);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        let envelope: ResultEnvelope<T> = serde_json::from_slice(&body).map_err(|e| {
            StoreError::Malformed(format!("{} returned invalid JSON: {}", url, e))
        })?;

        if status.is_success() {
            Ok(envelope.result)
        } else if status == StatusCode::NOT_FOUND && envelope.result.is_none() {
            Ok(None)
        } else {
            Err(StoreError::Malformed(format!(
                "{} returned unexpected status {}",
                url, status
            )))
        }
    }
}

#[async_trait]
impl RecordSource for RemoteStore {
    async fn range(&self) -> StoreResult<Option<DatasetRange>> {
        self.fetch("/range").await
    }

    async fn get(&self, index: u64) -> StoreResult<Option<Record>> {
        self.fetch(&format!("/query?index={}", index)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let store = RemoteStore::new("http://localhost:8901/", Duration::from_secs(1)).unwrap();
        assert_eq!(store.base_url(), "http://localhost:8901");
    }

    #[tokio::test]
    async fn test_unreachable_store() {
        // Port 9 (discard) is closed on test hosts.
        let store = RemoteStore::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        let err = store.get(0).await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }
}
