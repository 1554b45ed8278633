//! The record source boundary
//!
//! Everything the search engine knows about a store goes through
//! [`RecordSource`]: one query for the overall extent and one point lookup
//! by index. Each call is a full round trip and may suspend.

use crate::store::error::{StoreError, StoreResult};
use crate::store::types::{DatasetRange, Record};
use async_trait::async_trait;
use std::sync::Arc;

/// A store of ordered records that can only be queried one index at a time
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Overall extent of the dataset, `None` while the store is empty
    async fn range(&self) -> StoreResult<Option<DatasetRange>>;

    /// Record at `index`, `None` when the index is out of range
    async fn get(&self, index: u64) -> StoreResult<Option<Record>>;
}

#[async_trait]
impl<S: RecordSource + ?Sized> RecordSource for Arc<S> {
    async fn range(&self) -> StoreResult<Option<DatasetRange>> {
        (**self).range().await
    }

    async fn get(&self, index: u64) -> StoreResult<Option<Record>> {
        (**self).get(index).await
    }
}

/// Fetch the dataset descriptor in a single round trip.
///
/// No retries and no caching: callers refetch whenever they suspect the
/// dataset has grown.
pub async fn describe<S: RecordSource + ?Sized>(source: &S) -> StoreResult<DatasetRange> {
    source.range().await?.ok_or(StoreError::NotInitialized)
}
