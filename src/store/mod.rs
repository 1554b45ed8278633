//! Record Store
//!
//! The ordered collection of time-ranged records the search runs against.
//!
//! - **types**: `Record` and `DatasetRange`
//! - **source**: the `RecordSource` boundary (range query + point query)
//! - **sharded**: in-memory store split into fixed-size shards
//! - **remote**: HTTP client for a store running in another process
//! - **error**: error types
//!
//! ```text
//! ShardedStore ──(HTTP /range, /query)──> RemoteStore ──> SearchEngine
//!      └───────────────(in process)────────────────────────────┘
//! ```

pub mod error;
pub mod remote;
pub mod sharded;
pub mod source;
pub mod types;

pub use error::{StoreError, StoreResult};
pub use remote::RemoteStore;
pub use sharded::{GenerateOptions, ShardedStore, DEFAULT_SHARD_SIZE};
pub use source::{describe, RecordSource};
pub use types::{DatasetRange, Record};
