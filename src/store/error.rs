//! Record store error types
//!
//! Errors raised when talking to a record store, local or remote. A missing
//! record is never an error: lookups return `Option` for that.

use thiserror::Error;

/// Errors that can occur while querying a record store
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store could not be reached (connection refused, timeout)
    #[error("Record store unavailable: {0}")]
    Unavailable(String),

    /// The store answered with something that is not a valid response
    #[error("Malformed store response: {0}")]
    Malformed(String),

    /// The store holds no records yet
    #[error("Record store not initialized")]
    NotInitialized,

    /// Invalid store or client configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::Malformed(err.to_string())
        } else {
            StoreError::Unavailable(err.to_string())
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Malformed(err.to_string())
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
