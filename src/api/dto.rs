//! Data Transfer Objects
//!
//! Wire types shared by the store server, the gateway and the remote store
//! client. Every body is a JSON object with a single `result` field, `null`
//! when there is nothing to return.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// `{ "result": ... }` body used by every endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ResultEnvelope<T> {
    pub result: Option<T>,
}

/// Query string of `GET /media-segment`
#[derive(Debug, Deserialize)]
pub struct PositionParams {
    #[serde(default)]
    pub position: Option<String>,
}

/// Query string of `GET /query`
#[derive(Debug, Deserialize)]
pub struct IndexParams {
    #[serde(default)]
    pub index: Option<String>,
}

/// Body of `GET /stats`
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    /// Running mean record duration (ms)
    pub average_duration: f64,
    /// Number of probes folded into the mean
    pub samples: u64,
    /// Cached start of record 0
    pub lowest_start: Option<i64>,
    /// Record count last reported by the store
    pub known_length: Option<u64>,
}

/// Body of `GET /health`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub store: String,
    pub uptime_seconds: u64,
    pub version: String,
}

/// Serialize `body` with an exact `content-length`
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => (
            status,
            [
                (header::CONTENT_TYPE, "application/json".to_string()),
                (header::CONTENT_LENGTH, bytes.len().to_string()),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to serialize response: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// `{ "result": result }` with the given status
pub fn result_response<T: Serialize>(status: StatusCode, result: Option<T>) -> Response {
    json_response(status, &ResultEnvelope { result })
}

/// 404 with `{ "result": null }`
pub fn not_found() -> Response {
    result_response::<()>(StatusCode::NOT_FOUND, None)
}
