//! Record Store Routes
//!
//! - GET /range - Overall extent and record count
//! - GET /query?index=<i> - Record at an index

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Response,
};
use std::sync::Arc;

use crate::api::dto::{not_found, result_response, IndexParams};
use crate::api::error::ApiResult;
use crate::api::state::StoreState;
use crate::store::RecordSource;

/// GET /range
pub async fn get_range(State(state): State<Arc<StoreState>>) -> ApiResult<Response> {
    match state.store.range().await? {
        Some(range) => Ok(result_response(StatusCode::OK, Some(range))),
        None => Ok(not_found()),
    }
}

/// GET /query?index=<i>
///
/// Out-of-range and unparseable indexes both answer 404.
pub async fn get_record(
    State(state): State<Arc<StoreState>>,
    Query(params): Query<IndexParams>,
) -> ApiResult<Response> {
    let Some(index) = params
        .index
        .as_deref()
        .and_then(|raw| raw.trim().parse::<u64>().ok())
    else {
        return Ok(not_found());
    };

    match state.store.get(index).await? {
        Some(record) => Ok(result_response(StatusCode::OK, Some(record))),
        None => Ok(not_found()),
    }
}
