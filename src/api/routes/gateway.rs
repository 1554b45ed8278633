//! Gateway Routes
//!
//! - GET /range - Overall extent of the record store
//! - GET /media-segment?position=<ms> - Record containing a timestamp
//! - GET /stats - Running search statistics

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Response,
};
use std::sync::Arc;

use crate::api::dto::{not_found, result_response, PositionParams, StatsResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::GatewayState;
use crate::search::SearchOutcome;
use crate::store::{RecordSource, StoreError};

/// GET /range
///
/// Proxies the store's range query and remembers the record count for
/// later lookups.
pub async fn get_range(State(state): State<Arc<GatewayState>>) -> ApiResult<Response> {
    tracing::info!("get range from record store");

    match state.engine.source().range().await? {
        Some(range) => {
            state.remember_length(range.length).await;
            Ok(result_response(StatusCode::OK, Some(range)))
        }
        None => Ok(not_found()),
    }
}

/// GET /media-segment?position=<ms>
///
/// By default the position is read like a leading integer (`"300ms"` and
/// `"300.7"` both mean 300) and input without digits gets the same 404 as a
/// miss. With `malformed_as_bad_request` the whole value must be an integer,
/// anything else is a 400.
pub async fn get_media_segment(
    State(state): State<Arc<GatewayState>>,
    Query(params): Query<PositionParams>,
) -> ApiResult<Response> {
    let strict = state.config.malformed_as_bad_request;
    let parsed = params
        .position
        .as_deref()
        .and_then(|raw| parse_position(raw, strict));

    let position = match parsed {
        Some(position) => position,
        None if strict => {
            return Err(ApiError::Validation(format!(
                "position must be an integer, got {:?}",
                params.position.unwrap_or_default()
            )));
        }
        None => return Ok(not_found()),
    };

    let stats = state.engine.stats().snapshot();
    tracing::info!(
        "get media segment for position {}, running average {:.1}, durations {}",
        position,
        stats.average_duration,
        stats.samples
    );

    let length = match state.resolve_length().await {
        Ok(length) => length,
        Err(StoreError::NotInitialized) => return Ok(not_found()),
        Err(e) => return Err(e.into()),
    };

    let lookup = state.engine.locate_traced(position, length);
    let (outcome, trace) = tokio::time::timeout(state.config.search_timeout(), lookup)
        .await
        .map_err(|_| ApiError::Timeout(state.config.search_timeout_ms))??;

    tracing::debug!(
        position,
        probes = trace.probe_count(),
        found = outcome.is_found(),
        "lookup finished"
    );

    match outcome {
        SearchOutcome::Found(record) => Ok(result_response(StatusCode::OK, Some(record))),
        SearchOutcome::NotFound => Ok(not_found()),
    }
}

/// GET /stats
pub async fn get_stats(State(state): State<Arc<GatewayState>>) -> Response {
    let stats = state.engine.stats().snapshot();
    let body = StatsResponse {
        average_duration: stats.average_duration,
        samples: stats.samples,
        lowest_start: stats.lowest_start,
        known_length: state.known_length().await,
    };
    result_response(StatusCode::OK, Some(body))
}

fn parse_position(raw: &str, strict: bool) -> Option<i64> {
    let raw = raw.trim();
    if strict {
        return raw.parse().ok();
    }

    let digits_from = usize::from(raw.starts_with(['+', '-']));
    let digits_len = raw[digits_from..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return None;
    }
    raw[..digits_from + digits_len].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_position() {
        assert_eq!(parse_position("1200", false), Some(1200));
        assert_eq!(parse_position(" -5 ", false), Some(-5));
        assert_eq!(parse_position("+7", false), Some(7));
        assert_eq!(parse_position("300ms", false), Some(300));
        assert_eq!(parse_position("300.7", false), Some(300));
        assert_eq!(parse_position("", false), None);
        assert_eq!(parse_position("abc", false), None);
        assert_eq!(parse_position("-", false), None);
        assert_eq!(parse_position("ms300", false), None);
    }

    #[test]
    fn test_parse_position_strict() {
        assert_eq!(parse_position(" 1200 ", true), Some(1200));
        assert_eq!(parse_position("-5", true), Some(-5));
        assert_eq!(parse_position("300ms", true), None);
        assert_eq!(parse_position("300.7", true), None);
        assert_eq!(parse_position("", true), None);
    }
}
