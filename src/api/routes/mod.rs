//! API Routes
//!
//! Route handlers organized by server.

pub mod gateway;
pub mod health;
pub mod store;

use axum::response::Response;

use crate::api::dto::not_found;

/// Any unknown path answers `{ "result": null }` with 404
pub async fn fallback() -> Response {
    not_found()
}
