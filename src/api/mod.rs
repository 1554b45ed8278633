//! Mediaseek HTTP API
//!
//! Two servers, both built with Axum.
//!
//! # Record store
//! - `GET /range` - Overall extent and record count
//! - `GET /query?index=<i>` - Record at an index
//!
//! # Gateway
//! - `GET /range` - Proxy of the store's range, caches the record count
//! - `GET /media-segment?position=<ms>` - Record containing a timestamp
//! - `GET /stats` - Running search statistics
//! - `GET /health/live`, `GET /health/ready`, `GET /health` - Health checks
//!
//! Every body is `{ "result": ... }` JSON with an exact `content-length`;
//! misses answer 404 with `{ "result": null }`.
//!
//! # Example
//!
//! ```rust,ignore
//! use mediaseek::api::{build_gateway_router, serve, GatewayState};
//! use mediaseek::config::GatewayConfig;
//! use mediaseek::search::{DurationStats, SearchConfig};
//! use mediaseek::store::RemoteStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GatewayConfig::default();
//!     let source = Arc::new(RemoteStore::new(&config.store_url, config.request_timeout())?);
//!     let state = GatewayState::new(
//!         source,
//!         Arc::new(DurationStats::new()),
//!         SearchConfig::default(),
//!         config.clone(),
//!     );
//!     serve(build_gateway_router(state), &config.addr(), "Gateway").await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::{GatewayState, StoreState};

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the gateway router
pub fn build_gateway_router(state: GatewayState) -> Router {
    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    Router::new()
        .route("/range", get(routes::gateway::get_range))
        .route("/media-segment", get(routes::gateway::get_media_segment))
        .route("/stats", get(routes::gateway::get_stats))
        .nest("/health", health_routes)
        .fallback(routes::fallback)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// Build the record store router
pub fn build_store_router(state: StoreState) -> Router {
    Router::new()
        .route("/range", get(routes::store::get_range))
        .route("/query", get(routes::store::get_record))
        .route("/health/live", get(routes::health::liveness))
        .fallback(routes::fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Bind `addr` and serve `router` until Ctrl+C / SIGTERM
pub async fn serve(router: Router, addr: &str, name: &str) -> Result<(), ApiError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("{} listening on {}", name, addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("{} shut down gracefully", name);
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
