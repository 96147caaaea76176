//! Health endpoint.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Valid entries currently in the rate cache.
    pub cached_rates: usize,
}

/// GET /health -- returns service status and cache occupancy.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let cache = state.engine.cache_stats();

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        cached_rates: cache.valid_entries,
    })
}

/// Mount the health route.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
