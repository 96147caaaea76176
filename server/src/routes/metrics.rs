//! Metrics endpoint (Prometheus text exposition).

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::{routing::get, Router};

use crate::state::AppState;

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// GET /metrics -- render server and rate-engine counters.
async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let body = state
        .metrics
        .to_prometheus(state.engine.metrics(), &state.engine.cache_stats());

    ([(CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)], body)
}

/// Mount the metrics route.
pub fn router() -> Router<AppState> {
    Router::new().route("/metrics", get(metrics))
}
