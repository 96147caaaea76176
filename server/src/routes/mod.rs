//! HTTP routes.

pub mod convert;
pub mod health;
pub mod metrics;

use axum::Router;

use crate::state::AppState;

/// Assemble every route into one router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(convert::router())
        .merge(health::router())
        .merge(metrics::router())
}
