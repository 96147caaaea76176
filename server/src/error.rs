//! HTTP error type and response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use forex_rates::RateError;
use serde_json::json;

use crate::conversion::AmountError;

/// Application-level error type for HTTP handlers.
///
/// Implements [`IntoResponse`] to produce the `{"error": ...}` JSON
/// envelope with the appropriate status code.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed or unknown currency code in the request path.
    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),

    /// Amount query parameter failed validation.
    #[error(transparent)]
    InvalidAmount(#[from] AmountError),

    /// A rate-layer error.
    #[error(transparent)]
    Rate(#[from] RateError),
}

/// Convenience type alias for handler return values.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Status code this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidCurrency(_) | ApiError::InvalidAmount(_) => StatusCode::BAD_REQUEST,
            ApiError::Rate(RateError::RateNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Rate(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "Upstream failure");
        }

        let body = json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
