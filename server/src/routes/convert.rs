//! Conversion endpoint.

use axum::extract::{Path, Query, State};
use axum::{routing::get, Json, Router};
use forex_common::Currency;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::conversion::parse_amount;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Query parameters for the conversion endpoint.
#[derive(Debug, Deserialize)]
pub struct ConvertQuery {
    /// Amount to convert; the raw rate is returned when absent.
    pub amount: Option<String>,
}

/// Successful conversion payload.
#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    /// Converted amount (or the raw rate when no amount was given).
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub result: Decimal,
}

/// GET /convert/{FROM}-{TO}?amount=N
async fn convert(
    State(state): State<AppState>,
    Path(pair): Path<String>,
    Query(query): Query<ConvertQuery>,
) -> ApiResult<Json<ConvertResponse>> {
    state.metrics.conversion_started();

    let result = handle(&state, &pair, query.amount.as_deref()).await;
    if let Err(e) = &result {
        state.metrics.conversion_failed(e);
    }
    result.map(|result| Json(ConvertResponse { result }))
}

async fn handle(state: &AppState, pair: &str, amount: Option<&str>) -> ApiResult<Decimal> {
    let (from, to) = pair
        .split_once('-')
        .ok_or_else(|| ApiError::InvalidCurrency(pair.to_string()))?;

    let from = Currency::parse(from).map_err(|e| ApiError::InvalidCurrency(e.0))?;
    let to = Currency::parse(to).map_err(|e| ApiError::InvalidCurrency(e.0))?;

    let amount = amount.map(parse_amount).transpose()?;

    Ok(state.conversions.convert(from, to, amount).await?)
}

/// Mount the conversion route.
pub fn router() -> Router<AppState> {
    Router::new().route("/convert/{pair}", get(convert))
}
