//! REST client and provider for the Swop exchange-rate API.
//!
//! Wraps the Swop HTTP API (single-pair and full-table rate retrieval)
//! using [`reqwest`], and adapts its responses to [`ExchangeRate`].

use async_trait::async_trait;
use chrono::NaiveDate;
use forex_common::{Currency, CurrencyPair, ExchangeRate};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

use crate::error::{RateError, RateResult};
use crate::provider::RateProvider;

/// Configuration for the Swop client.
#[derive(Debug, Clone)]
pub struct SwopConfig {
    /// Base URL of the Swop API.
    pub base_url: String,
    /// API key sent in the `Authorization` header.
    pub api_key: String,
    /// Connect and read timeout.
    pub timeout: Duration,
}

impl Default for SwopConfig {
    fn default() -> Self {
        Self {
            base_url: "https://swop.cx".to_string(),
            api_key: String::new(),
            timeout: Duration::from_millis(1000),
        }
    }
}

/// One rate as returned by the Swop API.
#[derive(Debug, Clone, Deserialize)]
pub struct SwopRate {
    pub base_currency: String,
    pub quote_currency: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub quote: Decimal,
    pub date: String,
}

/// Errors from the Swop REST layer.
#[derive(Debug, thiserror::Error)]
pub enum SwopApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Swop returned a non-2xx status code.
    #[error("Swop API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

/// HTTP client for the Swop API.
pub struct SwopClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SwopClient {
    /// Create a new client from configuration.
    pub fn new(config: &SwopConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Fetch the rate for a single currency pair.
    ///
    /// Sends `GET /rest/rates/{base}/{quote}`.
    pub async fn fetch_rate(&self, base: &str, quote: &str) -> Result<SwopRate, SwopApiError> {
        let response = self
            .client
            .get(format!("{}/rest/rates/{}/{}", self.base_url, base, quote))
            .header("Authorization", format!("ApiKey {}", self.api_key))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Fetch the full rate table.
    ///
    /// Sends `GET /rest/rates`. Used for cache warmup.
    pub async fn fetch_all_rates(&self) -> Result<Vec<SwopRate>, SwopApiError> {
        let response = self
            .client
            .get(format!("{}/rest/rates", self.base_url))
            .header("Authorization", format!("ApiKey {}", self.api_key))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, SwopApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SwopApiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<T>().await?)
    }
}

/// Rate provider backed by the Swop API.
pub struct SwopRateProvider {
    client: SwopClient,
}

impl SwopRateProvider {
    /// Create a provider around an existing client.
    pub fn new(client: SwopClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RateProvider for SwopRateProvider {
    fn name(&self) -> &str {
        "swop"
    }

    async fn get_rate(&self, pair: &CurrencyPair) -> RateResult<ExchangeRate> {
        let response = self
            .client
            .fetch_rate(pair.base.code(), pair.quote.code())
            .await
            .map_err(|e| map_api_error(e, pair))?;

        to_exchange_rate(&response)
    }

    async fn all_rates(&self) -> RateResult<Vec<ExchangeRate>> {
        let responses = self
            .client
            .fetch_all_rates()
            .await
            .map_err(map_table_error)?;

        // Skip rows the domain model rejects (unknown currencies,
        // out-of-range rates) rather than failing the whole table.
        let mut rates = Vec::with_capacity(responses.len());
        for row in &responses {
            match to_exchange_rate(row) {
                Ok(rate) => rates.push(rate),
                Err(e) => warn!(
                    base = %row.base_currency,
                    quote = %row.quote_currency,
                    error = %e,
                    "Skipping unusable rate from full table"
                ),
            }
        }
        Ok(rates)
    }
}

/// Convert a Swop response row into a validated [`ExchangeRate`].
fn to_exchange_rate(row: &SwopRate) -> RateResult<ExchangeRate> {
    let base = Currency::parse(&row.base_currency)
        .map_err(|e| RateError::Parse(e.to_string()))?;
    let quote = Currency::parse(&row.quote_currency)
        .map_err(|e| RateError::Parse(e.to_string()))?;
    let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d")
        .map_err(|e| RateError::Parse(format!("invalid date {:?}: {}", row.date, e)))?;

    Ok(ExchangeRate::new(
        CurrencyPair::new(base, quote),
        row.quote,
        date,
    )?)
}

/// Map a single-pair API failure to a domain error.
fn map_api_error(err: SwopApiError, pair: &CurrencyPair) -> RateError {
    match err {
        SwopApiError::Api { status: 404, .. } => RateError::RateNotFound(pair.clone()),
        SwopApiError::Api { status, .. } => {
            RateError::Provider(format!("Swop returned status {status}"))
        }
        SwopApiError::Request(e) => map_request_error(e),
    }
}

/// Map a full-table API failure to a domain error.
fn map_table_error(err: SwopApiError) -> RateError {
    match err {
        SwopApiError::Api { status, .. } => {
            RateError::Provider(format!("Swop returned status {status}"))
        }
        SwopApiError::Request(e) => map_request_error(e),
    }
}

fn map_request_error(err: reqwest::Error) -> RateError {
    if err.is_decode() {
        RateError::Parse(err.to_string())
    } else if err.is_timeout() || err.is_connect() {
        RateError::Unreachable(err.to_string())
    } else {
        RateError::Provider(err.to_string())
    }
}
