//! Rate engine error types.

use forex_common::{CurrencyPair, RateOutOfRange};
use thiserror::Error;

/// Errors that can occur while retrieving exchange rates.
#[derive(Debug, Error)]
pub enum RateError {
    /// The upstream knows no rate for the requested currency pair.
    #[error("Rate not found for {0}")]
    RateNotFound(CurrencyPair),

    /// The upstream returned an error response.
    #[error("Rate provider error: {0}")]
    Provider(String),

    /// The upstream could not be reached (connect failure, timeout).
    #[error("Rate provider unreachable: {0}")]
    Unreachable(String),

    /// The upstream response could not be parsed.
    #[error("Failed to parse provider response: {0}")]
    Parse(String),

    /// The upstream returned a rate outside the allowed range.
    #[error(transparent)]
    RateOutOfRange(#[from] RateOutOfRange),
}

/// Result type for rate operations.
pub type RateResult<T> = Result<T, RateError>;
