//! Validated exchange-rate type.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::currency::CurrencyPair;

/// Smallest rate the service will accept from any provider.
pub const MIN_RATE: Decimal = Decimal::from_parts(1, 0, 0, false, 4);

/// Largest rate the service will accept from any provider.
pub const MAX_RATE: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// Error returned when a rate falls outside the allowed range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("rate {rate} for {pair} outside allowed range [{MIN_RATE}, {MAX_RATE}]")]
pub struct RateOutOfRange {
    pub pair: CurrencyPair,
    pub rate: Decimal,
}

/// An exchange rate between two currencies, quoted on a given date.
///
/// Construction enforces the range invariant, so a held `ExchangeRate`
/// is always usable for conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// The currency pair.
    pub pair: CurrencyPair,
    /// Units of quote currency per one unit of base currency.
    pub rate: Decimal,
    /// Date the rate was quoted.
    pub date: NaiveDate,
}

impl ExchangeRate {
    /// Create a new exchange rate, validating the range invariant.
    pub fn new(pair: CurrencyPair, rate: Decimal, date: NaiveDate) -> Result<Self, RateOutOfRange> {
        if rate < MIN_RATE || rate > MAX_RATE {
            return Err(RateOutOfRange { pair, rate });
        }
        Ok(Self { pair, rate, date })
    }
}
