//! Conversion service and amount validation.

use std::sync::Arc;

use forex_common::{Currency, CurrencyPair};
use forex_rates::{RateEngine, RateResult};
use rust_decimal::Decimal;

/// Largest accepted conversion amount (100000000000).
const MAX_AMOUNT: Decimal = Decimal::from_parts(1_215_752_192, 23, 0, false, 0);

/// Smallest accepted conversion amount.
const MIN_AMOUNT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Amount validation failure. Messages are part of the API contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("Amount must be a decimal number")]
    NotANumber,

    #[error("Amount must have at most 2 decimal places")]
    TooManyDecimalPlaces,

    #[error("Amount must be at least 0.01")]
    TooSmall,

    #[error("Amount must be at most 100000000000")]
    TooLarge,
}

/// Parse and validate a raw `amount` query value.
pub fn parse_amount(raw: &str) -> Result<Decimal, AmountError> {
    let amount: Decimal = raw.trim().parse().map_err(|_| AmountError::NotANumber)?;

    // Raw scale counts trailing zeros, so "1.0500" is rejected too.
    if amount.scale() > 2 {
        return Err(AmountError::TooManyDecimalPlaces);
    }
    if amount < MIN_AMOUNT {
        return Err(AmountError::TooSmall);
    }
    if amount > MAX_AMOUNT {
        return Err(AmountError::TooLarge);
    }

    Ok(amount)
}

/// Currency conversion on top of the rate engine.
pub struct ConversionService {
    engine: Arc<RateEngine>,
}

impl ConversionService {
    /// Create a new conversion service.
    pub fn new(engine: Arc<RateEngine>) -> Self {
        Self { engine }
    }

    /// Convert `amount` from one currency to another.
    ///
    /// With no amount, returns the raw rate. Same-currency conversion
    /// is the identity and never consults the provider.
    pub async fn convert(
        &self,
        from: Currency,
        to: Currency,
        amount: Option<Decimal>,
    ) -> RateResult<Decimal> {
        if from == to {
            return Ok(amount.unwrap_or(Decimal::ONE));
        }

        let rate = self.engine.get_rate(&CurrencyPair::new(from, to)).await?;

        Ok(match amount {
            Some(amount) => amount * rate.rate,
            None => rate.rate,
        })
    }
}
