//! Rate provider trait and the fixed in-memory provider.

use async_trait::async_trait;
use chrono::Utc;
use forex_common::{Currency, CurrencyPair, ExchangeRate};
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::error::{RateError, RateResult};

/// Trait for exchange-rate providers.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Get the provider name.
    fn name(&self) -> &str;

    /// Get the current rate for a currency pair.
    async fn get_rate(&self, pair: &CurrencyPair) -> RateResult<ExchangeRate>;

    /// Get every rate the provider knows about (used for cache warmup).
    async fn all_rates(&self) -> RateResult<Vec<ExchangeRate>>;
}

/// Provider backed by a fixed in-memory rate table.
///
/// Used for offline development and environments without upstream
/// credentials. The seed table carries a handful of major pairs.
pub struct FixedRateProvider {
    rates: HashMap<CurrencyPair, Decimal>,
}

impl FixedRateProvider {
    /// Create a provider with the standard seed rates.
    pub fn new() -> Self {
        let seed = [
            (Currency::usd(), Currency::eur(), Decimal::new(9250, 4)),
            (Currency::usd(), Currency::gbp(), Decimal::new(7850, 4)),
            (Currency::usd(), Currency::jpy(), Decimal::new(1_495_000, 4)),
            (Currency::eur(), Currency::gbp(), Decimal::new(8486, 4)),
            (Currency::eur(), Currency::jpy(), Decimal::new(1_616_200, 4)),
            (Currency::gbp(), Currency::jpy(), Decimal::new(1_904_500, 4)),
        ];

        let rates = seed
            .into_iter()
            .map(|(base, quote, rate)| (CurrencyPair::new(base, quote), rate))
            .collect();

        Self { rates }
    }
}

impl Default for FixedRateProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateProvider for FixedRateProvider {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn get_rate(&self, pair: &CurrencyPair) -> RateResult<ExchangeRate> {
        let rate = self
            .rates
            .get(pair)
            .ok_or_else(|| RateError::RateNotFound(pair.clone()))?;

        Ok(ExchangeRate::new(
            pair.clone(),
            rate.round_dp(4),
            Utc::now().date_naive(),
        )?)
    }

    async fn all_rates(&self) -> RateResult<Vec<ExchangeRate>> {
        let today = Utc::now().date_naive();
        let mut rates = Vec::with_capacity(self.rates.len());
        for (pair, rate) in &self.rates {
            rates.push(ExchangeRate::new(pair.clone(), rate.round_dp(4), today)?);
        }
        Ok(rates)
    }
}

/// Mock rate provider for testing.
#[cfg(any(test, feature = "test-utils"))]
pub struct MockRateProvider {
    name: String,
    rates: dashmap::DashMap<String, ExchangeRate>,
    failure: std::sync::Mutex<Option<String>>,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockRateProvider {
    /// Create a new mock provider.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rates: dashmap::DashMap::new(),
            failure: std::sync::Mutex::new(None),
        }
    }

    /// Set a rate for a currency pair.
    pub fn set_rate(&self, rate: ExchangeRate) {
        let key = format!("{}", rate.pair);
        self.rates.insert(key, rate);
    }

    /// Make every call fail with an upstream error.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock().expect("failure lock") = Some(message.into());
    }

    /// Clear a previously configured failure.
    pub fn recover(&self) {
        *self.failure.lock().expect("failure lock") = None;
    }

    fn forced_failure(&self) -> Option<String> {
        self.failure.lock().expect("failure lock").clone()
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl RateProvider for MockRateProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_rate(&self, pair: &CurrencyPair) -> RateResult<ExchangeRate> {
        if let Some(message) = self.forced_failure() {
            return Err(RateError::Unreachable(message));
        }
        let key = format!("{}", pair);
        self.rates
            .get(&key)
            .map(|r| r.clone())
            .ok_or_else(|| RateError::RateNotFound(pair.clone()))
    }

    async fn all_rates(&self) -> RateResult<Vec<ExchangeRate>> {
        if let Some(message) = self.forced_failure() {
            return Err(RateError::Unreachable(message));
        }
        Ok(self.rates.iter().map(|r| r.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn make_rate(base: &str, quote: &str, rate: Decimal) -> ExchangeRate {
        ExchangeRate::new(
            CurrencyPair::new(Currency::parse(base).unwrap(), Currency::parse(quote).unwrap()),
            rate,
            Utc::now().date_naive(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_fixed_provider_seed_rates() {
        let provider = FixedRateProvider::new();
        let pair = CurrencyPair::new(Currency::usd(), Currency::eur());

        let rate = provider.get_rate(&pair).await.unwrap();

        assert_eq!(rate.rate, dec!(0.9250));
        assert_eq!(rate.pair, pair);
    }

    #[tokio::test]
    async fn test_fixed_provider_unknown_pair() {
        let provider = FixedRateProvider::new();
        let pair = CurrencyPair::new(Currency::eur(), Currency::usd());

        let result = provider.get_rate(&pair).await;

        assert!(matches!(result, Err(RateError::RateNotFound(_))));
    }

    #[tokio::test]
    async fn test_fixed_provider_all_rates() {
        let provider = FixedRateProvider::new();

        let rates = provider.all_rates().await.unwrap();

        assert_eq!(rates.len(), 6);
    }

    #[tokio::test]
    async fn test_mock_provider() {
        let provider = MockRateProvider::new("test");
        let rate = make_rate("USD", "EUR", dec!(0.92));
        provider.set_rate(rate.clone());

        let pair = CurrencyPair::new(Currency::usd(), Currency::eur());
        let result = provider.get_rate(&pair).await.unwrap();

        assert_eq!(result, rate);
    }

    #[tokio::test]
    async fn test_mock_provider_failure() {
        let provider = MockRateProvider::new("test");
        provider.set_rate(make_rate("USD", "EUR", dec!(0.92)));
        provider.fail_with("connection refused");

        let pair = CurrencyPair::new(Currency::usd(), Currency::eur());
        assert!(matches!(
            provider.get_rate(&pair).await,
            Err(RateError::Unreachable(_))
        ));

        provider.recover();
        assert!(provider.get_rate(&pair).await.is_ok());
    }
}
