//! Rate engine: cache-fronted access to a rate provider.

use std::sync::Arc;
use std::time::Instant;

use forex_common::{CurrencyPair, ExchangeRate};
use tracing::{debug, info, instrument, warn};

use crate::cache::{CacheStats, RateCache, RateCacheConfig};
use crate::error::RateResult;
use crate::metrics::{RateMetrics, SharedRateMetrics};
use crate::provider::RateProvider;

/// Configuration for the rate engine.
#[derive(Debug, Clone, Default)]
pub struct RateEngineConfig {
    /// Cache configuration.
    pub cache: RateCacheConfig,
}

/// Cache-fronted rate lookup over a pluggable provider.
pub struct RateEngine {
    provider: Arc<dyn RateProvider>,
    cache: RateCache,
    metrics: SharedRateMetrics,
}

impl RateEngine {
    /// Create a new engine with the given provider.
    pub fn new(provider: Arc<dyn RateProvider>, config: RateEngineConfig) -> Self {
        Self {
            provider,
            cache: RateCache::with_config(config.cache),
            metrics: Arc::new(RateMetrics::new()),
        }
    }

    /// Get the metrics handle.
    pub fn metrics(&self) -> &SharedRateMetrics {
        &self.metrics
    }

    /// Get cache statistics.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Get today's rate for a currency pair.
    ///
    /// Checks the cache first; on a miss, fetches from the provider and
    /// caches the validated result.
    #[instrument(skip(self), fields(pair = %pair))]
    pub async fn get_rate(&self, pair: &CurrencyPair) -> RateResult<ExchangeRate> {
        if let Some(cached) = self.cache.get(pair) {
            self.metrics.cache_hit();
            debug!("Using cached rate");
            return Ok(cached);
        }
        self.metrics.cache_miss();

        let started = Instant::now();
        let result = self.provider.get_rate(pair).await;
        let latency = started.elapsed();

        match result {
            Ok(rate) => {
                self.metrics.provider_call(latency);
                self.cache.insert(rate.clone());
                Ok(rate)
            }
            Err(e) => {
                self.metrics.provider_error(latency);
                warn!(
                    provider = self.provider.name(),
                    error = %e,
                    "Provider failed to return rate"
                );
                Err(e)
            }
        }
    }

    /// Pre-populate the cache from the provider's full rate table.
    ///
    /// Failures are logged and swallowed: warmup must never take the
    /// service down.
    #[instrument(skip(self))]
    pub async fn warmup(&self) {
        match self.provider.all_rates().await {
            Ok(rates) => {
                let count = rates.len();
                for rate in rates {
                    self.cache.insert(rate);
                }
                self.metrics.warmup_run();
                info!(count, provider = self.provider.name(), "Cache warmup complete");
            }
            Err(e) => {
                warn!(
                    provider = self.provider.name(),
                    error = %e,
                    "Cache warmup failed"
                );
            }
        }
    }

    /// Evict expired cache entries.
    pub fn evict_expired(&self) {
        self.cache.evict_expired();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RateError;
    use crate::provider::MockRateProvider;
    use chrono::Utc;
    use forex_common::Currency;
    use rust_decimal_macros::dec;

    fn make_rate(base: Currency, quote: Currency, rate: rust_decimal::Decimal) -> ExchangeRate {
        ExchangeRate::new(
            CurrencyPair::new(base, quote),
            rate,
            Utc::now().date_naive(),
        )
        .unwrap()
    }

    fn setup_engine() -> (Arc<MockRateProvider>, RateEngine) {
        let provider = Arc::new(MockRateProvider::new("test"));
        provider.set_rate(make_rate(Currency::usd(), Currency::eur(), dec!(0.9250)));
        provider.set_rate(make_rate(Currency::gbp(), Currency::usd(), dec!(1.2700)));

        let engine = RateEngine::new(provider.clone(), RateEngineConfig::default());
        (provider, engine)
    }

    #[tokio::test]
    async fn test_get_rate_from_provider() {
        let (_, engine) = setup_engine();
        let pair = CurrencyPair::new(Currency::usd(), Currency::eur());

        let rate = engine.get_rate(&pair).await.unwrap();

        assert_eq!(rate.rate, dec!(0.9250));
        assert_eq!(engine.metrics().snapshot().cache_misses, 1);
        assert_eq!(engine.metrics().snapshot().provider_calls, 1);
    }

    #[tokio::test]
    async fn test_second_lookup_hits_cache() {
        let (provider, engine) = setup_engine();
        let pair = CurrencyPair::new(Currency::usd(), Currency::eur());

        let first = engine.get_rate(&pair).await.unwrap();

        // Even if the provider goes away, the cached rate is served.
        provider.fail_with("gone");
        let second = engine.get_rate(&pair).await.unwrap();

        assert_eq!(first, second);
        let snapshot = engine.metrics().snapshot();
        assert_eq!(snapshot.cache_hits, 1);
        assert_eq!(snapshot.cache_misses, 1);
        assert_eq!(snapshot.provider_calls, 1);
    }

    #[tokio::test]
    async fn test_rate_not_found() {
        let (_, engine) = setup_engine();
        let pair = CurrencyPair::new(Currency::eur(), Currency::jpy());

        let result = engine.get_rate(&pair).await;

        assert!(matches!(result, Err(RateError::RateNotFound(_))));
        assert_eq!(engine.metrics().snapshot().provider_errors, 1);
    }

    #[tokio::test]
    async fn test_warmup_populates_cache() {
        let (provider, engine) = setup_engine();

        engine.warmup().await;

        // Both seeded pairs are now served without provider calls.
        provider.fail_with("gone");
        let usd_eur = CurrencyPair::new(Currency::usd(), Currency::eur());
        let gbp_usd = CurrencyPair::new(Currency::gbp(), Currency::usd());
        assert!(engine.get_rate(&usd_eur).await.is_ok());
        assert!(engine.get_rate(&gbp_usd).await.is_ok());

        assert_eq!(engine.metrics().snapshot().warmup_runs, 1);
        assert_eq!(engine.cache_stats().total_entries, 2);
    }

    #[tokio::test]
    async fn test_warmup_failure_is_swallowed() {
        let provider = Arc::new(MockRateProvider::new("test"));
        provider.fail_with("connection refused");
        let engine = RateEngine::new(provider, RateEngineConfig::default());

        engine.warmup().await;

        assert_eq!(engine.metrics().snapshot().warmup_runs, 0);
        assert_eq!(engine.cache_stats().total_entries, 0);
    }
}
