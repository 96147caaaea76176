//! Exchange-rate caching with daily keys and TTL support.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use forex_common::{CurrencyPair, ExchangeRate};
use tracing::debug;

/// Cached rate entry.
#[derive(Debug, Clone)]
struct CacheEntry {
    rate: ExchangeRate,
    cached_at: DateTime<Utc>,
    ttl: Duration,
}

impl CacheEntry {
    fn new(rate: ExchangeRate, ttl: Duration) -> Self {
        Self {
            rate,
            cached_at: Utc::now(),
            ttl,
        }
    }

    fn is_valid(&self) -> bool {
        let age = Utc::now().signed_duration_since(self.cached_at);
        age < self.ttl
    }
}

/// Configuration for the rate cache.
#[derive(Debug, Clone)]
pub struct RateCacheConfig {
    /// TTL for cached rates.
    pub ttl: Duration,
    /// Maximum number of entries.
    pub max_entries: usize,
}

impl Default for RateCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::hours(24),
            max_entries: 1000,
        }
    }
}

/// Thread-safe rate cache keyed by quote date and currency pair.
///
/// Keys carry the current UTC date, so a rate cached yesterday is
/// never returned for today's lookups even before its TTL elapses.
pub struct RateCache {
    cache: DashMap<String, CacheEntry>,
    config: RateCacheConfig,
}

impl RateCache {
    /// Create a new rate cache with default configuration.
    pub fn new() -> Self {
        Self::with_config(RateCacheConfig::default())
    }

    /// Create a new rate cache with custom configuration.
    pub fn with_config(config: RateCacheConfig) -> Self {
        Self {
            cache: DashMap::new(),
            config,
        }
    }

    /// Get today's rate for a pair, if cached and still valid.
    pub fn get(&self, pair: &CurrencyPair) -> Option<ExchangeRate> {
        let key = Self::cache_key(pair);

        if let Some(entry) = self.cache.get(&key) {
            if entry.is_valid() {
                debug!(pair = %pair, "Cache hit");
                return Some(entry.rate.clone());
            }
            debug!(pair = %pair, "Cache entry expired");
            drop(entry);
            self.cache.remove(&key);
        }

        debug!(pair = %pair, "Cache miss");
        None
    }

    /// Insert a rate under today's key.
    pub fn insert(&self, rate: ExchangeRate) {
        let key = Self::cache_key(&rate.pair);

        if self.cache.len() >= self.config.max_entries {
            self.evict_expired();
        }

        let entry = CacheEntry::new(rate, self.config.ttl);
        self.cache.insert(key, entry);
    }

    /// Clear all cached rates.
    pub fn clear(&self) {
        self.cache.clear();
    }

    /// Get the number of entries in cache.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Evict expired entries.
    pub fn evict_expired(&self) {
        self.cache.retain(|_, entry| entry.is_valid());
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        let total = self.cache.len();
        let valid = self.cache.iter().filter(|e| e.is_valid()).count();

        CacheStats {
            total_entries: total,
            valid_entries: valid,
            expired_entries: total - valid,
        }
    }

    fn cache_key(pair: &CurrencyPair) -> String {
        format!(
            "{}:{}:{}",
            Utc::now().date_naive(),
            pair.base.code(),
            pair.quote.code()
        )
    }
}

impl Default for RateCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics.
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub total_entries: usize,
    pub valid_entries: usize,
    pub expired_entries: usize,
}
