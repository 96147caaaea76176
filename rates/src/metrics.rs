//! Metrics for rate retrieval.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Counters for cache and upstream-provider activity.
pub struct RateMetrics {
    /// Cache lookups that returned a rate.
    pub cache_hits: AtomicU64,
    /// Cache lookups that fell through to the provider.
    pub cache_misses: AtomicU64,
    /// Successful provider calls.
    pub provider_calls: AtomicU64,
    /// Failed provider calls.
    pub provider_errors: AtomicU64,
    /// Cumulative provider latency in microseconds.
    pub provider_latency_micros: AtomicU64,
    /// Completed warmup runs.
    pub warmup_runs: AtomicU64,
}

impl RateMetrics {
    /// Create new metrics instance.
    pub fn new() -> Self {
        Self {
            cache_hits: AtomicU64::new(0),
            cache_misses: AtomicU64::new(0),
            provider_calls: AtomicU64::new(0),
            provider_errors: AtomicU64::new(0),
            provider_latency_micros: AtomicU64::new(0),
            warmup_runs: AtomicU64::new(0),
        }
    }

    /// Record a cache hit.
    pub fn cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a cache miss.
    pub fn cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful provider call and its latency.
    pub fn provider_call(&self, latency: Duration) {
        self.provider_calls.fetch_add(1, Ordering::Relaxed);
        self.provider_latency_micros
            .fetch_add(latency.as_micros() as u64, Ordering::Relaxed);
    }

    /// Record a failed provider call and its latency.
    pub fn provider_error(&self, latency: Duration) {
        self.provider_errors.fetch_add(1, Ordering::Relaxed);
        self.provider_latency_micros
            .fetch_add(latency.as_micros() as u64, Ordering::Relaxed);
    }

    /// Record a completed warmup run.
    pub fn warmup_run(&self) {
        self.warmup_runs.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot.
    pub fn snapshot(&self) -> RateMetricsSnapshot {
        RateMetricsSnapshot {
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            provider_calls: self.provider_calls.load(Ordering::Relaxed),
            provider_errors: self.provider_errors.load(Ordering::Relaxed),
            provider_latency_micros: self.provider_latency_micros.load(Ordering::Relaxed),
            warmup_runs: self.warmup_runs.load(Ordering::Relaxed),
        }
    }

    /// Export metrics in Prometheus format.
    pub fn to_prometheus(&self) -> String {
        let snapshot = self.snapshot();
        format!(
            r#"# HELP forex_cache_gets_hit Cache lookups that returned a rate
# TYPE forex_cache_gets_hit counter
forex_cache_gets_hit {}

# HELP forex_cache_gets_miss Cache lookups that fell through to the provider
# TYPE forex_cache_gets_miss counter
forex_cache_gets_miss {}

# HELP forex_provider_calls_total Successful upstream provider calls
# TYPE forex_provider_calls_total counter
forex_provider_calls_total {}

# HELP forex_provider_errors_total Failed upstream provider calls
# TYPE forex_provider_errors_total counter
forex_provider_errors_total {}

# HELP forex_provider_latency_micros_total Cumulative upstream latency in microseconds
# TYPE forex_provider_latency_micros_total counter
forex_provider_latency_micros_total {}

# HELP forex_warmup_runs_total Completed cache warmup runs
# TYPE forex_warmup_runs_total counter
forex_warmup_runs_total {}
"#,
            snapshot.cache_hits,
            snapshot.cache_misses,
            snapshot.provider_calls,
            snapshot.provider_errors,
            snapshot.provider_latency_micros,
            snapshot.warmup_runs,
        )
    }
}

impl Default for RateMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time.
#[derive(Debug, Clone)]
pub struct RateMetricsSnapshot {
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub provider_calls: u64,
    pub provider_errors: u64,
    pub provider_latency_micros: u64,
    pub warmup_runs: u64,
}

/// Shared metrics instance.
pub type SharedRateMetrics = Arc<RateMetrics>;
