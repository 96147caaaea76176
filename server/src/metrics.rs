//! Server-level request metrics.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use forex_rates::cache::CacheStats;
use forex_rates::RateMetrics;

use crate::error::ApiError;

/// Counters for the HTTP conversion surface.
pub struct ServerMetrics {
    /// Conversion requests received.
    pub conversions_total: AtomicU64,
    /// Conversion requests that ended in an error response.
    pub conversions_failed: AtomicU64,
    /// Responses with a 4xx status.
    pub errors_client: AtomicU64,
    /// Responses with a 5xx status.
    pub errors_upstream: AtomicU64,
}

impl ServerMetrics {
    /// Create new metrics instance.
    pub fn new() -> Self {
        Self {
            conversions_total: AtomicU64::new(0),
            conversions_failed: AtomicU64::new(0),
            errors_client: AtomicU64::new(0),
            errors_upstream: AtomicU64::new(0),
        }
    }

    /// Record an incoming conversion request.
    pub fn conversion_started(&self) {
        self.conversions_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed conversion, classified by response status.
    pub fn conversion_failed(&self, error: &ApiError) {
        self.conversions_failed.fetch_add(1, Ordering::Relaxed);
        if error.status().is_client_error() {
            self.errors_client.fetch_add(1, Ordering::Relaxed);
        } else {
            self.errors_upstream.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Render the full Prometheus exposition: server counters, rate
    /// engine counters, and a cache size gauge.
    pub fn to_prometheus(&self, rate_metrics: &RateMetrics, cache: &CacheStats) -> String {
        let mut out = format!(
            r#"# HELP forex_conversions_total Conversion requests received
# TYPE forex_conversions_total counter
forex_conversions_total {}

# HELP forex_conversions_failed Conversion requests that returned an error
# TYPE forex_conversions_failed counter
forex_conversions_failed {}

# HELP forex_errors_client Responses with a 4xx status
# TYPE forex_errors_client counter
forex_errors_client {}

# HELP forex_errors_upstream Responses with a 5xx status
# TYPE forex_errors_upstream counter
forex_errors_upstream {}

# HELP forex_cache_entries Current rate cache entries
# TYPE forex_cache_entries gauge
forex_cache_entries {}

"#,
            self.conversions_total.load(Ordering::Relaxed),
            self.conversions_failed.load(Ordering::Relaxed),
            self.errors_client.load(Ordering::Relaxed),
            self.errors_upstream.load(Ordering::Relaxed),
            cache.total_entries,
        );
        out.push_str(&rate_metrics.to_prometheus());
        out
    }
}

impl Default for ServerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared metrics instance.
pub type SharedServerMetrics = Arc<ServerMetrics>;
