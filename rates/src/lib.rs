//! Forex Rate Engine
//!
//! Exchange-rate retrieval for the forex converter.
//!
//! # Features
//!
//! - Pluggable rate providers (Swop REST API, fixed in-memory table)
//! - Daily rate caching with configurable TTL and bounded size
//! - Provider-level metrics (cache hits/misses, call latency, errors)
//! - Startup cache warmup from the upstream's full rate table

pub mod cache;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod provider;
pub mod swop;

pub use cache::{RateCache, RateCacheConfig};
pub use engine::{RateEngine, RateEngineConfig};
pub use error::{RateError, RateResult};
pub use metrics::{RateMetrics, SharedRateMetrics};
pub use provider::{FixedRateProvider, RateProvider};
pub use swop::{SwopClient, SwopConfig, SwopRateProvider};

#[cfg(any(test, feature = "test-utils"))]
pub use provider::MockRateProvider;
