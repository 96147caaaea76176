//! Shared application state.

use std::sync::Arc;

use forex_rates::RateEngine;

use crate::config::ServerConfig;
use crate::conversion::ConversionService;
use crate::metrics::SharedServerMetrics;

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Rate engine (cache + provider).
    pub engine: Arc<RateEngine>,
    /// Conversion service on top of the engine.
    pub conversions: Arc<ConversionService>,
    /// Server-level request metrics.
    pub metrics: SharedServerMetrics,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Build state around a rate engine.
    pub fn new(engine: Arc<RateEngine>, config: ServerConfig) -> Self {
        Self {
            conversions: Arc::new(ConversionService::new(engine.clone())),
            engine,
            metrics: Arc::new(crate::metrics::ServerMetrics::new()),
            config: Arc::new(config),
        }
    }
}
