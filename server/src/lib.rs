//! Forex Converter Server
//!
//! Axum HTTP API exposing currency conversion backed by the rate engine.

pub mod config;
pub mod conversion;
pub mod error;
pub mod metrics;
pub mod routes;
pub mod state;
pub mod warmup;

pub use config::ServerConfig;
pub use state::AppState;
