//! Server configuration.

use std::time::Duration;

use forex_rates::SwopConfig;

/// Which rate provider backs the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Live rates from the Swop API.
    Swop,
    /// Fixed in-memory rate table (offline/dev).
    Fixed,
}

impl ProviderKind {
    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "swop" => Some(Self::Swop),
            "fixed" => Some(Self::Fixed),
            _ => None,
        }
    }
}

/// Main server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Which provider to use.
    pub provider: ProviderKind,
    /// Swop client configuration.
    pub swop: SwopConfig,
    /// Cache TTL in hours.
    pub cache_ttl_hours: i64,
    /// Maximum cache entries.
    pub cache_max_entries: usize,
    /// Run cache warmup at startup and on the daily schedule.
    pub warmup_enabled: bool,
    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            provider: ProviderKind::Swop,
            swop: SwopConfig::default(),
            cache_ttl_hours: 24,
            cache_max_entries: 1000,
            warmup_enabled: true,
            request_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                | Default           |
    /// |------------------------|-------------------|
    /// | `HOST`                 | `0.0.0.0`         |
    /// | `PORT`                 | `8080`            |
    /// | `RATE_PROVIDER`        | `swop`            |
    /// | `SWOP_BASE_URL`        | `https://swop.cx` |
    /// | `SWOP_API_KEY`         | (empty)           |
    /// | `SWOP_TIMEOUT_MS`      | `1000`            |
    /// | `CACHE_TTL_HOURS`      | `24`              |
    /// | `CACHE_MAX_ENTRIES`    | `1000`            |
    /// | `WARMUP_ENABLED`       | `true`            |
    /// | `REQUEST_TIMEOUT_SECS` | `30`              |
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("HOST") {
            config.host = host;
        }

        if let Ok(port) = std::env::var("PORT") {
            if let Ok(port) = port.parse() {
                config.port = port;
            }
        }

        if let Ok(kind) = std::env::var("RATE_PROVIDER") {
            if let Some(kind) = ProviderKind::parse(&kind) {
                config.provider = kind;
            }
        }

        if let Ok(url) = std::env::var("SWOP_BASE_URL") {
            config.swop.base_url = url;
        }

        if let Ok(key) = std::env::var("SWOP_API_KEY") {
            config.swop.api_key = key;
        }

        if let Ok(ms) = std::env::var("SWOP_TIMEOUT_MS") {
            if let Ok(ms) = ms.parse() {
                config.swop.timeout = Duration::from_millis(ms);
            }
        }

        if let Ok(hours) = std::env::var("CACHE_TTL_HOURS") {
            if let Ok(hours) = hours.parse() {
                config.cache_ttl_hours = hours;
            }
        }

        if let Ok(entries) = std::env::var("CACHE_MAX_ENTRIES") {
            if let Ok(entries) = entries.parse() {
                config.cache_max_entries = entries;
            }
        }

        if let Ok(enabled) = std::env::var("WARMUP_ENABLED") {
            if let Ok(enabled) = enabled.parse() {
                config.warmup_enabled = enabled;
            }
        }

        if let Ok(secs) = std::env::var("REQUEST_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse() {
                config.request_timeout_secs = secs;
            }
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("Listen port cannot be 0".to_string());
        }

        if self.provider == ProviderKind::Swop && self.swop.api_key.is_empty() {
            return Err("SWOP_API_KEY is required for the swop provider".to_string());
        }

        if self.cache_ttl_hours <= 0 {
            return Err("Cache TTL must be positive".to_string());
        }

        if self.cache_max_entries == 0 {
            return Err("Cache capacity cannot be 0".to_string());
        }

        Ok(())
    }
}
