//! Forex Converter Server binary.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::http::HeaderName;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use forex_rates::{
    FixedRateProvider, RateCacheConfig, RateEngine, RateEngineConfig, RateProvider, SwopClient,
    SwopRateProvider,
};
use forex_server::config::ProviderKind;
use forex_server::{routes, warmup, AppState, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("Starting forex converter server");

    let config = ServerConfig::from_env();
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Configuration error: {e}"))?;

    let provider: Arc<dyn RateProvider> = match config.provider {
        ProviderKind::Swop => {
            let client =
                SwopClient::new(&config.swop).context("Failed to build Swop HTTP client")?;
            Arc::new(SwopRateProvider::new(client))
        }
        ProviderKind::Fixed => Arc::new(FixedRateProvider::new()),
    };
    info!(provider = provider.name(), "Rate provider selected");

    let engine_config = RateEngineConfig {
        cache: RateCacheConfig {
            ttl: chrono::Duration::hours(config.cache_ttl_hours),
            max_entries: config.cache_max_entries,
        },
    };
    let engine = Arc::new(RateEngine::new(provider, engine_config));

    let refresh_handle = if config.warmup_enabled {
        // Startup warmup runs in the background so a slow upstream
        // cannot delay serving traffic.
        let warmup_engine = engine.clone();
        tokio::spawn(async move {
            info!("Starting cache warmup");
            warmup_engine.warmup().await;
        });

        Some(warmup::spawn_daily_refresh(engine.clone()))
    } else {
        None
    };

    let request_timeout = Duration::from_secs(config.request_timeout_secs);
    let addr = SocketAddr::new(
        config
            .host
            .parse()
            .with_context(|| format!("Invalid HOST address: {}", config.host))?,
        config.port,
    );

    let state = AppState::new(engine, config);
    let request_id_header = HeaderName::from_static("x-request-id");

    let app = routes::router()
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .with_state(state);

    info!(%addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    if let Some(handle) = refresh_handle {
        handle.abort();
        info!("Refresh task stopped");
    }

    info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for SIGINT or SIGTERM to initiate graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received SIGINT, starting graceful shutdown"),
        () = terminate => info!("Received SIGTERM, starting graceful shutdown"),
    }
}
