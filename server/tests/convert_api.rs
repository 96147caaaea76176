//! End-to-end tests for the HTTP API, driving the router directly.

use std::str::FromStr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::Utc;
use forex_common::{Currency, CurrencyPair, ExchangeRate};
use forex_rates::{MockRateProvider, RateEngine, RateEngineConfig};
use forex_server::config::ProviderKind;
use forex_server::{routes, AppState, ServerConfig};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tower::ServiceExt;

fn make_rate(base: Currency, quote: Currency, rate: Decimal) -> ExchangeRate {
    ExchangeRate::new(
        CurrencyPair::new(base, quote),
        rate,
        Utc::now().date_naive(),
    )
    .unwrap()
}

fn test_app() -> (Arc<MockRateProvider>, Router) {
    let provider = Arc::new(MockRateProvider::new("mock"));
    provider.set_rate(make_rate(Currency::usd(), Currency::eur(), dec!(1.079301)));
    provider.set_rate(make_rate(Currency::usd(), Currency::gbp(), dec!(0.789123)));

    let engine = Arc::new(RateEngine::new(provider.clone(), RateEngineConfig::default()));
    let config = ServerConfig {
        provider: ProviderKind::Fixed,
        ..Default::default()
    };
    let app = routes::router().with_state(AppState::new(engine, config));

    (provider, app)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, body)
}

/// Pull the `result` field out as a `Decimal` regardless of how the
/// JSON number is formatted.
fn result_decimal(body: &serde_json::Value) -> Decimal {
    Decimal::from_str(&body["result"].to_string()).unwrap()
}

#[tokio::test]
async fn converts_with_amount() {
    let (_, app) = test_app();

    let (status, body) = get(&app, "/convert/USD-EUR?amount=100").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result_decimal(&body), dec!(107.9301));
}

#[tokio::test]
async fn returns_rate_without_amount() {
    let (_, app) = test_app();

    let (status, body) = get(&app, "/convert/USD-GBP").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result_decimal(&body), dec!(0.789123));
}

#[tokio::test]
async fn same_currency_is_identity() {
    let (_, app) = test_app();

    // EUR-EUR has no mock rate; identity must not consult the provider.
    let (status, body) = get(&app, "/convert/EUR-EUR?amount=100").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result_decimal(&body), dec!(100));

    let (status, body) = get(&app, "/convert/EUR-EUR").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result_decimal(&body), dec!(1));
}

#[tokio::test]
async fn rejects_unknown_currency() {
    let (_, app) = test_app();

    let (status, body) = get(&app, "/convert/XYZ-EUR?amount=100").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid currency code: XYZ");
}

#[tokio::test]
async fn rejects_malformed_pair() {
    let (_, app) = test_app();

    let (status, _) = get(&app, "/convert/USDEUR").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn rejects_invalid_amounts() {
    let (_, app) = test_app();

    let cases = [
        ("abc", "Amount must be a decimal number"),
        ("1.005", "Amount must have at most 2 decimal places"),
        ("1.0500", "Amount must have at most 2 decimal places"),
        ("-100", "Amount must be at least 0.01"),
        ("100000000000.01", "Amount must be at most 100000000000"),
    ];

    for (amount, message) in cases {
        let (status, body) = get(&app, &format!("/convert/USD-EUR?amount={amount}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "amount={amount}");
        assert_eq!(body["error"], message, "amount={amount}");
    }
}

#[tokio::test]
async fn unknown_pair_maps_to_not_found() {
    let (_, app) = test_app();

    let (status, body) = get(&app, "/convert/GBP-USD?amount=10").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Rate not found for GBP/USD");
}

#[tokio::test]
async fn provider_failure_maps_to_bad_gateway() {
    let (provider, app) = test_app();
    provider.fail_with("connection refused");

    let (status, body) = get(&app, "/convert/USD-EUR?amount=10").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(
        body["error"],
        "Rate provider unreachable: connection refused"
    );
}

#[tokio::test]
async fn cached_rate_survives_provider_outage() {
    let (provider, app) = test_app();

    let (status, _) = get(&app, "/convert/USD-EUR?amount=10").await;
    assert_eq!(status, StatusCode::OK);

    provider.fail_with("gone");

    let (status, body) = get(&app, "/convert/USD-EUR?amount=10").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result_decimal(&body), dec!(10.79301));
}

#[tokio::test]
async fn health_reports_cache_occupancy() {
    let (_, app) = test_app();

    let (_, _) = get(&app, "/convert/USD-EUR").await;
    let (status, body) = get(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["cached_rates"], 1);
}

#[tokio::test]
async fn metrics_expose_conversion_counters() {
    let (_, app) = test_app();

    let (_, _) = get(&app, "/convert/USD-EUR?amount=100").await;
    let (_, _) = get(&app, "/convert/XYZ-EUR?amount=100").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();

    assert!(text.contains("forex_conversions_total 2"));
    assert!(text.contains("forex_conversions_failed 1"));
    assert!(text.contains("forex_cache_gets_miss 1"));
    assert!(text.contains("forex_cache_entries 1"));
}
