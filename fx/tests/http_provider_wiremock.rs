use std::sync::Arc;

use assetvault_common::{Currency, CurrencyPair};
use assetvault_fx::http::UNAVAILABLE_MESSAGE;
use assetvault_fx::{FxEngine, FxEngineConfig, FxError, HttpRateProvider, RateProvider};
use reqwest::Client;
use rust_decimal_macros::dec;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider_for(server: &MockServer) -> HttpRateProvider {
    HttpRateProvider::with_client(Client::new(), server.uri())
}

fn pair(from: &str, to: &str) -> CurrencyPair {
    CurrencyPair::new(Currency::new(from), Currency::new(to))
}

#[tokio::test]
async fn fetches_rate_from_lowercased_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/usd/eur.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"date": "2024-01-15", "eur": 1.2}"#, "application/json"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let rate = provider_for(&server)
        .fetch_rate(&pair("USD", "EUR"))
        .await
        .unwrap();

    assert_eq!(rate.rate, dec!(1.2));
    assert_eq!(rate.pair, pair("USD", "EUR"));
}

#[tokio::test]
async fn non_success_status_is_rate_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/xyz/eur.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .fetch_rate(&pair("XYZ", "EUR"))
        .await
        .unwrap_err();

    match err {
        FxError::RateUnavailable(message) => assert_eq!(message, UNAVAILABLE_MESSAGE),
        other => panic!("expected RateUnavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn success_without_target_key_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/btc/usd.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(r#"{"date": "2024-01-15"}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .fetch_rate(&pair("BTC", "USD"))
        .await
        .unwrap_err();

    assert!(matches!(err, FxError::MissingRate(_)));
}

#[tokio::test]
async fn malformed_body_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/btc/usd.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html>", "text/html"))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .fetch_rate(&pair("BTC", "USD"))
        .await
        .unwrap_err();

    assert!(matches!(err, FxError::InvalidResponse { .. }));
}

#[tokio::test]
async fn engine_caches_remote_rate() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/iota/usd.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(r#"{"usd": 24.4}"#, "application/json"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let engine = FxEngine::new(Arc::new(provider_for(&server)), FxEngineConfig::default());

    for _ in 0..3 {
        let rate = engine
            .get_rate_for(Currency::new("IOTA"), Currency::usd())
            .await
            .unwrap();
        assert_eq!(rate.rate, dec!(24.4));
    }

    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1);
}
