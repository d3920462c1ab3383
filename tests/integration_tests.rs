//! Integration tests using mock HTTP server
//!
//! Tests the full flow: YAML config → client → rate limiter → retries → typed models

use async_trait::async_trait;
use chesscom_api::http::{ApiRequest, RawResponse, Transport, TransportError};
use chesscom_api::{
    ChessComClient, ClientConfig, ErrorKind, RateLimiter, RateLimiterConfig, RequestExecutor,
    RetryPolicy,
};
use serde_json::json;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn yaml_config(server: &MockServer, extra: &str) -> ClientConfig {
    let yaml = format!(
        "base_url: {}\nretry:\n  base_backoff_ms: 10\n  jitter_ms: 0\n{extra}",
        server.uri()
    );
    ClientConfig::from_yaml_str(&yaml).unwrap()
}

fn country(code: &str) -> serde_json::Value {
    json!({ "code": code, "name": format!("Country {code}") })
}

// ============================================================================
// End-to-end through the typed client
// ============================================================================

#[tokio::test]
async fn test_yaml_configured_client_fetches_player() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/player/erik"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "username": "erik",
            "player_id": 41,
            "status": "staff",
            "country": "https://api.chess.com/pub/country/US",
            "joined": 1178556600,
            "last_online": 1700000000,
            "followers": 5000
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = yaml_config(&mock_server, "");
    let client = ChessComClient::with_config(&config).unwrap();
    let player = client.get_player("erik").await.unwrap();

    assert_eq!(player.player_id, 41);
    assert_eq!(player.country_code(), Some("US"));
}

#[tokio::test]
async fn test_rate_limited_response_is_retried_after_hint() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/country/NO"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "1"))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/country/NO"))
        .respond_with(ResponseTemplate::new(200).set_body_json(country("NO")))
        .mount(&mock_server)
        .await;

    let client = ChessComClient::with_config(&yaml_config(&mock_server, "")).unwrap();

    let start = std::time::Instant::now();
    let result = client.get_country("NO").await.unwrap();

    assert_eq!(result.code, "NO");
    assert!(start.elapsed() >= Duration::from_secs(1));
}

#[tokio::test]
async fn test_unavailable_server_exhausts_retries() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/puzzle"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = ChessComClient::with_config(&yaml_config(&mock_server, "")).unwrap();
    let err = client.get_daily_puzzle().await.unwrap_err();

    let api = err.as_api().unwrap();
    assert_eq!(api.kind(), ErrorKind::Exhausted);
    assert_eq!(api.attempts(), 3);
    assert_eq!(api.status(), Some(503));
}

#[tokio::test]
async fn test_configured_quota_spaces_concurrent_calls() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/country/SE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(country("SE")))
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = yaml_config(&mock_server, "rate_limit:\n  quota: 2\n  window_ms: 1000\n");
    let client = ChessComClient::with_config(&config).unwrap();

    let start = std::time::Instant::now();
    let results = futures::future::join_all((0..3).map(|_| client.get_country("SE"))).await;

    assert!(results.iter().all(Result::is_ok));
    assert!(start.elapsed() >= Duration::from_secs(1));
}

// ============================================================================
// Custom transports through the public executor API
// ============================================================================

/// Fails with a connection error `failures` times, then succeeds
struct FlakyTransport {
    failures: u32,
    calls: AtomicU32,
}

#[async_trait]
impl Transport for FlakyTransport {
    async fn send(
        &self,
        _request: &ApiRequest,
        _timeout: Duration,
    ) -> Result<RawResponse, TransportError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            Err(TransportError::Connect("connection reset by peer".to_string()))
        } else {
            Ok(RawResponse::new(200, r#"{"code":"FR","name":"France"}"#))
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_custom_transport_with_shared_limiter() {
    let transport = Arc::new(FlakyTransport {
        failures: 2,
        calls: AtomicU32::new(0),
    });
    let limiter = RateLimiter::new(&RateLimiterConfig::per_second(10));
    let executor = RequestExecutor::new(transport.clone())
        .with_policy(
            RetryPolicy::builder()
                .max_attempts(3)
                .backoff(Duration::from_millis(100), 2.0, Duration::from_secs(1))
                .jitter(Duration::ZERO)
                .build(),
        )
        .with_rate_limiter(limiter.clone());
    let client = ChessComClient::from_executor(executor);

    let start = tokio::time::Instant::now();
    let country = client.get_country("fr").await.unwrap();

    assert_eq!(country.name, "France");
    assert_eq!(transport.calls.load(Ordering::SeqCst), 3);
    assert!(start.elapsed() >= Duration::from_millis(300));
    assert!(start.elapsed() < Duration::from_millis(400));
    assert_eq!(limiter.in_window(), 3);
}
