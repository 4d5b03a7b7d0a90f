//! Tests for the HTTP client module

use super::*;
use crate::auth::{AuthConfig, Location};
use crate::error::Error;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(60));
    assert!(config.base_url.is_none());
    assert!(!config.error_for_status);
    assert!(config.user_agent.starts_with("cron-refresh/"));
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .base_url("https://app.example.com")
        .timeout(Duration::from_secs(5))
        .error_for_status(true)
        .build();

    assert_eq!(config.base_url, Some("https://app.example.com".to_string()));
    assert_eq!(config.timeout, Duration::from_secs(5));
    assert!(config.error_for_status);
}

#[test]
fn test_request_config_builder() {
    let config = RequestConfig::new()
        .query("offset", "0")
        .query("limit", "20")
        .json(serde_json::json!({"days": 28}));

    assert_eq!(config.query.get("offset"), Some(&"0".to_string()));
    assert_eq!(config.query.get("limit"), Some(&"20".to_string()));
    assert!(config.body.is_some());
}

#[test]
fn test_build_url_joins_slashes() {
    let client = HttpClient::with_config(
        HttpClientConfig::builder()
            .base_url("https://app.example.com/")
            .build(),
    )
    .unwrap();

    assert_eq!(
        client.build_url("/api/cron/instagram-refresh"),
        "https://app.example.com/api/cron/instagram-refresh"
    );
    assert_eq!(
        client.build_url("api/cron/backfill-accrual"),
        "https://app.example.com/api/cron/backfill-accrual"
    );
    assert_eq!(
        client.build_url("https://other.example.com/x"),
        "https://other.example.com/x"
    );
}

#[tokio::test]
async fn test_get_json_with_query_and_bearer() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/cron/instagram-refresh"))
        .and(query_param("offset", "40"))
        .and(header("Authorization", "Bearer s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "done": true
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_auth(
        HttpClientConfig::builder().base_url(mock_server.uri()).build(),
        AuthConfig::from_secret("s3cret", Location::Header),
    )
    .unwrap();

    let body = client
        .get_json_with_config(
            "/api/cron/instagram-refresh",
            RequestConfig::new().query("offset", "40"),
        )
        .await
        .unwrap();

    assert_eq!(body["done"], true);
}

#[tokio::test]
async fn test_query_secret_placement() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/cron/job"))
        .and(query_param("secret", "s3cret"))
        .and(query_param("limit", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_auth(
        HttpClientConfig::builder().base_url(mock_server.uri()).build(),
        AuthConfig::from_secret("s3cret", Location::Query),
    )
    .unwrap();

    client
        .get_with_config("/api/cron/job", RequestConfig::new().query("limit", "20"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_post_sends_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/cron/backfill-accrual"))
        .and(body_json(serde_json::json!({"days": 28})))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(
        HttpClientConfig::builder().base_url(mock_server.uri()).build(),
    )
    .unwrap();

    let response = client
        .post("/api/cron/backfill-accrual", serde_json::json!({"days": 28}))
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_non_success_is_returned_by_default() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/cron/job"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(serde_json::json!({"error": "Unauthorized"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(
        HttpClientConfig::builder().base_url(mock_server.uri()).build(),
    )
    .unwrap();

    let response = client
        .get_with_config("/api/cron/job", RequestConfig::new())
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_non_success_is_error_when_strict() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/cron/job"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(
        HttpClientConfig::builder()
            .base_url(mock_server.uri())
            .error_for_status(true)
            .build(),
    )
    .unwrap();

    let err = client
        .get_with_config("/api/cron/job", RequestConfig::new())
        .await
        .unwrap_err();

    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("Expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_json_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/cron/job"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(
        HttpClientConfig::builder().base_url(mock_server.uri()).build(),
    )
    .unwrap();

    let err = client
        .get_json_with_config("/api/cron/job", RequestConfig::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::JsonParse(_)));
}

#[tokio::test]
async fn test_timeout_surfaces_as_http_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/cron/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(
        HttpClientConfig::builder()
            .base_url(mock_server.uri())
            .timeout(Duration::from_millis(50))
            .build(),
    )
    .unwrap();

    let err = client
        .get_with_config("/api/cron/slow", RequestConfig::new())
        .await
        .unwrap_err();

    match err {
        Error::Http(e) => assert!(e.is_timeout()),
        other => panic!("Expected Http timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_error_hides_query_secret() {
    // Bind then drop a listener so nothing accepts on the port.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();

    let client = HttpClient::with_auth(
        HttpClientConfig::builder()
            .base_url(format!("http://127.0.0.1:{port}"))
            .build(),
        AuthConfig::from_secret("TOPSECRET123", Location::Query),
    )
    .unwrap();

    let err = client
        .get_with_config("/api/cron/job", RequestConfig::new().query("offset", "0"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Http(_)));
    let text = err.to_string();
    assert!(!text.contains("TOPSECRET123"), "secret leaked: {text}");
    assert!(!format!("{err:?}").contains("TOPSECRET123"));
}
