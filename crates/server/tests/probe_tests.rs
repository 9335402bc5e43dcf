//! Tests for the HTTP probe executor.

use rust_uptime_monitor::error::ProbeError;
use rust_uptime_monitor::probe::probe_url;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn reads_status_and_full_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Welcome Home"))
        .mount(&server)
        .await;

    let response = probe_url(&format!("{}/", server.uri()), PROBE_TIMEOUT)
        .await
        .unwrap();
    assert_eq!(response.status.as_u16(), 200);
    assert_eq!(response.body, "Welcome Home");
    assert!(response.elapsed > Duration::ZERO);
}

#[tokio::test]
async fn follows_redirects() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/target"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/target"))
        .respond_with(ResponseTemplate::new(200).set_body_string("landed"))
        .mount(&server)
        .await;

    let response = probe_url(&format!("{}/", server.uri()), PROBE_TIMEOUT)
        .await
        .unwrap();
    assert_eq!(response.status.as_u16(), 200);
    assert_eq!(response.body, "landed");
}

#[tokio::test]
async fn non_2xx_is_a_response_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&server)
        .await;

    let response = probe_url(&format!("{}/missing", server.uri()), PROBE_TIMEOUT)
        .await
        .unwrap();
    assert_eq!(response.status.as_u16(), 404);
    assert_eq!(response.body, "not here");
}

#[tokio::test]
async fn query_string_is_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "rust"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let response = probe_url(&format!("{}/search?q=rust", server.uri()), PROBE_TIMEOUT)
        .await
        .unwrap();
    assert_eq!(response.status.as_u16(), 200);
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let error = probe_url(&format!("{}/", server.uri()), Duration::from_millis(100))
        .await
        .unwrap_err();
    assert!(matches!(error, ProbeError::Timeout(_)));
    assert!(error.is_retryable());
}

#[tokio::test]
async fn connection_refused_is_a_connect_error() {
    // Bind then drop a listener so the port is very likely unused.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let error = probe_url(&format!("http://{addr}/"), PROBE_TIMEOUT)
        .await
        .unwrap_err();
    assert!(matches!(error, ProbeError::Connect(_)));
    assert!(error.is_retryable());
}

#[tokio::test]
async fn unparseable_url_is_fatal() {
    let error = probe_url("not a url", PROBE_TIMEOUT).await.unwrap_err();
    assert!(matches!(error, ProbeError::InvalidUrl(_)));
    assert!(!error.is_retryable());
}

#[tokio::test]
async fn unsupported_scheme_is_fatal() {
    let error = probe_url("ftp://example.com/file", PROBE_TIMEOUT)
        .await
        .unwrap_err();
    assert!(matches!(error, ProbeError::UnsupportedScheme(_)));
    assert!(!error.is_retryable());
}
