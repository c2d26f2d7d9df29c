//! Dispatcher behavior against a mock Sirportly server.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use sirportly::{Client, ClientOptions, RequestOptions, SirportlyError};
use tokio::sync::oneshot;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(mock_server: &MockServer) -> Client {
    Client::new(options_for(mock_server)).unwrap()
}

fn options_for(mock_server: &MockServer) -> ClientOptions {
    ClientOptions::new()
        .with_token("tok123")
        .with_secret("sec456")
        .with_server("127.0.0.1")
        .with_port(mock_server.address().port())
}

#[tokio::test]
async fn test_success_returns_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/tickets/all"))
        .and(header("x-auth-token", "tok123"))
        .and(header("x-auth-secret", "sec456"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"foo": "bar"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let body = client_for(&mock_server)
        .dispatch("/api/v2/tickets/all", RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(body, json!({"foo": "bar"}));
}

#[tokio::test]
async fn test_empty_success_body_is_null() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/tickets/update"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let body = client_for(&mock_server)
        .dispatch("/api/v2/tickets/update", RequestOptions::post())
        .await
        .unwrap();

    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn test_single_error_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/tickets/ticket"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "not found"})))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .dispatch(
            "/api/v2/tickets/ticket",
            RequestOptions::get().query("ticket", "AB-1"),
        )
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "not found");
    assert!(matches!(
        err,
        SirportlyError::Remote { status, .. } if status.as_u16() == 404
    ));
}

#[tokio::test]
async fn test_multiple_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/tickets/submit"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"errors": ["a", "b"]})))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .dispatch("/api/v2/tickets/submit", RequestOptions::post())
        .await
        .unwrap_err();

    match err {
        SirportlyError::RemoteErrors { status, errors, .. } => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(errors, json!(["a", "b"]));
        }
        other => panic!("expected RemoteErrors, got {other:?}"),
    }
}

#[tokio::test]
async fn test_failure_without_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"status": "denied"})))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .dispatch("/api/v2/objects/statuses", RequestOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(err, SirportlyError::RemoteStatus { .. }));
    assert_eq!(err.status().map(|s| s.as_u16()), Some(401));
}

#[tokio::test]
async fn test_non_json_body_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .dispatch("/api/v2/tickets/all", RequestOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(err, SirportlyError::Decode { .. }));
}

#[tokio::test]
async fn test_transport_failure() {
    // Nothing listens on port 1.
    let client = Client::new(
        ClientOptions::new()
            .with_token("tok123")
            .with_secret("sec456")
            .with_server("127.0.0.1")
            .with_port(1),
    )
    .unwrap();

    let err = client
        .dispatch("/api/v2/tickets/all", RequestOptions::new())
        .await
        .unwrap_err();

    assert!(err.is_transport(), "unexpected error: {err:?}");
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let client = Client::new(options_for(&mock_server).with_timeout_secs(1)).unwrap();
    let err = client
        .dispatch("/api/v2/tickets/all", RequestOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(err, SirportlyError::Timeout { .. }), "unexpected error: {err:?}");
}

#[tokio::test]
async fn test_caller_header_keeps_auth_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("x-auth-token", "tok123"))
        .and(header("x-auth-secret", "sec456"))
        .and(header("x-request-source", "cli"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let body = client_for(&mock_server)
        .dispatch(
            "/api/v2/tickets/all",
            RequestOptions::new().header("X-Request-Source", "cli"),
        )
        .await
        .unwrap();

    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_query_and_form_are_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/tickets/post_update"))
        .and(query_param("ticket", "AB-1"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 9})))
        .expect(1)
        .mount(&mock_server)
        .await;

    client_for(&mock_server)
        .dispatch(
            "/api/v2/tickets/post_update",
            RequestOptions::post()
                .query("ticket", "AB-1")
                .form("message", "Hello there & welcome"),
        )
        .await
        .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    let fields: Vec<(String, String)> = url::form_urlencoded::parse(&requests[0].body)
        .into_owned()
        .collect();
    assert_eq!(
        fields,
        vec![("message".to_string(), "Hello there & welcome".to_string())]
    );
}

#[tokio::test]
async fn test_dispatch_with_calls_back_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/tickets/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"reference": "AB-1"}])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (tx, rx) = oneshot::channel();
    let handle = client_for(&mock_server)
        .dispatch_with(
            "/api/v2/tickets/all",
            RequestOptions::get().query("page", 1),
            Some(move |result: Result<Value, SirportlyError>| {
                tx.send(result).ok();
            }),
        )
        .unwrap();

    handle.await.unwrap();
    let body = rx.await.unwrap().unwrap();
    assert_eq!(body[0]["reference"], "AB-1");
}

#[tokio::test]
async fn test_dispatch_with_reports_failure_through_callback() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "missing"})))
        .mount(&mock_server)
        .await;

    let (tx, rx) = oneshot::channel();
    client_for(&mock_server)
        .dispatch_with(
            "/api/v2/tickets/ticket",
            RequestOptions::new(),
            Some(move |result: Result<Value, SirportlyError>| {
                tx.send(result).ok();
            }),
        )
        .unwrap();

    let err = rx.await.unwrap().unwrap_err();
    assert_eq!(err.to_string(), "missing");
}

#[tokio::test]
async fn test_spawn_completion_wraps_any_operation() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/objects/teams"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"name": "Support"}])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let (tx, rx) = oneshot::channel();
    sirportly::spawn_completion(
        async move { client.teams().await },
        Some(move |result: Result<Value, SirportlyError>| {
            tx.send(result).ok();
        }),
    )
    .unwrap();

    let teams = rx.await.unwrap().unwrap();
    assert_eq!(teams[0]["name"], "Support");
}

#[tokio::test]
async fn test_connection_succeeds() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/objects/statuses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    client_for(&mock_server).test_connection().await.unwrap();
}

#[tokio::test]
async fn test_connection_reports_bad_credentials() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": "bad token tok123"})),
        )
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server).test_connection().await.unwrap_err();
    let message = err.to_string();

    assert!(matches!(err, SirportlyError::ConnectionTest { .. }));
    assert!(message.contains("authentication failed"));
    assert!(!message.contains("tok123"));
}
