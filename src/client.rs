//! HTTP client for the Sirportly API.
//!
//! This module provides [`Client`], which owns the validated configuration,
//! and the single dispatch routine every operation goes through: build the
//! URL, inject the auth headers, merge the caller's options, send, classify
//! the response.
//!
//! # Response classification
//!
//! | status        | body                      | result                        |
//! |---------------|---------------------------|-------------------------------|
//! | 2xx           | JSON (or empty)           | `Ok(body)`                    |
//! | other         | `{"error": ...}`          | `SirportlyError::Remote`       |
//! | other         | `{"errors": ...}`         | `SirportlyError::RemoteErrors` |
//! | other         | anything else / empty     | `SirportlyError::RemoteStatus` |
//! | any           | not JSON                  | `SirportlyError::Decode`       |
//!
//! No request is ever retried.
//!
//! # Security
//!
//! The token and secret are sent as sensitive headers and never logged.

use std::future::Future;
use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::StatusCode;
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::config::{ClientOptions, Config};
use crate::error::SirportlyError;
use crate::models::{ErrorEnvelope, ObjectKind, RequestOptions};

/// Path prefix shared by every API endpoint.
pub const API_PREFIX: &str = "/api/v2";

/// Header carrying the API token (`X-Auth-Token`).
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Header carrying the API secret (`X-Auth-Secret`).
pub const AUTH_SECRET_HEADER: &str = "x-auth-secret";

/// Client for the Sirportly API.
///
/// Cloning is cheap; clones share the configuration and connection pool.
///
/// # Example
///
/// ```ignore
/// let client = Client::new(
///     ClientOptions::new()
///         .with_token("token")
///         .with_secret("secret")
///         .with_server("support.example.com"),
/// )?;
///
/// let ticket = client.ticket("AB-123456").await?;
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    /// The underlying HTTP client.
    http: reqwest::Client,

    /// Immutable connection settings.
    /// SECURITY: holds the token and secret. Never log them!
    config: Config,
}

impl Client {
    /// Creates a client from caller options merged over the defaults.
    ///
    /// # Errors
    ///
    /// Returns `SirportlyError::Config` if `token`, `secret` or `server` is
    /// missing, and `SirportlyError::HttpClient` if the HTTP client fails to
    /// initialize. Nothing touches the network.
    pub fn new(options: ClientOptions) -> Result<Self, SirportlyError> {
        let config = options.build()?;
        Self::from_config(config)
    }

    /// Creates a client from an already validated configuration.
    pub fn from_config(config: Config) -> Result<Self, SirportlyError> {
        let mut builder = reqwest::Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(SirportlyError::HttpClient)?;

        tracing::debug!(
            server = %config.server(),
            protocol = %config.protocol(),
            port = config.port(),
            "Sirportly client configured"
        );

        Ok(Self {
            inner: Arc::new(ClientInner { http, config }),
        })
    }

    /// Returns the configuration this client was built with.
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Strips the token and secret from a message.
    pub fn sanitize(&self, message: &str) -> String {
        let config = &self.inner.config;
        SirportlyError::sanitize_message(message, &[config.token(), config.secret()])
    }

    /// Builds the default header set: both credentials plus `Accept`.
    fn default_headers(&self) -> Result<HeaderMap, SirportlyError> {
        let config = &self.inner.config;
        let mut headers = HeaderMap::new();

        let mut token = HeaderValue::from_str(config.token())
            .map_err(|_| SirportlyError::invalid_config("token is not a valid header value"))?;
        token.set_sensitive(true);
        let mut secret = HeaderValue::from_str(config.secret())
            .map_err(|_| SirportlyError::invalid_config("secret is not a valid header value"))?;
        secret.set_sensitive(true);

        headers.insert(AUTH_TOKEN_HEADER, token);
        headers.insert(AUTH_SECRET_HEADER, secret);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Sends one request and classifies the response.
    ///
    /// `path` is appended to `protocol://server:port` as-is and must start
    /// with `/`. Caller headers are merged over the auth headers per key.
    ///
    /// # Errors
    ///
    /// - `Validation` for a bad path or header, before any I/O
    /// - `Transport` / `Timeout` when no response was received
    /// - `Decode` when the body is not JSON
    /// - `Remote`, `RemoteErrors`, `RemoteStatus` for non-2xx responses
    pub async fn dispatch(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Value, SirportlyError> {
        if !path.starts_with('/') {
            return Err(SirportlyError::validation(format!(
                "request path must start with '/', got {:?}",
                path
            )));
        }

        let url = format!("{}{}", self.inner.config.base_url(), path);
        let method = options.effective_method();
        let headers = options.merge_headers(self.default_headers()?)?;

        tracing::debug!(method = %method, path = %path, "Making Sirportly API request");

        let mut req = self.inner.http.request(method.clone(), &url).headers(headers);

        let query = options.query_string_params();
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(form) = options.form_body() {
            req = req.form(form);
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                return SirportlyError::Timeout {
                    operation: format!("{} {}", method, path),
                };
            }
            SirportlyError::Transport(e)
        })?;
        let status = response.status();

        tracing::debug!(status = status.as_u16(), path = %path, "Sirportly API response");

        let body = response.text().await.map_err(SirportlyError::Transport)?;

        tracing::trace!(body = %self.sanitize(&body), "Sirportly API response body");

        classify_response(status, &body).inspect_err(|e| {
            if e.is_remote() {
                tracing::warn!(
                    status = status.as_u16(),
                    path = %path,
                    error = %self.sanitize(&e.to_string()),
                    "Sirportly API request failed"
                );
            }
        })
    }

    /// Callback form of [`dispatch`](Self::dispatch).
    ///
    /// Returns as soon as the request is spawned; `on_complete` runs exactly
    /// once with the outcome.
    ///
    /// # Errors
    ///
    /// Fails synchronously, before any I/O, with
    /// `SirportlyError::InvalidCallback` when `on_complete` is `None`, or
    /// `SirportlyError::Runtime` when called outside a Tokio runtime.
    pub fn dispatch_with<F>(
        &self,
        path: impl Into<String>,
        options: RequestOptions,
        on_complete: Option<F>,
    ) -> Result<JoinHandle<()>, SirportlyError>
    where
        F: FnOnce(Result<Value, SirportlyError>) + Send + 'static,
    {
        let client = self.clone();
        let path = path.into();
        spawn_completion(
            async move { client.dispatch(&path, options).await },
            on_complete,
        )
    }

    /// Tests connectivity and credentials by listing ticket statuses.
    ///
    /// # Errors
    ///
    /// Returns `SirportlyError::ConnectionTest` with a sanitized, actionable
    /// message.
    pub async fn test_connection(&self) -> Result<(), SirportlyError> {
        tracing::debug!("Testing connection to Sirportly server");

        match self.objects(ObjectKind::Statuses).await {
            Ok(_) => {
                tracing::info!("Connection test successful");
                Ok(())
            }
            Err(e) if matches!(e.status(), Some(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)) => {
                Err(SirportlyError::connection_test(format!(
                    "authentication failed ({}) - verify the token and secret",
                    self.sanitize(&e.to_string())
                )))
            }
            Err(SirportlyError::Timeout { .. }) => Err(SirportlyError::connection_test(
                "connection timed out - verify the server and port are reachable",
            )),
            Err(e @ SirportlyError::Transport(_)) => Err(SirportlyError::connection_test(format!(
                "{} - verify the server, protocol and port",
                self.sanitize(&e.to_string())
            ))),
            Err(e) => Err(SirportlyError::connection_test(self.sanitize(&e.to_string()))),
        }
    }
}

/// Runs `future` on the current Tokio runtime and hands its result to
/// `on_complete`, exactly once.
///
/// This is how any operation gets the callback contract:
///
/// ```ignore
/// let c = client.clone();
/// spawn_completion(async move { c.ticket("AB-1").await }, Some(|result| { /* ... */ }))?;
/// ```
///
/// # Errors
///
/// `SirportlyError::InvalidCallback` when `on_complete` is `None`;
/// `SirportlyError::Runtime` outside a Tokio runtime. Neither starts the
/// future.
pub fn spawn_completion<T, Fut, F>(
    future: Fut,
    on_complete: Option<F>,
) -> Result<JoinHandle<()>, SirportlyError>
where
    T: Send + 'static,
    Fut: Future<Output = Result<T, SirportlyError>> + Send + 'static,
    F: FnOnce(Result<T, SirportlyError>) + Send + 'static,
{
    let on_complete = on_complete.ok_or(SirportlyError::InvalidCallback)?;
    let runtime = Handle::try_current().map_err(|e| SirportlyError::Runtime(e.to_string()))?;
    Ok(runtime.spawn(async move { on_complete(future.await) }))
}

/// Joins [`API_PREFIX`] and an endpoint suffix.
pub(crate) fn api_path(suffix: &str) -> String {
    format!("{}{}", API_PREFIX, suffix)
}

/// Turns a status and raw body into the dispatch result.
///
/// A blank body decodes as `null`, so an empty 2xx is a success and an empty
/// non-2xx falls through to `RemoteStatus`.
pub(crate) fn classify_response(status: StatusCode, body: &str) -> Result<Value, SirportlyError> {
    let decoded = if body.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(body).map_err(|source| SirportlyError::Decode { status, source })?
    };

    if status.is_success() {
        return Ok(decoded);
    }

    Err(ErrorEnvelope::from_body(&decoded).into_error(status, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_client() -> Client {
        Client::new(
            ClientOptions::new()
                .with_token("tok123")
                .with_secret("sec456")
                .with_server("support.example.com"),
        )
        .unwrap()
    }

    #[test]
    fn test_classify_success_passes_body_through() {
        let result = classify_response(StatusCode::OK, r#"{"foo":"bar"}"#).unwrap();
        assert_eq!(result, json!({"foo": "bar"}));
    }

    #[test]
    fn test_classify_success_with_error_field_is_still_success() {
        let result = classify_response(StatusCode::CREATED, r#"{"error":"ignored"}"#).unwrap();
        assert_eq!(result["error"], "ignored");
    }

    #[test]
    fn test_classify_empty_success() {
        assert_eq!(classify_response(StatusCode::NO_CONTENT, "").unwrap(), Value::Null);
    }

    #[test]
    fn test_classify_single_error() {
        let err = classify_response(StatusCode::NOT_FOUND, r#"{"error":"not found"}"#).unwrap_err();
        assert_eq!(err.to_string(), "not found");
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    }

    #[test]
    fn test_classify_multiple_errors() {
        let err = classify_response(StatusCode::INTERNAL_SERVER_ERROR, r#"{"errors":["a","b"]}"#)
            .unwrap_err();
        assert!(matches!(err, SirportlyError::RemoteErrors { .. }));
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn test_classify_unrecognized_failure() {
        let err = classify_response(StatusCode::BAD_REQUEST, r#"{"status":"nope"}"#).unwrap_err();
        assert!(matches!(err, SirportlyError::RemoteStatus { status, .. } if status == StatusCode::BAD_REQUEST));

        let err = classify_response(StatusCode::UNAUTHORIZED, "").unwrap_err();
        assert!(matches!(err, SirportlyError::RemoteStatus { .. }));
    }

    #[test]
    fn test_classify_redirect_is_failure() {
        let err = classify_response(StatusCode::MULTIPLE_CHOICES, "{}").unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::MULTIPLE_CHOICES));
    }

    #[test]
    fn test_classify_invalid_json() {
        let err = classify_response(StatusCode::OK, "<html>oops</html>").unwrap_err();
        assert!(matches!(err, SirportlyError::Decode { status, .. } if status == StatusCode::OK));
    }

    #[test]
    fn test_api_path() {
        assert_eq!(api_path("/tickets/all"), "/api/v2/tickets/all");
    }

    #[test]
    fn test_default_headers_carry_credentials() {
        let headers = test_client().default_headers().unwrap();
        assert_eq!(headers.get(AUTH_TOKEN_HEADER).unwrap(), "tok123");
        assert_eq!(headers.get(AUTH_SECRET_HEADER).unwrap(), "sec456");
        assert!(headers.get(AUTH_TOKEN_HEADER).unwrap().is_sensitive());
    }

    #[test]
    fn test_config_accessor() {
        let client = test_client();
        assert_eq!(client.config().server(), "support.example.com");
        assert_eq!(client.config().port(), 80);
    }

    #[test]
    fn test_sanitize_strips_both_credentials() {
        let client = test_client();
        assert_eq!(client.sanitize("tok123/sec456"), "[REDACTED]/[REDACTED]");
    }

    #[test]
    fn test_dispatch_with_requires_callback() {
        let err = test_client()
            .dispatch_with(
                "/api/v2/tickets/all",
                RequestOptions::new(),
                None::<fn(Result<Value, SirportlyError>)>,
            )
            .unwrap_err();
        assert!(matches!(err, SirportlyError::InvalidCallback));
    }

    #[test]
    fn test_dispatch_with_outside_runtime() {
        let err = test_client()
            .dispatch_with("/api/v2/tickets/all", RequestOptions::new(), Some(|_| {}))
            .unwrap_err();
        assert!(matches!(err, SirportlyError::Runtime(_)));
    }

    #[tokio::test]
    async fn test_dispatch_rejects_relative_path() {
        let err = test_client()
            .dispatch("api/v2/tickets/all", RequestOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, SirportlyError::Validation(_)));
    }
}
