//! Error types for the Sirportly client.
//!
//! This module defines `SirportlyError`, the single error type every client
//! operation resolves to. Remote failures are classified from the HTTP status
//! and the service's JSON error envelope; everything else is either a local
//! guard (configuration, validation, callback) or a transport failure.
//!
//! # Security
//!
//! The auth token and secret must never appear in logs or surfaced messages.
//! Use `sanitize_message()` on any text that may echo request data.

use reqwest::StatusCode;
use thiserror::Error;

/// Maximum length kept from a raw response body inside an error.
pub(crate) const MAX_ERROR_BODY_LEN: usize = 500;

/// Unified error type for all Sirportly operations.
#[derive(Error, Debug)]
pub enum SirportlyError {
    /// Configuration error - missing or invalid credentials or endpoint.
    #[error("configuration error: {0}")]
    Config(String),

    /// A completion handler was required but none was supplied.
    #[error("a completion handler is required to dispatch a request")]
    InvalidCallback,

    /// Callback-style dispatch was attempted outside a Tokio runtime.
    #[error("runtime error: {0}")]
    Runtime(String),

    /// HTTP client initialization failed.
    #[error("HTTP client error: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// The request never produced a response (connection, DNS, TLS, ...).
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The transport gave up waiting for a response.
    #[error("request timed out: {operation}")]
    Timeout {
        /// The operation that timed out, as `METHOD path`.
        operation: String,
    },

    /// The response body was not valid JSON.
    #[error("could not decode response body (HTTP {status}): {source}")]
    Decode {
        /// Status code of the undecodable response.
        status: StatusCode,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The service rejected the request with a single `error` message.
    #[error("{message}")]
    Remote {
        /// Status code of the failed response.
        status: StatusCode,
        /// Message taken from the envelope's `error` field.
        message: String,
    },

    /// The service rejected the request with an `errors` collection.
    #[error("remote service returned errors (HTTP {status}): {body}")]
    RemoteErrors {
        /// Status code of the failed response.
        status: StatusCode,
        /// The decoded `errors` value, as sent by the service.
        errors: serde_json::Value,
        /// The raw response body, truncated.
        body: String,
    },

    /// Non-success status without a recognizable error envelope.
    #[error("HTTP {status}: {body}")]
    RemoteStatus {
        /// Status code of the failed response.
        status: StatusCode,
        /// The raw response body, truncated.
        body: String,
    },

    /// Input validation failed before any request was made.
    #[error("validation error: {0}")]
    Validation(String),

    /// Connection test failed.
    #[error("connection test failed: {message}")]
    ConnectionTest {
        /// Details about why the connection test failed.
        message: String,
    },
}

impl SirportlyError {
    /// Creates a configuration error for a missing option.
    pub fn missing_option(name: &str) -> Self {
        SirportlyError::Config(format!("missing required option: {}", name))
    }

    /// Creates a configuration error for an invalid value.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        SirportlyError::Config(message.into())
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        SirportlyError::Validation(message.into())
    }

    /// Creates a connection test error.
    pub fn connection_test(message: impl Into<String>) -> Self {
        SirportlyError::ConnectionTest {
            message: message.into(),
        }
    }

    /// Returns the HTTP status when the error was produced from a response.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            SirportlyError::Decode { status, .. }
            | SirportlyError::Remote { status, .. }
            | SirportlyError::RemoteErrors { status, .. }
            | SirportlyError::RemoteStatus { status, .. } => Some(*status),
            SirportlyError::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// Returns true if the service answered and reported a failure.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            SirportlyError::Remote { .. }
                | SirportlyError::RemoteErrors { .. }
                | SirportlyError::RemoteStatus { .. }
        )
    }

    /// Returns true if the request failed before reaching the service.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            SirportlyError::Transport(_) | SirportlyError::Timeout { .. }
        )
    }

    /// Replaces every occurrence of the given secrets with `[REDACTED]`.
    ///
    /// Empty secrets are skipped so an unset value cannot blank out the
    /// whole message.
    #[must_use]
    pub fn sanitize_message(message: &str, secrets: &[&str]) -> String {
        secrets
            .iter()
            .filter(|s| !s.is_empty())
            .fold(message.to_string(), |acc, secret| {
                acc.replace(secret, "[REDACTED]")
            })
    }

    /// Creates a sanitized version of this error's display message.
    #[must_use]
    pub fn sanitized_display(&self, secrets: &[&str]) -> String {
        Self::sanitize_message(&self.to_string(), secrets)
    }
}

/// Truncates a response body for inclusion in an error, on a char boundary.
pub(crate) fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LEN {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...[truncated]", &body[..end])
}
