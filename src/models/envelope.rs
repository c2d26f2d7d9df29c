//! The service's JSON error envelope.
//!
//! Failed responses carry either a single `error` message or an `errors`
//! collection. Success bodies are not modelled; they are handed to the
//! caller as raw JSON.

use reqwest::StatusCode;
use serde_json::Value;

use crate::error::{truncate_body, SirportlyError};

/// The error-bearing fields of a response body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorEnvelope {
    /// Singular `error` field.
    pub error: Option<Value>,

    /// Plural `errors` field.
    pub errors: Option<Value>,
}

impl ErrorEnvelope {
    /// Extracts the envelope fields from a decoded body.
    ///
    /// Null, `false` and empty-string values count as absent.
    pub fn from_body(body: &Value) -> Self {
        let field = |name: &str| body.get(name).filter(|v| is_present(v)).cloned();
        Self {
            error: field("error"),
            errors: field("errors"),
        }
    }

    /// Returns true if neither error shape is present.
    pub fn is_empty(&self) -> bool {
        self.error.is_none() && self.errors.is_none()
    }

    /// Converts the envelope of a failed response into an error.
    ///
    /// A singular `error` takes precedence over `errors`; with neither, the
    /// failure is reported from the status and raw body alone.
    pub fn into_error(self, status: StatusCode, raw_body: &str) -> SirportlyError {
        if let Some(error) = self.error {
            let message = match error {
                Value::String(s) => s,
                other => other.to_string(),
            };
            return SirportlyError::Remote { status, message };
        }

        if let Some(errors) = self.errors {
            return SirportlyError::RemoteErrors {
                status,
                errors,
                body: truncate_body(raw_body),
            };
        }

        SirportlyError::RemoteStatus {
            status,
            body: truncate_body(raw_body),
        }
    }
}

fn is_present(value: &Value) -> bool {
    !matches!(value, Value::Null | Value::Bool(false))
        && value.as_str().map_or(true, |s| !s.is_empty())
}
