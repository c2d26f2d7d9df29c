//! Per-call request options.
//!
//! A [`RequestOptions`] value describes everything a caller may change about
//! one dispatched request: the HTTP method, extra headers, query parameters
//! and form-body parameters. It is built fresh for every call.

use std::collections::BTreeMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::error::SirportlyError;

/// Ordered string parameters, encoded as a query string or form body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, replacing any previous value for the key.
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts a parameter, replacing any previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        self.0.insert(key.into(), value.to_string());
    }

    /// Copies every parameter of `other` into this set; `other` wins on
    /// conflicting keys.
    pub fn merge(&mut self, other: Params) {
        self.0.extend(other.0);
    }

    /// Returns the value for a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Returns true if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over parameters in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: ToString,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

impl<'de> Deserialize<'de> for Params {
    /// Accepts any JSON object; non-string values are stored as their JSON text.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let map = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
        Ok(map
            .into_iter()
            .map(|(k, v)| match v {
                serde_json::Value::String(s) => (k, s),
                other => (k, other.to_string()),
            })
            .collect())
    }
}

/// Options for a single dispatched request.
///
/// Anything left unset keeps the dispatcher default: `GET`, no query string,
/// no body, and only the authentication headers.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    method: Option<Method>,
    headers: Vec<(String, String)>,
    query: Params,
    form: Option<Params>,
}

impl RequestOptions {
    /// Creates options that keep every default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for `RequestOptions::new().method(Method::GET)`.
    pub fn get() -> Self {
        Self::new().method(Method::GET)
    }

    /// Shorthand for `RequestOptions::new().method(Method::POST)`.
    pub fn post() -> Self {
        Self::new().method(Method::POST)
    }

    /// Overrides the HTTP method.
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Adds a header. Merged over the defaults per key, so setting an
    /// unrelated header never drops authentication.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Adds one query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.insert(key, value);
        self
    }

    /// Adds a set of query parameters.
    pub fn query_params(mut self, params: Params) -> Self {
        self.query.merge(params);
        self
    }

    /// Adds one form-body field.
    pub fn form(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.form.get_or_insert_with(Params::new).insert(key, value);
        self
    }

    /// Adds a set of form-body fields.
    pub fn form_params(mut self, params: Params) -> Self {
        self.form.get_or_insert_with(Params::new).merge(params);
        self
    }

    /// The effective HTTP method.
    pub fn effective_method(&self) -> Method {
        self.method.clone().unwrap_or(Method::GET)
    }

    /// Query parameters.
    pub fn query_string_params(&self) -> &Params {
        &self.query
    }

    /// Form-body fields, if a body was requested.
    pub fn form_body(&self) -> Option<&Params> {
        self.form.as_ref()
    }

    /// Merges the caller's headers over `defaults`.
    ///
    /// Keys are compared case-insensitively; the caller's value wins for a
    /// key it sets, and every other default survives.
    ///
    /// # Errors
    ///
    /// Returns `SirportlyError::Validation` for a malformed header name or value.
    pub fn merge_headers(&self, mut defaults: HeaderMap) -> Result<HeaderMap, SirportlyError> {
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
                SirportlyError::validation(format!("invalid header name: {:?}", name))
            })?;
            let value = HeaderValue::from_str(value).map_err(|_| {
                SirportlyError::validation(format!("invalid value for header {}", name))
            })?;
            defaults.insert(name, value);
        }
        Ok(defaults)
    }
}
