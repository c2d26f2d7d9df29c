//! Configuration for the Sirportly client.
//!
//! Callers describe the connection with [`ClientOptions`], a bag of optional
//! settings that can be filled programmatically, deserialized, or loaded from
//! environment variables. [`ClientOptions::build`] merges it over the defaults
//! and validates it into an immutable [`Config`].

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use reqwest::header::HeaderValue;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::SirportlyError;

/// Default protocol used when none is configured.
pub const DEFAULT_PROTOCOL: Protocol = Protocol::Http;

/// Default port used when none is configured.
pub const DEFAULT_PORT: u16 = 80;

const ENV_TOKEN: &str = "SIRPORTLY_TOKEN";
const ENV_SECRET: &str = "SIRPORTLY_SECRET";
const ENV_SERVER: &str = "SIRPORTLY_SERVER";
const ENV_PROTOCOL: &str = "SIRPORTLY_PROTOCOL";
const ENV_PORT: &str = "SIRPORTLY_PORT";
const ENV_TIMEOUT_SECS: &str = "SIRPORTLY_TIMEOUT_SECS";

/// URL scheme used to reach the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// Plain HTTP.
    #[default]
    Http,
    /// HTTP over TLS.
    Https,
}

impl Protocol {
    /// Returns the scheme as it appears in a URL.
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = SirportlyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Protocol::Http),
            "https" => Ok(Protocol::Https),
            other => Err(SirportlyError::invalid_config(format!(
                "protocol must be \"http\" or \"https\", got {:?}",
                other
            ))),
        }
    }
}

/// Caller-supplied connection options.
///
/// Every field is optional here; missing values fall back to the defaults
/// (`protocol = http`, `port = 80`, no timeout) and the required ones
/// (`token`, `secret`, `server`) are checked by [`ClientOptions::build`].
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClientOptions {
    /// API token, sent as `X-Auth-Token`.
    pub token: Option<String>,

    /// API secret, sent as `X-Auth-Secret`.
    pub secret: Option<String>,

    /// Hostname of the Sirportly installation (no scheme, no path).
    pub server: Option<String>,

    /// URL scheme, `http` or `https`.
    pub protocol: Option<Protocol>,

    /// TCP port.
    pub port: Option<u16>,

    /// Optional transport timeout, in seconds.
    pub timeout_secs: Option<u64>,
}

impl ClientOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the API secret.
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    /// Sets the server hostname.
    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = Some(server.into());
        self
    }

    /// Sets the URL scheme.
    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = Some(protocol);
        self
    }

    /// Sets the TCP port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets a transport timeout.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Loads options from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SIRPORTLY_TOKEN`, `SIRPORTLY_SECRET`, `SIRPORTLY_SERVER`
    /// - `SIRPORTLY_PROTOCOL` (optional, `http` or `https`)
    /// - `SIRPORTLY_PORT` (optional)
    /// - `SIRPORTLY_TIMEOUT_SECS` (optional)
    ///
    /// Missing variables are left unset; call [`build`](Self::build) to
    /// validate.
    ///
    /// # Errors
    ///
    /// Returns `SirportlyError::Config` if an optional variable is present
    /// but unparseable.
    pub fn from_env() -> Result<Self, SirportlyError> {
        let protocol = read_env(ENV_PROTOCOL)
            .map(|p| p.parse::<Protocol>())
            .transpose()?;

        let port = read_env(ENV_PORT)
            .map(|p| {
                p.trim().parse::<u16>().map_err(|_| {
                    SirportlyError::invalid_config(format!("{} must be a port number", ENV_PORT))
                })
            })
            .transpose()?;

        let timeout_secs = read_env(ENV_TIMEOUT_SECS)
            .map(|t| {
                t.trim().parse::<u64>().map_err(|_| {
                    SirportlyError::invalid_config(format!(
                        "{} must be a whole number of seconds",
                        ENV_TIMEOUT_SECS
                    ))
                })
            })
            .transpose()?;

        Ok(Self {
            token: read_env(ENV_TOKEN),
            secret: read_env(ENV_SECRET),
            server: read_env(ENV_SERVER),
            protocol,
            port,
            timeout_secs,
        })
    }

    /// Merges these options over the defaults and validates the result.
    ///
    /// # Errors
    ///
    /// Returns `SirportlyError::Config` if `token`, `secret` or `server` is
    /// missing or blank, if a credential looks like a placeholder, or if the
    /// server and port do not form a valid endpoint.
    pub fn build(self) -> Result<Config, SirportlyError> {
        let token = required(self.token, "token")?;
        let secret = required(self.secret, "secret")?;
        let server = required(self.server, "server")?;

        Config::validate_credential(&token, "token")?;
        Config::validate_credential(&secret, "secret")?;

        let protocol = self.protocol.unwrap_or(DEFAULT_PROTOCOL);
        let port = self.port.unwrap_or(DEFAULT_PORT);
        let server = Config::validate_server(&server, protocol, port)?;

        let timeout = match self.timeout_secs {
            Some(0) => {
                return Err(SirportlyError::invalid_config(
                    "timeout must be at least one second",
                ))
            }
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };

        Ok(Config {
            token,
            secret,
            server,
            protocol,
            port,
            timeout,
        })
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .field("server", &self.server)
            .field("protocol", &self.protocol)
            .field("port", &self.port)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Validated, immutable connection settings.
///
/// Only obtainable through [`ClientOptions::build`] (or
/// [`Config::from_env`]), so every instance has non-blank credentials and a
/// well-formed endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    token: String,
    secret: String,
    server: String,
    protocol: Protocol,
    port: u16,
    timeout: Option<Duration>,
}

impl Config {
    /// Loads and validates configuration from environment variables.
    ///
    /// # Example
    ///
    /// ```ignore
    /// dotenvy::dotenv().ok();
    /// let config = Config::from_env()?;
    /// ```
    pub fn from_env() -> Result<Self, SirportlyError> {
        ClientOptions::from_env()?.build()
    }

    /// API token. Never log this value.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// API secret. Never log this value.
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Server hostname.
    pub fn server(&self) -> &str {
        &self.server
    }

    /// URL scheme.
    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// TCP port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Transport timeout, if one was configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns `protocol://server:port`, the prefix of every request URL.
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.server, self.port)
    }

    /// Validates that a credential is not a placeholder value.
    fn validate_credential(value: &str, name: &str) -> Result<(), SirportlyError> {
        let lower = value.to_lowercase();
        let placeholder_patterns = [
            "your_token",
            "your_secret",
            "your-token",
            "your-secret",
            "placeholder",
            "changeme",
        ];

        if placeholder_patterns.iter().any(|p| lower.contains(p)) {
            return Err(SirportlyError::invalid_config(format!(
                "{} appears to be a placeholder value",
                name
            )));
        }

        // Sent verbatim as a header, so it must be a legal header value.
        if HeaderValue::from_str(value).is_err() {
            return Err(SirportlyError::invalid_config(format!(
                "{} contains characters that cannot be sent in a header",
                name
            )));
        }

        Ok(())
    }

    /// Validates the server as a bare host and normalizes it.
    fn validate_server(server: &str, protocol: Protocol, port: u16) -> Result<String, SirportlyError> {
        if port == 0 {
            return Err(SirportlyError::invalid_config("port must be non-zero"));
        }

        if server.contains("://") {
            return Err(SirportlyError::invalid_config(
                "server must be a hostname without a scheme; use the protocol option",
            ));
        }

        let endpoint = format!("{}://{}:{}", protocol, server, port);
        let parsed = Url::parse(&endpoint).map_err(|e| {
            SirportlyError::invalid_config(format!("invalid server {:?}: {}", server, e))
        })?;

        if parsed.host_str().is_none()
            || parsed.path() != "/"
            || parsed.query().is_some()
            || parsed.fragment().is_some()
            || !parsed.username().is_empty()
        {
            return Err(SirportlyError::invalid_config(format!(
                "server must be a bare hostname, got {:?}",
                server
            )));
        }

        Ok(server.to_string())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &"[REDACTED]")
            .field("secret", &"[REDACTED]")
            .field("server", &self.server)
            .field("protocol", &self.protocol)
            .field("port", &self.port)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Reads an environment variable, treating blank values as unset.
fn read_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Unwraps a required option, rejecting missing or blank values.
fn required(value: Option<String>, name: &str) -> Result<String, SirportlyError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| SirportlyError::missing_option(name))
}
