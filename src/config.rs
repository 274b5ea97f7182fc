//! Bridge configuration and its builder.
//!
//! Provides a fluent API for configuring and validating a [`Bridge`].
//! All validation happens in [`BridgeBuilder::build`], before any network
//! attempt.
//!
//! # Example
//!
//! ```no_run
//! use ws_stdio_bridge::Bridge;
//!
//! # fn example() -> ws_stdio_bridge::Result<()> {
//! let bridge = Bridge::builder()
//!     .address("wss://example.com/mcp")
//!     .headers_json(r#"{"Authorization": "Bearer token"}"#)
//!     .log_messages("/tmp/messages.log")
//!     .build()?;
//! # Ok(())
//! # }
//! ```
//!
//! [`Bridge`]: crate::Bridge

// ============================================================================
// Imports
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use rustc_hash::FxHashMap;
use serde_json::{Value, from_str};
use tokio_tungstenite::tungstenite::http::{HeaderName, HeaderValue};
use url::Url;

use crate::bridge::Bridge;
use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Default wait before retrying a stalled stdin read.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(100);

// ============================================================================
// Headers
// ============================================================================

/// Extra HTTP headers sent with the WebSocket handshake.
///
/// Names are case-insensitive and stored lowercased, so inserting
/// `authorization` replaces an earlier `Authorization`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(FxHashMap<String, String>);

impl Headers {
    /// Creates an empty header set.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses headers from a JSON object of string values.
    ///
    /// # Errors
    ///
    /// - [`Error::Json`] if `json` is not valid JSON
    /// - [`Error::Config`] if it is not an object of strings
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = from_str(json)?;

        let Value::Object(map) = value else {
            return Err(Error::config("headers must be a JSON object"));
        };

        let mut headers = Self::new();
        for (name, value) in map {
            let Value::String(value) = value else {
                return Err(Error::config(format!(
                    "header '{name}' must have a string value"
                )));
            };
            headers.insert(name, value);
        }

        Ok(headers)
    }

    /// Adds or replaces a header.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let mut name = name.into();
        name.make_ascii_lowercase();
        self.0.insert(name, value.into());
    }

    /// Returns the value for `name`, if set.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Returns the number of headers.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no headers are set.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over header name/value pairs, names lowercased.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Converts every header into its HTTP representation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a name or value is not valid in HTTP.
    pub fn to_http(&self) -> Result<Vec<(HeaderName, HeaderValue)>> {
        self.0
            .iter()
            .map(|(name, value)| {
                let header_name = HeaderName::from_bytes(name.as_bytes())
                    .map_err(|e| Error::config(format!("invalid header name '{name}': {e}")))?;
                let header_value = HeaderValue::from_str(value)
                    .map_err(|e| Error::config(format!("invalid value for header '{name}': {e}")))?;
                Ok((header_name, header_value))
            })
            .collect()
    }
}

// ============================================================================
// BridgeConfig
// ============================================================================

/// Validated bridge configuration.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// WebSocket endpoint.
    pub address: Url,
    /// Extra handshake headers.
    pub headers: Headers,
    /// Message log file, if logging is enabled.
    pub log_path: Option<PathBuf>,
    /// Keep reading inbound messages after stdin ends.
    pub drain_on_eof: bool,
    /// Wait before retrying a stalled stdin read.
    pub retry_delay: Duration,
}

// ============================================================================
// BridgeBuilder
// ============================================================================

/// Builder for configuring a [`Bridge`] instance.
///
/// Use [`Bridge::builder()`] to create a new builder.
#[derive(Debug, Default, Clone)]
pub struct BridgeBuilder {
    address: Option<String>,
    headers_json: Option<String>,
    headers: Headers,
    log_path: Option<PathBuf>,
    drain_on_eof: bool,
    retry_delay: Option<Duration>,
}

impl BridgeBuilder {
    /// Creates a new builder with no configuration.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the WebSocket URL to connect to.
    #[inline]
    #[must_use]
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Sets handshake headers from a JSON object string.
    ///
    /// Parsed during [`build`](Self::build).
    #[inline]
    #[must_use]
    pub fn headers_json(mut self, json: impl Into<String>) -> Self {
        self.headers_json = Some(json.into());
        self
    }

    /// Adds a single handshake header.
    ///
    /// Takes precedence over the same name in [`headers_json`](Self::headers_json).
    #[inline]
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Enables message logging to `path`.
    #[inline]
    #[must_use]
    pub fn log_messages(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    /// Keeps the output side running after stdin ends.
    ///
    /// The bridge sends a Close frame and waits for the peer to finish.
    #[inline]
    #[must_use]
    pub fn drain_on_eof(mut self, drain: bool) -> Self {
        self.drain_on_eof = drain;
        self
    }

    /// Sets the backoff used when stdin has no data yet.
    #[inline]
    #[must_use]
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = Some(delay);
        self
    }

    /// Validates and returns the configuration.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if no address is set or headers are invalid
    /// - [`Error::Json`] if the header JSON is malformed
    /// - [`Error::InvalidUrl`] if the address is not a `ws`/`wss` URL
    pub fn build_config(self) -> Result<BridgeConfig> {
        let address = self.validate_address()?;
        let headers = self.validate_headers()?;

        Ok(BridgeConfig {
            address,
            headers,
            log_path: self.log_path,
            drain_on_eof: self.drain_on_eof,
            retry_delay: self.retry_delay.unwrap_or(DEFAULT_RETRY_DELAY),
        })
    }

    /// Validates the configuration and builds the bridge.
    ///
    /// # Errors
    ///
    /// See [`build_config`](Self::build_config).
    pub fn build(self) -> Result<Bridge> {
        self.build_config().map(Bridge::new)
    }

    fn validate_address(&self) -> Result<Url> {
        let raw = self
            .address
            .as_deref()
            .ok_or_else(|| Error::config("WebSocket address is required"))?;

        let url = Url::parse(raw).map_err(|e| Error::invalid_url(raw, e.to_string()))?;

        match url.scheme() {
            "ws" | "wss" => {}
            other => {
                return Err(Error::invalid_url(
                    raw,
                    format!("unsupported scheme '{other}', expected ws or wss"),
                ));
            }
        }

        if url.host_str().is_none() {
            return Err(Error::invalid_url(raw, "missing host"));
        }

        Ok(url)
    }

    fn validate_headers(&self) -> Result<Headers> {
        let mut headers = match &self.headers_json {
            Some(json) => Headers::from_json(json)?,
            None => Headers::new(),
        };

        for (name, value) in self.headers.iter() {
            headers.insert(name, value);
        }

        // Reject names/values the handshake request would refuse.
        headers.to_http()?;

        Ok(headers)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_minimal() {
        let config = BridgeBuilder::new()
            .address("ws://localhost:9999/echo")
            .build_config()
            .expect("valid config");

        assert_eq!(config.address.as_str(), "ws://localhost:9999/echo");
        assert!(config.headers.is_empty());
        assert!(config.log_path.is_none());
        assert!(!config.drain_on_eof);
        assert_eq!(config.retry_delay, DEFAULT_RETRY_DELAY);
    }

    #[test]
    fn test_builder_requires_address() {
        let err = BridgeBuilder::new().build_config().unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_builder_rejects_http_scheme() {
        let err = BridgeBuilder::new()
            .address("http://localhost:9999")
            .build_config()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidUrl { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_builder_rejects_garbage_url() {
        let err = BridgeBuilder::new()
            .address("not a url")
            .build_config()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidUrl { .. }));
    }

    #[test]
    fn test_builder_accepts_wss() {
        let config = BridgeBuilder::new()
            .address("wss://example.com/socket?token=abc")
            .build_config()
            .expect("valid config");
        assert_eq!(config.address.scheme(), "wss");
    }

    #[test]
    fn test_malformed_header_json() {
        let err = BridgeBuilder::new()
            .address("ws://localhost:9999")
            .headers_json("{bad json")
            .build_config()
            .unwrap_err();
        assert!(matches!(err, Error::Json(_)));
        assert!(err.is_config_error());
    }

    #[test]
    fn test_header_json_must_be_object() {
        let err = Headers::from_json("[\"Authorization\"]").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_header_values_must_be_strings() {
        let err = Headers::from_json(r#"{"X-Retry": 3}"#).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_invalid_header_name_rejected() {
        let err = BridgeBuilder::new()
            .address("ws://localhost:9999")
            .headers_json(r#"{"Bad Header": "x"}"#)
            .build_config()
            .unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_invalid_header_value_rejected() {
        let err = BridgeBuilder::new()
            .address("ws://localhost:9999")
            .header("X-Token", "line\nbreak")
            .build_config()
            .unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_headers_merge() {
        let config = BridgeBuilder::new()
            .address("ws://localhost:9999")
            .headers_json(r#"{"Authorization": "Bearer a", "X-Client": "cli"}"#)
            .header("Authorization", "Bearer b")
            .build_config()
            .expect("valid config");

        assert_eq!(config.headers.len(), 2);
        assert_eq!(config.headers.get("Authorization"), Some("Bearer b"));
        assert_eq!(config.headers.get("X-Client"), Some("cli"));
    }

    #[test]
    fn test_header_names_ignore_case() {
        let config = BridgeBuilder::new()
            .address("ws://localhost:9999")
            .headers_json(r#"{"Authorization": "from-json", "X-Token": "from-json"}"#)
            .header("authorization", "from-builder")
            .header("x-TOKEN", "from-builder")
            .build_config()
            .expect("valid config");

        assert_eq!(config.headers.len(), 2);
        assert_eq!(config.headers.get("AUTHORIZATION"), Some("from-builder"));
        assert_eq!(config.headers.get("x-token"), Some("from-builder"));

        let http = config.headers.to_http().expect("valid headers");
        assert_eq!(http.len(), 2);
        assert!(http.iter().all(|(_, value)| value == "from-builder"));
    }

    #[test]
    fn test_json_keys_differing_in_case_collapse() {
        let headers = Headers::from_json(r#"{"X-A": "1", "x-a": "2"}"#).expect("valid json");
        assert_eq!(headers.len(), 1);
        assert!(headers.get("X-A").is_some());
    }

    #[test]
    fn test_options_carried() {
        let config = BridgeBuilder::new()
            .address("ws://localhost:9999")
            .log_messages("/tmp/bridge.log")
            .drain_on_eof(true)
            .retry_delay(Duration::from_millis(5))
            .build_config()
            .expect("valid config");

        assert_eq!(config.log_path, Some(PathBuf::from("/tmp/bridge.log")));
        assert!(config.drain_on_eof);
        assert_eq!(config.retry_delay, Duration::from_millis(5));
    }
}
