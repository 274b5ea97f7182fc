//! Error types for the stdio bridge.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use ws_stdio_bridge::{Bridge, Result};
//!
//! async fn example() -> Result<()> {
//!     let bridge = Bridge::builder().address("ws://localhost:9999").build()?;
//!     bridge.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants | Exit code |
//! |----------|----------|-----------|
//! | Configuration | [`Error::Config`], [`Error::InvalidUrl`], [`Error::Json`] | 2 |
//! | Connection | [`Error::Connection`] | 1 |
//! | Transfer | [`Error::Transfer`], [`Error::Output`], [`Error::ConnectionClosed`] | 1 |
//! | External | [`Error::Io`] | 1 |

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::result::Result as StdResult;

use thiserror::Error;

use crate::line::Direction;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when the bridge configuration is invalid, such as malformed
    /// header JSON. Always raised before any network attempt.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// Target address is not a usable WebSocket URL.
    #[error("Invalid WebSocket URL '{url}': {message}")]
    InvalidUrl {
        /// The rejected address.
        url: String,
        /// Why it was rejected.
        message: String,
    },

    // ========================================================================
    // Connection Errors
    // ========================================================================
    /// WebSocket connection failed.
    ///
    /// Returned when DNS, TCP, TLS or the WebSocket handshake fails.
    #[error("WebSocket connection error: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },

    // ========================================================================
    // Transfer Errors
    // ========================================================================
    /// Mid-session read or write failure.
    #[error("Error {verb} WebSocket: {message}", verb = transfer_verb(.direction))]
    Transfer {
        /// Which pump hit the failure.
        direction: Direction,
        /// Description of the failure.
        message: String,
    },

    /// Writing to standard output failed.
    #[error("Error writing to stdout: {message}")]
    Output {
        /// Description of the failure.
        message: String,
    },

    /// WebSocket connection closed while a send was attempted.
    #[error("Connection closed")]
    ConnectionClosed,

    // ========================================================================
    // External Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON parse error.
    #[error("Error parsing headers JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn transfer_verb(direction: &Direction) -> &'static str {
    match direction {
        Direction::Sent => "sending to",
        Direction::Received => "receiving from",
    }
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an invalid URL error.
    #[inline]
    pub fn invalid_url(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates a connection error.
    #[inline]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a transfer error for the given direction.
    #[inline]
    pub fn transfer(direction: Direction, message: impl Into<String>) -> Self {
        Self::Transfer {
            direction,
            message: message.into(),
        }
    }

    /// Creates a standard output write error.
    #[inline]
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this error was raised before any network action.
    #[inline]
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::Config { .. } | Self::InvalidUrl { .. } | Self::Json(_)
        )
    }

    /// Returns `true` if this is a connection setup error.
    #[inline]
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }

    /// Returns `true` if this error happened mid-session.
    #[inline]
    #[must_use]
    pub fn is_transfer_error(&self) -> bool {
        matches!(
            self,
            Self::Transfer { .. } | Self::Output { .. } | Self::ConnectionClosed | Self::Io(_)
        )
    }

    /// Process exit code for this error.
    ///
    /// Configuration errors exit with 2, everything else with 1.
    #[inline]
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        if self.is_config_error() { 2 } else { 1 }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::ErrorKind;

    #[test]
    fn test_error_display() {
        let err = Error::connection("connection refused");
        assert_eq!(
            err.to_string(),
            "WebSocket connection error: connection refused"
        );
    }

    #[test]
    fn test_transfer_display() {
        let sent = Error::transfer(Direction::Sent, "broken pipe");
        let received = Error::transfer(Direction::Received, "reset");

        assert_eq!(sent.to_string(), "Error sending to WebSocket: broken pipe");
        assert_eq!(
            received.to_string(),
            "Error receiving from WebSocket: reset"
        );
    }

    #[test]
    fn test_output_display() {
        let err = Error::output("Broken pipe (os error 32)");
        assert_eq!(err.to_string(), "Error writing to stdout: Broken pipe (os error 32)");
        assert!(err.is_transfer_error());
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_config_error() {
        let err = Error::config("headers must be a JSON object");
        assert!(err.is_config_error());
        assert!(!err.is_connection_error());
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_json_error_is_config() {
        let json_err = serde_json::from_str::<serde_json::Value>("{bad json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
        assert!(err.is_config_error());
        assert!(err.to_string().starts_with("Error parsing headers JSON"));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(Error::invalid_url("http://x", "bad scheme").exit_code(), 2);
        assert_eq!(Error::connection("refused").exit_code(), 1);
        assert_eq!(Error::ConnectionClosed.exit_code(), 1);
        assert_eq!(Error::transfer(Direction::Sent, "x").exit_code(), 1);
    }

    #[test]
    fn test_from_io_error() {
        let io_err = IoError::new(ErrorKind::BrokenPipe, "stdout closed");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.is_transfer_error());
    }
}
