//! Command-line surface.
//!
//! ```text
//! ws-stdio <ADDRESS> [-H <JSON>] [-d <PATH>] [--drain] [--retry-delay-ms <MS>]
//! ```
//!
//! Parsing only collects arguments; validation happens when the arguments
//! are turned into a [`Bridge`].

// ============================================================================
// Imports
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::bridge::Bridge;
use crate::config::BridgeBuilder;
use crate::error::Result;

// ============================================================================
// Cli
// ============================================================================

/// Connect local stdio to a remote WebSocket server.
#[derive(Debug, Clone, Parser)]
#[command(name = "ws-stdio")]
#[command(about = "Connect local stdio to a remote WebSocket server")]
#[command(version)]
pub struct Cli {
    /// WebSocket server URL (e.g., ws://example.com)
    pub address: String,

    /// Additional HTTP headers as JSON string (e.g., '{"Authorization": "Bearer token"}')
    #[arg(short = 'H', long, value_name = "JSON")]
    pub headers: Option<String>,

    /// Write messages into a logfile for debugging purposes
    #[arg(short = 'd', long = "log-messages", value_name = "PATH")]
    pub log_messages: Option<PathBuf>,

    /// After stdin ends, close the connection politely and keep printing
    /// messages until the server finishes
    #[arg(long)]
    pub drain: bool,

    /// Milliseconds to wait before retrying a stdin read that had no data
    #[arg(long, value_name = "MS", default_value_t = 100)]
    pub retry_delay_ms: u64,
}

impl Cli {
    /// Converts the arguments into an unvalidated builder.
    #[must_use]
    pub fn into_builder(self) -> BridgeBuilder {
        let mut builder = Bridge::builder()
            .address(self.address)
            .drain_on_eof(self.drain)
            .retry_delay(Duration::from_millis(self.retry_delay_ms));

        if let Some(json) = self.headers {
            builder = builder.headers_json(json);
        }
        if let Some(path) = self.log_messages {
            builder = builder.log_messages(path);
        }

        builder
    }

    /// Validates the arguments and builds the bridge.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a bad address or header JSON.
    pub fn into_bridge(self) -> Result<Bridge> {
        self.into_builder().build()
    }
}

// ============================================================================
// Tests
// ============================================================================
