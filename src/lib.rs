//! ws-stdio-bridge - line-oriented stdio over WebSocket.
//!
//! This library connects a local process's standard input and output to a
//! remote WebSocket peer, one line per text message in each direction. It
//! lets tools that speak a line-based protocol over stdio (MCP servers and
//! clients, JSON-RPC shells) talk to a WebSocket endpoint unchanged.
//!
//! # Architecture
//!
//! - **Connection**: one client WebSocket, split into an outbound and an
//!   inbound half
//! - **Input pump**: stdin lines to outbound text messages
//! - **Output pump**: inbound text messages to stdout lines
//! - **Message log**: optional append-only record of both directions
//!
//! The session ends as soon as either pump finishes: end of stdin,
//! connection closed, or an I/O error. There is no reconnection.
//!
//! # Quick Start
//!
//! ```no_run
//! use ws_stdio_bridge::{Bridge, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let bridge = Bridge::builder()
//!         .address("ws://localhost:9999/echo")
//!         .headers_json(r#"{"Authorization": "Bearer token"}"#)
//!         .log_messages("messages.log")
//!         .build()?;
//!
//!     bridge.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`bridge`] | Pumps and session lifecycle |
//! | [`cli`] | Command-line arguments |
//! | [`config`] | Configuration builder and handshake headers |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`line`] | Line framing and [`Direction`] |
//! | [`logger`] | Append-only message log |
//! | [`transport`] | WebSocket connection |

// ============================================================================
// Modules
// ============================================================================

/// Pumps and session lifecycle.
pub mod bridge;

/// Command-line arguments.
pub mod cli;

/// Bridge configuration.
///
/// Use [`Bridge::builder()`] to create a validated configuration.
pub mod config;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Line framing between stdio and messages.
pub mod line;

/// Append-only message log.
pub mod logger;

/// WebSocket transport layer.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Bridge types
pub use bridge::{Bridge, EndedBy, InputPump, LineSink, LineSource, OutputPump, SessionEnd};

// Configuration types
pub use cli::Cli;
pub use config::{BridgeBuilder, BridgeConfig, Headers};

// Error types
pub use error::{Error, Result};

// Data types
pub use line::{Direction, Line};
pub use logger::{LogEntry, MessageLog};

// Transport types
pub use transport::{CloseReason, Connection, ConnectionState};
