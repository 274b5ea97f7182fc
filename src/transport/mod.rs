//! WebSocket transport layer.
//!
//! This module owns the single client connection to the remote peer.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐                              ┌─────────────────┐
//! │  Bridge (Rust)  │                              │  Remote peer    │
//! │                 │         WebSocket            │                 │
//! │  Outbound  ─────┼─────────────────────────────►│                 │
//! │  Inbound   ◄────┼──────────────────────────────│                 │
//! │                 │      ws:// or wss://         │                 │
//! └─────────────────┘                              └─────────────────┘
//! ```
//!
//! # Connection Lifecycle
//!
//! 1. `Connection::open` - Handshake with optional custom headers
//! 2. `Connection::split` - Hand `Outbound` to the input pump and
//!    `Inbound` to the output pump
//! 3. Either half records why the connection closed in the shared
//!    [`ConnectionState`]
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `connection` | Connection handshake, halves and state |

// ============================================================================
// Submodules
// ============================================================================

/// WebSocket client connection and its two halves.
pub mod connection;

// ============================================================================
// Re-exports
// ============================================================================

pub use connection::{CloseReason, Connection, ConnectionState, Inbound, Outbound};
