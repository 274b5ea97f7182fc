//! Stdio bridge engine.
//!
//! Two pumps share one connection:
//!
//! ```text
//!  stdin ──► InputPump ──► Outbound ─┐
//!                                    ├── WebSocket ── peer
//! stdout ◄── OutputPump ◄── Inbound ─┘
//! ```
//!
//! Order is preserved within each direction. Nothing orders sent lines
//! against received ones.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Bridge`] | Session lifecycle and shutdown |
//! | [`InputPump`] | Standard input to WebSocket |
//! | [`OutputPump`] | WebSocket to standard output |
//! | [`LineSink`] / [`LineSource`] | Endpoints the pumps move lines between |

// ============================================================================
// Submodules
// ============================================================================

/// Session lifecycle and shutdown coordination.
pub mod core;

/// Endpoint traits for the pumps.
pub mod endpoint;

/// Standard input to WebSocket.
pub mod input;

/// WebSocket to standard output.
pub mod output;

// ============================================================================
// Re-exports
// ============================================================================

pub use self::core::{Bridge, EndedBy, SessionEnd};
pub use endpoint::{LineSink, LineSource};
pub use input::InputPump;
pub use output::OutputPump;
