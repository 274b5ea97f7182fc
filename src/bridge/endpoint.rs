//! Line endpoints the pumps move data between.
//!
//! The input pump writes into a [`LineSink`] and the output pump reads from
//! a [`LineSource`]. The WebSocket halves implement both in production.

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;

use crate::error::Result;
use crate::line::Line;
use crate::transport::{Inbound, Outbound};

// ============================================================================
// Traits
// ============================================================================

/// Destination for outbound lines.
#[async_trait]
pub trait LineSink: Send {
    /// Sends one line, preserving call order.
    async fn send_line(&mut self, line: &Line) -> Result<()>;
}

/// Origin of inbound lines.
#[async_trait]
pub trait LineSource: Send {
    /// Waits for the next line. `Ok(None)` means the source has ended.
    async fn next_line(&mut self) -> Result<Option<Line>>;
}

// ============================================================================
// WebSocket Implementations
// ============================================================================

#[async_trait]
impl LineSink for Outbound {
    async fn send_line(&mut self, line: &Line) -> Result<()> {
        Outbound::send_line(self, line).await
    }
}

#[async_trait]
impl LineSource for Inbound {
    async fn next_line(&mut self) -> Result<Option<Line>> {
        Inbound::next_line(self).await
    }
}
