//! Output pump: WebSocket to standard output.
//!
//! Each inbound message is logged under [`Direction::Received`], written
//! with one trailing newline and flushed before the next one is read.

// ============================================================================
// Imports
// ============================================================================

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::error::{Error, Result};
use crate::line::{Direction, Line};
use crate::logger::MessageLog;

use super::endpoint::LineSource;

// ============================================================================
// OutputPump
// ============================================================================

/// Moves lines from a [`LineSource`] to a writer.
pub struct OutputPump<W> {
    writer: W,
    log: Option<MessageLog>,
}

impl<W> OutputPump<W>
where
    W: AsyncWrite + Unpin + Send,
{
    /// Creates a pump writing to `writer`.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self { writer, log: None }
    }

    /// Records every received line in `log`.
    #[inline]
    #[must_use]
    pub fn with_log(mut self, log: Option<MessageLog>) -> Self {
        self.log = log;
        self
    }

    /// Runs until the source ends.
    ///
    /// Returns the number of lines written.
    ///
    /// # Errors
    ///
    /// - any error from the source's `next_line`
    /// - [`Error::Output`] if writing to the output fails
    /// - [`Error::Io`] if the message log cannot be written
    pub async fn run<S>(mut self, source: &mut S) -> Result<u64>
    where
        S: LineSource + ?Sized,
    {
        let mut received = 0u64;

        while let Some(line) = source.next_line().await? {
            if let Some(log) = &self.log {
                log.append(Direction::Received, &line).await?;
            }

            self.write_line(&line).await?;
            received += 1;
        }

        debug!(received, "Inbound stream ended");
        Ok(received)
    }

    async fn write_line(&mut self, line: &Line) -> Result<()> {
        let map_err = |e: std::io::Error| Error::output(e.to_string());

        self.writer.write_all(&line.to_output()).await.map_err(map_err)?;
        self.writer.flush().await.map_err(map_err)
    }
}

// ============================================================================
// Tests
// ============================================================================
