//! Input pump: standard input to WebSocket.
//!
//! Reads one line at a time, drops blank lines, logs the rest under
//! [`Direction::Sent`] and forwards them in read order.
//!
//! # Stalls
//!
//! A read that reports `WouldBlock` or `Interrupted` is not an error. The
//! pump sleeps for the retry delay and reads again, for as long as the
//! process lives. On an interactive terminal a zero-byte read is treated the
//! same way, so only a non-interactive input can end the pump by EOF.

// ============================================================================
// Imports
// ============================================================================

use std::io::ErrorKind;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::sleep;
use tracing::{debug, trace};

use crate::config::DEFAULT_RETRY_DELAY;
use crate::error::{Error, Result};
use crate::line::{Direction, Line};
use crate::logger::MessageLog;

use super::endpoint::LineSink;

// ============================================================================
// InputPump
// ============================================================================

/// Moves lines from a reader to a [`LineSink`].
pub struct InputPump<R> {
    reader: R,
    log: Option<MessageLog>,
    retry_delay: Duration,
    interactive: bool,
}

impl<R> InputPump<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    /// Creates a pump reading from `reader`.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            log: None,
            retry_delay: DEFAULT_RETRY_DELAY,
            interactive: false,
        }
    }

    /// Records every forwarded line in `log`.
    #[inline]
    #[must_use]
    pub fn with_log(mut self, log: Option<MessageLog>) -> Self {
        self.log = log;
        self
    }

    /// Sets the backoff used when no data is available yet.
    #[inline]
    #[must_use]
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Marks the reader as an interactive terminal.
    #[inline]
    #[must_use]
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Runs until end of input.
    ///
    /// Returns the number of lines forwarded.
    ///
    /// # Errors
    ///
    /// - [`Error::Transfer`] if reading fails
    /// - [`Error::Io`] if the message log cannot be written
    /// - any error from the sink's `send_line`
    pub async fn run<S>(mut self, sink: &mut S) -> Result<u64>
    where
        S: LineSink + ?Sized,
    {
        let mut buf = String::new();
        let mut sent = 0u64;

        loop {
            match self.reader.read_line(&mut buf).await {
                Ok(0) if self.interactive => {
                    sleep(self.retry_delay).await;
                    continue;
                }

                Ok(0) => {
                    // Final line without a terminator.
                    if self.forward(&buf, sink).await? {
                        sent += 1;
                    }
                    debug!(sent, "Input reached end of stream");
                    return Ok(sent);
                }

                Ok(_) => {}

                Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::Interrupted) => {
                    trace!(kind = ?e.kind(), "Input not ready, retrying");
                    sleep(self.retry_delay).await;
                    continue;
                }

                Err(e) => return Err(Error::transfer(Direction::Sent, e.to_string())),
            }

            if self.forward(&buf, sink).await? {
                sent += 1;
            }
            buf.clear();
        }
    }

    /// Logs and sends one raw input line. Returns `false` for blank lines.
    async fn forward<S>(&self, raw: &str, sink: &mut S) -> Result<bool>
    where
        S: LineSink + ?Sized,
    {
        let Some(line) = Line::from_input(raw) else {
            return Ok(false);
        };

        if let Some(log) = &self.log {
            log.append(Direction::Sent, &line).await?;
        }

        sink.send_line(&line).await?;
        Ok(true)
    }
}

// ============================================================================
// Tests
// ============================================================================
