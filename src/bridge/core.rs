//! Bridge lifecycle.
//!
//! Opens the connection, writes the log header, runs both pumps and decides
//! when the session is over.
//!
//! # Shutdown
//!
//! | First to finish | Default | With `drain_on_eof` |
//! |-----------------|---------|---------------------|
//! | Input pump (EOF) | Close frame sent, session ends | Close frame sent, output drained |
//! | Output pump (close) | Session ends | Session ends |
//! | Either pump fails | Error returned | Error returned |

// ============================================================================
// Imports
// ============================================================================

use std::io::IsTerminal;

use tokio::io::{AsyncBufRead, AsyncWrite, BufReader};
use tracing::{debug, info};

use crate::config::{BridgeBuilder, BridgeConfig};
use crate::error::Result;
use crate::logger::MessageLog;
use crate::transport::{Connection, ConnectionState};

use super::input::InputPump;
use super::output::OutputPump;

// ============================================================================
// SessionEnd
// ============================================================================

/// Which side ended the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndedBy {
    /// Standard input reached end of stream.
    InputEnded,
    /// The connection closed.
    ConnectionClosed,
}

/// Summary of a finished session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEnd {
    /// Which side ended the session.
    pub ended_by: EndedBy,
    /// Connection state when the session ended.
    pub state: ConnectionState,
}

// ============================================================================
// Bridge
// ============================================================================

/// Line-oriented bridge between stdio and one WebSocket connection.
///
/// # Example
///
/// ```no_run
/// use ws_stdio_bridge::{Bridge, Result};
///
/// # async fn example() -> Result<()> {
/// let bridge = Bridge::builder()
///     .address("ws://localhost:9999/echo")
///     .build()?;
///
/// let end = bridge.run().await?;
/// println!("session ended: {:?}", end.ended_by);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Bridge {
    config: BridgeConfig,
}

impl Bridge {
    /// Creates a configuration builder.
    #[inline]
    #[must_use]
    pub fn builder() -> BridgeBuilder {
        BridgeBuilder::new()
    }

    /// Creates a bridge from a validated configuration.
    #[inline]
    #[must_use]
    pub fn new(config: BridgeConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Runs the bridge on the process's stdin and stdout.
    ///
    /// # Errors
    ///
    /// See [`run_with`](Self::run_with).
    pub async fn run(self) -> Result<SessionEnd> {
        let interactive = std::io::stdin().is_terminal();

        self.run_with(
            BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
            interactive,
        )
        .await
    }

    /// Runs the bridge on the given reader and writer.
    ///
    /// `interactive` marks the reader as a terminal, where a zero-byte read
    /// does not mean end of input.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::Io`] if the message log header cannot be written
    /// - [`crate::Error::Connection`] if the connection cannot be opened
    /// - [`crate::Error::Transfer`] or [`crate::Error::ConnectionClosed`]
    ///   if either pump fails
    pub async fn run_with<R, W>(self, reader: R, writer: W, interactive: bool) -> Result<SessionEnd>
    where
        R: AsyncBufRead + Unpin + Send,
        W: AsyncWrite + Unpin + Send,
    {
        let BridgeConfig {
            address,
            headers,
            log_path,
            drain_on_eof,
            retry_delay,
        } = self.config;

        let log = log_path.map(MessageLog::new);
        if let Some(log) = &log {
            log.start_session().await?;
            debug!(path = %log.path().display(), "Message logging enabled");
        }

        let connection = Connection::open(&address, &headers).await?;
        let (mut outbound, mut inbound) = connection.split();

        let input_pump = InputPump::new(reader)
            .with_log(log.clone())
            .retry_delay(retry_delay)
            .interactive(interactive);
        let output_pump = OutputPump::new(writer).with_log(log);

        let ended_by = {
            let input = async {
                let sent = input_pump.run(&mut outbound).await?;
                if drain_on_eof {
                    outbound.close().await;
                }
                Ok::<_, crate::Error>(sent)
            };
            let output = output_pump.run(&mut inbound);
            tokio::pin!(input, output);

            let first = tokio::select! {
                result = &mut input => First::Input(result),
                result = &mut output => First::Output(result),
            };

            match first {
                First::Input(result) => {
                    let sent = result?;
                    debug!(sent, "Input pump finished");
                    if drain_on_eof {
                        let received = output.await?;
                        debug!(received, "Output drained");
                    }
                    EndedBy::InputEnded
                }
                First::Output(result) => {
                    let received = result?;
                    debug!(received, "Output pump finished");
                    EndedBy::ConnectionClosed
                }
            }
        };

        if ended_by == EndedBy::InputEnded && !drain_on_eof {
            outbound.close().await;
        }

        let state = inbound.state();
        info!(?ended_by, ?state, "Bridge session ended");

        Ok(SessionEnd { ended_by, state })
    }
}

/// Result of whichever pump completed first.
enum First {
    Input(Result<u64>),
    Output(Result<u64>),
}
