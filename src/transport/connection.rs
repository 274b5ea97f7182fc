//! WebSocket client connection.
//!
//! Opens one connection per process and splits it into an [`Outbound`]
//! half for the input pump and an [`Inbound`] half for the output pump.
//! Each direction has exactly one owner, so neither half needs a lock.
//!
//! # State
//!
//! ```text
//! Connecting ──► Open ──► Closed(reason)
//! ```
//!
//! The first half to observe the end of the connection records the reason;
//! later observations keep the original reason.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, trace, warn};
use url::Url;

use crate::config::Headers;
use crate::error::{Error, Result};
use crate::line::{Direction, Line};

// ============================================================================
// Types
// ============================================================================

/// Client WebSocket stream, plain or TLS.
pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

// ============================================================================
// ConnectionState
// ============================================================================

/// Why the connection ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseReason {
    /// Standard input ended and the bridge closed its side.
    InputEnded,
    /// Peer sent a Close frame.
    PeerClosed {
        /// Close code, `1005` when the frame carried none.
        code: u16,
        /// Close reason text.
        reason: String,
    },
    /// Stream ended without a Close frame.
    StreamEnded,
    /// Read or write failed.
    Failed(String),
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputEnded => f.write_str("input ended"),
            Self::PeerClosed { code, reason } if reason.is_empty() => {
                write!(f, "closed by peer ({code})")
            }
            Self::PeerClosed { code, reason } => write!(f, "closed by peer ({code}: {reason})"),
            Self::StreamEnded => f.write_str("stream ended"),
            Self::Failed(message) => write!(f, "failed: {message}"),
        }
    }
}

/// Lifecycle state of a [`Connection`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// Handshake in progress.
    Connecting,
    /// Handshake completed, messages flowing.
    Open,
    /// Connection ended.
    Closed(CloseReason),
}

impl ConnectionState {
    /// Returns `true` once the connection has ended.
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed(_))
    }
}

/// State shared by both halves.
#[derive(Debug, Clone)]
struct SharedState(Arc<Mutex<ConnectionState>>);

impl SharedState {
    fn new() -> Self {
        Self(Arc::new(Mutex::new(ConnectionState::Connecting)))
    }

    fn get(&self) -> ConnectionState {
        self.0.lock().clone()
    }

    fn open(&self) {
        *self.0.lock() = ConnectionState::Open;
    }

    /// Records the close reason unless one is already set.
    fn close(&self, reason: CloseReason) {
        let mut state = self.0.lock();
        if !state.is_closed() {
            debug!(%reason, "Connection closed");
            *state = ConnectionState::Closed(reason);
        }
    }
}

// ============================================================================
// Connection
// ============================================================================

/// An open WebSocket connection to the remote peer.
pub struct Connection {
    stream: WsStream,
    state: SharedState,
}

impl Connection {
    /// Connects to `address`, sending `headers` with the handshake.
    ///
    /// Makes a single attempt; there is no retry.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if a header cannot be encoded
    /// - [`Error::Connection`] on DNS, TCP, TLS or handshake failure
    pub async fn open(address: &Url, headers: &Headers) -> Result<Self> {
        let state = SharedState::new();

        let mut request = address
            .as_str()
            .into_client_request()
            .map_err(|e| Error::connection(e.to_string()))?;

        for (name, value) in headers.to_http()? {
            request.headers_mut().insert(name, value);
        }

        debug!(%address, headers = headers.len(), "Connecting");

        let (stream, response) = connect_async(request).await.map_err(|e| {
            state.close(CloseReason::Failed(e.to_string()));
            Error::connection(e.to_string())
        })?;

        state.open();
        info!(%address, status = %response.status(), "WebSocket connection established");

        Ok(Self { stream, state })
    }

    /// Returns the current lifecycle state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state.get()
    }

    /// Splits the connection into its outbound and inbound halves.
    #[must_use]
    pub fn split(self) -> (Outbound, Inbound) {
        let (sink, stream) = self.stream.split();

        (
            Outbound {
                sink,
                state: self.state.clone(),
            },
            Inbound {
                stream,
                state: self.state,
            },
        )
    }
}

// ============================================================================
// Outbound
// ============================================================================

/// Sending half of a [`Connection`]. Owned by the input pump.
pub struct Outbound {
    sink: SplitSink<WsStream, Message>,
    state: SharedState,
}

impl Outbound {
    /// Sends one line as a text message.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionClosed`] if the connection is already closed
    /// - [`Error::Transfer`] if the write fails
    pub async fn send_line(&mut self, line: &Line) -> Result<()> {
        if self.state.get().is_closed() {
            return Err(Error::ConnectionClosed);
        }

        match self.sink.send(Message::text(line.as_str().to_owned())).await {
            Ok(()) => {
                trace!(len = line.as_str().len(), "Line sent");
                Ok(())
            }
            Err(WsError::ConnectionClosed | WsError::AlreadyClosed) => {
                self.state.close(CloseReason::StreamEnded);
                Err(Error::ConnectionClosed)
            }
            Err(e) => {
                self.state.close(CloseReason::Failed(e.to_string()));
                Err(Error::transfer(Direction::Sent, e.to_string()))
            }
        }
    }

    /// Sends a Close frame, ending the outbound direction.
    ///
    /// Inbound messages already in flight can still be read until the peer
    /// answers the close.
    pub async fn close(&mut self) {
        if let Err(e) = self.sink.close().await {
            warn!(error = %e, "Failed to send close frame");
        }
        self.state.close(CloseReason::InputEnded);
    }

    /// Returns the current lifecycle state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state.get()
    }
}

// ============================================================================
// Inbound
// ============================================================================

/// Receiving half of a [`Connection`]. Owned by the output pump.
pub struct Inbound {
    stream: SplitStream<WsStream>,
    state: SharedState,
}

impl Inbound {
    /// Waits for the next text message.
    ///
    /// Returns `Ok(None)` once the connection has closed. Binary, ping and
    /// pong frames are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transfer`] if reading fails for any reason other
    /// than a completed close.
    pub async fn next_line(&mut self) -> Result<Option<Line>> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => {
                    return Ok(Some(Line::from_message(text.as_str())));
                }

                Some(Ok(Message::Close(frame))) => {
                    let (code, reason) = frame
                        .map(|f| (u16::from(f.code), f.reason.as_str().to_owned()))
                        .unwrap_or((1005, String::new()));
                    self.state.close(CloseReason::PeerClosed { code, reason });
                    return Ok(None);
                }

                Some(Ok(Message::Binary(data))) => {
                    debug!(len = data.len(), "Ignoring binary message");
                }

                // Ping/Pong are answered by tungstenite
                Some(Ok(_)) => {}

                Some(Err(WsError::ConnectionClosed | WsError::AlreadyClosed)) | None => {
                    self.state.close(CloseReason::StreamEnded);
                    return Ok(None);
                }

                Some(Err(e)) => {
                    self.state.close(CloseReason::Failed(e.to_string()));
                    return Err(Error::transfer(Direction::Received, e.to_string()));
                }
            }
        }
    }

    /// Returns the current lifecycle state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state.get()
    }
}

// ============================================================================
// Tests
// ============================================================================
