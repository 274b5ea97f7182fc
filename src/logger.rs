//! Append-only message log.
//!
//! Records every line moved through the bridge, tagged by direction:
//!
//! ```text
//! Server started at 2026-10-18 09:12:44.031337
//! > {"jsonrpc":"2.0","id":1,"method":"initialize"}
//! < {"jsonrpc":"2.0","id":1,"result":{}}
//! ```
//!
//! Each append opens the file, writes one entry, flushes and releases the
//! handle, so the log stays valid if the process dies between writes. The
//! file work runs on tokio's blocking pool, keeping the pumps' workers free.

// ============================================================================
// Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Local};
use parking_lot::Mutex;
use tokio::task::spawn_blocking;
use tracing::trace;

use crate::error::{Error, Result};
use crate::line::{Direction, Line};

// ============================================================================
// Constants
// ============================================================================

/// Timestamp layout for the session header.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

// ============================================================================
// LogEntry
// ============================================================================

/// One record of a transferred line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Which way the line went.
    pub direction: Direction,
    /// Line content.
    pub content: Line,
    /// When the line was sent or received.
    pub timestamp: DateTime<Local>,
}

impl LogEntry {
    /// Creates an entry stamped with the current time.
    #[must_use]
    pub fn now(direction: Direction, content: Line) -> Self {
        Self {
            direction,
            content,
            timestamp: Local::now(),
        }
    }

    /// Formats the entry as written to the log file.
    #[inline]
    #[must_use]
    pub fn render(&self) -> String {
        self.content.to_log_entry(self.direction)
    }
}

// ============================================================================
// MessageLog
// ============================================================================

/// Shared handle to the message log file.
///
/// Cloning is cheap; all clones serialize their appends through one lock.
#[derive(Debug, Clone)]
pub struct MessageLog {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    path: PathBuf,
    lock: Mutex<()>,
}

impl MessageLog {
    /// Creates a log writing to `path`.
    ///
    /// Nothing is touched on disk until the first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(Inner {
                path: path.into(),
                lock: Mutex::new(()),
            }),
        }
    }

    /// Returns the log file path.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Writes the session header.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be opened or written.
    pub async fn start_session(&self) -> Result<()> {
        let header = format!("Server started at {}\n", Local::now().format(TIMESTAMP_FORMAT));
        self.write(header).await
    }

    /// Appends one line tagged with `direction`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be opened or written.
    pub async fn append(&self, direction: Direction, content: &Line) -> Result<()> {
        self.record(&LogEntry::now(direction, content.clone())).await
    }

    /// Appends a prepared entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be opened or written.
    pub async fn record(&self, entry: &LogEntry) -> Result<()> {
        trace!(direction = %entry.direction, "Logging message");
        self.write(entry.render()).await
    }

    async fn write(&self, text: String) -> Result<()> {
        let inner = Arc::clone(&self.inner);

        spawn_blocking(move || inner.write_raw(&text))
            .await
            .map_err(|e| Error::Io(std::io::Error::other(e)))?
    }
}

impl Inner {
    fn write_raw(&self, text: &str) -> Result<()> {
        let _guard = self.lock.lock();

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(text.as_bytes())?;
        file.flush()?;

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
