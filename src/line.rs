//! Line framing between stdio and WebSocket messages.
//!
//! One line of text is one WebSocket text message, in both directions.
//!
//! | Direction | Input | Output |
//! |-----------|-------|--------|
//! | [`Direction::Sent`] | `"ping\n"` from stdin | text message `"ping"` |
//! | [`Direction::Received`] | text message `"pong"` | `"pong\n"` on stdout |
//!
//! Blank input lines never become messages.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

// ============================================================================
// Direction
// ============================================================================

/// Direction a line travels through the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Standard input to WebSocket.
    Sent,
    /// WebSocket to standard output.
    Received,
}

impl Direction {
    /// Returns the log file prefix for this direction.
    #[inline]
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Sent => ">",
            Self::Received => "<",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sent => f.write_str("sent"),
            Self::Received => f.write_str("received"),
        }
    }
}

// ============================================================================
// Line
// ============================================================================

/// A single unit of transfer with its line terminator removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Line(String);

impl Line {
    /// Builds a line from raw stdin input.
    ///
    /// Strips one trailing `\n` (and a `\r` before it). Returns `None`
    /// when nothing is left, so blank lines are never forwarded.
    #[must_use]
    pub fn from_input(raw: &str) -> Option<Self> {
        let trimmed = raw.strip_suffix('\n').unwrap_or(raw);
        let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);

        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_owned()))
        }
    }

    /// Wraps an inbound message body.
    ///
    /// Message content is taken as-is; empty messages are still lines.
    #[inline]
    #[must_use]
    pub fn from_message(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Returns the line content without terminator.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the line, returning its content.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns the bytes written to stdout: content plus one `\n`.
    #[must_use]
    pub fn to_output(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.0.len() + 1);
        out.extend_from_slice(self.0.as_bytes());
        out.push(b'\n');
        out
    }

    /// Returns the log file entry for this line.
    #[must_use]
    pub fn to_log_entry(&self, direction: Direction) -> String {
        format!("{} {}\n", direction.marker(), self.0)
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Line {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    #[test]
    fn test_from_input_strips_newline() {
        let line = Line::from_input("ping\n").expect("non-blank");
        assert_eq!(line.as_str(), "ping");
    }

    #[test]
    fn test_from_input_strips_crlf() {
        let line = Line::from_input("ping\r\n").expect("non-blank");
        assert_eq!(line.as_str(), "ping");
    }

    #[test]
    fn test_from_input_without_terminator() {
        let line = Line::from_input("last").expect("non-blank");
        assert_eq!(line.as_str(), "last");
    }

    #[test]
    fn test_blank_lines_skipped() {
        assert!(Line::from_input("").is_none());
        assert!(Line::from_input("\n").is_none());
        assert!(Line::from_input("\r\n").is_none());
    }

    #[test]
    fn test_inner_whitespace_kept() {
        let line = Line::from_input("  {\"id\": 1}  \n").expect("non-blank");
        assert_eq!(line.as_str(), "  {\"id\": 1}  ");
    }

    #[test]
    fn test_to_output() {
        let line = Line::from_message("pong");
        assert_eq!(line.to_output(), b"pong\n");
    }

    #[test]
    fn test_log_entry_format() {
        let line = Line::from_message("hello");
        assert_eq!(line.to_log_entry(Direction::Sent), "> hello\n");
        assert_eq!(line.to_log_entry(Direction::Received), "< hello\n");
    }

    #[test]
    fn test_direction_display() {
        assert_eq!(Direction::Sent.to_string(), "sent");
        assert_eq!(Direction::Received.to_string(), "received");
    }

    proptest! {
        #[test]
        fn prop_input_lines_forwarded_in_order(lines in prop::collection::vec("[^\r\n]{0,16}", 0..32)) {
            let forwarded: Vec<String> = lines
                .iter()
                .map(|l| format!("{l}\n"))
                .filter_map(|raw| Line::from_input(&raw))
                .map(Line::into_inner)
                .collect();

            let expected: Vec<String> = lines.into_iter().filter(|l| !l.is_empty()).collect();
            prop_assert_eq!(forwarded, expected);
        }

        #[test]
        fn prop_output_has_single_newline(text in "[^\n]{0,32}") {
            let out = Line::from_message(text.clone()).to_output();
            prop_assert_eq!(out.len(), text.len() + 1);
            prop_assert_eq!(out.last(), Some(&b'\n'));
            prop_assert_eq!(&out[..text.len()], text.as_bytes());
        }
    }
}
