//! Error types for demo decoding and encoding.

use std::io;

use dem_core::GameType;
use thiserror::Error;

/// Errors that can occur while reading or writing a demo stream.
///
/// Decoding only surfaces [`Truncated`](DemoError::Truncated) from the
/// event-at-a-time API; the whole-file entry points recover from it and
/// return the events decoded so far. Every other variant except
/// [`Io`](DemoError::Io) reports an encoder contract violation: the
/// caller built an event whose stored tags disagree with the layout
/// rules, and writing it would produce bytes that decode differently.
#[derive(Debug, Error)]
pub enum DemoError {
    /// An I/O error occurred in the underlying reader or writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input ended in the middle of an event.
    #[error("input truncated while reading {context}")]
    Truncated {
        /// What was being read when the input ran out.
        context: &'static str,
    },

    /// The event is gated on a game type the session does not have.
    #[error("{event} events are not valid for game type {game_type}")]
    EventNotApplicable {
        /// Display name of the event.
        event: &'static str,
        /// Game type of the current session.
        game_type: GameType,
    },

    /// A stored tag or optional field disagrees with the layout rules.
    #[error("inconsistent {context}: {detail}")]
    Inconsistent {
        /// Record or field being written.
        context: &'static str,
        /// Human-readable description of the mismatch.
        detail: String,
    },

    /// A string is too long for its length prefix.
    #[error("string of {len} bytes exceeds the {max}-byte limit")]
    StringTooLong {
        /// Encoded length including the terminating NUL.
        len: usize,
        /// Largest encodable length.
        max: usize,
    },

    /// A string contains a character outside the single-byte range.
    #[error("character {ch:?} cannot be encoded as a single byte")]
    UnencodableChar {
        /// The offending character.
        ch: char,
    },

    /// A string contains a NUL, which would end it early on decode.
    #[error("string contains an embedded NUL")]
    EmbeddedNul,

    /// An event was written after the end-of-stream marker.
    #[error("{event} event written after end-of-stream marker")]
    EventAfterEof {
        /// Display name of the rejected event.
        event: &'static str,
    },

    /// Trailing bytes were supplied but the stream has no end marker.
    #[error("{len} trailing bytes supplied without an end-of-stream marker")]
    TrailingWithoutEof {
        /// Number of trailing bytes.
        len: usize,
    },

    /// The file header disagrees with the session established by its events.
    #[error(
        "file declares edition {declared_edition} / game type {declared_game_type}, \
         events establish edition {stream_edition} / game type {stream_game_type}"
    )]
    SessionMismatch {
        /// Edition stored on the file.
        declared_edition: u8,
        /// Game type stored on the file.
        declared_game_type: GameType,
        /// Edition established by the last session-start event.
        stream_edition: u8,
        /// Game type established by the last session-start event.
        stream_game_type: GameType,
    },

    /// A collection is larger than its count field can express.
    #[error("{context} holds {len} entries, more than the {max} its count field allows")]
    CountOverflow {
        /// Collection being written.
        context: &'static str,
        /// Number of entries.
        len: usize,
        /// Largest encodable count.
        max: usize,
    },
}

impl DemoError {
    /// `true` if the error means the input ran out mid-event.
    pub fn is_truncation(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }

    pub(crate) fn inconsistent(context: &'static str, detail: impl Into<String>) -> Self {
        Self::Inconsistent {
            context,
            detail: detail.into(),
        }
    }

    /// Check that an optional field is stored exactly when the tags say so.
    pub(crate) fn check_presence(
        context: &'static str,
        field: &str,
        expected: bool,
        present: bool,
    ) -> Result<(), Self> {
        match (expected, present) {
            (true, false) => Err(Self::inconsistent(
                context,
                format!("{field} is required here but missing"),
            )),
            (false, true) => Err(Self::inconsistent(
                context,
                format!("{field} is present but not recorded here"),
            )),
            _ => Ok(()),
        }
    }
}
