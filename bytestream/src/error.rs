//! Error types for byte stream operations.

use std::fmt;
use std::io;

/// Result type for byte stream operations.
pub type StreamResult<T> = Result<T, StreamError>;

/// Errors that can occur while reading from a byte stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// Attempted to read past the end of the input.
    UnexpectedEof {
        /// Number of bytes requested.
        requested: usize,
        /// Number of bytes that were available.
        available: usize,
    },

    /// The underlying reader failed for a reason other than end-of-input.
    Io {
        /// Kind of the underlying I/O error.
        kind: io::ErrorKind,
    },
}

impl StreamError {
    /// Returns `true` if the error reports that the input ended early.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::UnexpectedEof { .. })
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof {
                requested,
                available,
            } => {
                write!(
                    f,
                    "attempted to read {requested} bytes but only {available} bytes available"
                )
            }
            Self::Io { kind } => write!(f, "i/o error: {kind}"),
        }
    }
}

impl std::error::Error for StreamError {}

impl From<io::Error> for StreamError {
    fn from(err: io::Error) -> Self {
        Self::Io { kind: err.kind() }
    }
}
