//! Error types for wire format operations.

use std::fmt;

use bytestream::StreamError;

use crate::tag::WireType;

/// Result type for wire format operations.
pub type WireResult<T> = Result<T, WireError>;

/// Errors that can occur while reading wire primitives.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WireError {
    /// The underlying byte stream failed or ended early.
    Stream(StreamError),

    /// The low three bits of a tag hold a value the format does not define.
    InvalidWireType { value: u8 },

    /// A tag carries field number zero or one above the protocol maximum.
    InvalidFieldNumber { value: u64 },

    /// A wire type the codec recognizes but does not support (groups).
    UnsupportedWireType { wire_type: WireType },

    /// A length prefix does not fit in `usize`.
    LengthOverflow { value: u64 },
}

impl WireError {
    /// Returns `true` if the error reports that the input ended early.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::Stream(err) if err.is_eof())
    }
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stream(err) => write!(f, "stream error: {err}"),
            Self::InvalidWireType { value } => write!(f, "invalid wire type: {value}"),
            Self::InvalidFieldNumber { value } => write!(f, "invalid field number: {value}"),
            Self::UnsupportedWireType { wire_type } => {
                write!(f, "unsupported wire type: {wire_type}")
            }
            Self::LengthOverflow { value } => write!(f, "length overflow: {value}"),
        }
    }
}

impl std::error::Error for WireError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Stream(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StreamError> for WireError {
    fn from(err: StreamError) -> Self {
        Self::Stream(err)
    }
}
