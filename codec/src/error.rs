//! Error types for codec operations.

use std::fmt;

use bytestream::StreamError;
use schema::FieldKind;
use wire::{WireError, WireType};

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while encoding or decoding a message.
///
/// Every error aborts the whole call. A failed decode may leave the target
/// message partially populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The input ended before a tag, value or payload was complete.
    TruncatedInput { requested: usize, available: usize },

    /// The observed wire type has no decode rule for the field's kind.
    SchemaMismatch {
        field: u32,
        wire_type: WireType,
        kind: FieldKind,
    },

    /// The message descriptor declares no field with this number.
    UnknownField { number: u32 },

    /// The message descriptor declares no field with this name.
    UnknownFieldName { name: String },

    /// A packed payload does not split into whole elements.
    MalformedPacked { field: u32, declared_len: usize },

    /// The type resolver does not know a referenced message type.
    UnresolvedType { type_name: String },

    /// A value does not fit its field.
    InvalidValue { field: u32, reason: ValueReason },

    /// A configured limit was exceeded.
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },

    /// Wire format error other than truncation.
    Wire(WireError),

    /// Byte stream error other than truncation.
    Stream(StreamError),
}

/// Specific limit that was exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    FieldBytes,
    Depth,
}

/// Details for invalid value errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueReason {
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    WrongMessageType,
    InvalidUtf8 {
        valid_up_to: usize,
    },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TruncatedInput {
                requested,
                available,
            } => {
                write!(
                    f,
                    "truncated input: requested {requested} bytes, {available} available"
                )
            }
            Self::SchemaMismatch {
                field,
                wire_type,
                kind,
            } => {
                write!(f, "field {field}: {wire_type} wire type cannot carry {kind}")
            }
            Self::UnknownField { number } => write!(f, "unknown field number {number}"),
            Self::UnknownFieldName { name } => write!(f, "unknown field '{name}'"),
            Self::MalformedPacked {
                field,
                declared_len,
            } => {
                write!(
                    f,
                    "field {field}: packed payload of {declared_len} bytes ends mid-element"
                )
            }
            Self::UnresolvedType { type_name } => {
                write!(f, "unresolved message type '{type_name}'")
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "invalid value for field {field}: {reason}")
            }
            Self::LimitsExceeded {
                kind,
                limit,
                actual,
            } => {
                write!(f, "{kind} limit exceeded: {actual} > {limit}")
            }
            Self::Wire(e) => write!(f, "wire error: {e}"),
            Self::Stream(e) => write!(f, "stream error: {e}"),
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FieldBytes => "field bytes",
            Self::Depth => "nesting depth",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for ValueReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch { expected, found } => {
                write!(f, "expected {expected} but got {found}")
            }
            Self::WrongMessageType => write!(f, "message type does not match the field"),
            Self::InvalidUtf8 { valid_up_to } => {
                write!(f, "string is not UTF-8 after byte {valid_up_to}")
            }
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Wire(e) => Some(e),
            Self::Stream(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StreamError> for CodecError {
    fn from(err: StreamError) -> Self {
        match err {
            StreamError::UnexpectedEof {
                requested,
                available,
            } => Self::TruncatedInput {
                requested,
                available,
            },
            other => Self::Stream(other),
        }
    }
}

impl From<WireError> for CodecError {
    fn from(err: WireError) -> Self {
        match err {
            WireError::Stream(stream) => stream.into(),
            other => Self::Wire(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_schema_mismatch() {
        let err = CodecError::SchemaMismatch {
            field: 4,
            wire_type: WireType::Fixed32,
            kind: FieldKind::String,
        };
        assert_eq!(
            err.to_string(),
            "field 4: 32-bit wire type cannot carry string"
        );
    }

    #[test]
    fn error_display_limits() {
        let err = CodecError::LimitsExceeded {
            kind: LimitKind::Depth,
            limit: 2,
            actual: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("nesting depth"), "should name the limit");
        assert!(msg.contains("3 > 2"), "should show values");
    }

    #[test]
    fn error_display_invalid_value() {
        let err = CodecError::InvalidValue {
            field: 2,
            reason: ValueReason::TypeMismatch {
                expected: "string",
                found: "i32",
            },
        };
        assert!(err.to_string().contains("expected string but got i32"));
    }

    #[test]
    fn eof_becomes_truncated_input() {
        let stream = StreamError::UnexpectedEof {
            requested: 4,
            available: 1,
        };
        assert_eq!(
            CodecError::from(WireError::from(stream.clone())),
            CodecError::TruncatedInput {
                requested: 4,
                available: 1
            }
        );
        assert!(matches!(
            CodecError::from(stream),
            CodecError::TruncatedInput { .. }
        ));
    }

    #[test]
    fn other_errors_are_wrapped() {
        let err: CodecError = WireError::InvalidWireType { value: 7 }.into();
        assert!(matches!(err, CodecError::Wire(_)));
        assert!(std::error::Error::source(&err).is_some());

        let err: CodecError = StreamError::Io {
            kind: std::io::ErrorKind::BrokenPipe,
        }
        .into();
        assert!(matches!(err, CodecError::Stream(_)));
    }
}
