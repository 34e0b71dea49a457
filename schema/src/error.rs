//! Schema validation errors.

use std::fmt;

use crate::kind::FieldKind;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur when building or validating descriptors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A message definition has an empty full name.
    EmptyMessageName,

    /// A field definition has an empty name.
    EmptyFieldName { message: String, number: u32 },

    /// Field number is zero or above the protocol maximum.
    InvalidFieldNumber { message: String, number: u32 },

    /// Two fields of one message share a number.
    DuplicateFieldNumber { message: String, number: u32 },

    /// Two fields of one message share a name.
    DuplicateFieldName { message: String, field: String },

    /// A message-kind field does not name its type.
    MissingTypeName { message: String, field: String },

    /// A non-message field names a message type.
    UnexpectedTypeName { message: String, field: String },

    /// `packed` was set on a field that is not a repeated packable kind.
    PackedNotAllowed { message: String, field: String },

    /// A map field declares no key kind.
    MissingMapKey { message: String, field: String },

    /// A map key uses a kind that cannot be a key.
    InvalidMapKey {
        message: String,
        field: String,
        key: FieldKind,
    },

    /// A non-map field declares a key kind.
    UnexpectedMapKey { message: String, field: String },

    /// A oneof member is repeated or a map.
    OneofNotSingular { message: String, field: String },

    /// A pool already holds a message with this name.
    DuplicateMessage { name: String },

    /// A field references a message type the pool does not hold.
    UnresolvedTypeName {
        message: String,
        field: String,
        type_name: String,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMessageName => write!(f, "message name is empty"),
            Self::EmptyFieldName { message, number } => {
                write!(f, "{message}: field {number} has an empty name")
            }
            Self::InvalidFieldNumber { message, number } => {
                write!(f, "{message}: invalid field number {number}")
            }
            Self::DuplicateFieldNumber { message, number } => {
                write!(f, "{message}: duplicate field number {number}")
            }
            Self::DuplicateFieldName { message, field } => {
                write!(f, "{message}: duplicate field name '{field}'")
            }
            Self::MissingTypeName { message, field } => {
                write!(f, "{message}.{field}: message field has no type name")
            }
            Self::UnexpectedTypeName { message, field } => {
                write!(f, "{message}.{field}: only message fields take a type name")
            }
            Self::PackedNotAllowed { message, field } => {
                write!(f, "{message}.{field}: packed requires a repeated scalar field")
            }
            Self::MissingMapKey { message, field } => {
                write!(f, "{message}.{field}: map field has no key kind")
            }
            Self::InvalidMapKey {
                message,
                field,
                key,
            } => write!(f, "{message}.{field}: {key} cannot be a map key"),
            Self::UnexpectedMapKey { message, field } => {
                write!(f, "{message}.{field}: only map fields take a key kind")
            }
            Self::OneofNotSingular { message, field } => {
                write!(f, "{message}.{field}: oneof members must be singular")
            }
            Self::DuplicateMessage { name } => write!(f, "duplicate message '{name}'"),
            Self::UnresolvedTypeName {
                message,
                field,
                type_name,
            } => write!(f, "{message}.{field}: unknown message type '{type_name}'"),
        }
    }
}

impl std::error::Error for SchemaError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_field() {
        let err = SchemaError::InvalidMapKey {
            message: "pkg.Foo".to_string(),
            field: "scores".to_string(),
            key: FieldKind::Double,
        };
        assert_eq!(err.to_string(), "pkg.Foo.scores: double cannot be a map key");
    }

    #[test]
    fn display_duplicate_number() {
        let err = SchemaError::DuplicateFieldNumber {
            message: "pkg.Foo".to_string(),
            number: 3,
        };
        assert!(err.to_string().contains("duplicate field number 3"));
    }
}
