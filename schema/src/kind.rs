//! Field kinds and cardinalities.

use std::fmt;

/// The declared wire kind of a field.
///
/// The kind decides both how a value is framed on the wire and which
/// in-memory value variant carries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FieldKind {
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Bool,
    Enum,
    Fixed32,
    Sfixed32,
    Float,
    Fixed64,
    Sfixed64,
    Double,
    Bytes,
    String,
    Message,
}

impl FieldKind {
    /// All kinds, in declaration order.
    pub const ALL: [Self; 17] = [
        Self::Int32,
        Self::Int64,
        Self::Uint32,
        Self::Uint64,
        Self::Sint32,
        Self::Sint64,
        Self::Bool,
        Self::Enum,
        Self::Fixed32,
        Self::Sfixed32,
        Self::Float,
        Self::Fixed64,
        Self::Sfixed64,
        Self::Double,
        Self::Bytes,
        Self::String,
        Self::Message,
    ];

    /// Returns `true` for numeric, bool and enum kinds, the kinds a repeated
    /// field may pack into one length-delimited blob.
    #[must_use]
    pub const fn is_packable(self) -> bool {
        !matches!(self, Self::Bytes | Self::String | Self::Message)
    }

    /// Returns `true` if the kind may be used as a map key.
    ///
    /// Map keys are integral kinds, bool and string. Floating point, bytes,
    /// enum and message kinds are excluded.
    #[must_use]
    pub const fn is_valid_map_key(self) -> bool {
        !matches!(
            self,
            Self::Float | Self::Double | Self::Bytes | Self::Enum | Self::Message
        )
    }

    /// The lowercase kind name used in schema files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Sint32 => "sint32",
            Self::Sint64 => "sint64",
            Self::Bool => "bool",
            Self::Enum => "enum",
            Self::Fixed32 => "fixed32",
            Self::Sfixed32 => "sfixed32",
            Self::Float => "float",
            Self::Fixed64 => "fixed64",
            Self::Sfixed64 => "sfixed64",
            Self::Double => "double",
            Self::Bytes => "bytes",
            Self::String => "string",
            Self::Message => "message",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How many values a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Cardinality {
    /// At most one value.
    #[default]
    Singular,
    /// An ordered list of values.
    Repeated,
    /// A key/value map, modeled on the wire as repeated entry messages.
    Map,
}
