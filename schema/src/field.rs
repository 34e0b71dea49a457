//! Field definitions and validated field descriptors.

use std::sync::Arc;

use crate::kind::{Cardinality, FieldKind};
use crate::message::MessageDescriptor;

/// Declarative field definition within a message.
///
/// For a map field, `kind` and `type_name` describe the map's value and
/// `map_key` the key kind.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldDef {
    pub number: u32,
    pub name: String,
    pub kind: FieldKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cardinality: Cardinality,
    #[cfg_attr(feature = "serde", serde(default))]
    pub packed: bool,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub type_name: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub oneof: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub map_key: Option<FieldKind>,
}

impl FieldDef {
    /// Creates a singular field of the given kind.
    #[must_use]
    pub fn new(number: u32, name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            number,
            name: name.into(),
            kind,
            cardinality: Cardinality::Singular,
            packed: false,
            type_name: None,
            oneof: None,
            map_key: None,
        }
    }

    /// Creates a singular message field referencing `type_name`.
    #[must_use]
    pub fn message(number: u32, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::new(number, name, FieldKind::Message).type_name(type_name)
    }

    /// Creates a map field from `key` to `value`.
    ///
    /// Message-valued maps also need [`type_name`](Self::type_name).
    #[must_use]
    pub fn map(number: u32, name: impl Into<String>, key: FieldKind, value: FieldKind) -> Self {
        let mut field = Self::new(number, name, value);
        field.cardinality = Cardinality::Map;
        field.map_key = Some(key);
        field
    }

    /// Makes the field repeated.
    #[must_use]
    pub fn repeated(mut self) -> Self {
        self.cardinality = Cardinality::Repeated;
        self
    }

    /// Makes the field repeated and packed.
    #[must_use]
    pub fn packed(mut self) -> Self {
        self.cardinality = Cardinality::Repeated;
        self.packed = true;
        self
    }

    /// Sets the referenced message type.
    #[must_use]
    pub fn type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// Places the field in a oneof group.
    #[must_use]
    pub fn oneof(mut self, group: impl Into<String>) -> Self {
        self.oneof = Some(group.into());
        self
    }
}

/// A validated field of a [`MessageDescriptor`].
///
/// A map field reports kind [`FieldKind::Message`]; its synthesized entry
/// descriptor (fields `key` = 1 and `value` = 2) is available through
/// [`map_entry`](Self::map_entry).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub(crate) number: u32,
    pub(crate) name: String,
    pub(crate) kind: FieldKind,
    pub(crate) cardinality: Cardinality,
    pub(crate) packed: bool,
    pub(crate) type_name: Option<String>,
    pub(crate) oneof: Option<String>,
    pub(crate) map_entry: Option<Arc<MessageDescriptor>>,
}

impl FieldDescriptor {
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        self.kind
    }

    #[must_use]
    pub const fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    /// Returns `true` for list fields (maps are not lists).
    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self.cardinality, Cardinality::Repeated)
    }

    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self.cardinality, Cardinality::Map)
    }

    /// Returns `true` if the encoder should pack this list.
    #[must_use]
    pub const fn is_packed(&self) -> bool {
        self.packed
    }

    /// Returns `true` if a packed payload is a legal encoding of this field.
    #[must_use]
    pub const fn accepts_packed(&self) -> bool {
        self.is_list() && self.kind.is_packable()
    }

    /// Fully-qualified name of the referenced message type, if any.
    ///
    /// For map fields this is the synthesized entry type.
    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// Name of the oneof group this field belongs to.
    #[must_use]
    pub fn oneof(&self) -> Option<&str> {
        self.oneof.as_deref()
    }

    /// The synthesized entry descriptor of a map field.
    #[must_use]
    pub const fn map_entry(&self) -> Option<&Arc<MessageDescriptor>> {
        self.map_entry.as_ref()
    }
}
