//! Message definitions and validated message descriptors.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::error::{SchemaError, SchemaResult};
use crate::field::{FieldDef, FieldDescriptor};
use crate::kind::{Cardinality, FieldKind};
use crate::MAX_FIELD_NUMBER;

/// Field number of the key inside a map entry.
pub const MAP_KEY_NUMBER: u32 = 1;

/// Field number of the value inside a map entry.
pub const MAP_VALUE_NUMBER: u32 = 2;

/// Declarative message definition.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MessageDef {
    pub full_name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub fields: Vec<FieldDef>,
}

impl MessageDef {
    /// Creates a message with no fields.
    #[must_use]
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            fields: Vec::new(),
        }
    }

    /// Creates a message with the provided fields.
    #[must_use]
    pub fn with_fields(full_name: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        Self {
            full_name: full_name.into(),
            fields,
        }
    }

    /// Adds a field to the message.
    #[must_use]
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Validates and builds the runtime descriptor.
    pub fn build(self) -> SchemaResult<Arc<MessageDescriptor>> {
        MessageDescriptor::new(self)
    }
}

/// Immutable, validated schema for one message type.
///
/// Fields keep their declaration order; lookups by number and by name are
/// indexed. Message-kind fields refer to their type by name, so a descriptor
/// never owns its own type and self-referential schemas form no cycles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDescriptor {
    full_name: String,
    fields: Vec<FieldDescriptor>,
    by_number: HashMap<u32, usize>,
    by_name: HashMap<String, usize>,
    map_entry: bool,
}

impl MessageDescriptor {
    /// Validates a definition and builds its descriptor.
    ///
    /// Map fields get a synthesized entry descriptor named
    /// `<full_name>.<CamelField>Entry`.
    pub fn new(def: MessageDef) -> SchemaResult<Arc<Self>> {
        Self::build(def, false).map(Arc::new)
    }

    fn build(def: MessageDef, map_entry: bool) -> SchemaResult<Self> {
        let MessageDef { full_name, fields } = def;
        if full_name.is_empty() {
            return Err(SchemaError::EmptyMessageName);
        }

        let mut by_number = HashMap::with_capacity(fields.len());
        let mut by_name = HashMap::with_capacity(fields.len());
        let mut built = Vec::with_capacity(fields.len());
        for (index, field) in fields.into_iter().enumerate() {
            validate_field(&full_name, &field)?;
            if by_number.insert(field.number, index).is_some() {
                return Err(SchemaError::DuplicateFieldNumber {
                    message: full_name,
                    number: field.number,
                });
            }
            if by_name.insert(field.name.clone(), index).is_some() {
                return Err(SchemaError::DuplicateFieldName {
                    message: full_name,
                    field: field.name,
                });
            }
            built.push(build_field(&full_name, field)?);
        }

        Ok(Self {
            full_name,
            fields: built,
            by_number,
            by_name,
            map_entry,
        })
    }

    /// Fully-qualified type name.
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Looks up a field by number.
    #[must_use]
    pub fn field(&self, number: u32) -> Option<&FieldDescriptor> {
        self.by_number.get(&number).map(|&index| &self.fields[index])
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field_by_name(&self, name: &str) -> Option<&FieldDescriptor> {
        self.by_name.get(name).map(|&index| &self.fields[index])
    }

    /// Returns `true` for synthesized map entry types.
    #[must_use]
    pub const fn is_map_entry(&self) -> bool {
        self.map_entry
    }

    /// Other members of the oneof group `field` belongs to.
    pub fn oneof_siblings<'a>(
        &'a self,
        field: &'a FieldDescriptor,
    ) -> impl Iterator<Item = &'a FieldDescriptor> + 'a {
        self.fields.iter().filter(move |other| {
            other.number != field.number
                && other.oneof.is_some()
                && other.oneof == field.oneof
        })
    }
}

fn validate_field(message: &str, field: &FieldDef) -> SchemaResult<()> {
    let err_field = || field.name.clone();
    if field.name.is_empty() {
        return Err(SchemaError::EmptyFieldName {
            message: message.to_string(),
            number: field.number,
        });
    }
    if field.number == 0 || field.number > MAX_FIELD_NUMBER {
        return Err(SchemaError::InvalidFieldNumber {
            message: message.to_string(),
            number: field.number,
        });
    }

    match (field.kind, &field.type_name) {
        (FieldKind::Message, None) => {
            return Err(SchemaError::MissingTypeName {
                message: message.to_string(),
                field: err_field(),
            })
        }
        (kind, Some(_)) if kind != FieldKind::Message => {
            return Err(SchemaError::UnexpectedTypeName {
                message: message.to_string(),
                field: err_field(),
            })
        }
        _ => {}
    }

    if field.packed && !(field.cardinality == Cardinality::Repeated && field.kind.is_packable()) {
        return Err(SchemaError::PackedNotAllowed {
            message: message.to_string(),
            field: err_field(),
        });
    }

    match (field.cardinality, field.map_key) {
        (Cardinality::Map, None) => {
            return Err(SchemaError::MissingMapKey {
                message: message.to_string(),
                field: err_field(),
            })
        }
        (Cardinality::Map, Some(key)) if !key.is_valid_map_key() => {
            return Err(SchemaError::InvalidMapKey {
                message: message.to_string(),
                field: err_field(),
                key,
            })
        }
        (Cardinality::Singular | Cardinality::Repeated, Some(_)) => {
            return Err(SchemaError::UnexpectedMapKey {
                message: message.to_string(),
                field: err_field(),
            })
        }
        _ => {}
    }

    if field.oneof.is_some() && field.cardinality != Cardinality::Singular {
        return Err(SchemaError::OneofNotSingular {
            message: message.to_string(),
            field: err_field(),
        });
    }
    Ok(())
}

fn build_field(message: &str, field: FieldDef) -> SchemaResult<FieldDescriptor> {
    let FieldDef {
        number,
        name,
        kind,
        cardinality,
        packed,
        type_name,
        oneof,
        map_key,
    } = field;

    let Some(key) = map_key else {
        return Ok(FieldDescriptor {
            number,
            name,
            kind,
            cardinality,
            packed,
            type_name,
            oneof,
            map_entry: None,
        });
    };

    let entry_name = format!("{message}.{}Entry", camel_case(&name));
    let mut value = FieldDef::new(MAP_VALUE_NUMBER, "value", kind);
    value.type_name = type_name;
    let entry = MessageDef::new(entry_name.clone())
        .field(FieldDef::new(MAP_KEY_NUMBER, "key", key))
        .field(value);
    let entry = MessageDescriptor::build(entry, true)?;

    Ok(FieldDescriptor {
        number,
        name,
        kind: FieldKind::Message,
        cardinality,
        packed: false,
        type_name: Some(entry_name),
        oneof,
        map_entry: Some(Arc::new(entry)),
    })
}

fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = true;
    for ch in name.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person() -> MessageDef {
        MessageDef::new("test.Person")
            .field(FieldDef::new(2, "name", FieldKind::String))
            .field(FieldDef::new(1, "id", FieldKind::Int64))
            .field(FieldDef::new(3, "email", FieldKind::String).oneof("contact"))
            .field(FieldDef::new(4, "phone", FieldKind::String).oneof("contact"))
            .field(FieldDef::map(5, "tag_counts", FieldKind::String, FieldKind::Uint32))
            .field(FieldDef::message(6, "manager", "test.Person"))
    }

    #[test]
    fn fields_keep_declaration_order() {
        let desc = person().build().unwrap();
        let numbers: Vec<_> = desc.fields().iter().map(FieldDescriptor::number).collect();
        assert_eq!(numbers, vec![2, 1, 3, 4, 5, 6]);
    }

    #[test]
    fn lookup_by_number_and_name() {
        let desc = person().build().unwrap();
        assert_eq!(desc.field(1).unwrap().name(), "id");
        assert_eq!(desc.field_by_name("name").unwrap().number(), 2);
        assert!(desc.field(99).is_none());
        assert!(desc.field_by_name("missing").is_none());
    }

    #[test]
    fn map_entry_is_synthesized() {
        let desc = person().build().unwrap();
        let field = desc.field(5).unwrap();
        assert!(field.is_map());
        assert!(!field.is_list());
        assert_eq!(field.kind(), FieldKind::Message);
        assert_eq!(field.type_name(), Some("test.Person.TagCountsEntry"));

        let entry = field.map_entry().unwrap();
        assert!(entry.is_map_entry());
        assert_eq!(entry.full_name(), "test.Person.TagCountsEntry");
        assert_eq!(entry.fields().len(), 2);
        let key = entry.field(MAP_KEY_NUMBER).unwrap();
        assert_eq!((key.name(), key.kind()), ("key", FieldKind::String));
        let value = entry.field(MAP_VALUE_NUMBER).unwrap();
        assert_eq!((value.name(), value.kind()), ("value", FieldKind::Uint32));
    }

    #[test]
    fn message_valued_map_entry_keeps_type_name() {
        let desc = MessageDef::new("test.Index")
            .field(
                FieldDef::map(1, "by_id", FieldKind::Int32, FieldKind::Message)
                    .type_name("test.Person"),
            )
            .build()
            .unwrap();
        let entry = desc.field(1).unwrap().map_entry().unwrap();
        assert_eq!(entry.field(2).unwrap().type_name(), Some("test.Person"));
    }

    #[test]
    fn oneof_siblings_exclude_self() {
        let desc = person().build().unwrap();
        let email = desc.field(3).unwrap();
        let siblings: Vec<_> = desc.oneof_siblings(email).map(FieldDescriptor::name).collect();
        assert_eq!(siblings, vec!["phone"]);

        let id = desc.field(1).unwrap();
        assert_eq!(desc.oneof_siblings(id).count(), 0);
    }

    #[test]
    fn rejects_empty_names() {
        assert_eq!(
            MessageDef::new("").build().unwrap_err(),
            SchemaError::EmptyMessageName
        );
        let err = MessageDef::new("t.M")
            .field(FieldDef::new(1, "", FieldKind::Bool))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::EmptyFieldName { number: 1, .. }));
    }

    #[test]
    fn rejects_field_number_out_of_range() {
        for number in [0, MAX_FIELD_NUMBER + 1] {
            let err = MessageDef::new("t.M")
                .field(FieldDef::new(number, "x", FieldKind::Bool))
                .build()
                .unwrap_err();
            assert!(matches!(err, SchemaError::InvalidFieldNumber { .. }));
        }
        assert!(MessageDef::new("t.M")
            .field(FieldDef::new(MAX_FIELD_NUMBER, "x", FieldKind::Bool))
            .build()
            .is_ok());
    }

    #[test]
    fn rejects_duplicates() {
        let err = MessageDef::new("t.M")
            .field(FieldDef::new(1, "a", FieldKind::Bool))
            .field(FieldDef::new(1, "b", FieldKind::Bool))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateFieldNumber { number: 1, .. }));

        let err = MessageDef::new("t.M")
            .field(FieldDef::new(1, "a", FieldKind::Bool))
            .field(FieldDef::new(2, "a", FieldKind::Bool))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateFieldName { .. }));
    }

    #[test]
    fn rejects_type_name_mismatch() {
        let err = MessageDef::new("t.M")
            .field(FieldDef::new(1, "child", FieldKind::Message))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::MissingTypeName { .. }));

        let err = MessageDef::new("t.M")
            .field(FieldDef::new(1, "n", FieldKind::Int32).type_name("t.Other"))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::UnexpectedTypeName { .. }));
    }

    #[test]
    fn rejects_bad_packed() {
        let mut singular = FieldDef::new(1, "n", FieldKind::Int32);
        singular.packed = true;
        let err = MessageDef::new("t.M").field(singular).build().unwrap_err();
        assert!(matches!(err, SchemaError::PackedNotAllowed { .. }));

        let err = MessageDef::new("t.M")
            .field(FieldDef::new(1, "s", FieldKind::String).packed())
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::PackedNotAllowed { .. }));
    }

    #[test]
    fn rejects_bad_map_keys() {
        let err = MessageDef::new("t.M")
            .field(FieldDef::map(1, "m", FieldKind::Double, FieldKind::Int32))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            SchemaError::InvalidMapKey {
                key: FieldKind::Double,
                ..
            }
        ));

        let mut keyless = FieldDef::map(1, "m", FieldKind::Int32, FieldKind::Int32);
        keyless.map_key = None;
        let err = MessageDef::new("t.M").field(keyless).build().unwrap_err();
        assert!(matches!(err, SchemaError::MissingMapKey { .. }));

        let mut stray = FieldDef::new(1, "n", FieldKind::Int32);
        stray.map_key = Some(FieldKind::Int32);
        let err = MessageDef::new("t.M").field(stray).build().unwrap_err();
        assert!(matches!(err, SchemaError::UnexpectedMapKey { .. }));
    }

    #[test]
    fn rejects_repeated_oneof_member() {
        let err = MessageDef::new("t.M")
            .field(FieldDef::new(1, "n", FieldKind::Int32).repeated().oneof("g"))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::OneofNotSingular { .. }));
    }

    #[test]
    fn camel_case_entry_names() {
        assert_eq!(camel_case("tag_counts"), "TagCounts");
        assert_eq!(camel_case("attrs"), "Attrs");
        assert_eq!(camel_case("a__b"), "AB");
    }
}
