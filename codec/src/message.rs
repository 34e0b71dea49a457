//! The dynamic message object model.

use std::collections::BTreeMap;
use std::sync::Arc;

use schema::{Cardinality, FieldDescriptor, MessageDescriptor, MAP_KEY_NUMBER, MAP_VALUE_NUMBER};

use crate::error::{CodecError, CodecResult, ValueReason};
use crate::kind::variant_name;
use crate::value::{MapKey, Value};

/// A message whose shape is given by a runtime descriptor.
///
/// Values are stored by field number. Empty lists and maps count as unset:
/// [`fields`](Self::fields) skips them and equality ignores them.
#[derive(Debug, Clone)]
pub struct DynamicMessage {
    desc: Arc<MessageDescriptor>,
    fields: BTreeMap<u32, Value>,
}

impl DynamicMessage {
    /// Creates an empty message of the described type.
    #[must_use]
    pub const fn new(desc: Arc<MessageDescriptor>) -> Self {
        Self {
            desc,
            fields: BTreeMap::new(),
        }
    }

    #[must_use]
    pub const fn descriptor(&self) -> &Arc<MessageDescriptor> {
        &self.desc
    }

    #[must_use]
    pub fn full_name(&self) -> &str {
        self.desc.full_name()
    }

    /// Returns `true` if the field holds a value (non-empty for lists and maps).
    #[must_use]
    pub fn has(&self, number: u32) -> bool {
        self.fields
            .get(&number)
            .is_some_and(|value| !value.is_empty_container())
    }

    /// Current value of a field, if set.
    #[must_use]
    pub fn get(&self, number: u32) -> Option<&Value> {
        self.fields.get(&number)
    }

    /// Current value of a field looked up by name.
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&Value> {
        let field = self.desc.field_by_name(name)?;
        self.fields.get(&field.number())
    }

    /// Mutable access to a field's current value.
    pub fn get_mut(&mut self, number: u32) -> Option<&mut Value> {
        self.fields.get_mut(&number)
    }

    /// Sets a field after checking the value against its descriptor.
    ///
    /// Setting a oneof member clears every other member of its group.
    pub fn set(&mut self, number: u32, value: Value) -> CodecResult<()> {
        let desc = Arc::clone(&self.desc);
        let field = desc
            .field(number)
            .ok_or(CodecError::UnknownField { number })?;
        check_field_value(field, &value)?;
        self.put(&desc, field, value);
        Ok(())
    }

    /// Sets a field looked up by name.
    pub fn set_by_name(&mut self, name: &str, value: Value) -> CodecResult<()> {
        let number = self
            .desc
            .field_by_name(name)
            .map(FieldDescriptor::number)
            .ok_or_else(|| CodecError::UnknownFieldName {
                name: name.to_string(),
            })?;
        self.set(number, value)
    }

    /// Removes a field's value and returns it.
    pub fn clear(&mut self, number: u32) -> Option<Value> {
        self.fields.remove(&number)
    }

    /// The list of a repeated field, created empty on first access.
    pub fn list_mut(&mut self, number: u32) -> CodecResult<&mut Vec<Value>> {
        let field = self
            .desc
            .field(number)
            .ok_or(CodecError::UnknownField { number })?;
        if !field.is_list() {
            return Err(cardinality_mismatch(field, "list"));
        }
        match self
            .fields
            .entry(number)
            .or_insert_with(|| Value::List(Vec::new()))
        {
            Value::List(items) => Ok(items),
            other => Err(CodecError::InvalidValue {
                field: number,
                reason: ValueReason::TypeMismatch {
                    expected: "list",
                    found: other.type_name(),
                },
            }),
        }
    }

    /// The map of a map field, created empty on first access.
    pub fn map_mut(&mut self, number: u32) -> CodecResult<&mut BTreeMap<MapKey, Value>> {
        let field = self
            .desc
            .field(number)
            .ok_or(CodecError::UnknownField { number })?;
        if !field.is_map() {
            return Err(cardinality_mismatch(field, "map"));
        }
        match self
            .fields
            .entry(number)
            .or_insert_with(|| Value::Map(BTreeMap::new()))
        {
            Value::Map(entries) => Ok(entries),
            other => Err(CodecError::InvalidValue {
                field: number,
                reason: ValueReason::TypeMismatch {
                    expected: "map",
                    found: other.type_name(),
                },
            }),
        }
    }

    /// Populated fields in ascending field number order.
    pub fn fields(&self) -> impl Iterator<Item = (&FieldDescriptor, &Value)> + '_ {
        self.fields
            .iter()
            .filter(|(_, value)| !value.is_empty_container())
            .filter_map(|(number, value)| {
                self.desc.field(*number).map(|field| (field, value))
            })
    }

    /// Number of populated fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields().next().is_none()
    }

    /// Stores an already checked value, clearing oneof siblings.
    pub(crate) fn put(
        &mut self,
        desc: &MessageDescriptor,
        field: &FieldDescriptor,
        value: Value,
    ) {
        for sibling in desc.oneof_siblings(field) {
            self.fields.remove(&sibling.number());
        }
        self.fields.insert(field.number(), value);
    }

    /// Splits a decoded map entry into its key and value fields.
    pub(crate) fn take_entry(mut self) -> (Option<Value>, Option<Value>) {
        (
            self.fields.remove(&MAP_KEY_NUMBER),
            self.fields.remove(&MAP_VALUE_NUMBER),
        )
    }
}

impl PartialEq for DynamicMessage {
    fn eq(&self, other: &Self) -> bool {
        self.full_name() == other.full_name()
            && self
                .fields()
                .map(|(field, value)| (field.number(), value))
                .eq(other.fields().map(|(field, value)| (field.number(), value)))
    }
}

/// Checks that `value` matches the kind and cardinality of `field`.
pub(crate) fn check_field_value(field: &FieldDescriptor, value: &Value) -> CodecResult<()> {
    match (field.cardinality(), value) {
        (Cardinality::Singular, _) => check_element(field, value),
        (Cardinality::Repeated, Value::List(items)) => {
            items.iter().try_for_each(|item| check_element(field, item))
        }
        (Cardinality::Map, Value::Map(entries)) => {
            let Some(entry) = field.map_entry() else {
                return Err(cardinality_mismatch(field, "map"));
            };
            let (Some(key_field), Some(value_field)) =
                (entry.field(MAP_KEY_NUMBER), entry.field(MAP_VALUE_NUMBER))
            else {
                return Err(cardinality_mismatch(field, "map"));
            };
            for (key, item) in entries {
                if !key.is_kind(key_field.kind()) {
                    return Err(type_mismatch(
                        field.number(),
                        variant_name(key_field.kind()),
                        key.type_name(),
                    ));
                }
                check_element(value_field, item).map_err(|err| match err {
                    CodecError::InvalidValue { reason, .. } => CodecError::InvalidValue {
                        field: field.number(),
                        reason,
                    },
                    other => other,
                })?;
            }
            Ok(())
        }
        (Cardinality::Repeated, other) => {
            Err(type_mismatch(field.number(), "list", other.type_name()))
        }
        (Cardinality::Map, other) => Err(type_mismatch(field.number(), "map", other.type_name())),
    }
}

/// Checks one singular value, list element or map value.
pub(crate) fn check_element(field: &FieldDescriptor, value: &Value) -> CodecResult<()> {
    if !value.is_kind(field.kind()) {
        return Err(type_mismatch(
            field.number(),
            variant_name(field.kind()),
            value.type_name(),
        ));
    }
    if let Value::Message(message) = value {
        if field.type_name() != Some(message.full_name()) {
            return Err(CodecError::InvalidValue {
                field: field.number(),
                reason: ValueReason::WrongMessageType,
            });
        }
    }
    Ok(())
}

pub(crate) const fn type_mismatch(
    field: u32,
    expected: &'static str,
    found: &'static str,
) -> CodecError {
    CodecError::InvalidValue {
        field,
        reason: ValueReason::TypeMismatch { expected, found },
    }
}

fn cardinality_mismatch(field: &FieldDescriptor, expected: &'static str) -> CodecError {
    let found = match field.cardinality() {
        Cardinality::Singular => "singular",
        Cardinality::Repeated => "list",
        Cardinality::Map => "map",
    };
    type_mismatch(field.number(), expected, found)
}
