//! Descriptor-driven message decoding.

use std::sync::Arc;

use bytestream::{ByteRead, SliceReader};
use schema::{
    FieldDescriptor, FieldKind, MessageDescriptor, TypeResolver, MAP_KEY_NUMBER, MAP_VALUE_NUMBER,
};
use tracing::{debug, trace};
use wire::{
    decode_double, decode_fixed32, decode_fixed64, decode_float, decode_length, decode_tag,
    decode_varint, decode_zigzag, skip_field, WireType,
};

use crate::error::{CodecError, CodecResult, LimitKind, ValueReason};
use crate::kind::wire_type_for;
use crate::limits::CodecLimits;
use crate::message::{type_mismatch, DynamicMessage};
use crate::value::{MapKey, Value};

/// Decodes one complete message from `input` into `target`.
///
/// Reads tags until the input is exhausted at a tag boundary. Fields are
/// merged into `target`: singular fields (embedded messages included) are
/// overwritten, lists are appended to and map entries are inserted by key.
/// Unknown field numbers are skipped using their wire type.
///
/// On error, fields decoded before the failure stay in `target`.
pub fn decode_message<R: ByteRead>(
    target: &mut DynamicMessage,
    input: &mut R,
    resolver: &dyn TypeResolver,
    limits: &CodecLimits,
) -> CodecResult<()> {
    let mut decoder = Decoder {
        resolver,
        limits,
        open: Vec::new(),
    };
    decoder.message(target, input)
}

/// Decodes `bytes` into `target` with default limits.
pub fn decode_from_slice(
    target: &mut DynamicMessage,
    bytes: &[u8],
    resolver: &dyn TypeResolver,
) -> CodecResult<()> {
    let mut reader = SliceReader::new(bytes);
    decode_message(target, &mut reader, resolver, &CodecLimits::default())
}

struct Decoder<'a> {
    resolver: &'a dyn TypeResolver,
    limits: &'a CodecLimits,
    /// Descriptors of the messages currently being decoded, outermost first.
    open: Vec<Arc<MessageDescriptor>>,
}

impl Decoder<'_> {
    fn message<R: ByteRead>(
        &mut self,
        target: &mut DynamicMessage,
        input: &mut R,
    ) -> CodecResult<()> {
        let depth = self.open.len();
        if depth > self.limits.max_depth {
            debug!(depth, limit = self.limits.max_depth, "nesting depth limit exceeded");
            return Err(CodecError::LimitsExceeded {
                kind: LimitKind::Depth,
                limit: self.limits.max_depth,
                actual: depth,
            });
        }

        let desc = Arc::clone(target.descriptor());
        self.open.push(Arc::clone(&desc));
        let result = self.fields(target, &desc, input);
        self.open.pop();
        result
    }

    fn fields<R: ByteRead>(
        &mut self,
        target: &mut DynamicMessage,
        desc: &MessageDescriptor,
        input: &mut R,
    ) -> CodecResult<()> {
        while let Some(tag) = decode_tag(input)? {
            let Some(field) = desc.field(tag.field_number) else {
                let skipped = skip_field(tag.wire_type, input)?;
                trace!(
                    message = desc.full_name(),
                    field = tag.field_number,
                    wire_type = %tag.wire_type,
                    skipped,
                    "skipping unknown field"
                );
                continue;
            };

            match tag.wire_type {
                WireType::LengthDelimited => {
                    self.length_delimited(target, desc, field, input)?;
                }
                WireType::Varint | WireType::Fixed64 | WireType::Fixed32 if !field.is_map() => {
                    let value = decode_scalar(field, tag.wire_type, input)?;
                    merge(target, desc, field, value)?;
                }
                wire_type => return Err(mismatch(field, wire_type)),
            }
        }
        Ok(())
    }

    fn length_delimited<R: ByteRead>(
        &mut self,
        target: &mut DynamicMessage,
        desc: &MessageDescriptor,
        field: &FieldDescriptor,
        input: &mut R,
    ) -> CodecResult<()> {
        let len = decode_length(input)?;
        let payload = self.read_payload(field, len, input)?;

        if let Some(entry) = field.map_entry() {
            let (key, value) = self.map_entry(entry, &payload)?;
            target.map_mut(field.number())?.insert(key, value);
            return Ok(());
        }

        let value = match field.kind() {
            FieldKind::Bytes => Value::Bytes(payload),
            FieldKind::String => Value::String(String::from_utf8(payload).map_err(|err| {
                CodecError::InvalidValue {
                    field: field.number(),
                    reason: ValueReason::InvalidUtf8 {
                        valid_up_to: err.utf8_error().valid_up_to(),
                    },
                }
            })?),
            FieldKind::Message => {
                let mut child = DynamicMessage::new(self.resolve(field)?);
                self.message(&mut child, &mut SliceReader::new(&payload))?;
                Value::Message(child)
            }
            _ if field.accepts_packed() => {
                let values = decode_packed(field, &payload)?;
                target.list_mut(field.number())?.extend(values);
                return Ok(());
            }
            _ => return Err(mismatch(field, WireType::LengthDelimited)),
        };
        merge(target, desc, field, value)
    }

    /// Decodes one map entry payload, filling in defaults for a missing key
    /// or value.
    fn map_entry(
        &mut self,
        entry: &Arc<MessageDescriptor>,
        payload: &[u8],
    ) -> CodecResult<(MapKey, Value)> {
        let mut message = DynamicMessage::new(Arc::clone(entry));
        self.message(&mut message, &mut SliceReader::new(payload))?;
        let (key, value) = message.take_entry();

        let key = match key {
            Some(key) => key,
            None => self.default_value(entry, MAP_KEY_NUMBER)?,
        };
        let key = MapKey::from_value(key)
            .map_err(|found| type_mismatch(MAP_KEY_NUMBER, "map key", found.type_name()))?;

        let value = match value {
            Some(value) => value,
            None => self.default_value(entry, MAP_VALUE_NUMBER)?,
        };
        Ok((key, value))
    }

    fn default_value(&self, desc: &MessageDescriptor, number: u32) -> CodecResult<Value> {
        let field = desc
            .field(number)
            .ok_or(CodecError::UnknownField { number })?;
        match Value::default_for(field.kind()) {
            Some(value) => Ok(value),
            None => Ok(Value::Message(DynamicMessage::new(self.resolve(field)?))),
        }
    }

    /// Finds the descriptor of a message-kind field's type, preferring the
    /// messages already open on the decode stack.
    fn resolve(&self, field: &FieldDescriptor) -> CodecResult<Arc<MessageDescriptor>> {
        let type_name = field.type_name().unwrap_or_default();
        if let Some(open) = self
            .open
            .iter()
            .rev()
            .find(|desc| desc.full_name() == type_name)
        {
            return Ok(Arc::clone(open));
        }
        self.resolver.resolve(type_name).ok_or_else(|| {
            debug!(type_name, field = field.number(), "unresolved message type");
            CodecError::UnresolvedType {
                type_name: type_name.to_string(),
            }
        })
    }

    /// Reads a length-delimited payload after checking its declared length.
    fn read_payload<R: ByteRead>(
        &self,
        field: &FieldDescriptor,
        len: usize,
        input: &mut R,
    ) -> CodecResult<Vec<u8>> {
        if len > self.limits.max_field_bytes {
            debug!(
                field = field.number(),
                len,
                limit = self.limits.max_field_bytes,
                "field length limit exceeded"
            );
            return Err(CodecError::LimitsExceeded {
                kind: LimitKind::FieldBytes,
                limit: self.limits.max_field_bytes,
                actual: len,
            });
        }
        if let Some(available) = input.remaining_hint() {
            if len > available {
                return Err(CodecError::TruncatedInput {
                    requested: len,
                    available,
                });
            }
        }
        let mut payload = vec![0u8; len];
        input.read_exact(&mut payload)?;
        Ok(payload)
    }
}

/// Stores a decoded value according to the field's cardinality.
fn merge(
    target: &mut DynamicMessage,
    desc: &MessageDescriptor,
    field: &FieldDescriptor,
    value: Value,
) -> CodecResult<()> {
    if field.is_list() {
        target.list_mut(field.number())?.push(value);
    } else {
        target.put(desc, field, value);
    }
    Ok(())
}

/// Decodes the back-to-back elements of a packed payload.
fn decode_packed(field: &FieldDescriptor, payload: &[u8]) -> CodecResult<Vec<Value>> {
    let wire_type = wire_type_for(field.kind());
    let mut reader = SliceReader::new(payload);
    let mut values = Vec::new();
    while !reader.is_empty() {
        match decode_scalar(field, wire_type, &mut reader) {
            Ok(value) => values.push(value),
            Err(CodecError::TruncatedInput { .. }) => {
                return Err(CodecError::MalformedPacked {
                    field: field.number(),
                    declared_len: payload.len(),
                })
            }
            Err(err) => return Err(err),
        }
    }
    Ok(values)
}

/// Reads one varint or fixed-width value and reinterprets it per the field kind.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss
)]
fn decode_scalar<R: ByteRead>(
    field: &FieldDescriptor,
    wire_type: WireType,
    input: &mut R,
) -> CodecResult<Value> {
    let value = match (wire_type, field.kind()) {
        (WireType::Varint, kind) => {
            let (_, raw) = decode_varint(input)?;
            match kind {
                FieldKind::Int32 => Value::I32(raw as i32),
                FieldKind::Int64 => Value::I64(raw as i64),
                FieldKind::Uint32 => Value::U32(raw as u32),
                FieldKind::Uint64 => Value::U64(raw),
                FieldKind::Sint32 => Value::I32(decode_zigzag(raw) as i32),
                FieldKind::Sint64 => Value::I64(decode_zigzag(raw)),
                FieldKind::Bool => Value::Bool(raw != 0),
                FieldKind::Enum => Value::Enum(raw as i32),
                _ => return Err(mismatch(field, wire_type)),
            }
        }
        (WireType::Fixed64, FieldKind::Fixed64) => Value::U64(decode_fixed64(input)?),
        (WireType::Fixed64, FieldKind::Sfixed64) => Value::I64(decode_fixed64(input)? as i64),
        (WireType::Fixed64, FieldKind::Double) => Value::F64(decode_double(input)?),
        (WireType::Fixed32, FieldKind::Fixed32) => Value::U32(decode_fixed32(input)?),
        (WireType::Fixed32, FieldKind::Sfixed32) => Value::I32(decode_fixed32(input)? as i32),
        (WireType::Fixed32, FieldKind::Float) => Value::F32(decode_float(input)?),
        _ => return Err(mismatch(field, wire_type)),
    };
    Ok(value)
}

const fn mismatch(field: &FieldDescriptor, wire_type: WireType) -> CodecError {
    CodecError::SchemaMismatch {
        field: field.number(),
        wire_type,
        kind: field.kind(),
    }
}
