//! Descriptor-driven message encoding.

use bytestream::ByteWriter;
use schema::{Cardinality, FieldDescriptor, FieldKind, MAP_KEY_NUMBER, MAP_VALUE_NUMBER};
use wire::{
    encode_double, encode_fixed32, encode_fixed64, encode_float, encode_length_prefixed,
    encode_tag, encode_varint, encode_zigzag, WireType,
};

use crate::error::{CodecError, CodecResult, ValueReason};
use crate::kind::{variant_name, wire_type_for};
use crate::message::{type_mismatch, DynamicMessage};
use crate::value::Value;

/// Encodes every populated field of `message`.
///
/// Fields are written in ascending field number order. Packed lists become
/// one length-delimited field, unpacked lists repeat the tag per element and
/// maps write one entry message per key, in ascending key order.
pub fn encode_message(message: &DynamicMessage) -> CodecResult<Vec<u8>> {
    let mut out = ByteWriter::new();
    write_message(message, &mut out)?;
    Ok(out.finish())
}

/// Appends the encoding of `message` to `out`.
///
/// `out` is left untouched if encoding fails.
pub fn encode_message_into(message: &DynamicMessage, out: &mut ByteWriter) -> CodecResult<()> {
    let bytes = encode_message(message)?;
    out.write_bytes(&bytes);
    Ok(())
}

fn write_message(message: &DynamicMessage, out: &mut ByteWriter) -> CodecResult<()> {
    for (field, value) in message.fields() {
        write_field(field, value, out)?;
    }
    Ok(())
}

fn write_field(field: &FieldDescriptor, value: &Value, out: &mut ByteWriter) -> CodecResult<()> {
    match (field.cardinality(), value) {
        (Cardinality::Singular, _) => write_tagged(field, value, out),
        (Cardinality::Repeated, Value::List(items)) if field.is_packed() => {
            let mut body = ByteWriter::new();
            for item in items {
                write_bare(field, item, &mut body)?;
            }
            encode_tag(field.number(), WireType::LengthDelimited, out);
            encode_length_prefixed(body.as_slice(), out);
            Ok(())
        }
        (Cardinality::Repeated, Value::List(items)) => items
            .iter()
            .try_for_each(|item| write_tagged(field, item, out)),
        (Cardinality::Map, Value::Map(entries)) => {
            let entry = field.map_entry().ok_or(CodecError::UnresolvedType {
                type_name: field.type_name().unwrap_or_default().to_string(),
            })?;
            let (Some(key_field), Some(value_field)) =
                (entry.field(MAP_KEY_NUMBER), entry.field(MAP_VALUE_NUMBER))
            else {
                return Err(CodecError::UnresolvedType {
                    type_name: entry.full_name().to_string(),
                });
            };
            let mut body = ByteWriter::new();
            for (key, item) in entries {
                body.clear();
                write_tagged(key_field, &Value::from(key.clone()), &mut body)
                    .and_then(|()| write_tagged(value_field, item, &mut body))
                    .map_err(|err| reattribute(err, field))?;
                encode_tag(field.number(), WireType::LengthDelimited, out);
                encode_length_prefixed(body.as_slice(), out);
            }
            Ok(())
        }
        (Cardinality::Repeated, other) => {
            Err(type_mismatch(field.number(), "list", other.type_name()))
        }
        (Cardinality::Map, other) => Err(type_mismatch(field.number(), "map", other.type_name())),
    }
}

/// Writes the tag and value of one singular value or unpacked element.
fn write_tagged(field: &FieldDescriptor, value: &Value, out: &mut ByteWriter) -> CodecResult<()> {
    encode_tag(field.number(), wire_type_for(field.kind()), out);
    write_bare(field, value, out)
}

/// Writes one value without a tag.
#[allow(clippy::cast_sign_loss)]
fn write_bare(field: &FieldDescriptor, value: &Value, out: &mut ByteWriter) -> CodecResult<()> {
    match (field.kind(), value) {
        (FieldKind::Int32, Value::I32(v)) | (FieldKind::Enum, Value::Enum(v)) => {
            encode_varint(i64::from(*v) as u64, out);
        }
        (FieldKind::Int64, Value::I64(v)) => encode_varint(*v as u64, out),
        (FieldKind::Uint32, Value::U32(v)) => encode_varint(u64::from(*v), out),
        (FieldKind::Uint64, Value::U64(v)) => encode_varint(*v, out),
        (FieldKind::Sint32, Value::I32(v)) => encode_varint(encode_zigzag(i64::from(*v)), out),
        (FieldKind::Sint64, Value::I64(v)) => encode_varint(encode_zigzag(*v), out),
        (FieldKind::Bool, Value::Bool(v)) => encode_varint(u64::from(*v), out),
        (FieldKind::Fixed32, Value::U32(v)) => encode_fixed32(*v, out),
        (FieldKind::Sfixed32, Value::I32(v)) => encode_fixed32(*v as u32, out),
        (FieldKind::Float, Value::F32(v)) => encode_float(*v, out),
        (FieldKind::Fixed64, Value::U64(v)) => encode_fixed64(*v, out),
        (FieldKind::Sfixed64, Value::I64(v)) => encode_fixed64(*v as u64, out),
        (FieldKind::Double, Value::F64(v)) => encode_double(*v, out),
        (FieldKind::Bytes, Value::Bytes(v)) => encode_length_prefixed(v, out),
        (FieldKind::String, Value::String(v)) => encode_length_prefixed(v.as_bytes(), out),
        (FieldKind::Message, Value::Message(message)) => {
            if field.type_name() != Some(message.full_name()) {
                return Err(CodecError::InvalidValue {
                    field: field.number(),
                    reason: ValueReason::WrongMessageType,
                });
            }
            let mut body = ByteWriter::new();
            write_message(message, &mut body)?;
            encode_length_prefixed(body.as_slice(), out);
        }
        (kind, other) => {
            return Err(type_mismatch(
                field.number(),
                variant_name(kind),
                other.type_name(),
            ))
        }
    }
    Ok(())
}

/// Reports an invalid key or value of a map entry against the map field.
fn reattribute(err: CodecError, field: &FieldDescriptor) -> CodecError {
    match err {
        CodecError::InvalidValue { reason, .. } => CodecError::InvalidValue {
            field: field.number(),
            reason,
        },
        other => other,
    }
}
