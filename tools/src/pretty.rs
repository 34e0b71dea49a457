//! Schema-driven decoding and tree rendering.

use std::fmt;

use anyhow::{Context, Result};
use codec::{decode_from_slice, CodecError, CodecResult, DynamicMessage, MapKey, Value};
use schema::{DescriptorPool, MessageDef, TypeResolver};

/// Builds a pool from a JSON array of message definitions.
pub fn pool_from_json(json: &str) -> Result<DescriptorPool> {
    let defs: Vec<MessageDef> = serde_json::from_str(json).context("parse schema json")?;
    DescriptorPool::from_defs(defs).context("schema validation failed")
}

/// Decodes `bytes` as the message type `full_name` from `pool`.
pub fn decode_with_schema(
    bytes: &[u8],
    pool: &DescriptorPool,
    full_name: &str,
) -> CodecResult<DynamicMessage> {
    let desc = pool
        .resolve(full_name)
        .ok_or_else(|| CodecError::UnresolvedType {
            type_name: full_name.to_string(),
        })?;
    let mut message = DynamicMessage::new(desc);
    decode_from_slice(&mut message, bytes, pool)?;
    Ok(message)
}

/// Renders a message as an indented field tree.
pub struct MessageTree<'a>(pub &'a DynamicMessage);

impl fmt::Display for MessageTree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {{", self.0.full_name())?;
        write_body(f, self.0, 1)?;
        writeln!(f, "}}")
    }
}

fn write_body(f: &mut fmt::Formatter<'_>, message: &DynamicMessage, indent: usize) -> fmt::Result {
    for (field, value) in message.fields() {
        match value {
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    write_entry(f, &format!("{}[{i}]", field.name()), item, indent)?;
                }
            }
            Value::Map(entries) => {
                for (key, item) in entries {
                    let label = format!("{}[{}]", field.name(), KeyLabel(key));
                    write_entry(f, &label, item, indent)?;
                }
            }
            other => write_entry(f, field.name(), other, indent)?,
        }
    }
    Ok(())
}

fn write_entry(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    value: &Value,
    indent: usize,
) -> fmt::Result {
    let pad = indent * 2;
    match value {
        Value::Message(child) => {
            writeln!(f, "{:pad$}{label} {{", "")?;
            write_body(f, child, indent + 1)?;
            writeln!(f, "{:pad$}}}", "")
        }
        other => writeln!(f, "{:pad$}{label}: {}", "", Scalar(other)),
    }
}

struct Scalar<'a>(&'a Value);

impl fmt::Display for Scalar<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::I32(v) => write!(f, "{v}"),
            Value::I64(v) => write!(f, "{v}"),
            Value::U32(v) => write!(f, "{v}"),
            Value::U64(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Enum(v) => write!(f, "enum {v}"),
            Value::F32(v) => write!(f, "{v:?}"),
            Value::F64(v) => write!(f, "{v:?}"),
            Value::String(v) => write!(f, "{v:?}"),
            Value::Bytes(v) => write!(f, "b\"{}\"", v.escape_ascii()),
            Value::Message(m) => write!(f, "{} {{..}}", m.full_name()),
            Value::List(items) => write!(f, "[{} items]", items.len()),
            Value::Map(entries) => write!(f, "{{{} entries}}", entries.len()),
        }
    }
}

struct KeyLabel<'a>(&'a MapKey);

impl fmt::Display for KeyLabel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            MapKey::Bool(v) => write!(f, "{v}"),
            MapKey::I32(v) => write!(f, "{v}"),
            MapKey::I64(v) => write!(f, "{v}"),
            MapKey::U32(v) => write!(f, "{v}"),
            MapKey::U64(v) => write!(f, "{v}"),
            MapKey::String(v) => write!(f, "{v:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"[
      {
        "full_name": "demo.Order",
        "fields": [
          { "number": 1, "name": "id", "kind": "uint64" },
          { "number": 2, "name": "lines", "kind": "message", "cardinality": "repeated", "type_name": "demo.Line" },
          { "number": 3, "name": "tags", "kind": "string", "cardinality": "map", "map_key": "int32" },
          { "number": 4, "name": "raw", "kind": "bytes" }
        ]
      },
      {
        "full_name": "demo.Line",
        "fields": [
          { "number": 1, "name": "sku", "kind": "string" },
          { "number": 2, "name": "qty", "kind": "sint32" }
        ]
      }
    ]"#;

    fn order_bytes() -> Vec<u8> {
        vec![
            0x08, 0x2A, // id = 42
            0x12, 0x05, 0x0A, 0x01, b'a', 0x10, 0x03, // lines[0] = { sku "a", qty -2 }
            0x1A, 0x05, 0x08, 0x07, 0x12, 0x01, b'x', // tags[7] = "x"
            0x22, 0x02, 0x00, b'z', // raw
        ]
    }

    #[test]
    fn decode_and_render_tree() {
        let pool = pool_from_json(SCHEMA).unwrap();
        let message = decode_with_schema(&order_bytes(), &pool, "demo.Order").unwrap();
        assert_eq!(
            MessageTree(&message).to_string(),
            "demo.Order {\n  id: 42\n  lines[0] {\n    sku: \"a\"\n    qty: -2\n  }\n  tags[7]: \"x\"\n  raw: b\"\\x00z\"\n}\n"
        );
    }

    #[test]
    fn unknown_message_name() {
        let pool = pool_from_json(SCHEMA).unwrap();
        let err = decode_with_schema(&[], &pool, "demo.Nope").unwrap_err();
        assert_eq!(
            err,
            CodecError::UnresolvedType {
                type_name: "demo.Nope".to_string()
            }
        );
    }

    #[test]
    fn invalid_schema_is_reported() {
        let err = pool_from_json(r#"[{ "full_name": "", "fields": [] }]"#).unwrap_err();
        assert!(err.to_string().contains("schema validation failed"));
        assert!(pool_from_json("not json").is_err());
    }
}
