//! Schema-less inspection of wire bytes.

use std::fmt;

use bytestream::{ByteRead, SliceReader};
use serde::Serialize;
use wire::{
    decode_fixed32, decode_fixed64, decode_length, decode_tag, decode_varint, WireError,
    WireResult, WireType,
};

/// Bounds for the nested dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InspectLimits {
    /// How many levels of length-delimited payloads are tried as messages.
    pub max_depth: usize,
}

impl Default for InspectLimits {
    fn default() -> Self {
        Self { max_depth: 16 }
    }
}

impl InspectLimits {
    #[must_use]
    pub const fn for_testing() -> Self {
        Self { max_depth: 2 }
    }
}

/// Structure of one encoded message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectReport {
    pub size: usize,
    pub fields: Vec<WireField>,
}

/// One field occurrence on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WireField {
    pub number: u32,
    pub wire_type: String,
    /// Offset of the tag from the start of the outermost message.
    pub offset: usize,
    /// Encoded size including the tag.
    pub size: usize,
    pub value: WireValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WireValue {
    Varint {
        value: u64,
    },
    Fixed64 {
        bits: u64,
    },
    Fixed32 {
        bits: u32,
    },
    LengthDelimited {
        len: usize,
        /// Printable UTF-8 payloads that do not parse as a message.
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        /// Payloads that parse as a complete message.
        #[serde(skip_serializing_if = "Option::is_none")]
        nested: Option<Vec<WireField>>,
    },
}

/// Dumps the field structure of `bytes` without a schema.
///
/// Group wire types are rejected, as everywhere else.
pub fn inspect_bytes(bytes: &[u8], limits: &InspectLimits) -> WireResult<InspectReport> {
    Ok(InspectReport {
        size: bytes.len(),
        fields: parse_fields(bytes, 0, 0, limits)?,
    })
}

fn parse_fields(
    bytes: &[u8],
    base: usize,
    depth: usize,
    limits: &InspectLimits,
) -> WireResult<Vec<WireField>> {
    let mut reader = SliceReader::new(bytes);
    let mut fields = Vec::new();
    loop {
        let start = reader.position();
        let Some(tag) = decode_tag(&mut reader)? else {
            break;
        };
        let value = match tag.wire_type {
            WireType::Varint => WireValue::Varint {
                value: decode_varint(&mut reader)?.1,
            },
            WireType::Fixed64 => WireValue::Fixed64 {
                bits: decode_fixed64(&mut reader)?,
            },
            WireType::Fixed32 => WireValue::Fixed32 {
                bits: decode_fixed32(&mut reader)?,
            },
            WireType::LengthDelimited => {
                let len = decode_length(&mut reader)?;
                let payload_offset = base + reader.position();
                let payload = reader.read_slice(len)?;
                let nested = if depth < limits.max_depth && !payload.is_empty() {
                    parse_fields(payload, payload_offset, depth + 1, limits)
                        .ok()
                        .filter(|fields| !fields.is_empty())
                } else {
                    None
                };
                let text = if nested.is_none() {
                    printable_text(payload)
                } else {
                    None
                };
                WireValue::LengthDelimited { len, text, nested }
            }
            wire_type => return Err(WireError::UnsupportedWireType { wire_type }),
        };
        fields.push(WireField {
            number: tag.field_number,
            wire_type: tag.wire_type.to_string(),
            offset: base + start,
            size: reader.position() - start,
            value,
        });
    }
    Ok(fields)
}

fn printable_text(payload: &[u8]) -> Option<String> {
    let text = std::str::from_utf8(payload).ok()?;
    if text.is_empty() || text.chars().any(char::is_control) {
        return None;
    }
    Some(text.to_string())
}

impl fmt::Display for InspectReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "message: {} bytes, {} fields", self.size, self.fields.len())?;
        write_fields(f, &self.fields, 1)
    }
}

fn write_fields(f: &mut fmt::Formatter<'_>, fields: &[WireField], indent: usize) -> fmt::Result {
    for field in fields {
        write!(
            f,
            "{:width$}#{} {} @{} ({} bytes): ",
            "",
            field.number,
            field.wire_type,
            field.offset,
            field.size,
            width = indent * 2
        )?;
        match &field.value {
            WireValue::Varint { value } => writeln!(f, "{value}")?,
            WireValue::Fixed64 { bits } => writeln!(f, "0x{bits:016x}")?,
            WireValue::Fixed32 { bits } => writeln!(f, "0x{bits:08x}")?,
            WireValue::LengthDelimited { len, text, nested } => {
                match text {
                    Some(text) => writeln!(f, "{len} bytes {text:?}")?,
                    None => writeln!(f, "{len} bytes")?,
                }
                if let Some(nested) = nested {
                    write_fields(f, nested, indent + 1)?;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_fields() {
        let report = inspect_bytes(
            &[0x08, 0x96, 0x01, 0x15, 1, 0, 0, 0, 0x19, 0, 0, 0, 0, 0, 0, 0, 0x80],
            &InspectLimits::default(),
        )
        .unwrap();
        assert_eq!(report.size, 17);
        assert_eq!(
            report.fields,
            vec![
                WireField {
                    number: 1,
                    wire_type: "varint".to_string(),
                    offset: 0,
                    size: 3,
                    value: WireValue::Varint { value: 150 },
                },
                WireField {
                    number: 2,
                    wire_type: "32-bit".to_string(),
                    offset: 3,
                    size: 5,
                    value: WireValue::Fixed32 { bits: 1 },
                },
                WireField {
                    number: 3,
                    wire_type: "64-bit".to_string(),
                    offset: 8,
                    size: 9,
                    value: WireValue::Fixed64 {
                        bits: 0x8000_0000_0000_0000
                    },
                },
            ]
        );
    }

    #[test]
    fn nested_message_offsets_are_absolute() {
        // field 4 { field 1 = 7 }
        let report = inspect_bytes(&[0x22, 0x02, 0x08, 0x07], &InspectLimits::default()).unwrap();
        let WireValue::LengthDelimited { len, nested, text } = &report.fields[0].value else {
            panic!("expected length-delimited");
        };
        assert_eq!(*len, 2);
        assert!(text.is_none());
        let nested = nested.as_ref().unwrap();
        assert_eq!(nested[0].offset, 2);
        assert_eq!(nested[0].value, WireValue::Varint { value: 7 });
    }

    #[test]
    fn text_payload_is_not_nested() {
        // "hello" does not parse as a message: 'h' is field 13 with wire type 0,
        // then 'e' is a varint, then 'l' is field 13 again with wire type 4.
        let report =
            inspect_bytes(&[0x0A, 0x05, b'h', b'e', b'l', b'l', b'o'], &InspectLimits::default())
                .unwrap();
        assert_eq!(
            report.fields[0].value,
            WireValue::LengthDelimited {
                len: 5,
                text: Some("hello".to_string()),
                nested: None,
            }
        );
    }

    #[test]
    fn depth_limit_stops_nesting() {
        let bytes = [0x0A, 0x04, 0x0A, 0x02, 0x08, 0x01];
        let limits = InspectLimits { max_depth: 1 };
        let report = inspect_bytes(&bytes, &limits).unwrap();
        let WireValue::LengthDelimited {
            nested: Some(level1),
            ..
        } = &report.fields[0].value
        else {
            panic!("expected nested message");
        };
        assert!(matches!(
            level1[0].value,
            WireValue::LengthDelimited { nested: None, .. }
        ));
    }

    #[test]
    fn truncated_input_is_an_error() {
        assert!(inspect_bytes(&[0x0A, 0x05, 0x01], &InspectLimits::default()).is_err());
        assert!(inspect_bytes(&[0x0B], &InspectLimits::default()).is_err());
    }

    #[test]
    fn text_rendering() {
        let report = inspect_bytes(&[0x22, 0x02, 0x08, 0x07], &InspectLimits::default()).unwrap();
        assert_eq!(
            report.to_string(),
            "message: 4 bytes, 1 fields\n  #4 length-delimited @0 (4 bytes): 2 bytes\n    #1 varint @2 (2 bytes): 7\n"
        );
    }

    #[test]
    fn json_rendering() {
        let report = inspect_bytes(&[0x08, 0x01], &InspectLimits::default()).unwrap();
        assert_eq!(
            serde_json::to_string(&report).unwrap(),
            r#"{"size":2,"fields":[{"number":1,"wire_type":"varint","offset":0,"size":2,"value":{"kind":"varint","value":1}}]}"#
        );
    }
}
