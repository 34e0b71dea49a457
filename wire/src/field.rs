//! Length-delimited framing and schema-less field skipping.

use bytestream::{ByteRead, ByteWriter};

use crate::error::{WireError, WireResult};
use crate::tag::WireType;
use crate::varint::{decode_varint, encode_varint};

/// Reads a varint length prefix as `usize`.
pub fn decode_length<R: ByteRead>(input: &mut R) -> WireResult<usize> {
    let (_, value) = decode_varint(input)?;
    usize::try_from(value).map_err(|_| WireError::LengthOverflow { value })
}

/// Writes `payload` prefixed with its varint length.
pub fn encode_length_prefixed(payload: &[u8], out: &mut ByteWriter) {
    encode_varint(payload.len() as u64, out);
    out.write_bytes(payload);
}

/// Consumes one field value using only its wire type.
///
/// Returns the number of value bytes consumed (excluding the tag). Group wire
/// types are not supported.
pub fn skip_field<R: ByteRead>(wire_type: WireType, input: &mut R) -> WireResult<usize> {
    match wire_type {
        WireType::Varint => decode_varint(input).map(|(consumed, _)| consumed),
        WireType::Fixed64 | WireType::Fixed32 => {
            let size = wire_type.fixed_size().unwrap_or_default();
            input.skip(size)?;
            Ok(size)
        }
        WireType::LengthDelimited => {
            let start = input.position();
            let len = decode_length(input)?;
            input.skip(len)?;
            Ok(input.position() - start)
        }
        WireType::StartGroup | WireType::EndGroup => {
            Err(WireError::UnsupportedWireType { wire_type })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytestream::SliceReader;

    #[test]
    fn length_prefixed_roundtrip() {
        let mut out = ByteWriter::new();
        encode_length_prefixed(b"bar", &mut out);
        assert_eq!(out.as_slice(), &[0x03, b'b', b'a', b'r']);

        let bytes = out.finish();
        let mut reader = SliceReader::new(&bytes);
        assert_eq!(decode_length(&mut reader).unwrap(), 3);
    }

    #[test]
    fn skip_each_wire_type() {
        let bytes = [
            0x96, 0x01, // varint 150
            1, 2, 3, 4, 5, 6, 7, 8, // fixed64
            0x02, 0xAA, 0xBB, // length-delimited
            9, 9, 9, 9, // fixed32
            0x42,
        ];
        let mut reader = SliceReader::new(&bytes);
        assert_eq!(skip_field(WireType::Varint, &mut reader).unwrap(), 2);
        assert_eq!(skip_field(WireType::Fixed64, &mut reader).unwrap(), 8);
        assert_eq!(skip_field(WireType::LengthDelimited, &mut reader).unwrap(), 3);
        assert_eq!(skip_field(WireType::Fixed32, &mut reader).unwrap(), 4);
        assert_eq!(reader.rest(), &[0x42]);
    }

    #[test]
    fn skip_truncated_payload_fails() {
        let mut reader = SliceReader::new(&[0x05, 1, 2]);
        let err = skip_field(WireType::LengthDelimited, &mut reader).unwrap_err();
        assert!(err.is_eof());
    }

    #[test]
    fn skip_groups_unsupported() {
        let mut reader = SliceReader::new(&[0x00]);
        assert_eq!(
            skip_field(WireType::StartGroup, &mut reader),
            Err(WireError::UnsupportedWireType {
                wire_type: WireType::StartGroup
            })
        );
    }
}
