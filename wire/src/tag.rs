//! Field tags: a field number and a wire type packed into one varint.

use std::fmt;

use bytestream::{ByteRead, ByteWriter, StreamError};

use crate::error::{WireError, WireResult};
use crate::varint::{continue_varint, encode_varint, varint_len};

/// Largest field number the format allows (2^29 - 1).
pub const MAX_FIELD_NUMBER: u32 = (1 << 29) - 1;

/// How a field's value is framed on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WireType {
    Varint = 0,
    Fixed64 = 1,
    LengthDelimited = 2,
    StartGroup = 3,
    EndGroup = 4,
    Fixed32 = 5,
}

impl WireType {
    /// Parses a wire type from the low three bits of a tag.
    pub const fn parse(value: u8) -> WireResult<Self> {
        match value {
            0 => Ok(Self::Varint),
            1 => Ok(Self::Fixed64),
            2 => Ok(Self::LengthDelimited),
            3 => Ok(Self::StartGroup),
            4 => Ok(Self::EndGroup),
            5 => Ok(Self::Fixed32),
            _ => Err(WireError::InvalidWireType { value }),
        }
    }

    /// Byte width of fixed-size wire types.
    #[must_use]
    pub const fn fixed_size(self) -> Option<usize> {
        match self {
            Self::Fixed32 => Some(4),
            Self::Fixed64 => Some(8),
            _ => None,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Varint => "varint",
            Self::Fixed64 => "64-bit",
            Self::LengthDelimited => "length-delimited",
            Self::StartGroup => "start-group",
            Self::EndGroup => "end-group",
            Self::Fixed32 => "32-bit",
        }
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded field tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag {
    pub field_number: u32,
    pub wire_type: WireType,
}

impl Tag {
    /// Creates a tag.
    #[must_use]
    pub const fn new(field_number: u32, wire_type: WireType) -> Self {
        Self {
            field_number,
            wire_type,
        }
    }

    /// Returns the raw varint value `(field_number << 3) | wire_type`.
    #[must_use]
    pub const fn raw(self) -> u64 {
        ((self.field_number as u64) << 3) | self.wire_type as u64
    }

    /// Returns the encoded length of this tag in bytes.
    #[must_use]
    pub const fn encoded_len(self) -> usize {
        varint_len(self.raw())
    }
}

/// Writes the tag for `field_number` with the given wire type.
pub fn encode_tag(field_number: u32, wire_type: WireType, out: &mut ByteWriter) {
    encode_varint(Tag::new(field_number, wire_type).raw(), out);
}

/// Reads one tag.
///
/// Returns `Ok(None)` when the input is exhausted before the first tag byte,
/// which marks a clean end of message. Running out of input inside the tag
/// varint is an error.
pub fn decode_tag<R: ByteRead>(input: &mut R) -> WireResult<Option<Tag>> {
    let first = match input.read_u8() {
        Ok(byte) => byte,
        Err(StreamError::UnexpectedEof { .. }) => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let (_, raw) = continue_varint(first, input)?;
    let wire_type = WireType::parse((raw & 0x07) as u8)?;
    let number = raw >> 3;
    if number == 0 || number > u64::from(MAX_FIELD_NUMBER) {
        return Err(WireError::InvalidFieldNumber { value: number });
    }
    Ok(Some(Tag::new(number as u32, wire_type)))
}
