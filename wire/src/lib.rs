//! Protocol-buffers wire primitives for the dynwire codec.
//!
//! This crate handles the binary wire format at the value level: base-128
//! varints, the zigzag transform, little-endian fixed-width values, field tags,
//! length prefixes, and schema-less skipping. It does not know about message
//! descriptors, only about how bytes are framed.
//!
//! # Design Principles
//!
//! - **Bit-exact** - Output matches the standard protocol-buffers binary encoding.
//! - **Bounded decoding** - Every read is checked against the underlying stream.
//! - **No domain knowledge** - This crate frames values, it does not interpret fields.
//!
//! # Example
//!
//! ```
//! use bytestream::{ByteWriter, SliceReader};
//! use wire::{decode_tag, decode_varint, encode_tag, encode_varint, encode_zigzag, Tag, WireType};
//!
//! let mut out = ByteWriter::new();
//! encode_tag(1, WireType::Varint, &mut out);
//! encode_varint(encode_zigzag(-5), &mut out);
//! assert_eq!(out.as_slice(), &[0x08, 0x09]);
//!
//! let bytes = out.finish();
//! let mut reader = SliceReader::new(&bytes);
//! assert_eq!(decode_tag(&mut reader).unwrap(), Some(Tag::new(1, WireType::Varint)));
//! assert_eq!(decode_varint(&mut reader).unwrap(), (1, 9));
//! ```

mod error;
mod field;
mod fixed;
mod tag;
mod varint;

pub use error::{WireError, WireResult};
pub use field::{decode_length, encode_length_prefixed, skip_field};
pub use fixed::{
    decode_double, decode_fixed32, decode_fixed64, decode_float, encode_double, encode_fixed32,
    encode_fixed64, encode_float,
};
pub use tag::{decode_tag, encode_tag, Tag, WireType, MAX_FIELD_NUMBER};
pub use varint::{
    decode_varint, decode_zigzag, encode_varint, encode_zigzag, varint_len, MAX_VARINT_LEN,
};
