//! Byte-level reader and writer primitives for the dynwire codec.
//!
//! This crate provides the [`ByteRead`] input contract consumed by the decoder,
//! two implementations of it ([`SliceReader`] for in-memory buffers and
//! [`IoReader`] for any [`std::io::Read`]), and the growable [`ByteWriter`]
//! used by the encoder.
//!
//! # Design Principles
//!
//! - **No unsafe code** - Safety is paramount.
//! - **Bounded operations** - All reads are bounds-checked.
//! - **No domain knowledge** - This crate knows nothing about tags, wire types, or schemas.
//! - **Explicit errors** - All failures return structured errors, never panic.
//!
//! # Example
//!
//! ```
//! use bytestream::{ByteRead, ByteWriter, SliceReader};
//!
//! let mut writer = ByteWriter::new();
//! writer.write_u8(0x08);
//! writer.write_bytes(&[0x96, 0x01]);
//!
//! let bytes = writer.finish();
//!
//! let mut reader = SliceReader::new(&bytes);
//! assert_eq!(reader.read_u8().unwrap(), 0x08);
//! assert_eq!(reader.read_array::<2>().unwrap(), [0x96, 0x01]);
//! assert!(reader.is_empty());
//! ```

mod error;
mod reader;
mod writer;

pub use error::{StreamError, StreamResult};
pub use reader::{ByteRead, IoReader, SliceReader};
pub use writer::ByteWriter;
