//! Descriptor-driven protocol-buffers encoding and decoding.
//!
//! This is the main codec crate that ties together bytestream, wire, and
//! schema: it decodes wire bytes into dynamic messages whose shape is known
//! only at runtime, and encodes them back.
//!
//! # Features
//!
//! - Dynamic message object model (`DynamicMessage`, `Value`, `MapKey`)
//! - All scalar kinds, strings, bytes and embedded messages
//! - Packed and unpacked repeated fields, maps and oneof groups
//! - Self-referential schemas
//! - Unknown fields skipped by wire type
//! - Payload size and nesting depth limits for untrusted input
//!
//! # Design Principles
//!
//! - **Bit-exact** - Output is the standard protocol-buffers binary encoding.
//! - **Fail whole** - Any error aborts the entire call, nothing is swallowed.
//! - **Injected registry** - Nested types are found through `TypeResolver`.
//!
//! # Example
//!
//! ```
//! use codec::{decode_from_slice, encode_message, DynamicMessage, Value};
//! use schema::{DescriptorPool, FieldDef, FieldKind, MessageDef};
//!
//! let pool = DescriptorPool::from_defs([MessageDef::new("demo.Point")
//!     .field(FieldDef::new(1, "x", FieldKind::Sint32))
//!     .field(FieldDef::new(2, "y", FieldKind::Sint32))])
//! .unwrap();
//! let desc = pool.get("demo.Point").unwrap().clone();
//!
//! let mut point = DynamicMessage::new(desc.clone());
//! point.set_by_name("x", Value::I32(-5)).unwrap();
//! let bytes = encode_message(&point).unwrap();
//! assert_eq!(bytes, vec![0x08, 0x09]);
//!
//! let mut decoded = DynamicMessage::new(desc);
//! decode_from_slice(&mut decoded, &bytes, &pool).unwrap();
//! assert_eq!(decoded, point);
//! ```

mod decode;
mod encode;
mod error;
mod kind;
mod limits;
mod message;
mod value;

pub use decode::{decode_from_slice, decode_message};
pub use encode::{encode_message, encode_message_into};
pub use error::{CodecError, CodecResult, LimitKind, ValueReason};
pub use kind::wire_type_for;
pub use limits::CodecLimits;
pub use message::DynamicMessage;
pub use value::{MapKey, Value};
