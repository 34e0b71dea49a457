//! Runtime message descriptors for the dynwire codec.
//!
//! This crate describes message shapes at runtime:
//! - Field kinds and cardinalities
//! - Declarative definitions (`MessageDef`, `FieldDef`), loadable from JSON
//!   with the `serde` feature
//! - Validated descriptors with synthesized map entry types and oneof groups
//! - A type registry (`DescriptorPool`) behind the `TypeResolver` capability
//!
//! # Design Principles
//!
//! - **Runtime-first** - Schemas are data, no generated code is involved.
//! - **Validated once** - Descriptors are checked when built and immutable afterwards.
//! - **No cycles** - Message fields name their type, the registry resolves it.
//!
//! # Example
//!
//! ```
//! use schema::{DescriptorPool, FieldDef, FieldKind, MessageDef, TypeResolver};
//!
//! let pool = DescriptorPool::from_defs([MessageDef::new("demo.Tree")
//!     .field(FieldDef::new(1, "label", FieldKind::String))
//!     .field(FieldDef::message(2, "children", "demo.Tree").repeated())])
//! .unwrap();
//!
//! let tree = pool.resolve("demo.Tree").unwrap();
//! assert_eq!(tree.field(2).unwrap().type_name(), Some("demo.Tree"));
//! ```

mod error;
mod field;
mod kind;
mod message;
mod pool;

pub use error::{SchemaError, SchemaResult};
pub use field::{FieldDef, FieldDescriptor};
pub use kind::{Cardinality, FieldKind};
pub use message::{MessageDef, MessageDescriptor, MAP_KEY_NUMBER, MAP_VALUE_NUMBER};
pub use pool::{DescriptorPool, TypeResolver};

/// Largest field number the wire format allows (2^29 - 1).
pub const MAX_FIELD_NUMBER: u32 = (1 << 29) - 1;
