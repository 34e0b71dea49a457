//! Introspection and debugging tools for dynwire.
//!
//! This crate provides utilities for looking at encoded messages:
//!
//! - Dump the raw wire structure without a schema
//! - Decode against a JSON schema and print a field tree
//!
//! # Design Principles
//!
//! - **First-class tooling** - These tools are part of the product, not afterthoughts.
//! - **Human-readable output** - Make it easy to understand what is on the wire.

mod inspect;
mod pretty;

pub use inspect::{inspect_bytes, InspectLimits, InspectReport, WireField, WireValue};
pub use pretty::{decode_with_schema, pool_from_json, MessageTree};
