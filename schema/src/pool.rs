//! Message type registry.

use std::collections::HashMap;
use std::hash::BuildHasher;
use std::sync::Arc;

use crate::error::{SchemaError, SchemaResult};
use crate::message::{MessageDef, MessageDescriptor};

/// Resolves a fully-qualified message type name to its descriptor.
///
/// This is the only capability the decoder needs from a registry.
pub trait TypeResolver {
    fn resolve(&self, full_name: &str) -> Option<Arc<MessageDescriptor>>;
}

impl<S: BuildHasher> TypeResolver for HashMap<String, Arc<MessageDescriptor>, S> {
    fn resolve(&self, full_name: &str) -> Option<Arc<MessageDescriptor>> {
        self.get(full_name).cloned()
    }
}

impl<T: TypeResolver + ?Sized> TypeResolver for Arc<T> {
    fn resolve(&self, full_name: &str) -> Option<Arc<MessageDescriptor>> {
        (**self).resolve(full_name)
    }
}

/// A set of message descriptors addressed by full name.
#[derive(Debug, Clone, Default)]
pub struct DescriptorPool {
    messages: HashMap<String, Arc<MessageDescriptor>>,
}

impl DescriptorPool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds every definition and checks that all referenced types exist.
    pub fn from_defs(defs: impl IntoIterator<Item = MessageDef>) -> SchemaResult<Self> {
        let mut pool = Self::new();
        for def in defs {
            pool.add(def)?;
        }
        pool.validate_references()?;
        Ok(pool)
    }

    /// Builds and registers one definition.
    ///
    /// References to other types are not checked until
    /// [`validate_references`](Self::validate_references).
    pub fn add(&mut self, def: MessageDef) -> SchemaResult<Arc<MessageDescriptor>> {
        let desc = MessageDescriptor::new(def)?;
        self.add_descriptor(Arc::clone(&desc))?;
        Ok(desc)
    }

    /// Registers an already built descriptor.
    pub fn add_descriptor(&mut self, desc: Arc<MessageDescriptor>) -> SchemaResult<()> {
        if self.messages.contains_key(desc.full_name()) {
            return Err(SchemaError::DuplicateMessage {
                name: desc.full_name().to_string(),
            });
        }
        self.messages.insert(desc.full_name().to_string(), desc);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, full_name: &str) -> Option<&Arc<MessageDescriptor>> {
        self.messages.get(full_name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Registered type names in ascending order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.messages.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Checks that every message field, including map values, names a
    /// registered type.
    pub fn validate_references(&self) -> SchemaResult<()> {
        for name in self.names() {
            let Some(desc) = self.messages.get(name) else {
                continue;
            };
            self.check_message(desc)?;
        }
        Ok(())
    }

    fn check_message(&self, desc: &MessageDescriptor) -> SchemaResult<()> {
        for field in desc.fields() {
            if let Some(entry) = field.map_entry() {
                self.check_message(entry)?;
                continue;
            }
            let Some(type_name) = field.type_name() else {
                continue;
            };
            if !self.messages.contains_key(type_name) {
                return Err(SchemaError::UnresolvedTypeName {
                    message: desc.full_name().to_string(),
                    field: field.name().to_string(),
                    type_name: type_name.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl TypeResolver for DescriptorPool {
    fn resolve(&self, full_name: &str) -> Option<Arc<MessageDescriptor>> {
        self.messages.get(full_name).cloned()
    }
}
