//! Field values of dynamic messages.

use std::collections::BTreeMap;

use schema::FieldKind;

use crate::message::DynamicMessage;

/// A field value.
///
/// Scalar variants follow the field kind: `int32`, `sint32` and `sfixed32`
/// are carried as [`I32`](Self::I32), `uint32` and `fixed32` as
/// [`U32`](Self::U32), and likewise for the 64-bit kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    I32(i32),
    I64(i64),
    U32(u32),
    U64(u64),
    Bool(bool),
    Enum(i32),
    F32(f32),
    F64(f64),
    Bytes(Vec<u8>),
    String(String),
    Message(DynamicMessage),
    List(Vec<Value>),
    Map(BTreeMap<MapKey, Value>),
}

/// A map key: the integral, bool and string subset of [`Value`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MapKey {
    Bool(bool),
    I32(i32),
    I64(i64),
    U32(u32),
    U64(u64),
    String(String),
}

impl Value {
    /// Zero value of a scalar kind; `None` for message kinds, whose default
    /// needs a descriptor.
    #[must_use]
    pub fn default_for(kind: FieldKind) -> Option<Self> {
        let value = match kind {
            FieldKind::Int32 | FieldKind::Sint32 | FieldKind::Sfixed32 => Self::I32(0),
            FieldKind::Int64 | FieldKind::Sint64 | FieldKind::Sfixed64 => Self::I64(0),
            FieldKind::Uint32 | FieldKind::Fixed32 => Self::U32(0),
            FieldKind::Uint64 | FieldKind::Fixed64 => Self::U64(0),
            FieldKind::Bool => Self::Bool(false),
            FieldKind::Enum => Self::Enum(0),
            FieldKind::Float => Self::F32(0.0),
            FieldKind::Double => Self::F64(0.0),
            FieldKind::Bytes => Self::Bytes(Vec::new()),
            FieldKind::String => Self::String(String::new()),
            FieldKind::Message => return None,
        };
        Some(value)
    }

    /// Returns `true` if this variant carries values of `kind`.
    #[must_use]
    pub const fn is_kind(&self, kind: FieldKind) -> bool {
        matches!(
            (kind, self),
            (
                FieldKind::Int32 | FieldKind::Sint32 | FieldKind::Sfixed32,
                Self::I32(_)
            ) | (
                FieldKind::Int64 | FieldKind::Sint64 | FieldKind::Sfixed64,
                Self::I64(_)
            ) | (FieldKind::Uint32 | FieldKind::Fixed32, Self::U32(_))
                | (FieldKind::Uint64 | FieldKind::Fixed64, Self::U64(_))
                | (FieldKind::Bool, Self::Bool(_))
                | (FieldKind::Enum, Self::Enum(_))
                | (FieldKind::Float, Self::F32(_))
                | (FieldKind::Double, Self::F64(_))
                | (FieldKind::Bytes, Self::Bytes(_))
                | (FieldKind::String, Self::String(_))
                | (FieldKind::Message, Self::Message(_))
        )
    }

    /// Short variant name used in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::U32(_) => "u32",
            Self::U64(_) => "u64",
            Self::Bool(_) => "bool",
            Self::Enum(_) => "enum",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::Bytes(_) => "bytes",
            Self::String(_) => "string",
            Self::Message(_) => "message",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }

    #[must_use]
    pub const fn as_i32(&self) -> Option<i32> {
        match self {
            Self::I32(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I64(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_u32(&self) -> Option<u32> {
        match self {
            Self::U32(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_u64(&self) -> Option<u64> {
        match self {
            Self::U64(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_enum(&self) -> Option<i32> {
        match self {
            Self::Enum(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_f32(&self) -> Option<f32> {
        match self {
            Self::F32(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::F64(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_message(&self) -> Option<&DynamicMessage> {
        match self {
            Self::Message(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_message_mut(&mut self) -> Option<&mut DynamicMessage> {
        match self {
            Self::Message(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_map(&self) -> Option<&BTreeMap<MapKey, Self>> {
        match self {
            Self::Map(v) => Some(v),
            _ => None,
        }
    }

    /// Returns `true` for empty lists and maps, which count as unset.
    pub(crate) fn is_empty_container(&self) -> bool {
        match self {
            Self::List(items) => items.is_empty(),
            Self::Map(entries) => entries.is_empty(),
            _ => false,
        }
    }
}

impl MapKey {
    /// Returns `true` if this variant carries keys of `kind`.
    #[must_use]
    pub const fn is_kind(&self, kind: FieldKind) -> bool {
        matches!(
            (kind, self),
            (
                FieldKind::Int32 | FieldKind::Sint32 | FieldKind::Sfixed32,
                Self::I32(_)
            ) | (
                FieldKind::Int64 | FieldKind::Sint64 | FieldKind::Sfixed64,
                Self::I64(_)
            ) | (FieldKind::Uint32 | FieldKind::Fixed32, Self::U32(_))
                | (FieldKind::Uint64 | FieldKind::Fixed64, Self::U64(_))
                | (FieldKind::Bool, Self::Bool(_))
                | (FieldKind::String, Self::String(_))
        )
    }

    /// Short variant name used in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::U32(_) => "u32",
            Self::U64(_) => "u64",
            Self::String(_) => "string",
        }
    }

    /// Converts a scalar value into a key, or hands the value back.
    pub fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Bool(v) => Ok(Self::Bool(v)),
            Value::I32(v) => Ok(Self::I32(v)),
            Value::I64(v) => Ok(Self::I64(v)),
            Value::U32(v) => Ok(Self::U32(v)),
            Value::U64(v) => Ok(Self::U64(v)),
            Value::String(v) => Ok(Self::String(v)),
            other => Err(other),
        }
    }
}

impl From<MapKey> for Value {
    fn from(key: MapKey) -> Self {
        match key {
            MapKey::Bool(v) => Self::Bool(v),
            MapKey::I32(v) => Self::I32(v),
            MapKey::I64(v) => Self::I64(v),
            MapKey::U32(v) => Self::U32(v),
            MapKey::U64(v) => Self::U64(v),
            MapKey::String(v) => Self::String(v),
        }
    }
}

macro_rules! impl_from {
    ($target:ident: $($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for $target {
                #[allow(clippy::useless_conversion)]
                fn from(value: $ty) -> Self {
                    Self::$variant(value.into())
                }
            }
        )*
    };
}

impl_from!(Value:
    i32 => I32,
    i64 => I64,
    u32 => U32,
    u64 => U64,
    bool => Bool,
    f32 => F32,
    f64 => F64,
    Vec<u8> => Bytes,
    &[u8] => Bytes,
    String => String,
    &str => String,
    DynamicMessage => Message,
    Vec<Value> => List,
    BTreeMap<MapKey, Value> => Map,
);

impl_from!(MapKey:
    i32 => I32,
    i64 => I64,
    u32 => U32,
    u64 => U64,
    bool => Bool,
    String => String,
    &str => String,
);
