//! Mapping from field kinds to wire types and value variants.

use schema::FieldKind;
use wire::WireType;

/// Wire type a single value of `kind` is written with.
///
/// Packed lists override this with [`WireType::LengthDelimited`] for the
/// field as a whole; their elements still use this wire type.
#[must_use]
pub const fn wire_type_for(kind: FieldKind) -> WireType {
    match kind {
        FieldKind::Int32
        | FieldKind::Int64
        | FieldKind::Uint32
        | FieldKind::Uint64
        | FieldKind::Sint32
        | FieldKind::Sint64
        | FieldKind::Bool
        | FieldKind::Enum => WireType::Varint,
        FieldKind::Fixed64 | FieldKind::Sfixed64 | FieldKind::Double => WireType::Fixed64,
        FieldKind::Fixed32 | FieldKind::Sfixed32 | FieldKind::Float => WireType::Fixed32,
        FieldKind::Bytes | FieldKind::String | FieldKind::Message => WireType::LengthDelimited,
    }
}

/// Name of the value variant that carries `kind`.
pub(crate) const fn variant_name(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Int32 | FieldKind::Sint32 | FieldKind::Sfixed32 => "i32",
        FieldKind::Int64 | FieldKind::Sint64 | FieldKind::Sfixed64 => "i64",
        FieldKind::Uint32 | FieldKind::Fixed32 => "u32",
        FieldKind::Uint64 | FieldKind::Fixed64 => "u64",
        FieldKind::Bool => "bool",
        FieldKind::Enum => "enum",
        FieldKind::Float => "f32",
        FieldKind::Double => "f64",
        FieldKind::Bytes => "bytes",
        FieldKind::String => "string",
        FieldKind::Message => "message",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_types_by_kind() {
        assert_eq!(wire_type_for(FieldKind::Sint32), WireType::Varint);
        assert_eq!(wire_type_for(FieldKind::Enum), WireType::Varint);
        assert_eq!(wire_type_for(FieldKind::Double), WireType::Fixed64);
        assert_eq!(wire_type_for(FieldKind::Sfixed32), WireType::Fixed32);
        assert_eq!(wire_type_for(FieldKind::Message), WireType::LengthDelimited);
    }

    #[test]
    fn packable_kinds_never_use_length_delimited() {
        for kind in FieldKind::ALL {
            assert_eq!(
                kind.is_packable(),
                wire_type_for(kind) != WireType::LengthDelimited,
                "{kind}"
            );
        }
    }
}
