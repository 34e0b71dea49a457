#![no_main]

use std::sync::Arc;

use bytestream::SliceReader;
use codec::{decode_message, encode_message, CodecLimits, DynamicMessage};
use libfuzzer_sys::fuzz_target;
use schema::{DescriptorPool, FieldDef, FieldKind, MessageDef};

fn pool() -> DescriptorPool {
    DescriptorPool::from_defs([
        MessageDef::new("fuzz.Node")
            .field(FieldDef::new(1, "id", FieldKind::Uint64))
            .field(FieldDef::new(2, "delta", FieldKind::Sint32))
            .field(FieldDef::new(3, "name", FieldKind::String))
            .field(FieldDef::new(4, "blob", FieldKind::Bytes))
            .field(FieldDef::new(5, "weights", FieldKind::Float).packed())
            .field(FieldDef::new(6, "ids", FieldKind::Fixed64).repeated())
            .field(FieldDef::map(7, "attrs", FieldKind::String, FieldKind::Int64))
            .field(FieldDef::message(8, "children", "fuzz.Node").repeated())
            .field(FieldDef::new(9, "on", FieldKind::Bool).oneof("state"))
            .field(FieldDef::new(10, "level", FieldKind::Enum).oneof("state")),
    ])
    .unwrap()
}

fuzz_target!(|data: &[u8]| {
    let pool = pool();
    let desc = Arc::clone(pool.get("fuzz.Node").unwrap());
    let limits = CodecLimits::for_testing();

    let mut msg = DynamicMessage::new(Arc::clone(&desc));
    if decode_message(&mut msg, &mut SliceReader::new(data), &pool, &limits).is_err() {
        return;
    }

    // Whatever decodes must re-encode and decode to the same message.
    let bytes = encode_message(&msg).unwrap();
    let mut again = DynamicMessage::new(desc);
    decode_message(
        &mut again,
        &mut SliceReader::new(&bytes),
        &pool,
        &CodecLimits::unlimited(),
    )
    .unwrap();
    if msg.fields().all(|(_, v)| !has_nan(v)) {
        assert_eq!(again, msg);
    }
});

fn has_nan(value: &codec::Value) -> bool {
    match value {
        codec::Value::F32(v) => v.is_nan(),
        codec::Value::List(items) => items.iter().any(has_nan),
        codec::Value::Message(m) => m.fields().any(|(_, v)| has_nan(v)),
        _ => false,
    }
}
