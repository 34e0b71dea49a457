#![no_main]

use bytestream::{ByteRead, SliceReader};
use libfuzzer_sys::fuzz_target;
use wire::{WireType, MAX_VARINT_LEN};

fuzz_target!(|data: &[u8]| {
    let mut reader = SliceReader::new(data);
    let mut steps = 0usize;

    // Use input bytes to drive a bounded sequence of reads.
    while !reader.is_empty() && steps < 1024 {
        steps += 1;
        let before = reader.position();
        let ok = match data[before] % 5 {
            0 => wire::decode_varint(&mut reader)
                .map(|(len, _)| assert!(len <= data.len() - before))
                .is_ok(),
            1 => wire::decode_tag(&mut reader).is_ok(),
            2 => wire::decode_fixed32(&mut reader).is_ok(),
            3 => wire::decode_length(&mut reader).is_ok(),
            _ => {
                let wire_type = match data[before] % 4 {
                    0 => WireType::Varint,
                    1 => WireType::Fixed64,
                    2 => WireType::LengthDelimited,
                    _ => WireType::Fixed32,
                };
                wire::skip_field(wire_type, &mut reader).is_ok()
            }
        };
        if !ok {
            break;
        }
        assert!(reader.position() > before || reader.is_empty());
    }

    // Anything varint-shaped re-encodes to at most ten bytes.
    if let Ok((_, value)) = wire::decode_varint(&mut SliceReader::new(data)) {
        assert!(wire::varint_len(value) <= MAX_VARINT_LEN);
    }
});
