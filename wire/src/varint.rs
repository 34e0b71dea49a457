//! Base-128 varints and the zigzag transform.

use bytestream::{ByteRead, ByteWriter};

use crate::error::WireResult;

/// Maximum encoded length of a 64-bit varint.
pub const MAX_VARINT_LEN: usize = 10;

/// Writes `value` as a minimal-length base-128 varint, least-significant group first.
pub fn encode_varint(mut value: u64, out: &mut ByteWriter) {
    while value >= 0x80 {
        out.write_u8((value as u8 & 0x7F) | 0x80);
        value >>= 7;
    }
    out.write_u8(value as u8);
}

/// Returns the number of bytes [`encode_varint`] writes for `value`.
#[must_use]
pub const fn varint_len(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    if bits == 0 {
        1
    } else {
        (bits + 6) / 7
    }
}

/// Reads one varint, returning `(bytes_consumed, value)`.
///
/// The number of groups is not bounded; bits past the 64th are discarded.
pub fn decode_varint<R: ByteRead>(input: &mut R) -> WireResult<(usize, u64)> {
    let first = input.read_u8()?;
    continue_varint(first, input)
}

/// Finishes a varint whose first byte has already been read.
pub(crate) fn continue_varint<R: ByteRead>(first: u8, input: &mut R) -> WireResult<(usize, u64)> {
    let mut value = u64::from(first & 0x7F);
    let mut consumed = 1usize;
    let mut byte = first;
    while byte & 0x80 != 0 {
        byte = input.read_u8()?;
        let shift = u32::try_from(consumed.saturating_mul(7)).unwrap_or(u32::MAX);
        if let Some(bits) = u64::from(byte & 0x7F).checked_shl(shift) {
            value |= bits;
        }
        consumed += 1;
    }
    Ok((consumed, value))
}

/// Maps a signed integer onto an unsigned one so small magnitudes stay small.
#[must_use]
pub const fn encode_zigzag(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

/// Inverse of [`encode_zigzag`].
#[must_use]
pub const fn decode_zigzag(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytestream::SliceReader;

    fn encoded(value: u64) -> Vec<u8> {
        let mut out = ByteWriter::new();
        encode_varint(value, &mut out);
        out.finish()
    }

    #[test]
    fn encode_small_values() {
        assert_eq!(encoded(0), vec![0x00]);
        assert_eq!(encoded(1), vec![0x01]);
        assert_eq!(encoded(127), vec![0x7F]);
        assert_eq!(encoded(128), vec![0x80, 0x01]);
        assert_eq!(encoded(300), vec![0xAC, 0x02]);
    }

    #[test]
    fn encode_max_value() {
        let bytes = encoded(u64::MAX);
        assert_eq!(bytes.len(), MAX_VARINT_LEN);
        assert_eq!(bytes[9], 0x01);
        assert!(bytes[..9].iter().all(|b| *b == 0xFF));
    }

    #[test]
    fn varint_len_matches_encoding() {
        for value in [0, 1, 127, 128, 16_383, 16_384, u64::from(u32::MAX), u64::MAX] {
            assert_eq!(varint_len(value), encoded(value).len(), "value {value}");
        }
    }

    #[test]
    fn decode_reports_consumed_bytes() {
        let mut reader = SliceReader::new(&[0xAC, 0x02, 0x05]);
        assert_eq!(decode_varint(&mut reader).unwrap(), (2, 300));
        assert_eq!(decode_varint(&mut reader).unwrap(), (1, 5));
    }

    #[test]
    fn decode_truncated_fails() {
        let mut reader = SliceReader::new(&[0x80, 0x80]);
        let err = decode_varint(&mut reader).unwrap_err();
        assert!(err.is_eof());

        let mut empty = SliceReader::new(&[]);
        assert!(decode_varint(&mut empty).unwrap_err().is_eof());
    }

    #[test]
    fn decode_overlong_discards_high_bits() {
        // Twelve groups: 1 followed by eleven continuation bytes of zero payload.
        let mut bytes = vec![0x81];
        bytes.extend(std::iter::repeat(0x80).take(10));
        bytes.push(0x7F);
        let mut reader = SliceReader::new(&bytes);
        assert_eq!(decode_varint(&mut reader).unwrap(), (12, 1));
    }

    #[test]
    fn zigzag_known_values() {
        assert_eq!(encode_zigzag(0), 0);
        assert_eq!(encode_zigzag(-1), 1);
        assert_eq!(encode_zigzag(1), 2);
        assert_eq!(encode_zigzag(-2), 3);
        assert_eq!(encode_zigzag(-5), 9);
        assert_eq!(encode_zigzag(i64::MAX), u64::MAX - 1);
        assert_eq!(encode_zigzag(i64::MIN), u64::MAX);
    }

    #[test]
    fn zigzag_inverse() {
        for value in [0, 1, -1, 63, -64, i64::from(i32::MIN), i64::MAX, i64::MIN] {
            assert_eq!(decode_zigzag(encode_zigzag(value)), value);
        }
    }

    #[test]
    fn zigzag_32_bit_truncation() {
        let raw = encode_zigzag(i64::from(i32::MIN));
        assert_eq!(decode_zigzag(raw) as i32, i32::MIN);
    }
}
