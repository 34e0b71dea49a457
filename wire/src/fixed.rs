//! Little-endian fixed-width values.

use bytestream::{ByteRead, ByteWriter};

use crate::error::WireResult;

/// Writes a 32-bit little-endian value.
pub fn encode_fixed32(value: u32, out: &mut ByteWriter) {
    out.write_bytes(&value.to_le_bytes());
}

/// Writes a 64-bit little-endian value.
pub fn encode_fixed64(value: u64, out: &mut ByteWriter) {
    out.write_bytes(&value.to_le_bytes());
}

/// Reads exactly four bytes as a little-endian `u32`.
pub fn decode_fixed32<R: ByteRead>(input: &mut R) -> WireResult<u32> {
    Ok(u32::from_le_bytes(input.read_array::<4>()?))
}

/// Reads exactly eight bytes as a little-endian `u64`.
pub fn decode_fixed64<R: ByteRead>(input: &mut R) -> WireResult<u64> {
    Ok(u64::from_le_bytes(input.read_array::<8>()?))
}

/// Writes an IEEE-754 single as its 32-bit pattern.
pub fn encode_float(value: f32, out: &mut ByteWriter) {
    encode_fixed32(value.to_bits(), out);
}

/// Writes an IEEE-754 double as its 64-bit pattern.
pub fn encode_double(value: f64, out: &mut ByteWriter) {
    encode_fixed64(value.to_bits(), out);
}

/// Reads a 32-bit pattern as an IEEE-754 single.
pub fn decode_float<R: ByteRead>(input: &mut R) -> WireResult<f32> {
    decode_fixed32(input).map(f32::from_bits)
}

/// Reads a 64-bit pattern as an IEEE-754 double.
pub fn decode_double<R: ByteRead>(input: &mut R) -> WireResult<f64> {
    decode_fixed64(input).map(f64::from_bits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytestream::SliceReader;

    #[test]
    fn fixed32_is_little_endian() {
        let mut out = ByteWriter::new();
        encode_fixed32(0x1234_5678, &mut out);
        assert_eq!(out.as_slice(), &[0x78, 0x56, 0x34, 0x12]);

        let bytes = out.finish();
        let mut reader = SliceReader::new(&bytes);
        assert_eq!(decode_fixed32(&mut reader).unwrap(), 0x1234_5678);
    }

    #[test]
    fn fixed64_is_little_endian() {
        let mut out = ByteWriter::new();
        encode_fixed64(0x0102_0304_0506_0708, &mut out);
        assert_eq!(
            out.as_slice(),
            &[0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01]
        );
    }

    #[test]
    fn float_bits_roundtrip() {
        let mut out = ByteWriter::new();
        encode_float(0.12, &mut out);
        encode_double(-2.5, &mut out);
        let bytes = out.finish();
        assert_eq!(bytes.len(), 12);

        let mut reader = SliceReader::new(&bytes);
        assert_eq!(decode_float(&mut reader).unwrap().to_bits(), 0.12f32.to_bits());
        assert_eq!(decode_double(&mut reader).unwrap().to_bits(), (-2.5f64).to_bits());
    }

    #[test]
    fn nan_payload_is_preserved() {
        let nan = f64::from_bits(0x7FF8_0000_0000_0001);
        let mut out = ByteWriter::new();
        encode_double(nan, &mut out);
        let bytes = out.finish();
        let mut reader = SliceReader::new(&bytes);
        assert_eq!(decode_double(&mut reader).unwrap().to_bits(), nan.to_bits());
    }

    #[test]
    fn short_input_fails() {
        let mut reader = SliceReader::new(&[1, 2, 3]);
        assert!(decode_fixed32(&mut reader).unwrap_err().is_eof());

        let mut reader = SliceReader::new(&[1, 2, 3, 4, 5, 6, 7]);
        assert!(decode_fixed64(&mut reader).unwrap_err().is_eof());
    }
}
