//! Byte-level readers with bounded operations.

use std::io::{self, Read};

use crate::error::{StreamError, StreamResult};

/// An ordered, one-byte-at-a-time readable input.
///
/// This is the only capability the decoder needs from its input. A reader that
/// knows how many bytes are left should report it through
/// [`remaining_hint`](Self::remaining_hint) so callers can reject oversized
/// length prefixes before allocating.
pub trait ByteRead {
    /// Reads a single byte.
    fn read_u8(&mut self) -> StreamResult<u8>;

    /// Fills `buf` completely or fails with [`StreamError::UnexpectedEof`].
    fn read_exact(&mut self, buf: &mut [u8]) -> StreamResult<()>;

    /// Discards exactly `len` bytes.
    fn skip(&mut self, len: usize) -> StreamResult<()>;

    /// Number of bytes consumed so far.
    fn position(&self) -> usize;

    /// Number of bytes left, if the reader can tell.
    fn remaining_hint(&self) -> Option<usize> {
        None
    }

    /// Reads exactly `N` bytes into an array.
    fn read_array<const N: usize>(&mut self) -> StreamResult<[u8; N]>
    where
        Self: Sized,
    {
        let mut out = [0u8; N];
        self.read_exact(&mut out)?;
        Ok(out)
    }
}

impl<T: ByteRead + ?Sized> ByteRead for &mut T {
    fn read_u8(&mut self) -> StreamResult<u8> {
        (**self).read_u8()
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> StreamResult<()> {
        (**self).read_exact(buf)
    }

    fn skip(&mut self, len: usize) -> StreamResult<()> {
        (**self).skip(len)
    }

    fn position(&self) -> usize {
        (**self).position()
    }

    fn remaining_hint(&self) -> Option<usize> {
        (**self).remaining_hint()
    }
}

/// A reader over an in-memory byte slice.
///
/// All read operations are bounds-checked and return errors on failure.
/// The reader never panics on malformed input.
#[derive(Debug, Clone)]
pub struct SliceReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceReader<'a> {
    /// Creates a new `SliceReader` from a byte slice.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the number of bytes remaining to read.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Returns `true` if there are no more bytes to read.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns the unread tail without consuming it.
    #[must_use]
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.pos.min(self.data.len())..]
    }

    /// Borrows the next `len` bytes without copying.
    pub fn read_slice(&mut self, len: usize) -> StreamResult<&'a [u8]> {
        self.ensure_bytes(len)?;
        let start = self.pos;
        self.pos += len;
        Ok(&self.data[start..self.pos])
    }

    fn ensure_bytes(&self, len: usize) -> StreamResult<()> {
        let available = self.remaining();
        if len > available {
            return Err(StreamError::UnexpectedEof {
                requested: len,
                available,
            });
        }
        Ok(())
    }
}

impl ByteRead for SliceReader<'_> {
    fn read_u8(&mut self) -> StreamResult<u8> {
        self.ensure_bytes(1)?;
        let value = self.data[self.pos];
        self.pos += 1;
        Ok(value)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> StreamResult<()> {
        let src = self.read_slice(buf.len())?;
        buf.copy_from_slice(src);
        Ok(())
    }

    fn skip(&mut self, len: usize) -> StreamResult<()> {
        self.ensure_bytes(len)?;
        self.pos += len;
        Ok(())
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn remaining_hint(&self) -> Option<usize> {
        Some(self.remaining())
    }
}

/// A reader adapter over any [`std::io::Read`] source (files, sockets).
///
/// End-of-file in the middle of a read is reported as
/// [`StreamError::UnexpectedEof`]; other I/O failures become
/// [`StreamError::Io`]. Interrupted reads are retried.
#[derive(Debug)]
pub struct IoReader<R> {
    inner: R,
    pos: usize,
}

impl<R: Read> IoReader<R> {
    /// Wraps an I/O source.
    pub const fn new(inner: R) -> Self {
        Self { inner, pos: 0 }
    }

    /// Returns the wrapped source.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> ByteRead for IoReader<R> {
    fn read_u8(&mut self) -> StreamResult<u8> {
        let mut byte = [0u8; 1];
        self.read_exact(&mut byte)?;
        Ok(byte[0])
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> StreamResult<()> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => {
                    self.pos += filled;
                    return Err(StreamError::UnexpectedEof {
                        requested: buf.len(),
                        available: filled,
                    });
                }
                Ok(n) => filled += n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => {
                    self.pos += filled;
                    return Err(err.into());
                }
            }
        }
        self.pos += filled;
        Ok(())
    }

    fn skip(&mut self, len: usize) -> StreamResult<()> {
        let mut limited = (&mut self.inner).take(len as u64);
        let copied = io::copy(&mut limited, &mut io::sink())?;
        let copied = usize::try_from(copied).unwrap_or(usize::MAX);
        self.pos += copied;
        if copied < len {
            return Err(StreamError::UnexpectedEof {
                requested: len,
                available: copied,
            });
        }
        Ok(())
    }

    fn position(&self) -> usize {
        self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
        }
    }

    /// Yields one byte per call to exercise short reads.
    struct Trickle<'a>(&'a [u8]);

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.0.split_first() {
                Some((first, rest)) if !buf.is_empty() => {
                    buf[0] = *first;
                    self.0 = rest;
                    Ok(1)
                }
                _ => Ok(0),
            }
        }
    }

    #[test]
    fn empty_reader() {
        let reader = SliceReader::new(&[]);
        assert!(reader.is_empty());
        assert_eq!(reader.remaining(), 0);
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.remaining_hint(), Some(0));
    }

    #[test]
    fn read_from_empty_fails() {
        let mut reader = SliceReader::new(&[]);
        let result = reader.read_u8();
        assert_eq!(
            result,
            Err(StreamError::UnexpectedEof {
                requested: 1,
                available: 0
            })
        );
    }

    #[test]
    fn read_exact_past_end_fails_without_consuming() {
        let mut reader = SliceReader::new(&[1, 2, 3]);
        let mut buf = [0u8; 4];
        let err = reader.read_exact(&mut buf).unwrap_err();
        assert_eq!(
            err,
            StreamError::UnexpectedEof {
                requested: 4,
                available: 3
            }
        );
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn read_slice_borrows() {
        let data = [1, 2, 3, 4];
        let mut reader = SliceReader::new(&data);
        assert_eq!(reader.read_slice(3).unwrap(), &[1, 2, 3]);
        assert_eq!(reader.rest(), &[4]);
        assert_eq!(reader.position(), 3);
    }

    #[test]
    fn skip_respects_bounds() {
        let mut reader = SliceReader::new(&[1, 2, 3]);
        reader.skip(2).unwrap();
        assert_eq!(reader.read_u8().unwrap(), 3);
        assert!(matches!(
            reader.skip(1),
            Err(StreamError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn read_aligned_array() {
        let mut reader = SliceReader::new(&[0x78, 0x56, 0x34, 0x12]);
        let bytes = reader.read_array::<4>().unwrap();
        assert_eq!(u32::from_le_bytes(bytes), 0x1234_5678);
    }

    #[test]
    fn io_reader_handles_short_reads() {
        let mut reader = IoReader::new(Trickle(&[1, 2, 3, 4, 5]));
        let mut buf = [0u8; 4];
        reader.read_exact(&mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3, 4]);
        assert_eq!(reader.position(), 4);
        assert_eq!(reader.remaining_hint(), None);
    }

    #[test]
    fn io_reader_reports_partial_eof() {
        let mut reader = IoReader::new(Trickle(&[1, 2]));
        let mut buf = [0u8; 4];
        let err = reader.read_exact(&mut buf).unwrap_err();
        assert_eq!(
            err,
            StreamError::UnexpectedEof {
                requested: 4,
                available: 2
            }
        );
    }

    #[test]
    fn io_reader_skip() {
        let mut reader = IoReader::new(&[1u8, 2, 3, 4][..]);
        reader.skip(3).unwrap();
        assert_eq!(reader.read_u8().unwrap(), 4);
        let err = reader.skip(2).unwrap_err();
        assert!(err.is_eof());
    }

    #[test]
    fn io_reader_surfaces_io_errors() {
        let mut reader = IoReader::new(FailingReader);
        assert_eq!(
            reader.read_u8(),
            Err(StreamError::Io {
                kind: io::ErrorKind::ConnectionReset
            })
        );
    }

    #[test]
    fn mut_ref_forwards() {
        fn first_byte<R: ByteRead>(mut input: R) -> (u8, Option<usize>) {
            let byte = input.read_u8().unwrap();
            (byte, input.remaining_hint())
        }

        let data = [9u8, 8];
        let mut reader = SliceReader::new(&data);
        assert_eq!(first_byte(&mut reader), (9, Some(1)));
        assert_eq!(reader.position(), 1);
    }
}
