//! Bounded little-endian reader over an in-memory buffer.

use std::ops::Range;

use byteorder::{ByteOrder, LittleEndian};

use crate::util::{Error, Result};

/// Read position inside `bytes[..end]`.
///
/// Every read is checked against `end`, which is the bound of the enclosing
/// compound rather than the whole buffer.
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
    end: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor over `range`, rejecting ranges outside the buffer.
    pub fn new(bytes: &'a [u8], range: Range<usize>) -> Result<Self> {
        if range.start > range.end || range.end > bytes.len() {
            return Err(Error::UnexpectedEof(range.end));
        }
        Ok(Self { bytes, pos: range.start, end: range.end })
    }

    /// Current offset.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Exclusive bound.
    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Bytes left before the bound.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.end - self.pos
    }

    /// Check if the cursor reached its bound.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos >= self.end
    }

    /// Take the next `len` bytes.
    pub fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(Error::UnexpectedEof(self.pos + len));
        }
        let out = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(out)
    }

    /// Advance without reading.
    pub fn skip(&mut self, len: usize) -> Result<()> {
        self.take(len).map(|_| ())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.take(4)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(LittleEndian::read_f64(self.take(8)?))
    }

    /// Read a 4-byte length prefix, rejecting negative values.
    pub fn read_len(&mut self) -> Result<usize> {
        let at = self.pos;
        let len = self.read_i32()?;
        usize::try_from(len)
            .map_err(|_| Error::malformed(format!("negative length {} at offset {}", len, at)))
    }

    /// Read a length-prefixed UTF-8 string.
    pub fn read_str(&mut self) -> Result<&'a str> {
        let len = self.read_len()?;
        Ok(std::str::from_utf8(self.take(len)?)?)
    }
}
