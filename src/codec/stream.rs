//! In-memory output stream.

use byteorder::{ByteOrder, LittleEndian};

use crate::format::{Kind, LEN_PREFIX};
use crate::util::{Error, Result};

/// Output stream for encoded bytes.
///
/// A counting stream tracks the position only, so a size computation runs
/// the exact same path as a real encode.
#[derive(Debug)]
pub struct OStream {
    buf: Option<Vec<u8>>,
    pos: usize,
}

/// Open compound value awaiting its length and end marker.
#[derive(Debug)]
#[must_use = "an open compound must be closed with OStream::finish"]
pub struct Frame {
    kind: Kind,
    name_hash: i32,
    len_at: usize,
    body_start: usize,
}

impl OStream {
    /// Create a buffering stream.
    pub fn new() -> Self {
        Self { buf: Some(Vec::new()), pos: 0 }
    }

    /// Create a stream that only counts bytes.
    pub fn counting() -> Self {
        Self { buf: None, pos: 0 }
    }

    /// Get the current write position.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Write bytes and advance position.
    pub fn write_bytes(&mut self, data: &[u8]) {
        if let Some(buf) = self.buf.as_mut() {
            buf.extend_from_slice(data);
        }
        self.pos += data.len();
    }

    /// Write a u8 value.
    pub fn write_u8(&mut self, value: u8) {
        self.write_bytes(&[value]);
    }

    /// Write an i32 value (little-endian).
    pub fn write_i32(&mut self, value: i32) {
        let mut b = [0u8; 4];
        LittleEndian::write_i32(&mut b, value);
        self.write_bytes(&b);
    }

    /// Write a u32 value (little-endian).
    pub fn write_u32(&mut self, value: u32) {
        let mut b = [0u8; 4];
        LittleEndian::write_u32(&mut b, value);
        self.write_bytes(&b);
    }

    /// Write an f64 value (little-endian).
    pub fn write_f64(&mut self, value: f64) {
        let mut b = [0u8; 8];
        LittleEndian::write_f64(&mut b, value);
        self.write_bytes(&b);
    }

    /// Write a length prefix.
    pub fn write_len(&mut self, len: usize) -> Result<()> {
        let len = i32::try_from(len)
            .map_err(|_| Error::other(format!("length {} does not fit the i32 prefix", len)))?;
        self.write_i32(len);
        Ok(())
    }

    /// Write a length-prefixed UTF-8 string.
    pub fn write_str(&mut self, s: &str) -> Result<()> {
        self.write_len(s.len())?;
        self.write_bytes(s.as_bytes());
        Ok(())
    }

    /// Write `kind` and `name_hash`.
    pub fn write_tag(&mut self, kind: Kind, name_hash: i32) {
        self.write_u8(kind.as_u8());
        self.write_i32(name_hash);
    }

    /// Reserve a length prefix to be patched later; returns its position.
    pub fn reserve_len(&mut self) -> usize {
        let at = self.pos;
        self.write_i32(0);
        at
    }

    /// Overwrite a reserved length prefix.
    pub fn patch_len(&mut self, at: usize, len: usize) -> Result<()> {
        let len = i32::try_from(len)
            .map_err(|_| Error::other(format!("length {} does not fit the i32 prefix", len)))?;
        if let Some(buf) = self.buf.as_mut() {
            let slot = buf
                .get_mut(at..at + LEN_PREFIX)
                .ok_or(Error::UnexpectedEof(at + LEN_PREFIX))?;
            LittleEndian::write_i32(slot, len);
        }
        Ok(())
    }

    /// Open a compound value: tag, type names, optional array shape, length slot.
    pub fn begin(
        &mut self,
        kind: Kind,
        name_hash: i32,
        type_names: &[&str],
        dims: Option<&[u8]>,
    ) -> Result<Frame> {
        debug_assert!(kind.is_start());
        debug_assert_eq!(type_names.len(), kind.header_type_names());
        self.write_tag(kind, name_hash);
        for name in type_names {
            self.write_str(name)?;
        }
        if let Some(dims) = dims {
            self.write_u8(dims.len() as u8);
            self.write_bytes(dims);
        }
        let len_at = self.reserve_len();
        Ok(Frame {
            kind,
            name_hash,
            len_at,
            body_start: self.pos,
        })
    }

    /// Close a compound value: patch its inner length and write the end marker.
    pub fn finish(&mut self, frame: Frame) -> Result<()> {
        let inner = self.pos - frame.body_start;
        self.patch_len(frame.len_at, inner)?;
        let end = frame
            .kind
            .end_marker()
            .ok_or_else(|| Error::other(format!("{} has no end marker", frame.kind)))?;
        self.write_tag(end, frame.name_hash);
        Ok(())
    }

    /// Take the written bytes (empty for a counting stream).
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf.unwrap_or_default()
    }
}

impl Default for OStream {
    fn default() -> Self {
        Self::new()
    }
}
