//! Compound header parsing.

use std::ops::Range;

use smallvec::SmallVec;

use super::{Cursor, Kind, END_MARKER_LEN};
use crate::util::{Dimensions, Error, Result};

/// Parsed header of a compound tagged value.
///
/// ```text
/// kind:u8 name_hash:i32 TypeDescriptor(kind) inner_len:i32 children EndMarker
/// ```
#[derive(Debug, Clone)]
pub struct CompoundHeader<'a> {
    pub kind: Kind,
    pub name_hash: i32,
    /// Class/list/array/enum: one name. Dictionary: key then value. Wrapper: none.
    pub type_names: SmallVec<[&'a str; 2]>,
    /// Array shape; scalar for every other kind.
    pub dims: Dimensions,
    /// Byte range of the children.
    pub body: Range<usize>,
    /// Exclusive end, past the end marker.
    pub end: usize,
}

impl<'a> CompoundHeader<'a> {
    /// Read the header starting at `at`, bounded by `bound`.
    ///
    /// Validates that `inner_len` stays inside the bound and that the end
    /// marker belongs to the same compound family and name hash. Children are
    /// not interpreted.
    pub fn read(bytes: &'a [u8], at: usize, bound: usize) -> Result<Self> {
        let mut c = Cursor::new(bytes, at..bound)?;

        let raw = c.read_u8()?;
        let kind = Kind::from_u8(raw).ok_or(Error::UnknownKind { kind: raw, offset: at })?;
        let end_kind = kind
            .end_marker()
            .ok_or_else(|| Error::malformed(format!("{} at offset {} is not a compound start", kind, at)))?;
        let name_hash = c.read_i32()?;

        let mut type_names = SmallVec::new();
        for _ in 0..kind.header_type_names() {
            type_names.push(c.read_str()?);
        }

        let dims = if kind == Kind::ArrayStart {
            let rank = c.read_u8()? as usize;
            Dimensions::from_wire(c.take(rank)?)
        } else {
            Dimensions::scalar()
        };

        let inner = c.read_len()?;
        if inner + END_MARKER_LEN > c.remaining() {
            return Err(Error::malformed(format!(
                "{} at offset {} declares {} inner bytes but only {} remain",
                kind,
                at,
                inner,
                c.remaining().saturating_sub(END_MARKER_LEN)
            )));
        }
        let body = c.pos()..c.pos() + inner;
        c.skip(inner)?;

        let marker_at = c.pos();
        let marker = c.read_u8()?;
        if marker != end_kind.as_u8() {
            return Err(Error::malformed(format!(
                "expected {} marker at offset {}, found byte {:#04x}",
                end_kind, marker_at, marker
            )));
        }
        if c.read_i32()? != name_hash {
            return Err(Error::malformed(format!(
                "{} at offset {} closes with a different name hash",
                end_kind, marker_at
            )));
        }

        Ok(Self {
            kind,
            name_hash,
            type_names,
            dims,
            body,
            end: c.pos(),
        })
    }

    /// The single type name of class, list, array and enum headers.
    pub fn type_name(&self) -> &'a str {
        self.type_names.first().copied().unwrap_or("")
    }
}
