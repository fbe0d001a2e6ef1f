//! Shallow scanning of sibling tagged values.
//!
//! A scan walks one nesting level, computing each value's extent from its
//! header or primitive width alone, so unmatched values are skipped without
//! being interpreted.

use std::ops::Range;

use super::{CompoundHeader, Cursor, Kind};
use crate::util::{Error, Result};

/// Location of one tagged value inside a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Item {
    pub kind: Kind,
    pub name_hash: i32,
    /// Offset of the kind byte.
    pub start: usize,
    /// Offset right after `kind` and `name_hash`.
    pub payload: usize,
    /// Exclusive end (past the end marker for compounds).
    pub end: usize,
}

impl Item {
    /// Peek the value starting at `at` and compute its extent.
    pub fn at(bytes: &[u8], at: usize, bound: usize) -> Result<Self> {
        let mut c = Cursor::new(bytes, at..bound)?;
        let raw = c.read_u8()?;
        let kind = Kind::from_u8(raw).ok_or(Error::UnknownKind { kind: raw, offset: at })?;
        if kind.is_end() {
            return Err(Error::malformed(format!("stray {} marker at offset {}", kind, at)));
        }
        let name_hash = c.read_i32()?;
        let payload = c.pos();

        let end = if kind.is_start() {
            CompoundHeader::read(bytes, at, bound)?.end
        } else if let Some(width) = kind.fixed_payload_len() {
            c.skip(width)?;
            c.pos()
        } else {
            // String and TypeRef share the length-prefixed rule
            let len = c.read_len()?;
            c.skip(len)?;
            c.pos()
        };

        Ok(Self { kind, name_hash, start: at, payload, end })
    }

    /// Full byte range of the value.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Total encoded length.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Parse the compound header of this item.
    pub fn header<'a>(&self, bytes: &'a [u8]) -> Result<CompoundHeader<'a>> {
        CompoundHeader::read(bytes, self.start, self.end)
    }
}

/// Scan `range` into its sibling items, in encounter order.
pub fn scan(bytes: &[u8], range: Range<usize>) -> Result<Vec<Item>> {
    let mut items = Vec::new();
    let mut pos = range.start;
    while pos < range.end {
        let item = Item::at(bytes, pos, range.end)?;
        pos = item.end;
        items.push(item);
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(kind: Kind, hash: i32) -> Vec<u8> {
        let mut b = vec![kind.as_u8()];
        b.extend_from_slice(&hash.to_le_bytes());
        b
    }

    #[test]
    fn test_scan_primitives() {
        let mut bytes = tag(Kind::Int, 1);
        bytes.extend_from_slice(&3i32.to_le_bytes());
        bytes.extend(tag(Kind::String, 2));
        bytes.extend_from_slice(&3i32.to_le_bytes());
        bytes.extend_from_slice(b"Ore");
        bytes.extend(tag(Kind::Float, 3));
        bytes.extend_from_slice(&1.5f64.to_le_bytes());

        let items = scan(&bytes, 0..bytes.len()).unwrap();
        let kinds: Vec<Kind> = items.iter().map(|i| i.kind).collect();
        assert_eq!(kinds, vec![Kind::Int, Kind::String, Kind::Float]);
        assert_eq!(items[0].len(), 9);
        assert_eq!(items[1].len(), 12);
        assert_eq!(items[2].len(), 13);
        assert_eq!(items[2].end, bytes.len());
    }

    #[test]
    fn test_scan_rejects_unknown_kind() {
        let bytes = tag(Kind::Int, 0)
            .into_iter()
            .chain([0, 0, 0, 0, 0x42])
            .collect::<Vec<_>>();
        let err = scan(&bytes, 0..bytes.len()).unwrap_err();
        assert!(matches!(err, Error::UnknownKind { kind: 0x42, offset: 9 }));
    }

    #[test]
    fn test_scan_rejects_stray_end() {
        let bytes = tag(Kind::ListEnd, 0);
        assert!(matches!(scan(&bytes, 0..bytes.len()), Err(Error::Malformed(_))));
    }

    #[test]
    fn test_scan_truncated_primitive() {
        let mut bytes = tag(Kind::Double, 0);
        bytes.extend_from_slice(&[0, 0, 0]);
        assert!(matches!(
            scan(&bytes, 0..bytes.len()),
            Err(Error::UnexpectedEof(_))
        ));
    }
}
