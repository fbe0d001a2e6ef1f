//! Field markers and the per-type allow-list.

use crate::format::{name_hash, Kind};

/// How a declared field participates in the codec.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Marker {
    /// Primitive values and enums.
    Primitive,
    /// Nested class values.
    Class,
    /// Lists and fixed-size arrays.
    Sequence,
    /// Dictionaries.
    Dictionary,
}

impl Marker {
    /// Check whether a stored value of `kind` can land in a field with this marker.
    pub const fn accepts(self, kind: Kind) -> bool {
        match self {
            Self::Primitive => kind.is_primitive() || matches!(kind, Kind::EnumStart),
            Self::Class => matches!(kind, Kind::ClassStart),
            Self::Sequence => matches!(kind, Kind::ListStart | Kind::ArrayStart),
            Self::Dictionary => matches!(kind, Kind::DictStart),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Primitive => "primitive",
            Self::Class => "class",
            Self::Sequence => "sequence",
            Self::Dictionary => "dictionary",
        }
    }
}

/// One entry of a type's persisted-field allow-list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    /// Name the hash is computed from.
    pub name: &'static str,
    pub marker: Marker,
    /// Name hash written with the field's value.
    pub hash: i32,
}

impl FieldSpec {
    /// Declare a field; the hash is computed at compile time in const context.
    pub const fn new(name: &'static str, marker: Marker) -> Self {
        Self {
            name,
            marker,
            hash: name_hash(name),
        }
    }

    /// Check whether a scanned value belongs to this field.
    #[inline]
    pub fn matches(&self, kind: Kind, hash: i32) -> bool {
        self.hash == hash && self.marker.accepts(kind)
    }
}
