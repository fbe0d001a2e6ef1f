//! Value-level codec traits.
//!
//! Each value type a field may hold knows its wire kind, the type name
//! written into container headers, and how to encode and decode itself.

use std::borrow::Cow;

use crate::format::{Item, Kind};
use crate::graph::{Decoder, Encoder};
use crate::util::Result;

/// Static wire description of a value type.
pub trait WireType {
    /// Type name written into list, array and dictionary headers.
    fn wire_type() -> Cow<'static, str>;

    /// Kind of the tagged value this type encodes to.
    fn wire_kind() -> Kind;
}

/// Encode a value as one tagged value.
pub trait Encode {
    /// Write the tagged value carrying `name_hash`.
    fn encode(&self, name_hash: i32, enc: &mut Encoder<'_>) -> Result<()>;

    /// Null values are left out of their parent entirely.
    fn is_null(&self) -> bool {
        false
    }
}

/// Decode a value from one scanned tagged value.
pub trait Decode: Sized {
    fn decode(item: &Item, dec: &mut Decoder<'_>) -> Result<Self>;
}

impl<T: WireType> WireType for Option<T> {
    fn wire_type() -> Cow<'static, str> {
        T::wire_type()
    }

    fn wire_kind() -> Kind {
        T::wire_kind()
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode(&self, name_hash: i32, enc: &mut Encoder<'_>) -> Result<()> {
        match self {
            Some(v) => v.encode(name_hash, enc),
            None => Ok(()),
        }
    }

    fn is_null(&self) -> bool {
        self.as_ref().map_or(true, Encode::is_null)
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode(item: &Item, dec: &mut Decoder<'_>) -> Result<Self> {
        T::decode(item, dec).map(Some)
    }
}
