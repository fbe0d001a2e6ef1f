//! Enum codec.
//!
//! An enum is a compound wrapping exactly one `int` child named `"value"`,
//! with the enum's own type name in the header.

use super::{expect_header, write_primitive, Primitive};
use crate::format::{name_hash, scan, Item, Kind};
use crate::graph::{Decoder, Encoder};
use crate::util::{Error, Result};

/// Name hash of the wrapped value.
pub const ENUM_VALUE_HASH: i32 = name_hash("value");

/// A fieldless enum with stable integer discriminants.
///
/// Implemented with [`persist_enum!`](crate::persist_enum).
pub trait PersistEnum: Copy + Send + 'static {
    const TYPE_NAME: &'static str;

    fn to_repr(self) -> i32;

    fn from_repr(value: i32) -> Option<Self>;
}

/// Encode `value` as an enum tagged value.
pub fn encode_enum<E: PersistEnum>(value: E, name_hash: i32, enc: &mut Encoder<'_>) -> Result<()> {
    let out = enc.stream();
    let frame = out.begin(Kind::EnumStart, name_hash, &[E::TYPE_NAME], None)?;
    write_primitive(out, &Primitive::Int(value.to_repr()), ENUM_VALUE_HASH)?;
    out.finish(frame)
}

/// Decode an enum tagged value naming `E`.
pub fn decode_enum<E: PersistEnum>(item: &Item, dec: &mut Decoder<'_>) -> Result<E> {
    let header = expect_header(item, dec.bytes(), Kind::EnumStart)?;
    dec.registry()
        .check_assignable(header.type_name(), E::TYPE_NAME)?;

    let items = scan(dec.bytes(), header.body)?;
    let [inner] = items.as_slice() else {
        return Err(Error::malformed(format!(
            "enum {} wraps {} values, expected 1",
            E::TYPE_NAME,
            items.len()
        )));
    };
    let repr: i32 = dec.decode(inner)?;
    E::from_repr(repr).ok_or_else(|| Error::InvalidEnumValue {
        type_name: E::TYPE_NAME.to_string(),
        value: repr,
    })
}
