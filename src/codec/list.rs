//! List codec: `Vec<T>`.
//!
//! Elements are positional. Each one is written under the hash of its decimal
//! index and read back in encounter order.

use std::borrow::Cow;

use super::{element_hash, expect_header, Decode, Encode, WireType};
use crate::format::{scan, Item, Kind};
use crate::graph::{Decoder, Encoder};
use crate::util::{Error, Result};

impl<T: WireType> WireType for Vec<T> {
    fn wire_type() -> Cow<'static, str> {
        Cow::Owned(format!("list<{}>", T::wire_type()))
    }

    fn wire_kind() -> Kind {
        Kind::ListStart
    }
}

impl<T: Encode + WireType> Encode for Vec<T> {
    fn encode(&self, name_hash: i32, enc: &mut Encoder<'_>) -> Result<()> {
        let element = T::wire_type();
        let frame = enc
            .stream()
            .begin(Kind::ListStart, name_hash, &[element.as_ref()], None)?;
        for (i, value) in self.iter().enumerate() {
            if value.is_null() {
                return Err(Error::other(format!("list<{}> holds a null element at {}", element, i)));
            }
            enc.value(element_hash(i), value)?;
        }
        enc.stream().finish(frame)
    }
}

impl<T: Decode + WireType> Decode for Vec<T> {
    fn decode(item: &Item, dec: &mut Decoder<'_>) -> Result<Self> {
        let header = expect_header(item, dec.bytes(), Kind::ListStart)?;
        dec.registry()
            .check_assignable(header.type_name(), &T::wire_type())?;
        scan(dec.bytes(), header.body)?
            .iter()
            .map(|element| dec.decode(element))
            .collect()
    }
}
