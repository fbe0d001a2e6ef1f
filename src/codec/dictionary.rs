//! Dictionary codec: `HashMap<K, V>` and `BTreeMap<K, V>`.
//!
//! Entry `i` is written as a key named `"k{i}"` followed by a value named
//! `"v{i}"`. Decoding pairs children two at a time; entry order is not kept
//! for hashed maps.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use super::{expect_header, key_hash, value_hash, Decode, Encode, WireType};
use crate::format::{scan, Item, Kind};
use crate::graph::{Decoder, Encoder};
use crate::util::{Error, Result};

fn dict_type<K: WireType, V: WireType>() -> Cow<'static, str> {
    Cow::Owned(format!("dict<{},{}>", K::wire_type(), V::wire_type()))
}

fn encode_entries<'a, K, V>(
    name_hash: i32,
    entries: impl Iterator<Item = (&'a K, &'a V)>,
    enc: &mut Encoder<'_>,
) -> Result<()>
where
    K: Encode + WireType + 'a,
    V: Encode + WireType + 'a,
{
    let (key, value) = (K::wire_type(), V::wire_type());
    let frame = enc
        .stream()
        .begin(Kind::DictStart, name_hash, &[key.as_ref(), value.as_ref()], None)?;
    for (i, (k, v)) in entries.enumerate() {
        if k.is_null() || v.is_null() {
            return Err(Error::other(format!(
                "dict<{},{}> holds a null key or value in entry {}",
                key, value, i
            )));
        }
        enc.value(key_hash(i), k)?;
        enc.value(value_hash(i), v)?;
    }
    enc.stream().finish(frame)
}

fn decode_entries<K, V>(item: &Item, dec: &mut Decoder<'_>) -> Result<Vec<(K, V)>>
where
    K: Decode + WireType,
    V: Decode + WireType,
{
    let header = expect_header(item, dec.bytes(), Kind::DictStart)?;
    let (key, value) = match header.type_names.as_slice() {
        [key, value] => (*key, *value),
        _ => return Err(Error::malformed("dictionary header without key and value types")),
    };
    dec.registry().check_assignable(key, &K::wire_type())?;
    dec.registry().check_assignable(value, &V::wire_type())?;

    let items = scan(dec.bytes(), header.body)?;
    if items.len() % 2 != 0 {
        return Err(Error::malformed(format!(
            "dictionary at offset {} has an unpaired entry",
            item.start
        )));
    }
    items
        .chunks_exact(2)
        .map(|pair| -> Result<(K, V)> { Ok((dec.decode(&pair[0])?, dec.decode(&pair[1])?)) })
        .collect()
}

impl<K: WireType, V: WireType, S> WireType for HashMap<K, V, S> {
    fn wire_type() -> Cow<'static, str> {
        dict_type::<K, V>()
    }

    fn wire_kind() -> Kind {
        Kind::DictStart
    }
}

impl<K, V, S> Encode for HashMap<K, V, S>
where
    K: Encode + WireType,
    V: Encode + WireType,
{
    fn encode(&self, name_hash: i32, enc: &mut Encoder<'_>) -> Result<()> {
        encode_entries(name_hash, self.iter(), enc)
    }
}

impl<K, V, S> Decode for HashMap<K, V, S>
where
    K: Decode + WireType + Eq + Hash,
    V: Decode + WireType,
    S: std::hash::BuildHasher + Default,
{
    fn decode(item: &Item, dec: &mut Decoder<'_>) -> Result<Self> {
        Ok(decode_entries(item, dec)?.into_iter().collect())
    }
}

impl<K: WireType, V: WireType> WireType for BTreeMap<K, V> {
    fn wire_type() -> Cow<'static, str> {
        dict_type::<K, V>()
    }

    fn wire_kind() -> Kind {
        Kind::DictStart
    }
}

impl<K, V> Encode for BTreeMap<K, V>
where
    K: Encode + WireType,
    V: Encode + WireType,
{
    fn encode(&self, name_hash: i32, enc: &mut Encoder<'_>) -> Result<()> {
        encode_entries(name_hash, self.iter(), enc)
    }
}

impl<K, V> Decode for BTreeMap<K, V>
where
    K: Decode + WireType + Ord,
    V: Decode + WireType,
{
    fn decode(item: &Item, dec: &mut Decoder<'_>) -> Result<Self> {
        Ok(decode_entries(item, dec)?.into_iter().collect())
    }
}
