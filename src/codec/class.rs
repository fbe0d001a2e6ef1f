//! Class codec: declared fields of a [`Persist`] value.

use std::borrow::Cow;
use std::ops::Range;

use tracing::{trace, warn};

use super::{expect_header, read_state, write_state, Decode, Encode, WireType, STATE_HASH};
use crate::format::{scan, Item, Kind};
use crate::graph::{Decoder, Encoder, UnknownTypePolicy};
use crate::schema::{classify, Named, Persist};
use crate::util::{Error, Result};

/// Type name written for polymorphic `Box<dyn Persist>` fields.
pub const OBJECT: &str = "object";

/// Encode `obj` as a class tagged value.
///
/// The wrapper carrying non-field state, if any, precedes the fields. Null
/// fields are left out, so a type whose fields are all null encodes as an
/// empty class.
pub fn encode_object(obj: &dyn Persist, name_hash: i32, enc: &mut Encoder<'_>) -> Result<()> {
    let fields = classify(obj)?;
    let frame = enc
        .stream()
        .begin(Kind::ClassStart, name_hash, &[obj.type_name()], None)?;
    if obj.has_state() {
        write_state(obj, enc)?;
    }
    for field in fields {
        obj.encode_field(field, enc)?;
    }
    enc.stream().finish(frame)
}

/// Decode a class tagged value into a new instance of whatever type it names.
pub fn decode_object(item: &Item, dec: &mut Decoder<'_>) -> Result<Box<dyn Persist>> {
    let header = expect_header(item, dec.bytes(), Kind::ClassStart)?;
    let entry = dec.registry().resolve_class(header.type_name())?;
    let mut obj = dec.instantiate(&entry)?;
    fill_object(obj.as_mut(), header.body, dec)?;
    Ok(obj)
}

/// Decode a class tagged value that must hold a `T`.
pub fn decode_typed<T: Persist + Named>(item: &Item, dec: &mut Decoder<'_>) -> Result<T> {
    let header = expect_header(item, dec.bytes(), Kind::ClassStart)?;
    if header.type_name() != T::TYPE_NAME {
        return Err(Error::mismatch(T::TYPE_NAME, header.type_name()));
    }
    let entry = dec.registry().resolve_class(T::TYPE_NAME)?;
    let mut obj = dec.instantiate(&entry)?;
    fill_object(obj.as_mut(), header.body, dec)?;
    obj.downcast::<T>()
        .map(|obj| *obj)
        .ok_or_else(|| Error::other(format!("{} is registered for a different Rust type", T::TYPE_NAME)))
}

/// Assign the children in `body` to the fields of `obj`, then run its post-load hook.
///
/// Children are matched by kind and name hash; anything unmatched is skipped
/// by its stored length and unmatched fields keep their current value.
pub(crate) fn fill_object(obj: &mut dyn Persist, body: Range<usize>, dec: &mut Decoder<'_>) -> Result<()> {
    let fields = classify(obj)?;
    for item in scan(dec.bytes(), body)? {
        if item.kind == Kind::WrapperStart && item.name_hash == STATE_HASH {
            if obj.has_state() {
                read_state(obj, &item, dec)?;
            } else {
                trace!(type_name = obj.type_name(), "ignoring state wrapper");
            }
            continue;
        }

        let Some(field) = fields.iter().find(|f| f.matches(item.kind, item.name_hash)) else {
            trace!(
                type_name = obj.type_name(),
                kind = %item.kind,
                name_hash = item.name_hash,
                len = item.len(),
                "skipping unmatched value"
            );
            continue;
        };

        match obj.decode_field(field, &item, dec) {
            Ok(()) => {}
            Err(err) if dec.options().unknown_types == UnknownTypePolicy::Skip && err.is_skippable() => {
                warn!(
                    type_name = obj.type_name(),
                    field = field.name,
                    error = %err,
                    "skipping field"
                );
            }
            Err(err) => return Err(err),
        }
    }

    if let Some(hook) = obj.post_load() {
        hook.on_loaded();
    }
    Ok(())
}

impl Encode for dyn Persist {
    fn encode(&self, name_hash: i32, enc: &mut Encoder<'_>) -> Result<()> {
        encode_object(self, name_hash, enc)
    }
}

impl WireType for Box<dyn Persist> {
    fn wire_type() -> Cow<'static, str> {
        Cow::Borrowed(OBJECT)
    }

    fn wire_kind() -> Kind {
        Kind::ClassStart
    }
}

impl Encode for Box<dyn Persist> {
    fn encode(&self, name_hash: i32, enc: &mut Encoder<'_>) -> Result<()> {
        encode_object(self.as_ref(), name_hash, enc)
    }
}

impl Decode for Box<dyn Persist> {
    fn decode(item: &Item, dec: &mut Decoder<'_>) -> Result<Self> {
        decode_object(item, dec)
    }
}
