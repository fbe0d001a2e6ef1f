//! Wrapper codec for state that does not live in declared fields.
//!
//! A type with `has_state()` gets one wrapper child named `"$state"` holding
//! a positional sequence of values, written and read in the same order by
//! its [`PersistState`](crate::PersistState) hooks.

use super::{element_hash, Decode, Encode};
use crate::format::{name_hash, scan, Item, Kind};
use crate::graph::{Decoder, Encoder};
use crate::schema::Persist;
use crate::util::{Error, Result};

/// Name of the state wrapper inside a class.
pub const STATE_NAME: &str = "$state";

pub(crate) const STATE_HASH: i32 = name_hash(STATE_NAME);

/// Sequential writer handed to [`PersistState::write_state`](crate::PersistState::write_state).
pub struct StateWriter<'e, 'o> {
    enc: &'e mut Encoder<'o>,
    index: usize,
}

impl StateWriter<'_, '_> {
    /// Append one value.
    pub fn write<T: Encode + ?Sized>(&mut self, value: &T) -> Result<()> {
        if value.is_null() {
            return Err(Error::other(format!("null state value at {}", self.index)));
        }
        self.enc.value(element_hash(self.index), value)?;
        self.index += 1;
        Ok(())
    }

    /// Number of values written so far.
    pub fn len(&self) -> usize {
        self.index
    }

    pub fn is_empty(&self) -> bool {
        self.index == 0
    }
}

/// Sequential reader handed to [`PersistState::read_state`](crate::PersistState::read_state).
pub struct StateReader<'d, 'a> {
    dec: &'d mut Decoder<'a>,
    items: std::vec::IntoIter<Item>,
}

impl StateReader<'_, '_> {
    /// Read the next value.
    pub fn read<T: Decode>(&mut self) -> Result<T> {
        let item = self
            .items
            .next()
            .ok_or_else(|| Error::malformed("state wrapper has no more values"))?;
        self.dec.decode(&item)
    }

    /// Values not read yet.
    pub fn remaining(&self) -> usize {
        self.items.len()
    }
}

pub(crate) fn write_state(obj: &dyn Persist, enc: &mut Encoder<'_>) -> Result<()> {
    let frame = enc.stream().begin(Kind::WrapperStart, STATE_HASH, &[], None)?;
    obj.write_state(&mut StateWriter { enc: &mut *enc, index: 0 })?;
    enc.stream().finish(frame)
}

pub(crate) fn read_state(obj: &mut dyn Persist, item: &Item, dec: &mut Decoder<'_>) -> Result<()> {
    let header = item.header(dec.bytes())?;
    let items = scan(dec.bytes(), header.body)?;
    let mut reader = StateReader {
        dec,
        items: items.into_iter(),
    };
    obj.read_state(&mut reader)
}
