//! Primitive and compound codecs.
//!
//! Every compound codec follows the same shape: open the header with a
//! reserved `inner_len`, encode the children through the [`Encoder`], then
//! back-patch the length and close with the end marker. Decoding reads the
//! header, scans the children shallowly and decodes them one by one.
//!
//! [`Encoder`]: crate::graph::Encoder

mod stream;
mod traits;
mod primitive;
mod class;
mod list;
mod array;
mod dictionary;
mod enumeration;
mod state;

pub use stream::*;
pub use traits::*;
pub use primitive::*;
pub use class::*;
pub use array::*;
pub use enumeration::*;
pub use state::*;

use crate::format::{name_hash, CompoundHeader, Item, Kind};
use crate::util::{Error, Result};

/// Name hash of the list or state element at `index`.
pub fn element_hash(index: usize) -> i32 {
    name_hash(&index.to_string())
}

/// Name hash of the key of dictionary entry `index`.
pub fn key_hash(index: usize) -> i32 {
    name_hash(&format!("k{}", index))
}

/// Name hash of the value of dictionary entry `index`.
pub fn value_hash(index: usize) -> i32 {
    name_hash(&format!("v{}", index))
}

/// Parse the compound header of `item`, requiring `kind`.
pub(crate) fn expect_header<'a>(item: &Item, bytes: &'a [u8], kind: Kind) -> Result<CompoundHeader<'a>> {
    if item.kind != kind {
        return Err(Error::mismatch(kind.name(), item.kind.name()));
    }
    item.header(bytes)
}
