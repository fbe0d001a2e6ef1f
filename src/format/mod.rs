//! Wire format: tag vocabulary, headers and shallow scanning.
//!
//! Every value on the wire is a tagged value. Integers are little-endian.
//!
//! ```text
//! TaggedValue        ::= kind:u8 name_hash:i32 Payload(kind)
//! Payload(primitive) ::= fixed-width bytes | (len:i32 utf8_bytes[len])
//! Payload(compound)  ::= TypeDescriptor(kind) inner_len:i32 TaggedValue* EndMarker(kind)
//! EndMarker(kind)    ::= end_kind:u8 name_hash:i32
//!
//! TypeDescriptor(class)   ::= (len:i32 name_utf8[len])
//! TypeDescriptor(list)    ::= (len:i32 name_utf8[len])
//! TypeDescriptor(array)   ::= (len:i32 name_utf8[len]) dim_count:u8 dim_size:u8[dim_count]
//! TypeDescriptor(dict)    ::= (len:i32 key_name[...]) (len:i32 val_name[...])
//! TypeDescriptor(enum)    ::= (len:i32 name_utf8[len])
//! TypeDescriptor(wrapper) ::= (empty)
//! ```
//!
//! `inner_len` counts the children only, so a reader can jump over a whole
//! compound value without understanding it.

mod kind;
mod cursor;
mod header;
mod scan;

pub use kind::*;
pub use cursor::*;
pub use header::*;
pub use scan::*;

/// Size of `kind` plus `name_hash`.
pub const TAG_LEN: usize = 5;

/// Size of a length prefix.
pub const LEN_PREFIX: usize = 4;

/// Size of a compound end marker.
pub const END_MARKER_LEN: usize = 5;

/// Name hash used by all tagged values.
///
/// MurmurHash3 x86_32 of the UTF-8 name with seed 0, reinterpreted as `i32`.
#[inline]
pub const fn name_hash(name: &str) -> i32 {
    murmur3::hash_str(name) as i32
}
