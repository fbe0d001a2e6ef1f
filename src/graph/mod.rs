//! Graph encoding and decoding.
//!
//! [`Codec`] is the consumer-facing entry point: it walks a live object from
//! its root into one self-describing byte buffer and rebuilds brand-new
//! instances from it. Every call runs to completion on the calling thread;
//! any error aborts the whole call and no partially built graph escapes.

mod options;
mod encoder;
mod decoder;

pub use options::*;
pub use encoder::*;
pub use decoder::*;

use std::ops::Range;
use std::sync::Arc;

use tracing::debug;

use crate::codec::{expect_header, fill_object, Decode, OStream};
use crate::format::{name_hash, Cursor, Item, Kind, LEN_PREFIX};
use crate::registry::TypeRegistry;
use crate::schema::Persist;
use crate::util::{Error, Result};

/// Name given to the value written by [`Codec::encode_root`].
pub const ROOT_NAME: &str = "root";

const ROOT_HASH: i32 = name_hash(ROOT_NAME);

/// Encoder/decoder bound to a type registry and options.
///
/// Cheap to clone; clones share the registry.
#[derive(Clone, Debug)]
pub struct Codec {
    registry: Arc<TypeRegistry>,
    options: CodecOptions,
}

impl Codec {
    /// Create a codec with default options.
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self::with_options(registry, CodecOptions::default())
    }

    pub fn with_options(registry: Arc<TypeRegistry>, options: CodecOptions) -> Self {
        Self { registry, options }
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Encode `root` as a single class tagged value named `name`.
    ///
    /// No size prefix is written; read it back with [`decode_value`](Self::decode_value).
    pub fn encode(&self, root: &dyn Persist, name: &str) -> Result<Vec<u8>> {
        let mut enc = Encoder::new(OStream::new(), &self.options);
        enc.value(name_hash(name), root)?;
        let bytes = enc.into_stream().into_bytes();
        debug!(type_name = root.type_name(), value_name = name, bytes = bytes.len(), "encoded value");
        Ok(bytes)
    }

    /// Encode `root` as the root of a save buffer.
    ///
    /// With `size_prefix` on, the buffer starts with the root value's byte
    /// length as `i32`.
    pub fn encode_root(&self, root: &dyn Persist) -> Result<Vec<u8>> {
        let bytes = self.write_root(root, OStream::new())?.into_bytes();
        debug!(type_name = root.type_name(), bytes = bytes.len(), "encoded root");
        Ok(bytes)
    }

    /// Byte length [`encode_root`](Self::encode_root) would produce, computed
    /// by the same code path without buffering.
    pub fn size_of(&self, root: &dyn Persist) -> Result<usize> {
        Ok(self.write_root(root, OStream::counting())?.pos())
    }

    fn write_root(&self, root: &dyn Persist, mut out: OStream) -> Result<OStream> {
        let prefix = self.options.size_prefix.then(|| out.reserve_len());
        let start = out.pos();
        let mut enc = Encoder::new(out, &self.options);
        enc.value(ROOT_HASH, root)?;
        let mut out = enc.into_stream();
        if let Some(at) = prefix {
            let len = out.pos() - start;
            out.patch_len(at, len)?;
        }
        Ok(out)
    }

    /// Decode a buffer produced by [`encode_root`](Self::encode_root).
    pub fn decode_root(&self, bytes: &[u8]) -> Result<Box<dyn Persist>> {
        let range = self.root_range(bytes)?;
        let obj = self.decode_range::<Box<dyn Persist>>(bytes, range)?;
        debug!(type_name = obj.type_name(), bytes = bytes.len(), "decoded root");
        Ok(obj)
    }

    /// Decode a root buffer that must hold a `T`.
    pub fn decode_as<T: Decode>(&self, bytes: &[u8]) -> Result<T> {
        let range = self.root_range(bytes)?;
        self.decode_range(bytes, range)
    }

    /// Decode the single class tagged value occupying `range`.
    pub fn decode_value(&self, bytes: &[u8], range: Range<usize>) -> Result<Box<dyn Persist>> {
        self.decode_range(bytes, range)
    }

    /// Populate `existing` from the class tagged value occupying `range`.
    ///
    /// The stored type name must equal `existing.type_name()`. Fields absent
    /// from the stream keep their current values. On error `existing` may
    /// have been partly updated.
    pub fn load_into(&self, existing: &mut dyn Persist, bytes: &[u8], range: Range<usize>) -> Result<()> {
        let item = Self::single_item(bytes, range)?;
        let header = expect_header(&item, bytes, Kind::ClassStart)?;
        if header.type_name() != existing.type_name() {
            return Err(Error::mismatch(existing.type_name(), header.type_name()));
        }
        let mut dec = Decoder::new(bytes, &self.registry, &self.options);
        fill_object(existing, header.body, &mut dec)?;
        debug!(type_name = existing.type_name(), bytes = item.len(), "loaded into existing object");
        Ok(())
    }

    fn decode_range<T: Decode>(&self, bytes: &[u8], range: Range<usize>) -> Result<T> {
        let item = Self::single_item(bytes, range)?;
        let mut dec = Decoder::new(bytes, &self.registry, &self.options);
        dec.decode(&item)
    }

    /// Range of the root value, validating the size prefix when enabled.
    fn root_range(&self, bytes: &[u8]) -> Result<Range<usize>> {
        if !self.options.size_prefix {
            return Ok(0..bytes.len());
        }
        let mut c = Cursor::new(bytes, 0..bytes.len())?;
        let total = c.read_len()?;
        if total != c.remaining() {
            return Err(Error::malformed(format!(
                "size prefix declares {} bytes but {} follow",
                total,
                c.remaining()
            )));
        }
        Ok(LEN_PREFIX..bytes.len())
    }

    /// The one tagged value filling `range` exactly.
    fn single_item(bytes: &[u8], range: Range<usize>) -> Result<Item> {
        if range.start >= range.end {
            return Err(Error::UnexpectedEof(range.start));
        }
        let item = Item::at(bytes, range.start, range.end)?;
        if item.end != range.end {
            return Err(Error::malformed(format!(
                "{} trailing bytes after value at offset {}",
                range.end - item.end,
                range.start
            )));
        }
        Ok(item)
    }
}
