//! Graph decoder state.

use tracing::debug;

use crate::codec::Decode;
use crate::format::Item;
use crate::graph::CodecOptions;
use crate::registry::{Construction, Host, TypeCategory, TypeEntry, TypeRegistry};
use crate::schema::Persist;
use crate::util::{Error, Result};

/// Carries the source buffer, resolver and nesting depth through one decode pass.
pub struct Decoder<'a> {
    bytes: &'a [u8],
    registry: &'a TypeRegistry,
    options: &'a CodecOptions,
    depth: usize,
    hosts: u64,
}

impl<'a> Decoder<'a> {
    pub(crate) fn new(bytes: &'a [u8], registry: &'a TypeRegistry, options: &'a CodecOptions) -> Self {
        Self {
            bytes,
            registry,
            options,
            depth: 0,
            hosts: 0,
        }
    }

    /// Source buffer.
    #[inline]
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Type resolver.
    #[inline]
    pub fn registry(&self) -> &'a TypeRegistry {
        self.registry
    }

    /// Active options.
    #[inline]
    pub fn options(&self) -> &'a CodecOptions {
        self.options
    }

    /// Decode one item as `T`, enforcing the depth limit.
    pub fn decode<T: Decode>(&mut self, item: &Item) -> Result<T> {
        if self.depth >= self.options.max_depth {
            return Err(Error::DepthLimit(self.options.max_depth));
        }
        self.depth += 1;
        let result = T::decode(item, self);
        self.depth -= 1;
        result
    }

    /// Build a fresh instance of a registered class using its construction strategy.
    pub fn instantiate(&mut self, entry: &TypeEntry) -> Result<Box<dyn Persist>> {
        let construction = match entry.category() {
            TypeCategory::Class(construction) => construction,
            TypeCategory::Enum => {
                return Err(Error::mismatch("class", format!("enum {}", entry.name())));
            }
        };

        let obj = match construction {
            Construction::Default(make) => make(),
            Construction::Hosted(make) => {
                self.hosts += 1;
                let host = Host::new(self.hosts, entry.name());
                debug!(host = host.id(), type_name = entry.name(), "created host for component");
                make(host)
            }
            Construction::Factory(factory) => {
                let make = self.registry.factory(factory)?;
                make(entry.name())?
            }
        };

        if obj.type_name() != entry.name() {
            return Err(Error::mismatch(entry.name(), obj.type_name()));
        }
        Ok(obj)
    }
}
