//! Graph encoder state.

use crate::codec::{Encode, OStream, WireType};
use crate::graph::CodecOptions;
use crate::schema::FieldSpec;
use crate::util::{Error, Result};

/// Carries the output stream and nesting depth through one encode pass.
pub struct Encoder<'o> {
    out: OStream,
    options: &'o CodecOptions,
    depth: usize,
}

impl<'o> Encoder<'o> {
    pub(crate) fn new(out: OStream, options: &'o CodecOptions) -> Self {
        Self { out, options, depth: 0 }
    }

    /// Output stream.
    #[inline]
    pub fn stream(&mut self) -> &mut OStream {
        &mut self.out
    }

    /// Active options.
    #[inline]
    pub fn options(&self) -> &CodecOptions {
        self.options
    }

    /// Encode one declared field.
    ///
    /// Null values are left out. A value whose wire kind does not fit the
    /// field's marker is an authoring error.
    pub fn field<T: Encode + WireType>(&mut self, spec: &FieldSpec, value: &T) -> Result<()> {
        if value.is_null() {
            return Ok(());
        }
        let kind = T::wire_kind();
        if !spec.marker.accepts(kind) {
            return Err(Error::MarkerMismatch {
                field: spec.name,
                marker: spec.marker.name(),
                kind: kind.name(),
            });
        }
        self.value(spec.hash, value)
    }

    /// Encode any value under `name_hash`, enforcing the depth limit.
    pub fn value<T: Encode + ?Sized>(&mut self, name_hash: i32, value: &T) -> Result<()> {
        if self.depth >= self.options.max_depth {
            return Err(Error::DepthLimit(self.options.max_depth));
        }
        self.depth += 1;
        let result = value.encode(name_hash, self);
        self.depth -= 1;
        result
    }

    pub(crate) fn into_stream(self) -> OStream {
        self.out
    }
}
