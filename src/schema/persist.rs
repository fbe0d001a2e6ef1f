//! The `Persist` trait: types describing their own persisted fields.

use std::any::Any;

use super::FieldSpec;
use crate::codec::{StateReader, StateWriter};
use crate::format::Item;
use crate::graph::{Decoder, Encoder};
use crate::util::Result;

/// A class value that can be written to and restored from the wire.
///
/// Only the fields returned by [`fields`](Persist::fields) participate;
/// everything else on the type is invisible to the codec. Implementations are
/// usually generated with [`persist!`](crate::persist).
pub trait Persist: Any + Send {
    /// Stable name stored in class headers and resolved on decode.
    fn type_name(&self) -> &'static str;

    /// Ordered allow-list of persisted fields.
    fn fields(&self) -> &'static [FieldSpec];

    /// Encode the value of `field`.
    fn encode_field(&self, field: &FieldSpec, enc: &mut Encoder<'_>) -> Result<()>;

    /// Decode `item` into `field`.
    fn decode_field(&mut self, field: &FieldSpec, item: &Item, dec: &mut Decoder<'_>) -> Result<()>;

    /// Types carrying state outside declared fields return true and
    /// implement the two state methods.
    fn has_state(&self) -> bool {
        false
    }

    fn write_state(&self, _state: &mut StateWriter<'_, '_>) -> Result<()> {
        Ok(())
    }

    fn read_state(&mut self, _state: &mut StateReader<'_, '_>) -> Result<()> {
        Ok(())
    }

    /// Post-load capability; types implementing [`PostLoad`] return `Some(self)`.
    fn post_load(&mut self) -> Option<&mut dyn PostLoad> {
        None
    }

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl std::fmt::Debug for dyn Persist {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(self.type_name()).finish_non_exhaustive()
    }
}

impl dyn Persist {
    /// Borrow as a concrete type.
    pub fn downcast_ref<T: Persist>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    /// Mutably borrow as a concrete type.
    pub fn downcast_mut<T: Persist>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut()
    }

    /// Convert into a concrete type.
    pub fn downcast<T: Persist>(self: Box<Self>) -> Option<Box<T>> {
        self.into_any().downcast().ok()
    }
}

/// Compile-time type name of a concrete persisted type.
pub trait Named {
    const TYPE_NAME: &'static str;
}

/// Hook run once after every field of a freshly decoded value is assigned.
pub trait PostLoad {
    fn on_loaded(&mut self);
}

/// State hooks for types whose data does not map onto declared fields.
///
/// Enabled on a [`persist!`](crate::persist) type with `hooks: [state]`.
pub trait PersistState {
    fn write_state(&self, state: &mut StateWriter<'_, '_>) -> Result<()>;
    fn read_state(&mut self, state: &mut StateReader<'_, '_>) -> Result<()>;
}
