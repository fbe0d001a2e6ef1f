//! # graphpack
//!
//! Self-describing binary persistence for nested object graphs.
//!
//! A live object tree is encoded into a single buffer of tagged values and
//! restored later into brand-new instances. Fields are matched by name hash,
//! so data saved by one version of a type loads into another: unknown values
//! are skipped by their stored length, missing ones keep their defaults.
//!
//! ## Modules
//!
//! - [`util`] - Errors, array shapes, math types
//! - [`format`] - Wire vocabulary, compound headers, shallow scanning
//! - [`codec`] - Primitive and compound codecs
//! - [`schema`] - The `Persist` trait and field allow-lists
//! - [`registry`] - Type resolution and construction strategies
//! - [`graph`] - [`Codec`], the encode/decode entry point
//! - [`inspect`] - Registry-free structural dump of a buffer
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use graphpack::{persist, Codec, TypeRegistry};
//!
//! #[derive(Default)]
//! struct Stockpile {
//!     count: i32,
//!     label: String,
//!     items: Vec<i32>,
//! }
//!
//! persist! {
//!     Stockpile = "game.Stockpile" {
//!         count as "Count": Primitive,
//!         label as "Label": Primitive,
//!         items as "Items": Sequence,
//!     }
//! }
//!
//! let registry = Arc::new(TypeRegistry::new());
//! registry.register::<Stockpile>()?;
//! let codec = Codec::new(registry);
//!
//! let bytes = codec.encode_root(&stockpile)?;
//! let restored: Stockpile = codec.decode_as(&bytes)?;
//! ```

mod macros;

pub mod util;
pub mod format;
pub mod codec;
pub mod schema;
pub mod registry;
pub mod graph;
pub mod inspect;

// Re-export commonly used types
pub use util::{Dimensions, Error, Result, Vec3};
pub use format::{Item, Kind};
pub use codec::{Decode, Encode, Grid, PersistEnum, StateReader, StateWriter, TypeRef, WireType};
pub use schema::{FieldSpec, Marker, Named, Persist, PersistState, PostLoad};
pub use registry::{Construction, Host, Hosted, TypeRegistry};
pub use graph::{Codec, CodecOptions, Decoder, Encoder, UnknownTypePolicy};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{persist, persist_enum};
    pub use crate::codec::{Grid, PersistEnum, StateReader, StateWriter, TypeRef};
    pub use crate::graph::{Codec, CodecOptions, UnknownTypePolicy};
    pub use crate::registry::{Host, Hosted, TypeRegistry};
    pub use crate::schema::{Named, Persist, PersistState, PostLoad};
    pub use crate::util::{Dimensions, Error, Result, Vec3};
}
