//! Field selection.
//!
//! Every persisted type declares an explicit allow-list of fields, each tagged
//! with a [`Marker`]. Fields without a marker never reach the wire, which keeps
//! caches and runtime back-references out of saved data.

mod field;
mod persist;

pub use field::*;
pub use persist::*;

use crate::util::{Error, Result};

/// Return the ordered participating fields of `obj`.
///
/// Fails when the type declares neither fields nor wrapper state, and when two
/// field names on the type share a name hash (which would cross-assign data on
/// decode).
pub fn classify(obj: &dyn Persist) -> Result<&'static [FieldSpec]> {
    let fields = obj.fields();
    if fields.is_empty() && !obj.has_state() {
        return Err(Error::NoFieldMarkers(obj.type_name().to_string()));
    }
    for (i, a) in fields.iter().enumerate() {
        if let Some(b) = fields[i + 1..].iter().find(|b| b.hash == a.hash) {
            return Err(Error::NameHashCollision {
                type_name: obj.type_name().to_string(),
                first: a.name,
                second: b.name,
            });
        }
    }
    Ok(fields)
}
