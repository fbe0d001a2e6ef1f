//! Error types for graphpack.

use thiserror::Error;

/// Main error type for encode and decode operations.
///
/// An error aborts the whole encode or decode call; no partially decoded
/// graph is returned alongside it. The only exception is a class field
/// skipped under [`UnknownTypePolicy::Skip`](crate::UnknownTypePolicy::Skip).
#[derive(Error, Debug)]
pub enum Error {
    /// Buffer ended before a value or header was complete
    #[error("Unexpected end of buffer at offset {0}")]
    UnexpectedEof(usize),

    /// Kind byte outside the tag vocabulary
    #[error("Unknown kind byte {kind:#04x} at offset {offset}")]
    UnknownKind { kind: u8, offset: usize },

    /// Structurally invalid stream (bad end marker, negative length, ...)
    #[error("Malformed stream: {0}")]
    Malformed(String),

    /// Stored type name cannot be mapped to a constructible type
    #[error("Unresolved type: {0}")]
    UnresolvedType(String),

    /// A persisted type declares no fields and no wrapper state
    #[error("Type {0} declares no persisted fields")]
    NoFieldMarkers(String),

    /// Two field names of one type share a 32-bit name hash
    #[error("Fields {first} and {second} of {type_name} have colliding name hashes")]
    NameHashCollision {
        type_name: String,
        first: &'static str,
        second: &'static str,
    },

    /// A field value does not fit the marker it was declared with
    #[error("Field {field} is marked {marker} but holds a {kind} value")]
    MarkerMismatch {
        field: &'static str,
        marker: &'static str,
        kind: &'static str,
    },

    /// Type mismatch between stored and expected data
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// Array shape does not match its element count or target
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    /// Array rank or dimension does not fit the u8 wire field
    #[error("Dimension {dim} of size {size} does not fit in the array header")]
    DimensionOverflow { dim: usize, size: usize },

    /// Object graph nests deeper than the configured limit
    #[error("Nesting depth limit of {0} exceeded")]
    DepthLimit(usize),

    /// Stored enum discriminant has no matching variant
    #[error("Invalid value {value} for enum {type_name}")]
    InvalidEnumValue { type_name: String, value: i32 },

    /// Type name registered twice
    #[error("Type already registered: {0}")]
    DuplicateType(String),

    /// Factory-constructed type without a registered factory
    #[error("No factory registered under {0}")]
    MissingFactory(String),

    /// UTF-8 conversion error
    #[error("Invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an "other" error from a string.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create a malformed stream error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }

    /// Create a type mismatch error.
    pub fn mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Errors a parent may skip over under [`UnknownTypePolicy::Skip`].
    ///
    /// [`UnknownTypePolicy::Skip`]: crate::graph::UnknownTypePolicy::Skip
    pub fn is_skippable(&self) -> bool {
        matches!(self, Self::UnresolvedType(_) | Self::TypeMismatch { .. })
    }
}

/// Result type alias for graphpack operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = Error::UnknownKind { kind: 0x7f, offset: 12 };
        assert!(e.to_string().contains("0x7f"));
        assert!(e.to_string().contains("12"));

        let e = Error::DimensionOverflow { dim: 1, size: 300 };
        assert!(e.to_string().contains("300"));
    }

    #[test]
    fn test_error_from_utf8() {
        let bytes = vec![0xff, 0xfe];
        let err: Error = std::str::from_utf8(&bytes).unwrap_err().into();
        assert!(matches!(err, Error::Utf8(_)));
    }

    #[test]
    fn test_skippable() {
        assert!(Error::UnresolvedType("a.B".into()).is_skippable());
        assert!(Error::mismatch("int", "string").is_skippable());
        assert!(!Error::malformed("bad end marker").is_skippable());
    }
}
