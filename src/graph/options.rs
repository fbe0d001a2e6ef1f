//! Codec configuration.

/// Default nesting limit for encode and decode.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// What a class does with a field whose subtree names an unknown type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnknownTypePolicy {
    /// Abort the whole decode.
    #[default]
    Fail,
    /// Jump over the field using its stored length; the field keeps its default.
    Skip,
}

/// Options shared by every encode and decode call of a [`Codec`].
///
/// [`Codec`]: super::Codec
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodecOptions {
    /// Maximum nesting depth of compound values.
    pub max_depth: usize,
    /// Fallback for unresolvable types below a class field.
    pub unknown_types: UnknownTypePolicy,
    /// Prepend the root value's byte length in `encode_root`.
    pub size_prefix: bool,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            unknown_types: UnknownTypePolicy::Fail,
            size_prefix: true,
        }
    }
}

impl CodecOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the nesting limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the unknown-type fallback.
    pub fn with_unknown_types(mut self, policy: UnknownTypePolicy) -> Self {
        self.unknown_types = policy;
        self
    }

    /// Enable or disable the root size prefix.
    pub fn with_size_prefix(mut self, enabled: bool) -> Self {
        self.size_prefix = enabled;
        self
    }
}
