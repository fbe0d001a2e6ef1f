//! Type resolution.
//!
//! The registry maps stable type names to construction strategies. It is
//! read-mostly and shared across threads: decodes take read locks only, except
//! for the first resolution of a name, which is cached. Stored names come from
//! untrusted buffers, so their nesting is bounded by [`DEFAULT_MAX_DEPTH`] and
//! the cache stops growing at [`MAX_CACHED_NAMES`].

mod names;

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::codec::{PersistEnum, OBJECT};
use crate::format::Kind;
use crate::graph::DEFAULT_MAX_DEPTH;
use crate::schema::{Named, Persist};
use crate::util::{Error, Result};
use names::TypeName;

/// Upper bound on cached name resolutions.
pub const MAX_CACHED_NAMES: usize = 4096;

/// Builds an asset-like object from its type name.
pub type Factory = fn(&str) -> Result<Box<dyn Persist>>;

/// How the decoder creates a fresh instance of a class.
#[derive(Clone, Copy, Debug)]
pub enum Construction {
    /// Plain value object: default-construct.
    Default(fn() -> Box<dyn Persist>),
    /// Component-like object: attach to a freshly allocated [`Host`].
    Hosted(fn(Host) -> Box<dyn Persist>),
    /// Asset-like object: build through the named factory.
    Factory(&'static str),
}

/// Category of a registered type.
#[derive(Clone, Copy, Debug)]
pub enum TypeCategory {
    Class(Construction),
    Enum,
}

/// One registered type.
#[derive(Debug)]
pub struct TypeEntry {
    name: String,
    type_id: TypeId,
    category: TypeCategory,
}

impl TypeEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rust type registered under this name.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn category(&self) -> TypeCategory {
        self.category
    }
}

/// Implicit container a component-like object is attached to on decode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Host {
    id: u64,
    name: String,
}

impl Host {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }

    /// Identifier, unique within one decode call.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A component-like type that can only exist attached to a [`Host`].
pub trait Hosted: Persist + Named {
    fn with_host(host: Host) -> Self;
}

/// Resolved form of a stored type name.
#[derive(Clone, Debug)]
pub enum TypeDescriptor {
    Primitive(Kind),
    /// Any registered class.
    Object,
    Class(Arc<TypeEntry>),
    Enum(Arc<TypeEntry>),
    List(Box<TypeDescriptor>),
    Array(Box<TypeDescriptor>),
    Dictionary(Box<TypeDescriptor>, Box<TypeDescriptor>),
}

impl TypeDescriptor {
    /// Kind of the tagged values this type is stored as.
    pub fn kind(&self) -> Kind {
        match self {
            Self::Primitive(kind) => *kind,
            Self::Object | Self::Class(_) => Kind::ClassStart,
            Self::Enum(_) => Kind::EnumStart,
            Self::List(_) => Kind::ListStart,
            Self::Array(_) => Kind::ArrayStart,
            Self::Dictionary(..) => Kind::DictStart,
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(kind) => write!(f, "{}", kind.name()),
            Self::Object => write!(f, "{}", OBJECT),
            Self::Class(entry) | Self::Enum(entry) => write!(f, "{}", entry.name()),
            Self::List(inner) => write!(f, "list<{}>", inner),
            Self::Array(inner) => write!(f, "array<{}>", inner),
            Self::Dictionary(k, v) => write!(f, "dict<{},{}>", k, v),
        }
    }
}

/// Name-keyed registry of constructible types.
#[derive(Default)]
pub struct TypeRegistry {
    types: RwLock<HashMap<String, Arc<TypeEntry>>>,
    factories: RwLock<HashMap<String, Factory>>,
    resolved: RwLock<HashMap<String, TypeDescriptor>>,
}

fn make_default<T: Persist + Default>() -> Box<dyn Persist> {
    Box::new(T::default())
}

fn make_hosted<T: Hosted>(host: Host) -> Box<dyn Persist> {
    Box::new(T::with_host(host))
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plain value type.
    pub fn register<T: Persist + Named + Default>(&self) -> Result<()> {
        self.insert::<T>(T::TYPE_NAME, TypeCategory::Class(Construction::Default(make_default::<T>)))
    }

    /// Register a component-like type, attached to a fresh host on decode.
    pub fn register_hosted<T: Hosted>(&self) -> Result<()> {
        self.insert::<T>(T::TYPE_NAME, TypeCategory::Class(Construction::Hosted(make_hosted::<T>)))
    }

    /// Register an asset-like type built by the factory named `factory`.
    pub fn register_asset<T: Persist + Named>(&self, factory: &'static str) -> Result<()> {
        self.insert::<T>(T::TYPE_NAME, TypeCategory::Class(Construction::Factory(factory)))
    }

    /// Register an enum.
    pub fn register_enum<E: PersistEnum>(&self) -> Result<()> {
        self.insert::<E>(E::TYPE_NAME, TypeCategory::Enum)
    }

    /// Register a named factory for asset-like types.
    pub fn register_factory(&self, name: impl Into<String>, make: Factory) {
        let name = name.into();
        debug!(factory = %name, "registered factory");
        self.factories.write().insert(name, make);
    }

    fn insert<T: 'static>(&self, name: &str, category: TypeCategory) -> Result<()> {
        if self.is_reserved(name) {
            return Err(Error::DuplicateType(name.to_string()));
        }
        let mut types = self.types.write();
        if let Some(existing) = types.get(name) {
            // Registering the same Rust type twice is harmless.
            if existing.type_id == TypeId::of::<T>() {
                return Ok(());
            }
            return Err(Error::DuplicateType(name.to_string()));
        }
        debug!(type_name = name, "registered type");
        types.insert(
            name.to_string(),
            Arc::new(TypeEntry {
                name: name.to_string(),
                type_id: TypeId::of::<T>(),
                category,
            }),
        );
        Ok(())
    }

    fn is_reserved(&self, name: &str) -> bool {
        name == OBJECT
            || Kind::primitive_from_name(name).is_some()
            || !matches!(names::parse(name), Ok(TypeName::Simple(_)))
    }

    /// Check whether `name` resolves.
    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_ok()
    }

    /// Number of registered classes and enums.
    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.read().is_empty()
    }

    /// Registered entry for a class or enum name.
    pub fn entry(&self, name: &str) -> Option<Arc<TypeEntry>> {
        self.types.read().get(name).cloned()
    }

    /// Resolve a stored type name.
    ///
    /// Names nesting deeper than [`DEFAULT_MAX_DEPTH`] fail with
    /// [`Error::DepthLimit`] before any level is parsed.
    pub fn resolve(&self, name: &str) -> Result<TypeDescriptor> {
        if let Some(found) = self.resolved.read().get(name) {
            return Ok(found.clone());
        }
        if names::nesting_depth(name) > DEFAULT_MAX_DEPTH {
            return Err(Error::DepthLimit(DEFAULT_MAX_DEPTH));
        }
        self.resolve_nested(name, 0)
    }

    fn resolve_nested(&self, name: &str, depth: usize) -> Result<TypeDescriptor> {
        if depth > DEFAULT_MAX_DEPTH {
            return Err(Error::DepthLimit(DEFAULT_MAX_DEPTH));
        }
        if let Some(found) = self.resolved.read().get(name) {
            return Ok(found.clone());
        }
        let descriptor = match names::parse(name)? {
            TypeName::Simple(simple) => self.resolve_simple(simple)?,
            TypeName::List(inner) => TypeDescriptor::List(Box::new(self.resolve_nested(inner, depth + 1)?)),
            TypeName::Array(inner) => TypeDescriptor::Array(Box::new(self.resolve_nested(inner, depth + 1)?)),
            TypeName::Dict(k, v) => TypeDescriptor::Dictionary(
                Box::new(self.resolve_nested(k, depth + 1)?),
                Box::new(self.resolve_nested(v, depth + 1)?),
            ),
        };
        let mut resolved = self.resolved.write();
        if resolved.len() < MAX_CACHED_NAMES {
            resolved.insert(name.to_string(), descriptor.clone());
        }
        Ok(descriptor)
    }

    fn resolve_simple(&self, name: &str) -> Result<TypeDescriptor> {
        if let Some(kind) = Kind::primitive_from_name(name) {
            return Ok(TypeDescriptor::Primitive(kind));
        }
        if name == OBJECT {
            return Ok(TypeDescriptor::Object);
        }
        let entry = self
            .entry(name)
            .ok_or_else(|| Error::UnresolvedType(name.to_string()))?;
        Ok(match entry.category {
            TypeCategory::Class(_) => TypeDescriptor::Class(entry),
            TypeCategory::Enum => TypeDescriptor::Enum(entry),
        })
    }

    /// Resolve a class name to its registered entry.
    pub fn resolve_class(&self, name: &str) -> Result<Arc<TypeEntry>> {
        match self.resolve(name)? {
            TypeDescriptor::Class(entry) => Ok(entry),
            other => Err(Error::mismatch("class", other.to_string())),
        }
    }

    /// Check that values stored as `stored` can be read into a field expecting `expected`.
    ///
    /// The stored name must resolve. It is accepted when the names are equal,
    /// or when `expected` is `object` and `stored` is a class.
    pub fn check_assignable(&self, stored: &str, expected: &str) -> Result<()> {
        let descriptor = self.resolve(stored)?;
        if stored == expected {
            return Ok(());
        }
        if expected == OBJECT && matches!(descriptor, TypeDescriptor::Class(_)) {
            return Ok(());
        }
        Err(Error::mismatch(expected, stored))
    }

    /// Look up a named factory.
    pub fn factory(&self, name: &str) -> Result<Factory> {
        self.factories
            .read()
            .get(name)
            .copied()
            .ok_or_else(|| Error::MissingFactory(name.to_string()))
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let types = self.types.read();
        let mut names: Vec<&String> = types.keys().collect();
        names.sort();
        f.debug_struct("TypeRegistry")
            .field("types", &names)
            .field("factories", &self.factories.read().len())
            .finish()
    }
}
