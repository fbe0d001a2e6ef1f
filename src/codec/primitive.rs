//! Primitive codec.
//!
//! Numeric payloads are fixed-width little-endian. `float` is widened to
//! 8 bytes on the wire and narrowed back on read; Vector3 is three f64.
//! Strings and type references share the length-prefixed UTF-8 rule.

use std::borrow::Cow;
use std::fmt;

use super::{Decode, Encode, OStream, WireType};
use crate::format::{Cursor, Item, Kind};
use crate::graph::{Decoder, Encoder};
use crate::registry::TypeRegistry;
use crate::util::{Error, Result, Vec3};

/// A primitive value, borrowed from the buffer where possible.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive<'a> {
    Bool(bool),
    Byte(u8),
    Int(i32),
    UInt(u32),
    Float(f32),
    Double(f64),
    String(Cow<'a, str>),
    Vector3(Vec3),
    TypeRef(Cow<'a, str>),
}

impl Primitive<'_> {
    /// Wire kind of this value.
    pub fn kind(&self) -> Kind {
        match self {
            Self::Bool(_) => Kind::Bool,
            Self::Byte(_) => Kind::Byte,
            Self::Int(_) => Kind::Int,
            Self::UInt(_) => Kind::UInt,
            Self::Float(_) => Kind::Float,
            Self::Double(_) => Kind::Double,
            Self::String(_) => Kind::String,
            Self::Vector3(_) => Kind::Vector3,
            Self::TypeRef(_) => Kind::TypeRef,
        }
    }

    /// Detach from the source buffer.
    pub fn into_owned(self) -> Primitive<'static> {
        match self {
            Self::String(s) => Primitive::String(Cow::Owned(s.into_owned())),
            Self::TypeRef(s) => Primitive::TypeRef(Cow::Owned(s.into_owned())),
            Self::Bool(v) => Primitive::Bool(v),
            Self::Byte(v) => Primitive::Byte(v),
            Self::Int(v) => Primitive::Int(v),
            Self::UInt(v) => Primitive::UInt(v),
            Self::Float(v) => Primitive::Float(v),
            Self::Double(v) => Primitive::Double(v),
            Self::Vector3(v) => Primitive::Vector3(v),
        }
    }
}

/// Emit `(kind, name_hash, payload)` for a primitive.
pub fn write_primitive(out: &mut OStream, value: &Primitive<'_>, name_hash: i32) -> Result<()> {
    out.write_tag(value.kind(), name_hash);
    match value {
        Primitive::Bool(v) => out.write_u8(u8::from(*v)),
        Primitive::Byte(v) => out.write_u8(*v),
        Primitive::Int(v) => out.write_i32(*v),
        Primitive::UInt(v) => out.write_u32(*v),
        Primitive::Float(v) => out.write_f64(f64::from(*v)),
        Primitive::Double(v) => out.write_f64(*v),
        Primitive::Vector3(v) => {
            out.write_f64(f64::from(v.x));
            out.write_f64(f64::from(v.y));
            out.write_f64(f64::from(v.z));
        }
        Primitive::String(s) | Primitive::TypeRef(s) => out.write_str(s)?,
    }
    Ok(())
}

/// Read the payload of a primitive of `kind` starting at `offset`.
///
/// `end` is the bound derived from the enclosing compound.
pub fn read_primitive(bytes: &[u8], offset: usize, end: usize, kind: Kind) -> Result<Primitive<'_>> {
    let mut c = Cursor::new(bytes, offset..end)?;
    Ok(match kind {
        Kind::Bool => Primitive::Bool(c.read_u8()? != 0),
        Kind::Byte => Primitive::Byte(c.read_u8()?),
        Kind::Int => Primitive::Int(c.read_i32()?),
        Kind::UInt => Primitive::UInt(c.read_u32()?),
        Kind::Float => Primitive::Float(c.read_f64()? as f32),
        Kind::Double => Primitive::Double(c.read_f64()?),
        Kind::Vector3 => {
            let x = c.read_f64()? as f32;
            let y = c.read_f64()? as f32;
            let z = c.read_f64()? as f32;
            Primitive::Vector3(Vec3::new(x, y, z))
        }
        Kind::String => Primitive::String(Cow::Borrowed(c.read_str()?)),
        Kind::TypeRef => Primitive::TypeRef(Cow::Borrowed(c.read_str()?)),
        other => return Err(Error::mismatch("primitive", other.name())),
    })
}

/// Read the primitive an item points at, requiring `kind`.
pub(crate) fn expect_primitive<'a>(item: &Item, bytes: &'a [u8], kind: Kind) -> Result<Primitive<'a>> {
    if item.kind != kind {
        return Err(Error::mismatch(kind.name(), item.kind.name()));
    }
    read_primitive(bytes, item.payload, item.end, kind)
}

/// A stored reference to a registered type, by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TypeRef(pub String);

impl TypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Referenced type name.
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Check that the referenced type is known to `registry`.
    pub fn is_resolvable(&self, registry: &TypeRegistry) -> bool {
        registry.resolve(&self.0).is_ok()
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! primitive_codec {
    ($ty:ty, $kind:ident, |$v:ident| $to:expr, $from:pat => $out:expr) => {
        impl WireType for $ty {
            fn wire_type() -> Cow<'static, str> {
                Cow::Borrowed(Kind::$kind.name())
            }

            fn wire_kind() -> Kind {
                Kind::$kind
            }
        }

        impl Encode for $ty {
            fn encode(&self, name_hash: i32, enc: &mut Encoder<'_>) -> Result<()> {
                let $v = self;
                write_primitive(enc.stream(), &$to, name_hash)
            }
        }

        impl Decode for $ty {
            fn decode(item: &Item, dec: &mut Decoder<'_>) -> Result<Self> {
                match expect_primitive(item, dec.bytes(), Kind::$kind)? {
                    $from => Ok($out),
                    other => Err(Error::mismatch(Kind::$kind.name(), other.kind().name())),
                }
            }
        }
    };
}

primitive_codec!(bool, Bool, |v| Primitive::Bool(*v), Primitive::Bool(v) => v);
primitive_codec!(u8, Byte, |v| Primitive::Byte(*v), Primitive::Byte(v) => v);
primitive_codec!(i32, Int, |v| Primitive::Int(*v), Primitive::Int(v) => v);
primitive_codec!(u32, UInt, |v| Primitive::UInt(*v), Primitive::UInt(v) => v);
primitive_codec!(f32, Float, |v| Primitive::Float(*v), Primitive::Float(v) => v);
primitive_codec!(f64, Double, |v| Primitive::Double(*v), Primitive::Double(v) => v);
primitive_codec!(Vec3, Vector3, |v| Primitive::Vector3(*v), Primitive::Vector3(v) => v);
primitive_codec!(String, String, |v| Primitive::String(Cow::Borrowed(v.as_str())), Primitive::String(s) => s.into_owned());
primitive_codec!(TypeRef, TypeRef, |v| Primitive::TypeRef(Cow::Borrowed(v.name())), Primitive::TypeRef(s) => TypeRef(s.into_owned()));
