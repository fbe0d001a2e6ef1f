//! Tag vocabulary - the closed set of value kinds the format can represent.

use std::fmt;

/// Kind byte at the head of every tagged value.
///
/// Primitive kinds carry a fixed-width or length-prefixed payload. Compound
/// kinds come in start/end pairs; the end marker always follows the children.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Kind {
    /// Boolean (one byte, 0 = false)
    Bool = 0,
    /// Unsigned 8-bit integer
    Byte = 1,
    /// Signed 32-bit integer
    Int = 2,
    /// Unsigned 32-bit integer
    UInt = 3,
    /// 32-bit float, widened to 8 bytes on the wire
    Float = 4,
    /// 64-bit float
    Double = 5,
    /// Length-prefixed UTF-8 string
    String = 6,
    /// Three components, each stored as f64
    Vector3 = 7,
    /// Length-prefixed type name
    TypeRef = 8,

    ClassStart = 16,
    ClassEnd = 17,
    ListStart = 18,
    ListEnd = 19,
    ArrayStart = 20,
    ArrayEnd = 21,
    DictStart = 22,
    DictEnd = 23,
    EnumStart = 24,
    EnumEnd = 25,
    /// Container-held state that does not map onto declared fields
    WrapperStart = 26,
    WrapperEnd = 27,
}

impl Kind {
    /// Convert from the wire byte.
    pub const fn from_u8(v: u8) -> Option<Self> {
        Some(match v {
            0 => Self::Bool,
            1 => Self::Byte,
            2 => Self::Int,
            3 => Self::UInt,
            4 => Self::Float,
            5 => Self::Double,
            6 => Self::String,
            7 => Self::Vector3,
            8 => Self::TypeRef,
            16 => Self::ClassStart,
            17 => Self::ClassEnd,
            18 => Self::ListStart,
            19 => Self::ListEnd,
            20 => Self::ArrayStart,
            21 => Self::ArrayEnd,
            22 => Self::DictStart,
            23 => Self::DictEnd,
            24 => Self::EnumStart,
            25 => Self::EnumEnd,
            26 => Self::WrapperStart,
            27 => Self::WrapperEnd,
            _ => return None,
        })
    }

    /// Wire byte of this kind.
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Human-readable kind name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Byte => "byte",
            Self::Int => "int",
            Self::UInt => "uint",
            Self::Float => "float",
            Self::Double => "double",
            Self::String => "string",
            Self::Vector3 => "vector3",
            Self::TypeRef => "type",
            Self::ClassStart => "class",
            Self::ClassEnd => "class-end",
            Self::ListStart => "list",
            Self::ListEnd => "list-end",
            Self::ArrayStart => "array",
            Self::ArrayEnd => "array-end",
            Self::DictStart => "dictionary",
            Self::DictEnd => "dictionary-end",
            Self::EnumStart => "enum",
            Self::EnumEnd => "enum-end",
            Self::WrapperStart => "wrapper",
            Self::WrapperEnd => "wrapper-end",
        }
    }

    /// Parse a primitive kind from its type name (`"int"`, `"string"`, ...).
    pub fn primitive_from_name(name: &str) -> Option<Self> {
        PRIMITIVES.iter().copied().find(|k| k.name() == name)
    }

    /// Returns true for the leaf kinds.
    #[inline]
    pub const fn is_primitive(self) -> bool {
        (self as u8) < 16
    }

    /// Returns true for the start half of a compound pair.
    #[inline]
    pub const fn is_start(self) -> bool {
        !self.is_primitive() && (self as u8) % 2 == 0
    }

    /// Returns true for the end half of a compound pair.
    #[inline]
    pub const fn is_end(self) -> bool {
        !self.is_primitive() && (self as u8) % 2 == 1
    }

    /// End marker matching a start kind.
    pub const fn end_marker(self) -> Option<Self> {
        match self {
            Self::ClassStart => Some(Self::ClassEnd),
            Self::ListStart => Some(Self::ListEnd),
            Self::ArrayStart => Some(Self::ArrayEnd),
            Self::DictStart => Some(Self::DictEnd),
            Self::EnumStart => Some(Self::EnumEnd),
            Self::WrapperStart => Some(Self::WrapperEnd),
            _ => None,
        }
    }

    /// Payload width of fixed-size primitives; None when length-prefixed or compound.
    pub const fn fixed_payload_len(self) -> Option<usize> {
        match self {
            Self::Bool | Self::Byte => Some(1),
            Self::Int | Self::UInt => Some(4),
            Self::Float | Self::Double => Some(8),
            Self::Vector3 => Some(24),
            _ => None,
        }
    }

    /// Number of type names carried by a compound header.
    pub const fn header_type_names(self) -> usize {
        match self {
            Self::ClassStart | Self::ListStart | Self::ArrayStart | Self::EnumStart => 1,
            Self::DictStart => 2,
            _ => 0,
        }
    }
}

/// All primitive kinds in wire order.
pub const PRIMITIVES: [Kind; 9] = [
    Kind::Bool,
    Kind::Byte,
    Kind::Int,
    Kind::UInt,
    Kind::Float,
    Kind::Double,
    Kind::String,
    Kind::Vector3,
    Kind::TypeRef,
];

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
