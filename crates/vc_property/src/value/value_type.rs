use alloc::boxed::Box;
use core::any::TypeId;
use core::fmt;

use crate::bean::Type;
use crate::value::ValueKind;

// -----------------------------------------------------------------------------
// IntType

/// The Rust width of an integer property.
///
/// Values are carried as `i128`, which holds every width losslessly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntType {
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
}

impl IntType {
    /// Returns the inclusive range of representable values.
    pub const fn range(self) -> (i128, i128) {
        match self {
            Self::I8 => (i8::MIN as i128, i8::MAX as i128),
            Self::I16 => (i16::MIN as i128, i16::MAX as i128),
            Self::I32 => (i32::MIN as i128, i32::MAX as i128),
            Self::I64 => (i64::MIN as i128, i64::MAX as i128),
            Self::Isize => (isize::MIN as i128, isize::MAX as i128),
            Self::U8 => (0, u8::MAX as i128),
            Self::U16 => (0, u16::MAX as i128),
            Self::U32 => (0, u32::MAX as i128),
            Self::U64 => (0, u64::MAX as i128),
            Self::Usize => (0, usize::MAX as i128),
        }
    }

    /// Returns `true` if `value` fits this width.
    #[inline]
    pub const fn contains(self, value: i128) -> bool {
        let (min, max) = self.range();
        min <= value && value <= max
    }

    /// Returns the Rust name of this width.
    pub const fn name(self) -> &'static str {
        match self {
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::Isize => "isize",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::Usize => "usize",
        }
    }
}

impl fmt::Display for IntType {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// -----------------------------------------------------------------------------
// EnumInfo

/// Variant table of a fieldless enum, generated by `#[derive(PropertyEnum)]`.
#[derive(Debug, Clone, Copy)]
pub struct EnumInfo {
    ty: Type,
    variants: &'static [&'static str],
}

impl EnumInfo {
    /// Creates the info for enum `T`.
    #[inline]
    pub fn of<T: ?Sized + 'static>(variants: &'static [&'static str]) -> Self {
        Self {
            ty: Type::of::<T>(),
            variants,
        }
    }

    #[inline]
    pub const fn ty(&self) -> Type {
        self.ty
    }

    #[inline]
    pub const fn variants(&self) -> &'static [&'static str] {
        self.variants
    }

    /// Returns the static name of `variant`, if it exists.
    pub fn variant(&self, variant: &str) -> Option<&'static str> {
        self.variants.iter().copied().find(|v| *v == variant)
    }
}

impl PartialEq for EnumInfo {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty
    }
}

impl Eq for EnumInfo {}

// -----------------------------------------------------------------------------
// ValueType

/// The declared type of a property.
///
/// # Examples
///
/// ```
/// use vc_property::value::{IntType, Typed, ValueType};
///
/// assert_eq!(<Option<Vec<u8>>>::value_type().to_string(), "Option<Vec<u8>>");
/// assert_eq!(u8::value_type(), ValueType::Int(IntType::U8));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueType {
    /// Accepts any value unchanged.
    Any,
    Bool,
    Int(IntType),
    Float,
    Char,
    Text,
    Enum(EnumInfo),
    List(Box<ValueType>),
    Map(Box<ValueType>),
    Optional(Box<ValueType>),
    Bean(Type),
}

impl ValueType {
    /// Returns the [`ValueKind`] values of this type are stored as.
    ///
    /// `Any` has no single kind.
    pub const fn kind(&self) -> Option<ValueKind> {
        Some(match self {
            Self::Any => return None,
            Self::Bool => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Float => ValueKind::Float,
            Self::Char => ValueKind::Char,
            Self::Text => ValueKind::Text,
            Self::Enum(_) => ValueKind::Enum,
            Self::List(_) => ValueKind::List,
            Self::Map(_) => ValueKind::Map,
            Self::Optional(_) => ValueKind::Optional,
            Self::Bean(_) => ValueKind::Bean,
        })
    }

    /// Returns the [`TypeId`] of enum and bean types.
    pub fn target_type_id(&self) -> Option<TypeId> {
        match self {
            Self::Enum(info) => Some(info.ty().id()),
            Self::Bean(ty) => Some(ty.id()),
            _ => None,
        }
    }

    /// Strips `Optional` layers.
    pub fn unwrap_optional(&self) -> &ValueType {
        match self {
            Self::Optional(inner) => inner.unwrap_optional(),
            other => other,
        }
    }

    /// Returns the element type of a list or map, or `Any`.
    pub fn element(&self) -> &ValueType {
        static ANY: ValueType = ValueType::Any;

        match self.unwrap_optional() {
            Self::List(elem) | Self::Map(elem) => elem,
            _ => &ANY,
        }
    }

    #[inline]
    pub const fn is_optional(&self) -> bool {
        matches!(self, Self::Optional(_))
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any"),
            Self::Bool => f.write_str("bool"),
            Self::Int(ty) => fmt::Display::fmt(ty, f),
            Self::Float => f.write_str("f64"),
            Self::Char => f.write_str("char"),
            Self::Text => f.write_str("String"),
            Self::Enum(info) => f.write_str(info.ty().ident()),
            Self::List(elem) => write!(f, "Vec<{elem}>"),
            Self::Map(elem) => write!(f, "Map<String, {elem}>"),
            Self::Optional(inner) => write!(f, "Option<{inner}>"),
            Self::Bean(ty) => f.write_str(ty.ident()),
        }
    }
}
