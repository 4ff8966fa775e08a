//! Provide the dynamic [`Value`] that flows through property paths.
//!
//! - [`Value`]: the runtime value read from or written to a property.
//! - [`ValueType`]: the declared type of a property.
//! - [`Typed`], [`IntoValue`], [`FromValue`]: bridges between Rust types
//!   and [`Value`], used by derived getters and setters.

// -----------------------------------------------------------------------------
// Modules

mod traits;
mod value_type;

// -----------------------------------------------------------------------------
// Exports

pub use traits::{FromValue, IntoValue, Typed, ValueError};
pub use value_type::{EnumInfo, IntType, ValueType};

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::bean::{BeanRef, Type};

// -----------------------------------------------------------------------------
// ValueKind

/// The variant of a [`Value`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    Char,
    Text,
    Enum,
    List,
    Map,
    Optional,
    Bean,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "integer",
            Self::Float => "float",
            Self::Char => "char",
            Self::Text => "text",
            Self::Enum => "enum",
            Self::List => "list",
            Self::Map => "map",
            Self::Optional => "optional",
            Self::Bean => "bean",
        })
    }
}

// -----------------------------------------------------------------------------
// EnumValue

/// A variant of a fieldless enum derived with `PropertyEnum`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumValue {
    /// The enum type.
    pub ty: Type,
    /// The variant name.
    pub variant: &'static str,
}

// -----------------------------------------------------------------------------
// Value

/// A dynamically typed property value.
///
/// `Null` means "absent". `Optional` is the single-value container and is
/// unwrapped transparently by the accessor. Bean handles compare by
/// identity.
///
/// # Examples
///
/// ```
/// use vc_property::Value;
///
/// assert_eq!(Value::from("tony"), Value::Text("tony".into()));
/// assert_eq!(Value::from(7_i32), Value::Int(7));
/// assert!(Value::Optional(None).is_absent());
/// assert_eq!(Value::from(Some(3_i32)).into_present(), Some(Value::Int(3)));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i128),
    Float(f64),
    Char(char),
    Text(String),
    Enum(EnumValue),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Optional(Option<Box<Value>>),
    Bean(BeanRef),
}

impl Value {
    /// Returns the [`ValueKind`] of this value.
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Char(_) => ValueKind::Char,
            Self::Text(_) => ValueKind::Text,
            Self::Enum(_) => ValueKind::Enum,
            Self::List(_) => ValueKind::List,
            Self::Map(_) => ValueKind::Map,
            Self::Optional(_) => ValueKind::Optional,
            Self::Bean(_) => ValueKind::Bean,
        }
    }

    /// Returns `true` for `Null` and an empty `Optional`.
    #[inline]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Null | Self::Optional(None))
    }

    /// Unwraps `Optional` layers, returning `None` when the value is absent.
    pub fn into_present(self) -> Option<Value> {
        match self {
            Self::Null | Self::Optional(None) => None,
            Self::Optional(Some(inner)) => inner.into_present(),
            other => Some(other),
        }
    }

    /// Unwraps `Optional` layers, mapping absence to `Null`.
    #[inline]
    pub fn unwrap_optional(self) -> Value {
        self.into_present().unwrap_or(Self::Null)
    }

    /// Returns the bean handle, if this is a bean.
    #[inline]
    pub fn as_bean(&self) -> Option<&BeanRef> {
        match self {
            Self::Bean(bean) => Some(bean),
            _ => None,
        }
    }

    /// Returns the text, if this is text.
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the integer, if this is an integer.
    #[inline]
    pub const fn as_int(&self) -> Option<i128> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null | Self::Optional(None) => f.write_str("null"),
            Self::Bool(v) => fmt::Display::fmt(v, f),
            Self::Int(v) => fmt::Display::fmt(v, f),
            Self::Float(v) => fmt::Display::fmt(v, f),
            Self::Char(v) => fmt::Display::fmt(v, f),
            Self::Text(v) => f.write_str(v),
            Self::Enum(v) => f.write_str(v.variant),
            Self::List(items) => {
                f.write_str("[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    fmt::Display::fmt(item, f)?;
                }
                f.write_str("]")
            }
            Self::Map(entries) => {
                f.write_str("{")?;
                for (index, (key, item)) in entries.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {item}")?;
                }
                f.write_str("}")
            }
            Self::Optional(Some(inner)) => fmt::Display::fmt(inner, f),
            Self::Bean(bean) => write!(f, "<{}>", bean.bean_type().ident()),
        }
    }
}

// -----------------------------------------------------------------------------
// From impls

macro_rules! impl_from_into_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(value: $ty) -> Self {
                    IntoValue::into_value(value)
                }
            }
        )*
    };
}

impl_from_into_value!(
    bool, char, String, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64,
);

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Self::Text(value.into())
    }
}

impl From<BeanRef> for Value {
    #[inline]
    fn from(value: BeanRef) -> Self {
        Self::Bean(value)
    }
}

impl From<Vec<Value>> for Value {
    #[inline]
    fn from(value: Vec<Value>) -> Self {
        Self::List(value)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    #[inline]
    fn from(value: BTreeMap<String, Value>) -> Self {
        Self::Map(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    #[inline]
    fn from(value: Option<T>) -> Self {
        Self::Optional(value.map(|v| Box::new(v.into())))
    }
}
