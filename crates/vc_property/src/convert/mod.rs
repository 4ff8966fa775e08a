//! Provide the [`TypeConverter`], which coerces raw values to declared types.
//!
//! A value that already satisfies the target type passes through unchanged
//! (integers must fit the declared width, list and map elements are
//! converted one by one). Any other value goes through a coercion looked up
//! by `(source kind, target)`. Coercions registered for a specific type win
//! over those registered for a target kind.
//!
//! # Examples
//!
//! ```
//! use vc_property::convert::TypeConverter;
//! use vc_property::value::{IntType, Value, ValueType};
//!
//! let converter = TypeConverter::new();
//! let int = ValueType::Int(IntType::U8);
//!
//! assert_eq!(converter.convert("0x1F".into(), &int).unwrap(), Value::Int(31));
//! assert!(converter.convert("300".into(), &int).is_err());
//!
//! let list = ValueType::List(ValueType::Bool.into());
//! assert_eq!(
//!     converter.convert("yes, off".into(), &list).unwrap(),
//!     Value::List(vec![Value::Bool(true), Value::Bool(false)]),
//! );
//! ```

// -----------------------------------------------------------------------------
// Modules

mod coercions;

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;

use thiserror::Error;
use vc_utils::hash::HashMap;

use crate::bean::Type;
use crate::value::{IntType, Value, ValueKind, ValueType};

// -----------------------------------------------------------------------------
// Errors

/// Why a single coercion failed.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum CoercionError {
    #[error("`{0}` is not a valid number")]
    InvalidNumber(String),

    #[error("{value} is out of range for `{target}`")]
    OutOfRange { value: String, target: IntType },

    #[error("`{0}` is not a valid boolean")]
    InvalidBool(String),

    #[error("`{0}` is not a single character")]
    InvalidChar(String),

    #[error("`{variant}` is not a variant of `{ty}`")]
    UnknownVariant { variant: String, ty: Type },

    #[error("cannot convert {from} to `{to}`")]
    Unsupported { from: ValueKind, to: ValueType },

    #[error("{0}")]
    Custom(Cow<'static, str>),
}

/// A raw value could not be converted to the declared type.
///
/// Carries the raw value so that callers can report what was attempted.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("cannot convert `{value}` to `{target}`")]
pub struct ConversionError {
    /// The raw value, unchanged.
    pub value: Value,
    /// The declared type.
    pub target: ValueType,
    /// The failed coercion.
    #[source]
    pub source: CoercionError,
}

/// The result of [`TypeConverter::convert`].
pub type ConversionOutcome = Result<Value, ConversionError>;

// -----------------------------------------------------------------------------
// ConversionKey

/// The target side of a coercion lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversionKey {
    /// Any target of this kind.
    Kind(ValueKind),
    /// One specific enum or bean type.
    Type(TypeId),
}

impl ConversionKey {
    /// The key for the specific type `T`.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::Type(TypeId::of::<T>())
    }
}

/// A registered coercion.
///
/// Receives the raw value, the (non-optional) target type and the converter,
/// so element-wise coercions can convert recursively.
pub type Coercion =
    Box<dyn Fn(&Value, &ValueType, &TypeConverter) -> Result<Value, CoercionError>>;

// -----------------------------------------------------------------------------
// TypeConverter

/// Coerces raw values to declared [`ValueType`]s.
///
/// Conversion never touches the target bean.
pub struct TypeConverter {
    coercions: HashMap<(ValueKind, ConversionKey), Coercion>,
}

impl Default for TypeConverter {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeConverter {
    /// Creates a converter with the default coercions.
    pub fn new() -> Self {
        let mut converter = Self::empty();
        coercions::register_defaults(&mut converter);
        converter
    }

    /// Creates a converter that only passes through matching values.
    #[inline]
    pub fn empty() -> Self {
        Self {
            coercions: HashMap::default(),
        }
    }

    /// Registers a coercion from values of kind `from` to targets matching
    /// `key`, returning the one it replaces.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_property::convert::{ConversionKey, TypeConverter};
    /// use vc_property::value::{Value, ValueKind, ValueType};
    ///
    /// let mut converter = TypeConverter::new();
    /// converter.register(ValueKind::Bool, ConversionKey::Kind(ValueKind::Char), |v, _, _| {
    ///     Ok(Value::Char(if v == &Value::Bool(true) { 'Y' } else { 'N' }))
    /// });
    ///
    /// let out = converter.convert(Value::Bool(true), &ValueType::Char).unwrap();
    /// assert_eq!(out, Value::Char('Y'));
    /// ```
    pub fn register(
        &mut self,
        from: ValueKind,
        key: ConversionKey,
        coercion: impl Fn(&Value, &ValueType, &TypeConverter) -> Result<Value, CoercionError>
        + 'static,
    ) -> Option<Coercion> {
        self.coercions.insert((from, key), Box::new(coercion))
    }

    /// Removes a coercion.
    #[inline]
    pub fn unregister(&mut self, from: ValueKind, key: ConversionKey) -> Option<Coercion> {
        self.coercions.remove(&(from, key))
    }

    /// Returns `true` if a coercion is registered for the pair.
    #[inline]
    pub fn contains(&self, from: ValueKind, key: ConversionKey) -> bool {
        self.coercions.contains_key(&(from, key))
    }

    /// Converts `raw` to `target`.
    ///
    /// The error keeps `raw` unchanged.
    pub fn convert(&self, raw: Value, target: &ValueType) -> ConversionOutcome {
        match self.try_convert(&raw, target) {
            Ok(Some(value)) => Ok(value),
            Ok(None) => Ok(raw),
            Err(source) => Err(ConversionError {
                value: raw,
                target: target.clone(),
                source,
            }),
        }
    }

    /// Converts a borrowed value.
    ///
    /// Returns `Ok(None)` if `raw` already satisfies `target`.
    pub fn try_convert(
        &self,
        raw: &Value,
        target: &ValueType,
    ) -> Result<Option<Value>, CoercionError> {
        match (raw, target) {
            (_, ValueType::Any) => Ok(None),

            // Optional list and map elements.
            (Value::Optional(None), ValueType::Optional(_)) => Ok(None),
            (Value::Null, ValueType::Optional(_)) => Ok(Some(Value::Optional(None))),
            (Value::Optional(Some(inner)), ValueType::Optional(elem)) => Ok(self
                .try_convert(inner, elem)?
                .map(|value| Value::Optional(Some(Box::new(value))))),
            (_, ValueType::Optional(elem)) => {
                let value = self.try_convert(raw, elem)?.unwrap_or_else(|| raw.clone());
                Ok(Some(Value::Optional(Some(Box::new(value)))))
            }
            (Value::Optional(Some(inner)), _) => Ok(Some(
                self.try_convert(inner, target)?
                    .unwrap_or_else(|| (**inner).clone()),
            )),

            // Identity.
            (Value::Int(value), ValueType::Int(ty)) => {
                if ty.contains(*value) {
                    Ok(None)
                } else {
                    Err(CoercionError::OutOfRange {
                        value: alloc::format!("{value}"),
                        target: *ty,
                    })
                }
            }
            (Value::Bool(_), ValueType::Bool)
            | (Value::Float(_), ValueType::Float)
            | (Value::Char(_), ValueType::Char)
            | (Value::Text(_), ValueType::Text) => Ok(None),
            (Value::Enum(value), ValueType::Enum(info)) if value.ty == info.ty() => Ok(None),
            (Value::Bean(bean), ValueType::Bean(ty)) if bean.bean_type() == *ty => Ok(None),
            (Value::List(items), ValueType::List(elem)) => {
                Ok(self.convert_items(items, elem)?.map(Value::List))
            }
            (Value::Map(entries), ValueType::Map(elem)) => {
                Ok(self.convert_entries(entries, elem)?.map(Value::Map))
            }

            _ => self.coerce(raw, target).map(Some),
        }
    }

    fn coerce(&self, raw: &Value, target: &ValueType) -> Result<Value, CoercionError> {
        let from = raw.kind();
        let by_type = target
            .target_type_id()
            .and_then(|id| self.coercions.get(&(from, ConversionKey::Type(id))));
        let coercion = by_type.or_else(|| {
            target
                .kind()
                .and_then(|kind| self.coercions.get(&(from, ConversionKey::Kind(kind))))
        });

        match coercion {
            Some(coercion) => coercion(raw, target, self),
            None => Err(CoercionError::Unsupported {
                from,
                to: target.clone(),
            }),
        }
    }

    fn convert_items(
        &self,
        items: &[Value],
        elem: &ValueType,
    ) -> Result<Option<Vec<Value>>, CoercionError> {
        let mut converted: Option<Vec<Value>> = None;
        for (index, item) in items.iter().enumerate() {
            match self.try_convert(item, elem)? {
                Some(value) => converted
                    .get_or_insert_with(|| items[..index].to_vec())
                    .push(value),
                None => {
                    if let Some(out) = &mut converted {
                        out.push(item.clone());
                    }
                }
            }
        }
        Ok(converted)
    }

    fn convert_entries(
        &self,
        entries: &BTreeMap<String, Value>,
        elem: &ValueType,
    ) -> Result<Option<BTreeMap<String, Value>>, CoercionError> {
        let mut changed = false;
        let mut out = BTreeMap::new();
        for (key, item) in entries {
            let value = match self.try_convert(item, elem)? {
                Some(value) => {
                    changed = true;
                    value
                }
                None => item.clone(),
            };
            out.insert(key.clone(), value);
        }
        Ok(changed.then_some(out))
    }
}

impl fmt::Debug for TypeConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeConverter")
            .field("coercions", &self.coercions.len())
            .finish()
    }
}
