use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use thiserror::Error;

use crate::bean::{Bean, BeanRef, Shared, Type};
use crate::registry::{GetTypeMeta, TypeRegistry};
use crate::value::{IntType, Value, ValueKind, ValueType};

// -----------------------------------------------------------------------------
// Error

/// A [`Value`] could not be turned into a Rust value.
///
/// Raised by [`FromValue`] in derived setters. Values reaching a setter have
/// already been converted to the declared type, so this only fires when a
/// manual setter is fed something unexpected.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ValueError {
    #[error("expected a value of type `{expected}`, found {found}")]
    Mismatch {
        expected: ValueType,
        found: ValueKind,
    },
    #[error("integer {value} is out of range for `{ty}`")]
    OutOfRange { value: i128, ty: IntType },
    #[error("float {value} is out of range for `f32`")]
    FloatOutOfRange { value: f64 },
    #[error("expected a bean of type `{expected}`, found `{found}`")]
    BeanType { expected: Type, found: Type },
    #[error("`{variant}` is not a variant of `{ty}`")]
    UnknownVariant { variant: String, ty: Type },
}

impl ValueError {
    #[inline]
    fn mismatch<T: Typed + ?Sized>(found: &Value) -> Self {
        Self::Mismatch {
            expected: T::value_type(),
            found: found.kind(),
        }
    }
}

// -----------------------------------------------------------------------------
// Traits

/// A Rust type with a declared [`ValueType`].
pub trait Typed: 'static {
    /// Returns the declared type of properties holding `Self`.
    fn value_type() -> ValueType;

    /// Registers bean types reachable through `Self`.
    fn register_dependencies(_registry: &mut TypeRegistry) {}
}

/// Converts a Rust value into a [`Value`].
pub trait IntoValue {
    fn into_value(self) -> Value;
}

/// Converts a [`Value`] back into a Rust value.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, ValueError>;
}

// -----------------------------------------------------------------------------
// Primitives

impl Typed for bool {
    #[inline]
    fn value_type() -> ValueType {
        ValueType::Bool
    }
}

impl IntoValue for bool {
    #[inline]
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Bool(v) => Ok(v),
            other => Err(ValueError::mismatch::<Self>(&other)),
        }
    }
}

impl Typed for char {
    #[inline]
    fn value_type() -> ValueType {
        ValueType::Char
    }
}

impl IntoValue for char {
    #[inline]
    fn into_value(self) -> Value {
        Value::Char(self)
    }
}

impl FromValue for char {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Char(v) => Ok(v),
            other => Err(ValueError::mismatch::<Self>(&other)),
        }
    }
}

impl Typed for String {
    #[inline]
    fn value_type() -> ValueType {
        ValueType::Text
    }
}

impl IntoValue for String {
    #[inline]
    fn into_value(self) -> Value {
        Value::Text(self)
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Text(v) => Ok(v),
            other => Err(ValueError::mismatch::<Self>(&other)),
        }
    }
}

macro_rules! impl_int {
    ($($ty:ty => $int:ident),* $(,)?) => {
        $(
            impl Typed for $ty {
                #[inline]
                fn value_type() -> ValueType {
                    ValueType::Int(IntType::$int)
                }
            }

            impl IntoValue for $ty {
                #[inline]
                fn into_value(self) -> Value {
                    Value::Int(self as i128)
                }
            }

            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self, ValueError> {
                    match value {
                        Value::Int(v) => <$ty>::try_from(v).map_err(|_| ValueError::OutOfRange {
                            value: v,
                            ty: IntType::$int,
                        }),
                        other => Err(ValueError::mismatch::<Self>(&other)),
                    }
                }
            }
        )*
    };
}

impl_int!(
    i8 => I8, i16 => I16, i32 => I32, i64 => I64, isize => Isize,
    u8 => U8, u16 => U16, u32 => U32, u64 => U64, usize => Usize,
);

impl Typed for f64 {
    #[inline]
    fn value_type() -> ValueType {
        ValueType::Float
    }
}

impl IntoValue for f64 {
    #[inline]
    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Float(v) => Ok(v),
            other => Err(ValueError::mismatch::<Self>(&other)),
        }
    }
}

impl Typed for f32 {
    #[inline]
    fn value_type() -> ValueType {
        ValueType::Float
    }
}

impl IntoValue for f32 {
    #[inline]
    fn into_value(self) -> Value {
        Value::Float(f64::from(self))
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Float(v) => {
                let narrowed = v as f32;
                if narrowed.is_infinite() && v.is_finite() {
                    return Err(ValueError::FloatOutOfRange { value: v });
                }
                Ok(narrowed)
            }
            other => Err(ValueError::mismatch::<Self>(&other)),
        }
    }
}

// -----------------------------------------------------------------------------
// Value itself

impl Typed for Value {
    #[inline]
    fn value_type() -> ValueType {
        ValueType::Any
    }
}

impl IntoValue for Value {
    #[inline]
    fn into_value(self) -> Value {
        self
    }
}

impl FromValue for Value {
    #[inline]
    fn from_value(value: Value) -> Result<Self, ValueError> {
        Ok(value)
    }
}

// -----------------------------------------------------------------------------
// Containers

impl<T: Typed> Typed for Option<T> {
    #[inline]
    fn value_type() -> ValueType {
        ValueType::Optional(Box::new(T::value_type()))
    }

    #[inline]
    fn register_dependencies(registry: &mut TypeRegistry) {
        T::register_dependencies(registry);
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    #[inline]
    fn into_value(self) -> Value {
        Value::Optional(self.map(|v| Box::new(v.into_value())))
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Null | Value::Optional(None) => Ok(None),
            Value::Optional(Some(inner)) => T::from_value(*inner).map(Some),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: Typed> Typed for Vec<T> {
    #[inline]
    fn value_type() -> ValueType {
        ValueType::List(Box::new(T::value_type()))
    }

    #[inline]
    fn register_dependencies(registry: &mut TypeRegistry) {
        T::register_dependencies(registry);
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<T: FromValue + Typed> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(ValueError::mismatch::<Self>(&other)),
        }
    }
}

impl<T: Typed> Typed for BTreeMap<String, T> {
    #[inline]
    fn value_type() -> ValueType {
        ValueType::Map(Box::new(T::value_type()))
    }

    #[inline]
    fn register_dependencies(registry: &mut TypeRegistry) {
        T::register_dependencies(registry);
    }
}

impl<T: IntoValue> IntoValue for BTreeMap<String, T> {
    fn into_value(self) -> Value {
        Value::Map(self.into_iter().map(|(k, v)| (k, v.into_value())).collect())
    }
}

impl<T: FromValue + Typed> FromValue for BTreeMap<String, T> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Map(entries) => entries
                .into_iter()
                .map(|(k, v)| T::from_value(v).map(|v| (k, v)))
                .collect(),
            other => Err(ValueError::mismatch::<Self>(&other)),
        }
    }
}

// -----------------------------------------------------------------------------
// Beans

impl<T: GetTypeMeta> Typed for Shared<T> {
    #[inline]
    fn value_type() -> ValueType {
        ValueType::Bean(Type::of::<T>())
    }

    #[inline]
    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register::<T>();
    }
}

impl<T: Bean> IntoValue for Shared<T> {
    #[inline]
    fn into_value(self) -> Value {
        Value::Bean(BeanRef::from_shared(self))
    }
}

impl<T: Bean> FromValue for Shared<T> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Bean(bean) => bean.downcast::<T>().ok_or_else(|| ValueError::BeanType {
                expected: Type::of::<T>(),
                found: bean.bean_type(),
            }),
            other => Err(ValueError::Mismatch {
                expected: ValueType::Bean(Type::of::<T>()),
                found: other.kind(),
            }),
        }
    }
}

impl Typed for BeanRef {
    #[inline]
    fn value_type() -> ValueType {
        ValueType::Any
    }
}

impl IntoValue for BeanRef {
    #[inline]
    fn into_value(self) -> Value {
        Value::Bean(self)
    }
}

impl FromValue for BeanRef {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Bean(bean) => Ok(bean),
            other => Err(ValueError::Mismatch {
                expected: ValueType::Any,
                found: other.kind(),
            }),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::string::{String, ToString};
    use alloc::vec;
    use alloc::vec::Vec;

    use super::{FromValue, IntoValue, Typed, ValueError};
    use crate::value::{IntType, Value, ValueType};

    #[test]
    fn integers_are_range_checked() {
        assert_eq!(u8::from_value(Value::Int(255)), Ok(255));
        assert_eq!(
            u8::from_value(Value::Int(256)),
            Err(ValueError::OutOfRange {
                value: 256,
                ty: IntType::U8
            })
        );
        assert_eq!(u64::MAX.into_value(), Value::Int(18_446_744_073_709_551_615));
        assert_eq!(u64::from_value(u64::MAX.into_value()), Ok(u64::MAX));
        assert_eq!(i64::MIN.into_value(), Value::Int(-9_223_372_036_854_775_808));
        assert_eq!(
            i64::from_value(Value::Int(9_223_372_036_854_775_808)),
            Err(ValueError::OutOfRange {
                value: 9_223_372_036_854_775_808,
                ty: IntType::I64
            })
        );
    }

    #[test]
    fn f32_rejects_overflow() {
        assert_eq!(f32::from_value(Value::Float(1.5)), Ok(1.5));
        assert_eq!(
            f32::from_value(Value::Float(1e300)),
            Err(ValueError::FloatOutOfRange { value: 1e300 })
        );
        assert!(f32::from_value(Value::Float(f64::INFINITY)).is_ok_and(f32::is_infinite));
        assert!(f32::from_value(Value::Float(f64::NAN)).is_ok_and(f32::is_nan));
    }

    #[test]
    fn optional_accepts_bare_values() {
        assert_eq!(<Option<i32>>::from_value(Value::Null), Ok(None));
        assert_eq!(<Option<i32>>::from_value(Value::Int(3)), Ok(Some(3)));
        assert_eq!(
            Some(String::from("a")).into_value(),
            Value::Optional(Some(Value::Text("a".into()).into()))
        );
    }

    #[test]
    fn containers() {
        let list = vec![1_i32, 2].into_value();
        assert_eq!(list, Value::List(vec![Value::Int(1), Value::Int(2)]));
        assert_eq!(Vec::<i32>::from_value(list), Ok(vec![1, 2]));

        let mut map = BTreeMap::new();
        map.insert(String::from("k"), 1.5_f64);
        let value = map.clone().into_value();
        assert_eq!(BTreeMap::<String, f64>::from_value(value), Ok(map));

        assert_eq!(
            <BTreeMap<String, Vec<bool>>>::value_type(),
            ValueType::Map(ValueType::List(ValueType::Bool.into()).into())
        );
    }

    #[test]
    fn mismatch_reports_kind() {
        let err = bool::from_value(Value::Text("yes".into())).unwrap_err();
        assert_eq!(err.to_string(), "expected a value of type `bool`, found text");
    }
}
