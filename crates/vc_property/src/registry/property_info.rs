use alloc::boxed::Box;
use core::fmt;

use crate::bean::{Bean, Type};
use crate::error::InvocationError;
use crate::value::{Typed, Value, ValueType};

// -----------------------------------------------------------------------------
// Capabilities

/// A type-erased read capability.
pub type Getter = Box<dyn Fn(&dyn Bean) -> Result<Value, InvocationError>>;

/// A type-erased write capability.
pub type Setter = Box<dyn Fn(&mut dyn Bean, Value) -> Result<(), InvocationError>>;

// -----------------------------------------------------------------------------
// PropertyInfo

/// Describes one property of a bean type: its name, its declared type and
/// the capabilities to read and write it.
///
/// Setters receive values that already match [`PropertyInfo::value_type`].
/// Both directions are fallible so that domain rules can reject a value.
///
/// # Examples
///
/// ```
/// use vc_property::{Bean, Value};
/// use vc_property::registry::PropertyInfo;
///
/// struct Person { age: i32 }
/// impl Bean for Person {}
///
/// let info = PropertyInfo::of::<i32>("age")
///     .with_getter(|p: &Person| Ok(Value::Int(p.age.into())))
///     .with_setter(|p: &mut Person, v| {
///         p.age = vc_property::FromValue::from_value(v)?;
///         Ok(())
///     });
///
/// let mut person = Person { age: 1 };
/// info.write(&mut person, Value::Int(2)).unwrap();
/// assert_eq!(info.read(&person).unwrap(), Value::Int(2));
/// ```
pub struct PropertyInfo {
    name: &'static str,
    value_type: ValueType,
    getter: Option<Getter>,
    setter: Option<Setter>,
}

impl PropertyInfo {
    /// Creates a property without capabilities.
    #[inline]
    pub const fn new(name: &'static str, value_type: ValueType) -> Self {
        Self {
            name,
            value_type,
            getter: None,
            setter: None,
        }
    }

    /// Creates a property declared as `V`.
    #[inline]
    pub fn of<V: Typed>(name: &'static str) -> Self {
        Self::new(name, V::value_type())
    }

    /// Adds a read capability on beans of type `T`.
    pub fn with_getter<T: Bean>(
        mut self,
        getter: impl Fn(&T) -> Result<Value, InvocationError> + 'static,
    ) -> Self {
        self.getter = Some(Box::new(move |bean: &dyn Bean| match bean.downcast_ref::<T>() {
            Some(bean) => getter(bean),
            None => Err(InvocationError::WrongReceiver {
                expected: Type::of::<T>(),
            }),
        }));
        self
    }

    /// Adds a write capability on beans of type `T`.
    pub fn with_setter<T: Bean>(
        mut self,
        setter: impl Fn(&mut T, Value) -> Result<(), InvocationError> + 'static,
    ) -> Self {
        self.setter = Some(Box::new(move |bean: &mut dyn Bean, value| {
            match bean.downcast_mut::<T>() {
                Some(bean) => setter(bean, value),
                None => Err(InvocationError::WrongReceiver {
                    expected: Type::of::<T>(),
                }),
            }
        }));
        self
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the declared type.
    #[inline]
    pub const fn value_type(&self) -> &ValueType {
        &self.value_type
    }

    #[inline]
    pub const fn is_readable(&self) -> bool {
        self.getter.is_some()
    }

    #[inline]
    pub const fn is_writable(&self) -> bool {
        self.setter.is_some()
    }

    /// Invokes the getter.
    pub fn read(&self, bean: &dyn Bean) -> Result<Value, InvocationError> {
        match &self.getter {
            Some(getter) => getter(bean),
            None => Err(InvocationError::Missing("getter")),
        }
    }

    /// Invokes the setter.
    pub fn write(&self, bean: &mut dyn Bean, value: Value) -> Result<(), InvocationError> {
        match &self.setter {
            Some(setter) => setter(bean, value),
            None => Err(InvocationError::Missing("setter")),
        }
    }
}

impl fmt::Debug for PropertyInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyInfo")
            .field("name", &self.name)
            .field("value_type", &self.value_type)
            .field("readable", &self.is_readable())
            .field("writable", &self.is_writable())
            .finish()
    }
}
