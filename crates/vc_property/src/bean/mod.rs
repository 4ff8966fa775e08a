//! Provide the [`Bean`] trait and the shared [`BeanRef`] handle.
//!
//! A bean is any `'static` value whose properties are described in a
//! [`TypeRegistry`](crate::registry::TypeRegistry). Beans are shared through
//! `Rc<RefCell<_>>`, so a graph may hold the same bean in several places and
//! writes through one path are visible through every other.

// -----------------------------------------------------------------------------
// Modules

mod bean_ref;
mod ty;

// -----------------------------------------------------------------------------
// Exports

pub use bean_ref::{BeanCell, BeanRef, Shared};
pub use ty::Type;

use core::any::Any;

// -----------------------------------------------------------------------------
// Bean

/// A value whose properties can be accessed by name.
///
/// Usually implemented with [`#[derive(Bean)]`](crate::derive::Bean), which
/// also generates the [`GetTypeMeta`](crate::registry::GetTypeMeta) table.
///
/// # Examples
///
/// ```
/// use vc_property::{Bean, Type};
///
/// struct Plain;
/// impl Bean for Plain {}
///
/// let bean: &dyn Bean = &Plain;
/// assert_eq!(bean.bean_type(), Type::of::<Plain>());
/// ```
pub trait Bean: Any {
    /// Returns the concrete type of this bean.
    fn bean_type(&self) -> Type {
        Type::of::<Self>()
    }
}

impl dyn Bean {
    /// Returns `true` if the concrete type is `T`.
    #[inline]
    pub fn is<T: Bean>(&self) -> bool {
        (self as &dyn Any).is::<T>()
    }

    /// Downcasts to the concrete type.
    #[inline]
    pub fn downcast_ref<T: Bean>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }

    /// Downcasts to the concrete type.
    #[inline]
    pub fn downcast_mut<T: Bean>(&mut self) -> Option<&mut T> {
        (self as &mut dyn Any).downcast_mut::<T>()
    }
}
