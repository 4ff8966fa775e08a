use alloc::rc::Rc;
use core::any::Any;
use core::cell::{Ref, RefCell, RefMut};
use core::fmt;

use crate::bean::{Bean, Type};
use crate::error::InvocationError;

// -----------------------------------------------------------------------------
// Shared

/// The shared form of a bean of type `T`.
///
/// Properties holding other beans use `Shared<T>` (or `Option<Shared<T>>`).
pub type Shared<T> = Rc<RefCell<T>>;

// -----------------------------------------------------------------------------
// BeanCell

/// A type-erased `RefCell` holding a bean.
///
/// Implemented for every `RefCell<T: Bean>`.
pub trait BeanCell: Any {
    /// Immutably borrows the bean, failing if it is mutably borrowed.
    fn try_borrow_bean(&self) -> Option<Ref<'_, dyn Bean>>;

    /// Mutably borrows the bean, failing if it is borrowed.
    fn try_borrow_bean_mut(&self) -> Option<RefMut<'_, dyn Bean>>;

    /// Returns the concrete bean type.
    fn cell_bean_type(&self) -> Type;
}

impl<T: Bean> BeanCell for RefCell<T> {
    #[inline]
    fn try_borrow_bean(&self) -> Option<Ref<'_, dyn Bean>> {
        self.try_borrow().ok().map(|r| Ref::map(r, |bean| bean as &dyn Bean))
    }

    #[inline]
    fn try_borrow_bean_mut(&self) -> Option<RefMut<'_, dyn Bean>> {
        self.try_borrow_mut().ok().map(|r| RefMut::map(r, |bean| bean as &mut dyn Bean))
    }

    #[inline]
    fn cell_bean_type(&self) -> Type {
        Type::of::<T>()
    }
}

// -----------------------------------------------------------------------------
// BeanRef

/// A shared, type-erased handle to a bean.
///
/// Cloning the handle shares the bean. Equality is identity.
///
/// # Examples
///
/// ```
/// use vc_property::{Bean, BeanRef};
///
/// #[derive(Default)]
/// struct Counter { hits: u32 }
/// impl Bean for Counter {}
///
/// let bean = BeanRef::new(Counter::default());
/// let same = bean.clone();
/// assert!(bean.ptr_eq(&same));
///
/// let typed = bean.downcast::<Counter>().unwrap();
/// typed.borrow_mut().hits += 1;
/// assert_eq!(same.downcast::<Counter>().unwrap().borrow().hits, 1);
/// ```
#[derive(Clone)]
pub struct BeanRef(Rc<dyn BeanCell>);

impl BeanRef {
    /// Wraps a new bean.
    #[inline]
    pub fn new<T: Bean>(bean: T) -> Self {
        Self(Rc::new(RefCell::new(bean)))
    }

    /// Erases an existing shared bean, keeping its identity.
    #[inline]
    pub fn from_shared<T: Bean>(shared: Shared<T>) -> Self {
        Self(shared)
    }

    /// Returns the typed shared bean, if the concrete type is `T`.
    pub fn downcast<T: Bean>(&self) -> Option<Shared<T>> {
        let any: Rc<dyn Any> = self.0.clone();
        any.downcast::<RefCell<T>>().ok()
    }

    /// Returns the concrete bean type.
    #[inline]
    pub fn bean_type(&self) -> Type {
        self.0.cell_bean_type()
    }

    /// Returns `true` if both handles point to the same bean.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Immutably borrows the bean.
    ///
    /// Returns [`InvocationError::Borrowed`] instead of panicking when the
    /// bean is currently mutably borrowed.
    pub fn borrow(&self) -> Result<Ref<'_, dyn Bean>, InvocationError> {
        self.0
            .try_borrow_bean()
            .ok_or_else(|| InvocationError::Borrowed(self.bean_type().path()))
    }

    /// Mutably borrows the bean.
    ///
    /// Returns [`InvocationError::Borrowed`] instead of panicking when the
    /// bean is currently borrowed.
    pub fn borrow_mut(&self) -> Result<RefMut<'_, dyn Bean>, InvocationError> {
        self.0
            .try_borrow_bean_mut()
            .ok_or_else(|| InvocationError::Borrowed(self.bean_type().path()))
    }
}

impl PartialEq for BeanRef {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for BeanRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BeanRef<{}>({:p})", self.bean_type().ident(), Rc::as_ptr(&self.0))
    }
}

impl<T: Bean> From<Shared<T>> for BeanRef {
    #[inline]
    fn from(value: Shared<T>) -> Self {
        Self::from_shared(value)
    }
}

#[cfg(test)]
mod tests {
    use super::BeanRef;
    use crate::bean::Bean;
    use crate::error::InvocationError;

    struct Leaf(u8);
    impl Bean for Leaf {}

    #[test]
    fn reentrant_borrow_is_an_error() {
        let bean = BeanRef::new(Leaf(1));
        let guard = bean.borrow().unwrap();
        assert!(matches!(bean.borrow_mut(), Err(InvocationError::Borrowed(_))));
        assert!(bean.borrow().is_ok());
        drop(guard);

        let mut guard = bean.borrow_mut().unwrap();
        guard.downcast_mut::<Leaf>().unwrap().0 = 2;
        drop(guard);
        assert_eq!(bean.downcast::<Leaf>().unwrap().borrow().0, 2);
    }

    #[test]
    fn downcast_to_wrong_type() {
        struct Other;
        impl Bean for Other {}

        let bean = BeanRef::new(Leaf(0));
        assert!(bean.downcast::<Other>().is_none());
        assert!(bean.borrow().unwrap().is::<Leaf>());
    }
}
