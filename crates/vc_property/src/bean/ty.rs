use core::any::TypeId;
use core::fmt;
use core::hash::{Hash, Hasher};

// -----------------------------------------------------------------------------
// Type

/// The identity of a Rust type together with its path.
///
/// Equality and hashing only consider the [`TypeId`].
///
/// The path comes from [`core::any::type_name`], which is meant for
/// diagnostics. It is used for the metadata segment and error messages,
/// never for identity.
///
/// # Examples
///
/// ```
/// use vc_property::Type;
///
/// mod model {
///     pub struct Person;
/// }
///
/// let ty = Type::of::<model::Person>();
/// assert_eq!(ty.ident(), "Person");
/// assert!(ty.path().ends_with("model::Person"));
/// assert!(ty.module_path().ends_with("model"));
/// ```
#[derive(Clone, Copy)]
pub struct Type {
    id: TypeId,
    path: &'static str,
}

impl Type {
    /// Creates the [`Type`] of `T`.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            path: core::any::type_name::<T>(),
        }
    }

    /// Returns the [`TypeId`].
    #[inline(always)]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// Returns the full type path, e.g. `my_crate::model::Person`.
    #[inline(always)]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    // The path without generic arguments.
    fn base(&self) -> &'static str {
        match self.path.find('<') {
            Some(index) => &self.path[..index],
            None => self.path,
        }
    }

    /// Returns the type name without its module path, e.g. `Person`.
    pub fn ident(&self) -> &'static str {
        let base = self.base();
        match base.rfind("::") {
            Some(index) => &base[index + 2..],
            None => base,
        }
    }

    /// Returns the module path, e.g. `my_crate::model`.
    ///
    /// Empty for primitive types.
    pub fn module_path(&self) -> &'static str {
        let base = self.base();
        match base.rfind("::") {
            Some(index) => &base[..index],
            None => "",
        }
    }

    /// Returns the crate name, e.g. `my_crate`.
    ///
    /// Empty for primitive types.
    pub fn crate_name(&self) -> &'static str {
        let base = self.base();
        match base.find("::") {
            Some(index) => &base[..index],
            None => "",
        }
    }
}

impl PartialEq for Type {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Type {}

impl Hash for Type {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Type {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}

impl fmt::Display for Type {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;

    use super::Type;

    #[test]
    fn generic_paths() {
        let ty = Type::of::<Vec<String>>();
        assert_eq!(ty.ident(), "Vec");
        assert_eq!(ty.crate_name(), "alloc");
        assert_eq!(ty.module_path(), "alloc::vec");
    }

    #[test]
    fn primitives() {
        let ty = Type::of::<i32>();
        assert_eq!(ty.ident(), "i32");
        assert_eq!(ty.module_path(), "");
        assert_eq!(ty.crate_name(), "");
        assert_ne!(ty, Type::of::<u32>());
    }
}
