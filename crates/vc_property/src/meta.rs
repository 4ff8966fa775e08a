//! Provide the type-metadata segment and its access policy.
//!
//! When a name segment equals [`MetaPolicy::meta_segment`] (`class` by
//! default) and the bean has no real property of that name, the accessor
//! yields a synthetic [`TypeHandle`] bean describing the bean's type. Its
//! properties are read-only:
//!
//! | property     | value                          |
//! |--------------|--------------------------------|
//! | `name`       | full type path                 |
//! | `simpleName` | type name without module path  |
//! | `module`     | module path                    |
//! | `crate`      | crate name                     |
//!
//! A [`MetaPolicy`] may deny some of them. Denied names behave as if the
//! property did not exist.

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::bean::{Bean, Type};
use crate::registry::{GetTypeMeta, PropertyInfo, TypeMeta};
use crate::value::Value;

// -----------------------------------------------------------------------------
// MetaPolicy

/// Controls the metadata segment and which of its properties are reachable.
pub trait MetaPolicy {
    /// Returns the segment name that yields a [`TypeHandle`].
    fn meta_segment(&self) -> &str {
        "class"
    }

    /// Returns `true` if the [`TypeHandle`] property must not be accessed.
    fn is_denied(&self, property: &str) -> bool;
}

// -----------------------------------------------------------------------------
// DenyListPolicy

/// The default [`MetaPolicy`]: a configurable segment name and denylist.
///
/// Denies `module`, `crate`, `classLoader` and `package` by default.
///
/// # Examples
///
/// ```
/// use vc_property::meta::{DenyListPolicy, MetaPolicy};
///
/// let policy = DenyListPolicy::default();
/// assert!(policy.is_denied("module"));
/// assert!(!policy.is_denied("name"));
///
/// let policy = DenyListPolicy::permissive().with_segment("type").deny("name");
/// assert_eq!(policy.meta_segment(), "type");
/// assert!(policy.is_denied("name"));
/// assert!(!policy.is_denied("module"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenyListPolicy {
    segment: Cow<'static, str>,
    denied: Vec<Cow<'static, str>>,
}

impl Default for DenyListPolicy {
    fn default() -> Self {
        Self {
            segment: Cow::Borrowed("class"),
            denied: vec![
                Cow::Borrowed("module"),
                Cow::Borrowed("crate"),
                Cow::Borrowed("classLoader"),
                Cow::Borrowed("package"),
            ],
        }
    }
}

impl DenyListPolicy {
    /// Creates a policy with the default denylist.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a policy that denies nothing.
    #[inline]
    pub fn permissive() -> Self {
        Self {
            segment: Cow::Borrowed("class"),
            denied: Vec::new(),
        }
    }

    /// Changes the metadata segment name.
    #[inline]
    pub fn with_segment(mut self, segment: impl Into<Cow<'static, str>>) -> Self {
        self.segment = segment.into();
        self
    }

    /// Adds a name to the denylist.
    pub fn deny(mut self, property: impl Into<Cow<'static, str>>) -> Self {
        let property = property.into();
        if !self.denied.contains(&property) {
            self.denied.push(property);
        }
        self
    }

    /// Removes a name from the denylist.
    pub fn allow(mut self, property: &str) -> Self {
        self.denied.retain(|denied| denied != property);
        self
    }

    /// Returns the denied names.
    #[inline]
    pub fn denied(&self) -> &[Cow<'static, str>] {
        &self.denied
    }
}

impl MetaPolicy for DenyListPolicy {
    #[inline]
    fn meta_segment(&self) -> &str {
        &self.segment
    }

    #[inline]
    fn is_denied(&self, property: &str) -> bool {
        self.denied.iter().any(|denied| denied == property)
    }
}

// -----------------------------------------------------------------------------
// TypeHandle

/// The synthetic bean produced by the metadata segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeHandle {
    ty: Type,
}

impl TypeHandle {
    #[inline]
    pub const fn new(ty: Type) -> Self {
        Self { ty }
    }

    /// Returns the described type.
    #[inline]
    pub const fn described(&self) -> Type {
        self.ty
    }
}

impl Bean for TypeHandle {}

fn text(s: &str) -> Value {
    Value::Text(String::from(s))
}

impl GetTypeMeta for TypeHandle {
    fn get_type_meta() -> TypeMeta {
        TypeMeta::with_capacity::<Self>(4)
            .with_property(
                PropertyInfo::of::<String>("name")
                    .with_getter(|h: &TypeHandle| Ok(text(h.ty.path()))),
            )
            .with_property(
                PropertyInfo::of::<String>("simpleName")
                    .with_getter(|h: &TypeHandle| Ok(text(h.ty.ident()))),
            )
            .with_property(
                PropertyInfo::of::<String>("module")
                    .with_getter(|h: &TypeHandle| Ok(text(h.ty.module_path()))),
            )
            .with_property(
                PropertyInfo::of::<String>("crate")
                    .with_getter(|h: &TypeHandle| Ok(text(h.ty.crate_name()))),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::{DenyListPolicy, MetaPolicy, TypeHandle};
    use crate::bean::Type;
    use crate::registry::GetTypeMeta;
    use crate::value::Value;

    struct Sample;

    #[test]
    fn handle_properties_are_read_only() {
        let meta = TypeHandle::get_type_meta();
        let handle = TypeHandle::new(Type::of::<Sample>());
        for info in meta.properties() {
            assert!(info.is_readable());
            assert!(!info.is_writable());
        }
        let simple = meta.property("simpleName").unwrap().read(&handle).unwrap();
        assert_eq!(simple, Value::Text("Sample".into()));
    }

    #[test]
    fn allow_removes_denied_name() {
        let policy = DenyListPolicy::new().allow("crate");
        assert!(!policy.is_denied("crate"));
        assert!(policy.is_denied("classLoader"));
        assert_eq!(policy.denied().len(), 3);
    }
}
