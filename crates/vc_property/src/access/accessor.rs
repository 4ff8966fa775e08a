use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;

use crate::access::{AccessOptions, PropertyChange, PropertyDescriptor};
use crate::bean::{BeanRef, Type};
use crate::convert::TypeConverter;
use crate::error::{AccessError, InvocationError};
use crate::meta::{DenyListPolicy, MetaPolicy, TypeHandle};
use crate::path::{AccessPath, PropertyPath, Segment};
use crate::registry::{CapabilityRegistry, PropertyInfo};
use crate::suggest::SuggestionEngine;
use crate::value::{Value, ValueType};

// -----------------------------------------------------------------------------
// PropertyAccessor

/// Reads, writes and describes properties addressed by path strings.
///
/// The accessor holds no bean. Every operation takes the root bean, so one
/// accessor serves any number of object graphs built from the types its
/// registry knows.
pub struct PropertyAccessor<R> {
    pub(super) registry: R,
    pub(super) converter: TypeConverter,
    pub(super) suggestions: SuggestionEngine,
    pub(super) meta_policy: Box<dyn MetaPolicy>,
    pub(super) options: AccessOptions,
}

/// What a name segment resolves to on a bean.
pub(super) enum Capability<'a> {
    Property(&'a PropertyInfo),
    Meta,
}

/// A value reached while navigating, with what is known about its slot.
pub(super) struct Cursor {
    pub value: Value,
    pub declared: ValueType,
    pub owner: Type,
    pub readable: bool,
    pub writable: bool,
}

impl Cursor {
    fn root(root: &BeanRef) -> Self {
        let owner = root.bean_type();
        Self {
            value: Value::Bean(root.clone()),
            declared: ValueType::Bean(owner),
            owner,
            readable: true,
            writable: false,
        }
    }
}

impl<R: CapabilityRegistry> PropertyAccessor<R> {
    /// Creates an accessor with default conversions, suggestions, metadata
    /// policy and options.
    pub fn new(registry: R) -> Self {
        Self {
            registry,
            converter: TypeConverter::new(),
            suggestions: SuggestionEngine::new(),
            meta_policy: Box::new(DenyListPolicy::new()),
            options: AccessOptions::new(),
        }
    }

    /// Replaces the options used by [`set`](Self::set).
    #[inline]
    pub fn with_options(mut self, options: AccessOptions) -> Self {
        self.options = options;
        self
    }

    #[inline]
    pub fn with_converter(mut self, converter: TypeConverter) -> Self {
        self.converter = converter;
        self
    }

    #[inline]
    pub fn with_suggestions(mut self, suggestions: SuggestionEngine) -> Self {
        self.suggestions = suggestions;
        self
    }

    #[inline]
    pub fn with_meta_policy(mut self, policy: impl MetaPolicy + 'static) -> Self {
        self.meta_policy = Box::new(policy);
        self
    }

    #[inline]
    pub fn registry(&self) -> &R {
        &self.registry
    }

    #[inline]
    pub fn converter(&self) -> &TypeConverter {
        &self.converter
    }

    #[inline]
    pub fn converter_mut(&mut self) -> &mut TypeConverter {
        &mut self.converter
    }

    #[inline]
    pub fn options(&self) -> &AccessOptions {
        &self.options
    }

    #[inline]
    pub fn options_mut(&mut self) -> &mut AccessOptions {
        &mut self.options
    }

    // -------------------------------------------------------------------------
    // Operations

    /// Returns `true` if `path` names a readable property.
    ///
    /// Intermediate segments are read. Any failure yields `false`.
    pub fn is_readable(&self, root: &BeanRef, path: impl AccessPath) -> bool {
        self.describe(root, path).is_ok_and(|desc| desc.readable)
    }

    /// Returns `true` if `path` names a writable property.
    ///
    /// Intermediate segments are read. Any failure yields `false`.
    pub fn is_writable(&self, root: &BeanRef, path: impl AccessPath) -> bool {
        self.describe(root, path).is_ok_and(|desc| desc.writable)
    }

    /// Reads the value at `path`.
    ///
    /// `Optional` values are unwrapped, an absent final value reads as
    /// [`Value::Null`]. A missing map key reads as `Null` too.
    ///
    /// # Errors
    ///
    /// - [`AccessError::MalformedPath`] if `path` does not parse.
    /// - [`AccessError::NotReadableProperty`] for unknown, denied or
    ///   write-only properties.
    /// - [`AccessError::NullValueInNestedPath`] if an intermediate is absent.
    /// - [`AccessError::InvalidProperty`] for bad list indices and keys used
    ///   on non-collections.
    /// - [`AccessError::InvocationFailed`] if a getter fails.
    pub fn get(&self, root: &BeanRef, path: impl AccessPath) -> Result<Value, AccessError> {
        let path = path.parse_path()?;
        let parent = self.navigate(root, &path)?;
        let cursor = self.read_step(parent, &path, path.len() - 1)?;
        Ok(cursor.value.unwrap_optional())
    }

    /// Writes `value` at `path` with the accessor's own options.
    ///
    /// See [`set_with`](Self::set_with).
    #[inline]
    pub fn set(
        &self,
        root: &BeanRef,
        path: impl AccessPath,
        value: impl Into<Value>,
    ) -> Result<PropertyChange, AccessError> {
        self.set_with(root, path, value, &self.options)
    }

    /// Writes `value` at `path`.
    ///
    /// The raw value is converted to the declared type of the final segment.
    /// Intermediate beans are modified in place. Collections on the path are
    /// written back through the property that holds them.
    ///
    /// Writes are not transactional. Intermediates grown before a failing
    /// step stay in the graph.
    ///
    /// # Errors
    ///
    /// - [`AccessError::MalformedPath`] if `path` does not parse.
    /// - [`AccessError::NotWritableProperty`] if the final property is
    ///   unknown or read-only, with near-match suggestions.
    /// - [`AccessError::NotReadableProperty`] for an unreadable intermediate.
    /// - [`AccessError::AutoGrowFailed`] if an absent intermediate cannot be
    ///   created.
    /// - [`AccessError::TypeMismatch`] if conversion fails. The final
    ///   property is not touched.
    /// - [`AccessError::InvalidProperty`] for bad list indices.
    /// - [`AccessError::InvocationFailed`] if a getter or setter fails.
    pub fn set_with(
        &self,
        root: &BeanRef,
        path: impl AccessPath,
        value: impl Into<Value>,
        options: &AccessOptions,
    ) -> Result<PropertyChange, AccessError> {
        let path = path.parse_path()?;
        let old_value = if options.extract_old_value {
            self.extract_old_value(root, &path)
        } else {
            None
        };

        let new_value = self.write_path(root, &path, value.into(), options)?;
        Ok(PropertyChange {
            property: path.to_string(),
            old_value,
            new_value,
        })
    }

    /// Describes the final segment of `path`.
    ///
    /// Intermediate segments are read, the final one is not.
    ///
    /// # Errors
    ///
    /// Navigation errors as in [`get`](Self::get), and
    /// [`AccessError::InvalidProperty`] if the final name is unknown.
    pub fn describe(
        &self,
        root: &BeanRef,
        path: impl AccessPath,
    ) -> Result<PropertyDescriptor, AccessError> {
        let path = path.parse_path()?;
        let parent = self.navigate(root, &path)?;
        self.describe_step(parent, &path, path.len() - 1)
    }

    // -------------------------------------------------------------------------
    // Resolution

    /// Resolves a name on a bean of type `owner`.
    pub(super) fn capability(&self, owner: &Type, name: &str) -> Option<Capability<'_>> {
        if owner.id() == TypeId::of::<TypeHandle>() && self.meta_policy.is_denied(name) {
            return None;
        }
        if let Some(info) = self.registry.describe(owner.id(), name) {
            return Some(Capability::Property(info));
        }
        (name == self.meta_policy.meta_segment()).then_some(Capability::Meta)
    }

    /// Writable names and aliases of `owner` close to `name`.
    pub(super) fn suggest(&self, owner: &Type, name: &str) -> Vec<String> {
        let id = owner.id();
        let candidates = self
            .registry
            .property_names(id)
            .into_iter()
            .chain(self.registry.alias_names(id))
            .filter(|candidate| {
                self.registry
                    .describe(id, candidate)
                    .is_some_and(PropertyInfo::is_writable)
            });
        self.suggestions.suggest(name, candidates)
    }

    pub(super) fn invoke_read(
        &self,
        bean: &BeanRef,
        info: &PropertyInfo,
        path: &PropertyPath,
        index: usize,
    ) -> Result<Value, AccessError> {
        let failed = |source: InvocationError| AccessError::InvocationFailed {
            property: path.prefix(index + 1),
            owner: bean.bean_type(),
            source,
        };
        let guard = bean.borrow().map_err(failed)?;
        info.read(&*guard).map_err(failed)
    }

    pub(super) fn invoke_write(
        &self,
        bean: &BeanRef,
        info: &PropertyInfo,
        value: Value,
        path: &PropertyPath,
        index: usize,
    ) -> Result<(), AccessError> {
        let failed = |source: InvocationError| AccessError::InvocationFailed {
            property: path.prefix(index + 1),
            owner: bean.bean_type(),
            source,
        };
        let mut guard = bean.borrow_mut().map_err(failed)?;
        info.write(&mut *guard, value).map_err(failed)
    }

    // -------------------------------------------------------------------------
    // Navigation

    /// Reads every segment but the last, returning the parent of the final
    /// segment.
    fn navigate(&self, root: &BeanRef, path: &PropertyPath) -> Result<Cursor, AccessError> {
        let mut cursor = Cursor::root(root);
        for index in 0..path.len() - 1 {
            cursor = self.read_step(cursor, path, index)?;
            if cursor.value.is_absent() {
                return Err(AccessError::NullValueInNestedPath {
                    property: path.prefix(index + 1),
                    owner: cursor.owner,
                });
            }
        }
        Ok(cursor)
    }

    /// Reads segment `index` of `path` from the value under `cursor`.
    fn read_step(
        &self,
        cursor: Cursor,
        path: &PropertyPath,
        index: usize,
    ) -> Result<Cursor, AccessError> {
        let Cursor {
            value,
            declared,
            owner,
            readable,
            writable,
        } = cursor;
        let segment = &path.segments()[index];

        match (value.unwrap_optional(), segment) {
            (Value::Bean(bean), Segment::Name(name)) => {
                let owner = bean.bean_type();
                match self.capability(&owner, name) {
                    Some(Capability::Property(info)) if info.is_readable() => Ok(Cursor {
                        value: self.invoke_read(&bean, info, path, index)?,
                        declared: info.value_type().clone(),
                        owner,
                        readable: true,
                        writable: info.is_writable(),
                    }),
                    Some(Capability::Meta) => Ok(meta_cursor(owner)),
                    _ => Err(AccessError::NotReadableProperty {
                        property: path.prefix(index + 1),
                        owner,
                    }),
                }
            }
            (Value::List(items), Segment::Key { key, .. }) => {
                let position = list_index(key, path, index, owner)?;
                let len = items.len();
                let value = items.into_iter().nth(position).ok_or_else(|| {
                    out_of_bounds(position, len, path, index, owner)
                })?;
                Ok(Cursor {
                    value,
                    declared: declared.element().clone(),
                    owner,
                    readable,
                    writable,
                })
            }
            (Value::Map(mut entries), Segment::Key { key, .. }) => Ok(Cursor {
                value: entries.remove(key.as_str()).unwrap_or_default(),
                declared: declared.element().clone(),
                owner,
                readable,
                writable,
            }),
            (value, segment) => Err(unsupported_segment(&value, segment, path, index, owner)),
        }
    }

    fn describe_step(
        &self,
        cursor: Cursor,
        path: &PropertyPath,
        index: usize,
    ) -> Result<PropertyDescriptor, AccessError> {
        let segment = &path.segments()[index];
        let property = path.prefix(index + 1);
        let owner = cursor.owner;

        match (cursor.value.unwrap_optional(), segment) {
            (Value::Bean(bean), Segment::Name(name)) => {
                let owner = bean.bean_type();
                match self.capability(&owner, name) {
                    Some(Capability::Property(info)) => Ok(PropertyDescriptor {
                        property,
                        owner,
                        value_type: info.value_type().clone(),
                        readable: info.is_readable(),
                        writable: info.is_writable(),
                    }),
                    Some(Capability::Meta) => {
                        let meta = meta_cursor(owner);
                        Ok(PropertyDescriptor {
                            property,
                            owner,
                            value_type: meta.declared,
                            readable: meta.readable,
                            writable: meta.writable,
                        })
                    }
                    None => Err(AccessError::InvalidProperty {
                        property,
                        owner,
                        reason: "no such property".into(),
                    }),
                }
            }
            (Value::List(_), Segment::Key { key, .. }) => {
                list_index(key, path, index, owner)?;
                Ok(PropertyDescriptor {
                    property,
                    owner,
                    value_type: cursor.declared.element().clone(),
                    readable: cursor.readable,
                    writable: cursor.writable,
                })
            }
            (Value::Map(_), Segment::Key { .. }) => Ok(PropertyDescriptor {
                property,
                owner,
                value_type: cursor.declared.element().clone(),
                readable: cursor.readable,
                writable: cursor.writable,
            }),
            (value, segment) => Err(unsupported_segment(&value, segment, path, index, owner)),
        }
    }

    fn extract_old_value(&self, root: &BeanRef, path: &PropertyPath) -> Option<Value> {
        match self.get(root, path) {
            Ok(value) => Some(value),
            Err(err) => {
                log::debug!("could not read the old value of `{path}`: {err}");
                None
            }
        }
    }
}

impl<R> fmt::Debug for PropertyAccessor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyAccessor")
            .field("converter", &self.converter)
            .field("suggestions", &self.suggestions)
            .field("meta_segment", &self.meta_policy.meta_segment())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Helpers

pub(super) fn meta_cursor(owner: Type) -> Cursor {
    Cursor {
        value: Value::Bean(BeanRef::new(TypeHandle::new(owner))),
        declared: ValueType::Bean(Type::of::<TypeHandle>()),
        owner,
        readable: true,
        writable: false,
    }
}

pub(super) fn list_index(
    key: &str,
    path: &PropertyPath,
    index: usize,
    owner: Type,
) -> Result<usize, AccessError> {
    key.parse().map_err(|_| AccessError::InvalidProperty {
        property: path.prefix(index + 1),
        owner,
        reason: alloc::format!("`{key}` is not a valid list index").into(),
    })
}

pub(super) fn out_of_bounds(
    position: usize,
    len: usize,
    path: &PropertyPath,
    index: usize,
    owner: Type,
) -> AccessError {
    AccessError::InvalidProperty {
        property: path.prefix(index + 1),
        owner,
        reason: alloc::format!("index {position} out of bounds for length {len}").into(),
    }
}

pub(super) fn unsupported_segment(
    value: &Value,
    segment: &Segment,
    path: &PropertyPath,
    index: usize,
    owner: Type,
) -> AccessError {
    let reason = match segment {
        Segment::Name(_) => alloc::format!("cannot read a named property of a {} value", value.kind()),
        Segment::Key { .. } => alloc::format!("cannot index into a {} value", value.kind()),
    };
    AccessError::InvalidProperty {
        property: path.prefix(index + 1),
        owner,
        reason: reason.into(),
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::rc::Rc;
    use alloc::string::{String, ToString};
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use super::PropertyAccessor;
    use crate::access::AccessOptions;
    use crate::bean::{Bean, BeanRef, Shared};
    use crate::derive::{Bean, PropertyEnum};
    use crate::error::{AccessError, GrowFailure, InvocationError};
    use crate::meta::DenyListPolicy;
    use crate::registry::{GetTypeMeta, PropertyInfo, TypeMeta, TypeRegistry};
    use crate::value::{FromValue, IntType, Value, ValueError, ValueType};

    #[derive(Bean, Default)]
    #[bean(default)]
    struct TestBean {
        #[bean(alias = "title")]
        name: String,
        age: i32,
        #[bean(setter = "set_touchy")]
        touchy: String,
        spouse: Option<Shared<TestBean>>,
        nicknames: Vec<String>,
        ratings: BTreeMap<String, i32>,
    }

    impl TestBean {
        fn set_touchy(&mut self, touchy: String) -> Result<(), InvocationError> {
            if touchy.contains('.') {
                return Err(InvocationError::rejected("Can't contain a ."));
            }
            self.touchy = touchy;
            Ok(())
        }
    }

    #[derive(Bean, Default)]
    #[bean(default)]
    struct IntelliBean {
        #[bean(rename = "myString")]
        my_string: String,
        #[bean(rename = "myStriNg")]
        my_stri_ng: String,
        #[bean(rename = "myStringss")]
        my_stringss: String,
        name: String,
    }

    #[derive(Bean, Default)]
    struct GetterBean {
        #[bean(getter = "name")]
        name: Option<String>,
    }

    impl GetterBean {
        fn name(&self) -> Result<Option<String>, InvocationError> {
            match &self.name {
                Some(name) => Ok(Some(name.clone())),
                None => Err(InvocationError::rejected("name has not been set")),
            }
        }
    }

    #[derive(Bean, Default)]
    #[bean(default)]
    struct Named {
        name: String,
    }

    #[derive(Bean, Default)]
    #[bean(default)]
    struct Holder {
        object: Option<Shared<Named>>,
        items: Vec<Option<Shared<Named>>>,
        #[bean(read_only)]
        fixed: Option<Shared<Named>>,
        count: Option<u8>,
    }

    #[derive(Bean)]
    struct Unconstructible {
        label: String,
    }

    #[derive(Bean, Default)]
    #[bean(default)]
    struct Outer {
        inner: Option<Shared<Unconstructible>>,
    }

    #[derive(PropertyEnum, Debug, Clone, Copy, PartialEq, Default)]
    enum Color {
        #[default]
        Red,
        #[bean(rename = "GREEN")]
        Green,
    }

    #[derive(Bean, Default)]
    struct Paint {
        color: Color,
        #[bean(skip)]
        #[allow(dead_code)]
        mixed: bool,
    }

    #[derive(Bean, Default)]
    struct Loader {
        #[bean(rename = "classLoader")]
        class_loader: String,
    }

    #[derive(Bean, Default)]
    #[bean(default)]
    struct Numbers {
        big: u64,
        small: f32,
        counts: Vec<u64>,
        tags: Vec<String>,
        scores: Vec<i32>,
        members: Vec<Shared<Named>>,
        colors: Vec<Color>,
    }

    /// Setter takes text, getter reports its length.
    #[derive(Default)]
    struct Mismatched {
        object: String,
    }

    impl Bean for Mismatched {}

    impl GetTypeMeta for Mismatched {
        fn get_type_meta() -> TypeMeta {
            TypeMeta::of::<Self>().with_property(
                PropertyInfo::of::<String>("object")
                    .with_getter(|this: &Mismatched| Ok(Value::Int(this.object.len() as i128)))
                    .with_setter(|this: &mut Mismatched, value| {
                        this.object = String::from_value(value)?;
                        Ok(())
                    }),
            )
        }
    }

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.register::<TestBean>();
        registry.register::<IntelliBean>();
        registry.register::<GetterBean>();
        registry.register::<Holder>();
        registry.register::<Outer>();
        registry.register::<Mismatched>();
        registry.register::<Paint>();
        registry.register::<Loader>();
        registry.register::<Numbers>();
        registry
    }

    fn shared<T>(value: T) -> Shared<T> {
        Rc::new(RefCell::new(value))
    }

    fn growing() -> AccessOptions {
        AccessOptions::new().auto_grow(true)
    }

    #[test]
    fn simple_round_trip() {
        let registry = registry();
        let accessor = PropertyAccessor::new(&registry);
        let bean = shared(TestBean::default());
        let root = BeanRef::from_shared(bean.clone());

        let change = accessor.set(&root, "age", "42").unwrap();
        assert_eq!(change.property, "age");
        assert_eq!(change.new_value, Value::Int(42));
        assert_eq!(change.old_value, None);
        assert_eq!(bean.borrow().age, 42);
        assert_eq!(accessor.get(&root, "age").unwrap(), Value::Int(42));

        accessor.set(&root, "title", "tom").unwrap();
        assert_eq!(bean.borrow().name, "tom");
        assert_eq!(accessor.get(&root, "name").unwrap(), Value::from("tom"));
    }

    #[test]
    fn nested_round_trip() {
        let registry = registry();
        let accessor = PropertyAccessor::new(&registry);
        let spouse = shared(TestBean::default());
        let bean = shared(TestBean {
            spouse: Some(spouse.clone()),
            ..TestBean::default()
        });
        let root = BeanRef::from_shared(bean);

        accessor.set(&root, "spouse.age", 31).unwrap();
        assert_eq!(spouse.borrow().age, 31);
        assert_eq!(accessor.get(&root, "spouse.age").unwrap(), Value::Int(31));
        assert_eq!(accessor.get(&root, "spouse.spouse").unwrap(), Value::Null);

        let err = accessor.get(&root, "spouse.spouse.age").unwrap_err();
        assert!(matches!(
            err,
            AccessError::NullValueInNestedPath { ref property, .. } if property == "spouse.spouse"
        ));
        assert!(err.is_invalid_navigation());
    }

    #[test]
    fn not_writable_suggests_close_names() {
        let registry = registry();
        let accessor = PropertyAccessor::new(&registry);
        let root = BeanRef::new(TestBean::default());

        let err = accessor.set(&root, "ag", "1").unwrap_err();
        assert!(err.is_unknown_property());
        assert_eq!(err.property(), Some("ag"));
        assert_eq!(err.possible_matches(), Some(&["age".into()][..]));

        let err = accessor.set(&root, "names", "x").unwrap_err();
        assert_eq!(err.possible_matches(), Some(&["name".into()][..]));

        let err = accessor.set(&root, "zzzzzz", "x").unwrap_err();
        assert!(err.is_unknown_property());
        assert!(err.possible_matches().is_none());

        let root = BeanRef::new(IntelliBean::default());
        let err = accessor.set(&root, "mystring", "x").unwrap_err();
        assert_eq!(
            err.possible_matches().unwrap(),
            ["myStriNg", "myString", "myStringss"]
        );
    }

    #[test]
    fn type_mismatch_keeps_bean() {
        let registry = registry();
        let accessor = PropertyAccessor::new(&registry);
        let bean = shared(TestBean {
            age: 7,
            ..TestBean::default()
        });
        let root = BeanRef::from_shared(bean.clone());

        let err = accessor.set(&root, "age", "foobar").unwrap_err();
        match err {
            AccessError::TypeMismatch { property, source } => {
                assert_eq!(property, "age");
                assert_eq!(source.value, Value::from("foobar"));
                assert_eq!(source.target, ValueType::Int(IntType::I32));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(bean.borrow().age, 7);
    }

    #[test]
    fn setter_rejection_is_invocation_failure() {
        let registry = registry();
        let accessor = PropertyAccessor::new(&registry);
        let bean = shared(TestBean::default());
        let root = BeanRef::from_shared(bean.clone());

        accessor.set(&root, "touchy", "valid").unwrap();
        let err = accessor.set(&root, "touchy", ".invalid").unwrap_err();
        match err {
            AccessError::InvocationFailed { property, source, .. } => {
                assert_eq!(property, "touchy");
                assert_eq!(source, InvocationError::rejected("Can't contain a ."));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(bean.borrow().touchy, "valid");
    }

    #[test]
    fn getter_and_setter_types_may_differ() {
        let registry = registry();
        let accessor = PropertyAccessor::new(&registry);
        let root = BeanRef::new(Mismatched::default());

        accessor.set(&root, "object", "a String").unwrap();
        assert_eq!(accessor.get(&root, "object").unwrap(), Value::Int(8));
    }

    #[test]
    fn failing_getter_does_not_block_write() {
        let registry = registry();
        let accessor = PropertyAccessor::new(&registry);
        let bean = shared(GetterBean::default());
        let root = BeanRef::from_shared(bean.clone());

        assert!(accessor.get(&root, "name").is_err());

        let options = AccessOptions::new().extract_old_value(true);
        let change = accessor.set_with(&root, "name", "tom", &options).unwrap();
        assert_eq!(change.old_value, None);
        assert_eq!(bean.borrow().name.as_deref(), Some("tom"));

        let change = accessor.set_with(&root, "name", "ann", &options).unwrap();
        assert_eq!(change.old_value, Some(Value::from("tom")));
        assert_eq!(accessor.get(&root, "name").unwrap(), Value::from("ann"));
    }

    #[test]
    fn auto_grow_nested_bean() {
        let registry = registry();
        let accessor = PropertyAccessor::new(&registry);
        let holder = shared(Holder::default());
        let root = BeanRef::from_shared(holder.clone());

        let err = accessor.set(&root, "object.name", "x").unwrap_err();
        assert!(matches!(
            err,
            AccessError::AutoGrowFailed { reason: GrowFailure::Disabled, ref property, .. }
                if property == "object"
        ));
        assert!(holder.borrow().object.is_none());

        accessor
            .set_with(&root, "object.name", "x", &growing())
            .unwrap();
        assert_eq!(accessor.get(&root, "object.name").unwrap(), Value::from("x"));
        let object = holder.borrow().object.clone().unwrap();
        assert_eq!(object.borrow().name, "x");
    }

    #[test]
    fn nested_write_keeps_container_identity() {
        let registry = registry();
        let accessor = PropertyAccessor::new(&registry);
        let holder = shared(Holder::default());
        let root = BeanRef::from_shared(holder.clone());
        let named = shared(Named::default());

        accessor
            .set(&root, "object", BeanRef::from_shared(named.clone()))
            .unwrap();
        accessor.set(&root, "object.name", "new").unwrap();

        assert!(Rc::ptr_eq(holder.borrow().object.as_ref().unwrap(), &named));
        assert_eq!(named.borrow().name, "new");
    }

    #[test]
    fn auto_grow_failures() {
        let registry = registry();
        let accessor = PropertyAccessor::new(&registry).with_options(growing());

        let root = BeanRef::new(Holder::default());
        let err = accessor.set(&root, "fixed.name", "x").unwrap_err();
        assert!(matches!(
            err,
            AccessError::NotWritableProperty { ref property, .. } if property == "fixed"
        ));

        let err = accessor.set(&root, "count.value", "1").unwrap_err();
        assert!(matches!(
            err,
            AccessError::AutoGrowFailed { reason: GrowFailure::NotConstructible(_), .. }
        ));

        let root = BeanRef::new(Outer::default());
        let err = accessor.set(&root, "inner.label", "x").unwrap_err();
        assert!(matches!(
            err,
            AccessError::AutoGrowFailed { reason: GrowFailure::Construction(_), .. }
        ));
    }

    #[test]
    fn keyed_list_access() {
        let registry = registry();
        let accessor = PropertyAccessor::new(&registry);
        let bean = shared(TestBean::default());
        let root = BeanRef::from_shared(bean.clone());

        let err = accessor.set(&root, "nicknames[0]", "bob").unwrap_err();
        assert!(matches!(err, AccessError::InvalidProperty { .. }));

        accessor
            .set_with(&root, "nicknames[0]", "bob", &growing())
            .unwrap();
        accessor.set(&root, "nicknames[0]", "rob").unwrap();
        assert_eq!(bean.borrow().nicknames, ["rob"]);
        assert_eq!(accessor.get(&root, "nicknames[0]").unwrap(), Value::from("rob"));

        let err = accessor.get(&root, "nicknames[3]").unwrap_err();
        assert!(matches!(err, AccessError::InvalidProperty { ref property, .. } if property == "nicknames[3]"));
        let err = accessor.get(&root, "nicknames[x]").unwrap_err();
        assert!(matches!(err, AccessError::InvalidProperty { .. }));
        let err = accessor.get(&root, "age[0]").unwrap_err();
        assert!(matches!(err, AccessError::InvalidProperty { .. }));
    }

    #[test]
    fn list_gaps_take_default_elements() {
        let registry = registry();
        let accessor = PropertyAccessor::new(&registry).with_options(growing());
        let numbers = shared(Numbers::default());
        let root = BeanRef::from_shared(numbers.clone());

        accessor.set(&root, "tags[2]", "c").unwrap();
        assert_eq!(numbers.borrow().tags, ["", "", "c"]);

        accessor.set(&root, "scores[1]", "7").unwrap();
        assert_eq!(numbers.borrow().scores, [0, 7]);

        accessor.set(&root, "members[1].name", "bob").unwrap();
        {
            let numbers = numbers.borrow();
            assert_eq!(numbers.members.len(), 2);
            assert_eq!(numbers.members[0].borrow().name, "");
            assert_eq!(numbers.members[1].borrow().name, "bob");
            assert!(!Rc::ptr_eq(&numbers.members[0], &numbers.members[1]));
        }

        // Enums have no zero value to fill a gap with.
        let err = accessor.set(&root, "colors[1]", "GREEN").unwrap_err();
        assert!(matches!(
            err,
            AccessError::AutoGrowFailed {
                reason: GrowFailure::NotConstructible(_),
                ref property,
                ..
            } if property == "colors[1]"
        ));
        assert!(numbers.borrow().colors.is_empty());
        accessor.set(&root, "colors[0]", "GREEN").unwrap();
        assert_eq!(numbers.borrow().colors, [Color::Green]);
    }

    #[test]
    fn unsigned_values_are_lossless() {
        let registry = registry();
        let accessor = PropertyAccessor::new(&registry).with_options(growing());
        let numbers = shared(Numbers {
            big: u64::MAX,
            counts: vec![u64::MAX],
            ..Numbers::default()
        });
        let root = BeanRef::from_shared(numbers.clone());

        assert_eq!(
            accessor.get(&root, "big").unwrap(),
            Value::Int(18_446_744_073_709_551_615)
        );
        accessor.set(&root, "big", "18446744073709551614").unwrap();
        assert_eq!(numbers.borrow().big, u64::MAX - 1);

        let err = accessor.set(&root, "big", "-1").unwrap_err();
        assert!(matches!(err, AccessError::TypeMismatch { .. }));
        assert_eq!(numbers.borrow().big, u64::MAX - 1);

        // The list is read, extended and written back whole.
        accessor.set(&root, "counts[1]", 1).unwrap();
        assert_eq!(numbers.borrow().counts, [u64::MAX, 1]);
    }

    #[test]
    fn f32_overflow_is_rejected() {
        let registry = registry();
        let accessor = PropertyAccessor::new(&registry);
        let numbers = shared(Numbers::default());
        let root = BeanRef::from_shared(numbers.clone());

        let err = accessor.set(&root, "small", "1e300").unwrap_err();
        assert!(matches!(
            err,
            AccessError::InvocationFailed {
                source: InvocationError::Value(ValueError::FloatOutOfRange { .. }),
                ..
            }
        ));
        assert_eq!(numbers.borrow().small, 0.0);

        accessor.set(&root, "small", "2.5").unwrap();
        assert_eq!(numbers.borrow().small, 2.5);
    }

    #[test]
    fn failed_write_keeps_grown_intermediate() {
        let registry = registry();
        let accessor = PropertyAccessor::new(&registry).with_options(growing());
        let bean = shared(TestBean::default());
        let root = BeanRef::from_shared(bean.clone());

        let err = accessor.set(&root, "spouse.age", "foobar").unwrap_err();
        assert!(matches!(err, AccessError::TypeMismatch { .. }));

        let spouse = bean.borrow().spouse.clone();
        let spouse = spouse.expect("spouse was grown before the conversion failed");
        assert_eq!(spouse.borrow().age, 0);
    }

    #[test]
    fn keyed_map_access() {
        let registry = registry();
        let accessor = PropertyAccessor::new(&registry);
        let bean = shared(TestBean::default());
        let root = BeanRef::from_shared(bean.clone());

        let change = accessor.set(&root, "ratings['x.y']", "3").unwrap();
        assert_eq!(change.property, "ratings['x.y']");
        assert_eq!(bean.borrow().ratings.get("x.y"), Some(&3));
        assert_eq!(accessor.get(&root, "ratings[\"x.y\"]").unwrap(), Value::Int(3));
        assert_eq!(accessor.get(&root, "ratings[missing]").unwrap(), Value::Null);
    }

    #[test]
    fn list_of_beans_grows() {
        let registry = registry();
        let accessor = PropertyAccessor::new(&registry).with_options(growing());
        let holder = shared(Holder::default());
        let root = BeanRef::from_shared(holder.clone());

        accessor.set(&root, "items[1].name", "second").unwrap();
        assert_eq!(holder.borrow().items.len(), 2);
        assert!(holder.borrow().items[0].is_none());
        assert_eq!(accessor.get(&root, "items[1].name").unwrap(), Value::from("second"));
        assert_eq!(accessor.get(&root, "items[0]").unwrap(), Value::Null);

        let limited = AccessOptions::new().auto_grow(true).collection_limit(4);
        let err = accessor
            .set_with(&root, "items[4].name", "x", &limited)
            .unwrap_err();
        assert!(matches!(
            err,
            AccessError::AutoGrowFailed {
                reason: GrowFailure::LimitExceeded { index: 4, limit: 4 },
                ..
            }
        ));
        assert_eq!(holder.borrow().items.len(), 2);
    }

    #[test]
    fn meta_segment() {
        let registry = registry();
        let accessor = PropertyAccessor::new(&registry);
        let root = BeanRef::new(TestBean::default());

        assert_eq!(
            accessor.get(&root, "class.simpleName").unwrap(),
            Value::from("TestBean")
        );
        assert!(accessor.is_readable(&root, "class.name"));
        assert!(!accessor.is_writable(&root, "class.name"));
        assert!(!accessor.is_readable(&root, "class.module"));
        assert!(matches!(
            accessor.get(&root, "class.module").unwrap_err(),
            AccessError::NotReadableProperty { .. }
        ));
        assert!(accessor.set(&root, "class.name", "x").unwrap_err().is_unknown_property());
        assert_eq!(
            accessor.describe(&root, "class.name").unwrap().value_type,
            ValueType::Text
        );

        let root = BeanRef::new(Loader::default());
        assert!(accessor.is_writable(&root, "classLoader"));
        accessor.set(&root, "classLoader", "custom").unwrap();
        assert_eq!(accessor.get(&root, "classLoader").unwrap(), Value::from("custom"));
        assert!(!accessor.is_readable(&root, "class.classLoader"));

        let accessor = PropertyAccessor::new(&registry)
            .with_meta_policy(DenyListPolicy::permissive().with_segment("type"));
        assert!(accessor.is_readable(&root, "type.module"));
        assert!(!accessor.is_readable(&root, "class.name"));
    }

    #[test]
    fn describe_and_flags() {
        let registry = registry();
        let accessor = PropertyAccessor::new(&registry);
        let spouse = shared(TestBean::default());
        let root = BeanRef::new(TestBean {
            spouse: Some(spouse),
            ..TestBean::default()
        });

        let desc = accessor.describe(&root, "spouse.age").unwrap();
        assert_eq!(desc.property, "spouse.age");
        assert_eq!(desc.value_type, ValueType::Int(IntType::I32));
        assert!(desc.readable && desc.writable);

        let desc = accessor.describe(&root, "ratings[a]").unwrap();
        assert_eq!(desc.value_type, ValueType::Int(IntType::I32));

        assert!(matches!(
            accessor.describe(&root, "missing").unwrap_err(),
            AccessError::InvalidProperty { .. }
        ));
        assert!(!accessor.is_readable(&root, "missing"));
        assert!(!accessor.is_writable(&root, "spouse.spouse.age"));

        let root = BeanRef::new(GetterBean::default());
        assert!(accessor.is_readable(&root, "name"));
        assert!(accessor.is_writable(&root, "name"));
    }

    #[test]
    fn malformed_paths() {
        let registry = registry();
        let accessor = PropertyAccessor::new(&registry);
        let root = BeanRef::new(TestBean::default());

        for path in ["['", "[']", "", "a..b", "ratings[x"] {
            assert!(matches!(
                accessor.get(&root, path).unwrap_err(),
                AccessError::MalformedPath(_)
            ));
            assert!(!accessor.is_readable(&root, path));
        }
    }

    #[test]
    fn enum_properties_convert_from_text() {
        let registry = registry();
        let accessor = PropertyAccessor::new(&registry);
        let paint = shared(Paint::default());
        let root = BeanRef::from_shared(paint.clone());

        accessor.set(&root, "color", "GREEN").unwrap();
        assert_eq!(paint.borrow().color, Color::Green);
        assert_eq!(accessor.get(&root, "color").unwrap().to_string(), "GREEN");

        let err = accessor.set(&root, "color", "Green").unwrap_err();
        assert!(matches!(err, AccessError::TypeMismatch { .. }));
        assert!(accessor.set(&root, "mixed", "true").unwrap_err().is_unknown_property());
    }

    #[test]
    fn list_values_convert_element_wise() {
        let registry = registry();
        let accessor = PropertyAccessor::new(&registry);
        let bean = shared(TestBean::default());
        let root = BeanRef::from_shared(bean.clone());

        accessor.set(&root, "nicknames", "a, b").unwrap();
        assert_eq!(bean.borrow().nicknames, ["a", "b"]);

        accessor
            .set(&root, "nicknames", vec![Value::from("c")])
            .unwrap();
        assert_eq!(bean.borrow().nicknames, ["c"]);
    }
}
