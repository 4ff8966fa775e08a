use alloc::vec::Vec;

use vc_utils::hash::HashMap;

use crate::bean::{Bean, BeanRef, Type};
use crate::registry::{PropertyInfo, TypeRegistry};

// -----------------------------------------------------------------------------
// TypeMeta

/// Runtime storage for the properties of one bean type, registered into the
/// [`TypeRegistry`].
///
/// This includes an ordered property table, an alias table and an optional
/// zero-argument constructor used to auto-grow nested paths.
///
/// An instance of `TypeMeta` can be built by hand, but is more often
/// generated by [`#[derive(Bean)]`](crate::derive::Bean), which implements
/// the [`GetTypeMeta`] trait.
///
/// # Example
///
/// ```
/// use vc_property::{Bean, Value};
/// use vc_property::registry::{PropertyInfo, TypeMeta};
///
/// #[derive(Default)]
/// struct Person { name: String }
/// impl Bean for Person {}
///
/// let meta = TypeMeta::of::<Person>()
///     .with_property(
///         PropertyInfo::of::<String>("name")
///             .with_getter(|p: &Person| Ok(Value::Text(p.name.clone()))),
///     )
///     .with_alias("title", "name")
///     .with_default::<Person>();
///
/// assert_eq!(meta.resolve("title").unwrap().name(), "name");
/// assert!(meta.construct().is_some());
/// ```
pub struct TypeMeta {
    ty: Type,
    properties: Vec<PropertyInfo>,
    index: HashMap<&'static str, usize>,
    aliases: HashMap<&'static str, &'static str>,
    constructor: Option<fn() -> BeanRef>,
}

impl TypeMeta {
    /// Creates an empty [`TypeMeta`] for `ty`.
    #[inline]
    pub fn new(ty: Type) -> Self {
        Self {
            ty,
            properties: Vec::new(),
            index: HashMap::default(),
            aliases: HashMap::default(),
            constructor: None,
        }
    }

    /// Creates an empty [`TypeMeta`] for bean type `T`.
    #[inline]
    pub fn of<T: Bean>() -> Self {
        Self::new(Type::of::<T>())
    }

    /// Creates an empty [`TypeMeta`] with room for `capacity` properties.
    #[inline]
    pub fn with_capacity<T: Bean>(capacity: usize) -> Self {
        let mut meta = Self::of::<T>();
        meta.properties.reserve(capacity);
        meta
    }

    #[inline(always)]
    pub const fn ty(&self) -> Type {
        self.ty
    }

    /// Inserts a property, replacing one with the same name in place.
    pub fn insert_property(&mut self, info: PropertyInfo) {
        match self.index.get(info.name()) {
            Some(&slot) => self.properties[slot] = info,
            None => {
                self.index.insert(info.name(), self.properties.len());
                self.properties.push(info);
            }
        }
    }

    /// See [`TypeMeta::insert_property`].
    #[inline]
    pub fn with_property(mut self, info: PropertyInfo) -> Self {
        self.insert_property(info);
        self
    }

    /// Makes `alias` resolve to the property `target`.
    ///
    /// Aliases never shadow a real property of the same name.
    #[inline]
    pub fn insert_alias(&mut self, alias: &'static str, target: &'static str) {
        self.aliases.insert(alias, target);
    }

    /// See [`TypeMeta::insert_alias`].
    #[inline]
    pub fn with_alias(mut self, alias: &'static str, target: &'static str) -> Self {
        self.insert_alias(alias, target);
        self
    }

    /// Sets the zero-argument constructor.
    #[inline]
    pub fn with_constructor(mut self, constructor: fn() -> BeanRef) -> Self {
        self.constructor = Some(constructor);
        self
    }

    /// Uses `T::default()` as the zero-argument constructor.
    #[inline]
    pub fn with_default<T: Bean + Default>(self) -> Self {
        self.with_constructor(|| BeanRef::new(T::default()))
    }

    /// Returns the property with the canonical `name`.
    #[inline]
    pub fn property(&self, name: &str) -> Option<&PropertyInfo> {
        self.index.get(name).map(|&slot| &self.properties[slot])
    }

    /// Returns the property for `name`, looking through aliases.
    pub fn resolve(&self, name: &str) -> Option<&PropertyInfo> {
        self.property(name)
            .or_else(|| self.aliases.get(name).and_then(|target| self.property(target)))
    }

    /// Returns the mutable property with the canonical `name`.
    #[inline]
    pub fn property_mut(&mut self, name: &str) -> Option<&mut PropertyInfo> {
        self.index
            .get(name)
            .map(|&slot| &mut self.properties[slot])
    }

    /// Iterates over the properties in declaration order.
    #[inline]
    pub fn properties(&self) -> impl ExactSizeIterator<Item = &PropertyInfo> {
        self.properties.iter()
    }

    /// Iterates over the `(alias, target)` pairs in arbitrary order.
    #[inline]
    pub fn aliases(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.aliases.iter().map(|(alias, target)| (*alias, *target))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    #[inline]
    pub const fn is_constructible(&self) -> bool {
        self.constructor.is_some()
    }

    /// Creates a new bean with the zero-argument constructor.
    #[inline]
    pub fn construct(&self) -> Option<BeanRef> {
        self.constructor.map(|constructor| constructor())
    }
}

impl core::fmt::Debug for TypeMeta {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TypeMeta")
            .field("ty", &self.ty)
            .field("properties", &self.properties)
            .field("constructible", &self.is_constructible())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// GetTypeMeta

/// A bean type that can produce its own [`TypeMeta`].
///
/// Generated by [`#[derive(Bean)]`](crate::derive::Bean).
pub trait GetTypeMeta: Bean {
    /// Returns the **default** [`TypeMeta`] for this type.
    fn get_type_meta() -> TypeMeta;

    /// Registers other types needed by this type.
    /// **Allow** not to register oneself.
    fn register_dependencies(_registry: &mut TypeRegistry) {}
}
