use alloc::vec::Vec;
use core::any::TypeId;

use vc_utils::TypeIdMap;
use vc_utils::hash::{FixedHashState, HashMap};

use crate::bean::{BeanRef, Type};
use crate::error::ConstructionError;
use crate::meta::TypeHandle;
use crate::registry::{CapabilityRegistry, GetTypeMeta, PropertyInfo, TypeMeta};

// -----------------------------------------------------------------------------
// TypeRegistry

/// A registry of bean types.
///
/// This struct is the central store of property tables. [Registering] a type
/// will generate a new [`TypeMeta`] entry in this store using the type's
/// [`GetTypeMeta`] implementation (which is automatically implemented when
/// using [`#[derive(Bean)]`](crate::derive::Bean)).
///
/// # Example
///
/// ```
/// use core::any::TypeId;
/// use vc_property::derive::Bean;
/// use vc_property::registry::TypeRegistry;
///
/// #[derive(Bean, Default)]
/// #[bean(default)]
/// struct Person {
///     name: String,
///     spouse: Option<vc_property::Shared<Person>>,
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Person>();
///
/// let meta = registry.get(TypeId::of::<Person>()).unwrap();
/// assert!(meta.property("spouse").is_some());
/// assert!(meta.is_constructible());
/// ```
///
/// [Registering]: TypeRegistry::register
pub struct TypeRegistry {
    type_meta_table: TypeIdMap<TypeMeta>,
    type_path_to_id: HashMap<&'static str, TypeId>,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create a empty [`TypeRegistry`].
    #[inline]
    pub const fn empty() -> Self {
        Self {
            type_meta_table: TypeIdMap::new(),
            type_path_to_id: HashMap::with_hasher(FixedHashState),
        }
    }

    /// Create a type registry with the metadata bean [`TypeHandle`]
    /// registered, so that the metadata segment (`class` by default) resolves.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register::<TypeHandle>();
        registry
    }

    /// Try add or do nothing.
    ///
    /// - If the type already exists, the function will do nothing and return `false`.
    /// - If the type does not exist, the function will insert value and return `true`.
    ///
    /// This method will _not_ register type dependencies.
    /// Use [`register`](Self::register) to register a type with its dependencies.
    pub fn try_insert_type_meta(&mut self, type_meta: TypeMeta) -> bool {
        let ty = type_meta.ty();
        let inserted = self.type_meta_table.try_insert(ty.id(), || type_meta);
        if inserted {
            self.type_path_to_id.insert(ty.path(), ty.id());
        }
        inserted
    }

    /// Insert or **Overwrite** the meta of a type.
    ///
    /// This method will _not_ register type dependencies.
    pub fn insert_type_meta(&mut self, type_meta: TypeMeta) {
        let ty = type_meta.ty();
        self.type_path_to_id.insert(ty.path(), ty.id());
        self.type_meta_table.insert(ty.id(), type_meta);
    }

    /// Attempts to register the type `T` if it has not yet been registered already.
    ///
    /// This will also recursively register any type dependencies as specified by
    /// [`GetTypeMeta::register_dependencies`]. When deriving `Bean`, these are the
    /// bean types reachable through the properties. Dependencies are not registered
    /// more than once.
    ///
    /// To overwrite an existing meta, use [`insert_type_meta`](Self::insert_type_meta).
    pub fn register<T: GetTypeMeta>(&mut self) {
        let ty = Type::of::<T>();
        if self.type_meta_table.try_insert(ty.id(), T::get_type_meta) {
            self.type_path_to_id.insert(ty.path(), ty.id());
            log::trace!("registered bean type `{ty}`");
            T::register_dependencies(self);
        }
    }

    /// Attempts to register the type of the referenced value.
    #[inline]
    pub fn register_by_val<T: GetTypeMeta>(&mut self, _: &T) {
        self.register::<T>();
    }

    /// Automatically registers all non-generic types annotated with
    /// `#[bean(auto_register)]`.
    ///
    /// This method is equivalent to calling [`register`](Self::register) for each
    /// qualifying type. Repeated calls are cheap and will not insert duplicates.
    ///
    /// ## Return Value
    ///
    /// Returns `true` if automatic registration succeeded on the current platform;
    /// otherwise, `false`.
    ///
    /// ## Feature Dependency
    ///
    /// This method requires the `auto_register` feature. When disabled, it does
    /// nothing and returns `false`.
    ///
    /// ## Platform Support
    ///
    /// Supported platforms are those of the `inventory` crate. On unsupported
    /// platforms, this method becomes a no-op.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use core::any::TypeId;
    /// # use vc_property::{derive::Bean, registry::TypeRegistry};
    /// #[derive(Bean, Default)]
    /// #[bean(default, auto_register)]
    /// struct Foo {
    ///     value: i32,
    /// }
    ///
    /// let mut registry = TypeRegistry::empty();
    /// assert!(registry.auto_register());
    /// assert!(registry.contains(TypeId::of::<Foo>()));
    /// ```
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            use crate::__macro_exports::auto_register;
            // Reduce the cost of duplicate registrations.
            if self.contains(TypeId::of::<auto_register::__AvailFlag>()) {
                return true;
            }
            auto_register::__register_types(self);
            self.contains(TypeId::of::<auto_register::__AvailFlag>())
        }
        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }

    /// Removes the meta of a type, returning it.
    pub fn remove(&mut self, type_id: TypeId) -> Option<TypeMeta> {
        let meta = self.type_meta_table.remove(&type_id)?;
        self.type_path_to_id.remove(meta.ty().path());
        Some(meta)
    }

    /// Removes every registered type, including [`TypeHandle`].
    pub fn clear(&mut self) {
        self.type_meta_table.clear();
        self.type_path_to_id.clear();
    }

    /// Returns `true` if the type is registered.
    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.type_meta_table.contains(&type_id)
    }

    /// Returns the meta of a type.
    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&TypeMeta> {
        self.type_meta_table.get(&type_id)
    }

    /// Returns the mutable meta of a type, e.g. to add aliases later.
    #[inline]
    pub fn get_mut(&mut self, type_id: TypeId) -> Option<&mut TypeMeta> {
        self.type_meta_table.get_mut(&type_id)
    }

    /// Returns the meta of a type by its full path.
    pub fn get_with_type_path(&self, type_path: &str) -> Option<&TypeMeta> {
        self.type_path_to_id
            .get(type_path)
            .and_then(|id| self.get(*id))
    }

    /// Returns the number of registered types.
    #[inline]
    pub fn len(&self) -> usize {
        self.type_meta_table.len()
    }

    /// Iterates over the registered metas in arbitrary order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TypeMeta> {
        self.type_meta_table.values()
    }
}

impl CapabilityRegistry for TypeRegistry {
    #[inline]
    fn describe(&self, type_id: TypeId, name: &str) -> Option<&PropertyInfo> {
        self.get(type_id)?.resolve(name)
    }

    fn property_names(&self, type_id: TypeId) -> Vec<&str> {
        match self.get(type_id) {
            Some(meta) => meta.properties().map(PropertyInfo::name).collect(),
            None => Vec::new(),
        }
    }

    fn alias_names(&self, type_id: TypeId) -> Vec<&str> {
        match self.get(type_id) {
            Some(meta) => meta.aliases().map(|(alias, _)| alias).collect(),
            None => Vec::new(),
        }
    }

    fn construct(&self, ty: &Type) -> Result<BeanRef, ConstructionError> {
        let meta = self
            .get(ty.id())
            .ok_or(ConstructionError::Unregistered(*ty))?;
        meta.construct()
            .ok_or(ConstructionError::NoConstructor(*ty))
    }
}
