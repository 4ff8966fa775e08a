//! Provide the capability registry.
//!
//! The accessor never inspects Rust types itself. It asks a
//! [`CapabilityRegistry`] for the [`PropertyInfo`] of a `(type, name)` pair
//! and for a way to construct a bean of a given type.
//!
//! [`TypeRegistry`] is the default implementation: a table of [`TypeMeta`]
//! populated by [`#[derive(Bean)]`](crate::derive::Bean), by hand, or
//! automatically through [`TypeRegistry::auto_register`].

// -----------------------------------------------------------------------------
// Modules

mod property_info;
mod type_meta;
mod type_registry;

// -----------------------------------------------------------------------------
// Exports

pub use property_info::{Getter, PropertyInfo, Setter};
pub use type_meta::{GetTypeMeta, TypeMeta};
pub use type_registry::TypeRegistry;

use alloc::vec::Vec;
use core::any::TypeId;

use crate::bean::{BeanRef, Type};
use crate::error::ConstructionError;

// -----------------------------------------------------------------------------
// CapabilityRegistry

/// The source of property capabilities consumed by the accessor.
pub trait CapabilityRegistry {
    /// Returns the property `name` of a type, looking through aliases.
    fn describe(&self, type_id: TypeId, name: &str) -> Option<&PropertyInfo>;

    /// Returns the canonical property names of a type in declaration order.
    fn property_names(&self, type_id: TypeId) -> Vec<&str>;

    /// Returns the alias names of a type.
    fn alias_names(&self, _type_id: TypeId) -> Vec<&str> {
        Vec::new()
    }

    /// Creates a new bean of type `ty` with its zero-argument constructor.
    fn construct(&self, ty: &Type) -> Result<BeanRef, ConstructionError>;
}

impl<R: CapabilityRegistry + ?Sized> CapabilityRegistry for &R {
    #[inline]
    fn describe(&self, type_id: TypeId, name: &str) -> Option<&PropertyInfo> {
        (**self).describe(type_id, name)
    }

    #[inline]
    fn property_names(&self, type_id: TypeId) -> Vec<&str> {
        (**self).property_names(type_id)
    }

    #[inline]
    fn alias_names(&self, type_id: TypeId) -> Vec<&str> {
        (**self).alias_names(type_id)
    }

    #[inline]
    fn construct(&self, ty: &Type) -> Result<BeanRef, ConstructionError> {
        (**self).construct(ty)
    }
}
