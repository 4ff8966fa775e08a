//! Provide path-based property access on bean graphs.
//!
//! [`PropertyAccessor`] resolves a path segment by segment through a
//! [`CapabilityRegistry`](crate::registry::CapabilityRegistry):
//!
//! - named segments look up a property of the current bean (aliases first
//!   resolved by the registry), or the metadata segment;
//! - keyed segments index into lists and maps;
//! - `Optional` values are unwrapped transparently.
//!
//! Writes convert the raw value to the declared type with a
//! [`TypeConverter`](crate::convert::TypeConverter) and may create missing
//! intermediate values when [`AccessOptions::auto_grow_nested_paths`] is on.
//! Lists and maps are values: writing into an element writes the whole
//! collection back through the property that holds it.
//!
//! # Examples
//!
//! ```
//! use vc_property::derive::Bean;
//! use vc_property::registry::TypeRegistry;
//! use vc_property::{AccessOptions, BeanRef, PropertyAccessor, Shared, Value};
//!
//! #[derive(Bean, Default)]
//! #[bean(default)]
//! struct Person {
//!     name: String,
//!     age: u8,
//!     spouse: Option<Shared<Person>>,
//! }
//!
//! let mut registry = TypeRegistry::new();
//! registry.register::<Person>();
//!
//! let accessor = PropertyAccessor::new(&registry)
//!     .with_options(AccessOptions::new().auto_grow(true));
//! let root = BeanRef::new(Person::default());
//!
//! accessor.set(&root, "spouse.age", "31").unwrap();
//! assert_eq!(accessor.get(&root, "spouse.age").unwrap(), Value::Int(31));
//! assert_eq!(accessor.get(&root, "class.simpleName").unwrap(), Value::from("Person"));
//!
//! let err = accessor.set(&root, "spouse.ag", "1").unwrap_err();
//! assert_eq!(err.possible_matches(), Some(&["age".to_string()][..]));
//! ```

// -----------------------------------------------------------------------------
// Modules

mod accessor;
mod write;

// -----------------------------------------------------------------------------
// Exports

pub use accessor::PropertyAccessor;

use alloc::string::String;

use crate::bean::Type;
use crate::value::{Value, ValueType};

// -----------------------------------------------------------------------------
// AccessOptions

/// Per-call behaviour of [`PropertyAccessor::set_with`].
///
/// # Examples
///
/// ```
/// use vc_property::AccessOptions;
///
/// let options = AccessOptions::new().auto_grow(true).collection_limit(16);
/// assert!(options.auto_grow_nested_paths);
/// assert_eq!(options.auto_grow_collection_limit, 16);
/// assert!(!options.extract_old_value);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(default)
)]
pub struct AccessOptions {
    /// Create absent intermediate values while writing.
    pub auto_grow_nested_paths: bool,
    /// List indices at or above this limit are not grown.
    pub auto_grow_collection_limit: usize,
    /// Read the current value before writing and report it in the
    /// [`PropertyChange`]. Read failures are logged and ignored.
    pub extract_old_value: bool,
}

impl Default for AccessOptions {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl AccessOptions {
    /// Auto-grow off, a collection limit of 256, no old-value extraction.
    #[inline]
    pub const fn new() -> Self {
        Self {
            auto_grow_nested_paths: false,
            auto_grow_collection_limit: 256,
            extract_old_value: false,
        }
    }

    #[inline]
    pub const fn auto_grow(mut self, enabled: bool) -> Self {
        self.auto_grow_nested_paths = enabled;
        self
    }

    #[inline]
    pub const fn collection_limit(mut self, limit: usize) -> Self {
        self.auto_grow_collection_limit = limit;
        self
    }

    #[inline]
    pub const fn extract_old_value(mut self, enabled: bool) -> Self {
        self.extract_old_value = enabled;
        self
    }
}

// -----------------------------------------------------------------------------
// Results

/// A successful write.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyChange {
    /// The canonical path that was written.
    pub property: String,
    /// The previous value, when extraction was requested and succeeded.
    pub old_value: Option<Value>,
    /// The value handed to the setter, after conversion.
    pub new_value: Value,
}

/// What [`PropertyAccessor::describe`] knows about the final segment.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
    /// The canonical path.
    pub property: String,
    /// The bean type holding the property.
    pub owner: Type,
    /// The declared type; the element type for keyed segments.
    pub value_type: ValueType,
    pub readable: bool,
    pub writable: bool,
}
