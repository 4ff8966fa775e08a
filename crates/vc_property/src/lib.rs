#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// Extern Self

// Derived code refers to `vc_property`, which must also resolve inside this
// crate's own tests and doc tests.
extern crate self as vc_property;

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

pub mod access;
pub mod batch;
pub mod bean;
pub mod convert;
pub mod error;
pub mod meta;
pub mod path;
pub mod registry;
pub mod suggest;
pub mod value;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use access::{AccessOptions, PropertyAccessor};
pub use bean::{Bean, BeanRef, Shared, Type};
pub use value::{FromValue, IntoValue, Typed, Value, ValueType};
pub use vc_property_derive as derive;
