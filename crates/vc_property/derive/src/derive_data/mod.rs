//! Provide some tools for parsing token stream.

// -----------------------------------------------------------------------------
// Modules

mod attributes;
mod bean_struct;
mod property_enum;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use attributes::{FieldAttributes, TypeAttributes, VariantAttributes};
pub(crate) use bean_struct::{BeanField, BeanStruct};
pub(crate) use property_enum::PropertyEnum;
