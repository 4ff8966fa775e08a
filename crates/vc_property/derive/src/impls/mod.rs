//! Generate trait implementations.

mod auto_register;
mod bean;
mod property_enum;

pub(crate) use auto_register::get_auto_register_impl;
pub(crate) use bean::impl_bean;
pub(crate) use property_enum::impl_property_enum;
