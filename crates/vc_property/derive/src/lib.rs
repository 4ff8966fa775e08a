//! See following macros:
//!
//! - [`Bean`]
//! - [`PropertyEnum`]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static BEAN_ATTRIBUTE_NAME: &str = "bean";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;

// -----------------------------------------------------------------------------
// Macros

/// # Bean Derivation
///
/// `#[derive(Bean)]` implements `Bean` and `GetTypeMeta` for a struct with
/// named fields. Every field becomes a readable and writable property named
/// after the field. Field types must implement `Typed`, `IntoValue`,
/// `FromValue` and `Clone`.
///
/// ## Type Attributes
///
/// - `default`: registers `Default::default` as the zero-argument
///   constructor, so auto-grow can create the type.
/// - `auto_register`: submits the type to `TypeRegistry::auto_register`.
///   No effect on generic types, or when the `auto_register` feature is off.
///
/// ```rust, ignore
/// #[derive(Bean, Default)]
/// #[bean(default, auto_register)]
/// struct Person { /* ... */ }
/// ```
///
/// ## Field Attributes
///
/// - `rename = "name"`: the property name.
/// - `alias = "other"`: an additional name, may be repeated.
/// - `skip`: not a property.
/// - `read_only` / `write_only`: drop the setter or getter.
/// - `getter = "method"`: read through `fn(&self) -> Result<T, InvocationError>`.
/// - `setter = "method"`: write through `fn(&mut self, T) -> Result<(), InvocationError>`.
///
/// ```rust, ignore
/// #[derive(Bean)]
/// struct Account {
///     #[bean(rename = "ownerName", alias = "owner")]
///     owner_name: String,
///     #[bean(setter = "set_balance")]
///     balance: i64,
///     #[bean(read_only)]
///     id: u64,
///     #[bean(skip)]
///     cache: Vec<u8>,
/// }
/// ```
#[proc_macro_derive(Bean, attributes(bean))]
pub fn derive_bean(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    match derive_data::BeanStruct::from_derive_input(&ast) {
        Ok(data) => impls::impl_bean(&data).into(),
        Err(err) => err.into_compile_error().into(),
    }
}

/// # Property Enum Derivation
///
/// `#[derive(PropertyEnum)]` implements `Typed`, `IntoValue` and `FromValue`
/// for a fieldless enum, so it can be used as a property type. Text converts
/// to a variant by exact name; `#[bean(rename = "...")]` changes the name of
/// a variant.
///
/// ```rust, ignore
/// #[derive(PropertyEnum, Clone, Copy)]
/// enum Color {
///     Red,
///     #[bean(rename = "GREEN")]
///     Green,
/// }
/// ```
#[proc_macro_derive(PropertyEnum, attributes(bean))]
pub fn derive_property_enum(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    match derive_data::PropertyEnum::from_derive_input(&ast) {
        Ok(data) => impls::impl_property_enum(&data).into(),
        Err(err) => err.into_compile_error().into(),
    }
}
