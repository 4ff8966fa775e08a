//! Paths into `vc_property` used by generated code.

use proc_macro2::TokenStream;
use quote::quote;

/// Get the correct access path to the `vc_property` crate.
///
/// 1. For crates that depend on `vc_property`, `::vc_property` is returned.
/// 2. For crates that depend on `vc_bean`, `::vc_bean::property` is returned.
/// 3. For other situations, `::vc_property` is returned, but this may be incorrect.
///
/// Reading the manifest is relatively expensive, so the path is obtained
/// once per derive and passed around.
pub(crate) fn vc_property() -> syn::Path {
    vc_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("vc_property"))
}

#[cfg(feature = "auto_register")]
#[inline(always)]
pub(crate) fn auto_register_(vc_property_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_property_path::__macro_exports::auto_register
    }
}

#[inline(always)]
pub(crate) fn bean_(vc_property_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_property_path::bean::Bean
    }
}

#[inline(always)]
pub(crate) fn type_(vc_property_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_property_path::bean::Type
    }
}

#[inline(always)]
pub(crate) fn get_type_meta_(vc_property_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_property_path::registry::GetTypeMeta
    }
}

#[inline(always)]
pub(crate) fn type_meta_(vc_property_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_property_path::registry::TypeMeta
    }
}

#[inline(always)]
pub(crate) fn type_registry_(vc_property_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_property_path::registry::TypeRegistry
    }
}

#[inline(always)]
pub(crate) fn property_info_(vc_property_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_property_path::registry::PropertyInfo
    }
}

#[inline(always)]
pub(crate) fn value_(vc_property_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_property_path::value::Value
    }
}

#[inline(always)]
pub(crate) fn enum_value_(vc_property_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_property_path::value::EnumValue
    }
}

#[inline(always)]
pub(crate) fn enum_info_(vc_property_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_property_path::value::EnumInfo
    }
}

#[inline(always)]
pub(crate) fn value_type_(vc_property_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_property_path::value::ValueType
    }
}

#[inline(always)]
pub(crate) fn value_error_(vc_property_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_property_path::value::ValueError
    }
}

#[inline(always)]
pub(crate) fn typed_(vc_property_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_property_path::value::Typed
    }
}

#[inline(always)]
pub(crate) fn into_value_(vc_property_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_property_path::value::IntoValue
    }
}

#[inline(always)]
pub(crate) fn from_value_(vc_property_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_property_path::value::FromValue
    }
}
