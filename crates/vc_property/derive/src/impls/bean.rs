use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::{BeanField, BeanStruct};
use crate::path;

/// Generate `Bean` and `GetTypeMeta` implementations.
pub(crate) fn impl_bean(data: &BeanStruct) -> TokenStream {
    let vc_property_path = &data.vc_property_path;
    let bean_ = path::bean_(vc_property_path);
    let get_type_meta_ = path::get_type_meta_(vc_property_path);
    let type_meta_ = path::type_meta_(vc_property_path);
    let type_registry_ = path::type_registry_(vc_property_path);
    let typed_ = path::typed_(vc_property_path);

    let ident = data.ident;
    let mut generics = data.generics.clone();
    generics
        .make_where_clause()
        .predicates
        .push(syn::parse_quote!(Self: 'static));
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let capacity = data.fields.len();
    let properties = data.fields.iter().map(|field| property_tokens(data, field));
    let aliases = data.fields.iter().flat_map(|field| {
        let name = field.name();
        field.attrs.aliases.iter().map(move |alias| {
            quote! { .with_alias(#alias, #name) }
        })
    });
    let constructor = data
        .attrs
        .default
        .map(|_| quote! { .with_default::<Self>() });
    let dependencies = (!data.fields.is_empty()).then(|| {
        let types = data.fields.iter().map(|field| &field.ty);
        quote! {
            fn register_dependencies(registry: &mut #type_registry_) {
                #(<#types as #typed_>::register_dependencies(registry);)*
            }
        }
    });

    let auto_register = crate::impls::get_auto_register_impl(data);

    quote! {
        impl #impl_generics #bean_ for #ident #ty_generics #where_clause {}

        impl #impl_generics #get_type_meta_ for #ident #ty_generics #where_clause {
            fn get_type_meta() -> #type_meta_ {
                #type_meta_::with_capacity::<Self>(#capacity)
                    #(#properties)*
                    #(#aliases)*
                    #constructor
            }

            #dependencies
        }

        #auto_register
    }
}

fn property_tokens(data: &BeanStruct, field: &BeanField) -> TokenStream {
    let vc_property_path = &data.vc_property_path;
    let property_info_ = path::property_info_(vc_property_path);
    let value_ = path::value_(vc_property_path);
    let into_value_ = path::into_value_(vc_property_path);
    let from_value_ = path::from_value_(vc_property_path);

    let name = field.name();
    let member = &field.ident;
    let ty = &field.ty;

    let getter = field.is_readable().then(|| match &field.attrs.getter {
        Some(method) => quote! {
            .with_getter(|this: &Self| {
                ::core::result::Result::map(this.#method(), #into_value_::into_value)
            })
        },
        None => quote! {
            .with_getter(|this: &Self| {
                ::core::result::Result::Ok(#into_value_::into_value(
                    <#ty as ::core::clone::Clone>::clone(&this.#member),
                ))
            })
        },
    });

    let setter = field.is_writable().then(|| match &field.attrs.setter {
        Some(method) => quote! {
            .with_setter(|this: &mut Self, value: #value_| {
                let value: #ty = #from_value_::from_value(value)?;
                this.#method(value)
            })
        },
        None => quote! {
            .with_setter(|this: &mut Self, value: #value_| {
                this.#member = #from_value_::from_value(value)?;
                ::core::result::Result::Ok(())
            })
        },
    });

    quote! {
        .with_property(
            #property_info_::of::<#ty>(#name)
                #getter
                #setter
        )
    }
}
