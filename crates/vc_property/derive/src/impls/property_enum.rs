use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::PropertyEnum;
use crate::path;

/// Generate `Typed`, `IntoValue` and `FromValue` for a fieldless enum.
pub(crate) fn impl_property_enum(data: &PropertyEnum) -> TokenStream {
    let vc_property_path = &data.vc_property_path;
    let type_ = path::type_(vc_property_path);
    let typed_ = path::typed_(vc_property_path);
    let value_ = path::value_(vc_property_path);
    let value_type_ = path::value_type_(vc_property_path);
    let value_error_ = path::value_error_(vc_property_path);
    let enum_value_ = path::enum_value_(vc_property_path);
    let enum_info_ = path::enum_info_(vc_property_path);
    let into_value_ = path::into_value_(vc_property_path);
    let from_value_ = path::from_value_(vc_property_path);

    let ident = data.ident;
    let names: Vec<_> = data.variants.iter().map(|v| &v.name).collect();
    let idents: Vec<_> = data.variants.iter().map(|v| &v.ident).collect();

    quote! {
        impl #typed_ for #ident {
            fn value_type() -> #value_type_ {
                #value_type_::Enum(#enum_info_::of::<Self>(&[#(#names),*]))
            }
        }

        impl #into_value_ for #ident {
            fn into_value(self) -> #value_ {
                let variant = match self {
                    #(Self::#idents => #names,)*
                };
                #value_::Enum(#enum_value_ {
                    ty: #type_::of::<Self>(),
                    variant,
                })
            }
        }

        impl #from_value_ for #ident {
            fn from_value(value: #value_) -> ::core::result::Result<Self, #value_error_> {
                match value {
                    #value_::Enum(value) if value.ty == #type_::of::<Self>() => {
                        match value.variant {
                            #(#names => ::core::result::Result::Ok(Self::#idents),)*
                            other => ::core::result::Result::Err(#value_error_::UnknownVariant {
                                variant: ::core::convert::Into::into(other),
                                ty: #type_::of::<Self>(),
                            }),
                        }
                    }
                    other => ::core::result::Result::Err(#value_error_::Mismatch {
                        expected: <Self as #typed_>::value_type(),
                        found: other.kind(),
                    }),
                }
            }
        }
    }
}
