use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields, Ident, LitStr};

use super::VariantAttributes;

/// One fieldless variant.
pub(crate) struct EnumVariant {
    pub ident: Ident,
    pub name: LitStr,
}

/// A fieldless enum deriving `PropertyEnum`.
pub(crate) struct PropertyEnum<'a> {
    pub ident: &'a Ident,
    pub variants: Vec<EnumVariant>,
    pub vc_property_path: syn::Path,
}

impl<'a> PropertyEnum<'a> {
    pub fn from_derive_input(ast: &'a DeriveInput) -> syn::Result<Self> {
        let Data::Enum(data) = &ast.data else {
            return Err(syn::Error::new(
                ast.ident.span(),
                "`PropertyEnum` can only be derived for enums",
            ));
        };
        if !ast.generics.params.is_empty() {
            return Err(syn::Error::new(
                ast.generics.span(),
                "`PropertyEnum` does not support generic enums",
            ));
        }

        let mut variants = Vec::with_capacity(data.variants.len());
        for variant in &data.variants {
            if !matches!(variant.fields, Fields::Unit) {
                return Err(syn::Error::new(
                    variant.fields.span(),
                    "`PropertyEnum` variants cannot have fields",
                ));
            }
            let attrs = VariantAttributes::parse_attrs(&variant.attrs)?;
            let name = attrs
                .rename
                .unwrap_or_else(|| LitStr::new(&variant.ident.to_string(), variant.ident.span()));
            variants.push(EnumVariant {
                ident: variant.ident.clone(),
                name,
            });
        }

        Ok(Self {
            ident: &ast.ident,
            variants,
            vc_property_path: crate::path::vc_property(),
        })
    }
}
