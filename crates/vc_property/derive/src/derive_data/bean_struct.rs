use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields, Generics, Ident, LitStr, Type};

use super::{FieldAttributes, TypeAttributes};

/// One field exposed as a property.
pub(crate) struct BeanField {
    pub ident: Ident,
    pub ty: Type,
    pub attrs: FieldAttributes,
}

impl BeanField {
    /// The property name: `rename`, or the field name without `r#`.
    pub fn name(&self) -> LitStr {
        match &self.attrs.rename {
            Some(rename) => rename.clone(),
            None => {
                let name = self.ident.to_string();
                let name = name.strip_prefix("r#").unwrap_or(&name);
                LitStr::new(name, self.ident.span())
            }
        }
    }

    #[inline]
    pub fn is_readable(&self) -> bool {
        self.attrs.write_only.is_none()
    }

    #[inline]
    pub fn is_writable(&self) -> bool {
        self.attrs.read_only.is_none()
    }
}

/// A struct with named fields deriving `Bean`.
pub(crate) struct BeanStruct<'a> {
    pub ident: &'a Ident,
    pub generics: &'a Generics,
    pub attrs: TypeAttributes,
    pub fields: Vec<BeanField>,
    pub vc_property_path: syn::Path,
}

impl<'a> BeanStruct<'a> {
    pub fn from_derive_input(ast: &'a DeriveInput) -> syn::Result<Self> {
        let attrs = TypeAttributes::parse_attrs(&ast.attrs)?;

        let named = match &ast.data {
            Data::Struct(data) => match &data.fields {
                Fields::Named(named) => Some(&named.named),
                Fields::Unit => None,
                Fields::Unnamed(fields) => {
                    return Err(syn::Error::new(
                        fields.span(),
                        "`Bean` properties need named fields",
                    ));
                }
            },
            _ => {
                return Err(syn::Error::new(
                    ast.ident.span(),
                    "`Bean` can only be derived for structs",
                ));
            }
        };

        let mut fields = Vec::new();
        for field in named.into_iter().flatten() {
            let attrs = FieldAttributes::parse_attrs(&field.attrs)?;
            if attrs.skip.is_some() {
                continue;
            }
            let Some(ident) = field.ident.clone() else {
                continue;
            };
            fields.push(BeanField {
                ident,
                ty: field.ty.clone(),
                attrs,
            });
        }

        let mut names: Vec<String> = Vec::new();
        for field in &fields {
            let name = field.name();
            let aliases = field.attrs.aliases.iter();
            for lit in core::iter::once(&name).chain(aliases) {
                let value = lit.value();
                if names.contains(&value) {
                    return Err(syn::Error::new(
                        lit.span(),
                        format!("Duplicate property name `{value}`"),
                    ));
                }
                names.push(value);
            }
        }

        Ok(Self {
            ident: &ast.ident,
            generics: &ast.generics,
            attrs,
            fields,
            vc_property_path: crate::path::vc_property(),
        })
    }

    #[inline]
    pub fn is_generic(&self) -> bool {
        !self.generics.params.is_empty()
    }
}
