//! Parse `#[bean(...)]` attributes.

use proc_macro2::Span;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Attribute, Expr, Ident, Lit, LitStr, Meta, MetaNameValue, Token};

use crate::BEAN_ATTRIBUTE_NAME;

/// Iterates the items of every `#[bean(...)]` attribute.
fn for_each_meta(
    attrs: &[Attribute],
    mut f: impl FnMut(Meta) -> syn::Result<()>,
) -> syn::Result<()> {
    for attr in attrs {
        if !attr.path().is_ident(BEAN_ATTRIBUTE_NAME) {
            continue;
        }
        let metas = attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)?;
        for meta in metas {
            f(meta)?;
        }
    }
    Ok(())
}

fn lit_str(pair: &MetaNameValue) -> syn::Result<LitStr> {
    match &pair.value {
        Expr::Lit(syn::ExprLit {
            lit: Lit::Str(lit_str),
            ..
        }) => Ok(lit_str.clone()),
        other => Err(syn::Error::new(other.span(), "Expected a string literal")),
    }
}

fn ident(pair: &MetaNameValue) -> syn::Result<Ident> {
    let lit = lit_str(pair)?;
    lit.parse()
        .map_err(|_| syn::Error::new(lit.span(), "Expected a method name"))
}

fn set_flag(flag: &mut Option<Span>, span: Span, name: &str) -> syn::Result<()> {
    if flag.is_some() {
        return Err(syn::Error::new(span, format!("Duplicate `{name}`")));
    }
    *flag = Some(span);
    Ok(())
}

fn key_of(meta: &Meta) -> String {
    meta.path()
        .get_ident()
        .map(ToString::to_string)
        .unwrap_or_default()
}

// -----------------------------------------------------------------------------
// Type attributes

/// Attributes on the deriving type.
#[derive(Default)]
pub(crate) struct TypeAttributes {
    /// `#[bean(default)]`: register `Default::default` as constructor.
    pub default: Option<Span>,
    /// `#[bean(auto_register)]`
    pub auto_register: Option<Span>,
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for_each_meta(attrs, |meta| match (&meta, key_of(&meta).as_str()) {
            (Meta::Path(path), "default") => set_flag(&mut this.default, path.span(), "default"),
            (Meta::Path(path), "auto_register") => {
                set_flag(&mut this.auto_register, path.span(), "auto_register")
            }
            _ => Err(syn::Error::new(
                meta.span(),
                "Unknown type attribute, expected `default` or `auto_register`",
            )),
        })?;
        Ok(this)
    }
}

// -----------------------------------------------------------------------------
// Field attributes

/// Attributes on one struct field.
#[derive(Default)]
pub(crate) struct FieldAttributes {
    pub rename: Option<LitStr>,
    pub aliases: Vec<LitStr>,
    pub skip: Option<Span>,
    pub read_only: Option<Span>,
    pub write_only: Option<Span>,
    /// `&self` method returning `Result<FieldTy, InvocationError>`.
    pub getter: Option<Ident>,
    /// `&mut self` method taking `FieldTy`, returning `Result<(), InvocationError>`.
    pub setter: Option<Ident>,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for_each_meta(attrs, |meta| {
            match (&meta, key_of(&meta).as_str()) {
                (Meta::Path(path), "skip") => set_flag(&mut this.skip, path.span(), "skip")?,
                (Meta::Path(path), "read_only") => {
                    set_flag(&mut this.read_only, path.span(), "read_only")?
                }
                (Meta::Path(path), "write_only") => {
                    set_flag(&mut this.write_only, path.span(), "write_only")?
                }
                (Meta::NameValue(pair), "rename") => {
                    if this.rename.is_some() {
                        return Err(syn::Error::new(pair.span(), "Duplicate `rename`"));
                    }
                    this.rename = Some(lit_str(pair)?);
                }
                (Meta::NameValue(pair), "alias") => this.aliases.push(lit_str(pair)?),
                (Meta::NameValue(pair), "getter") => this.getter = Some(ident(pair)?),
                (Meta::NameValue(pair), "setter") => this.setter = Some(ident(pair)?),
                _ => {
                    return Err(syn::Error::new(
                        meta.span(),
                        "Unknown field attribute, expected one of `rename`, `alias`, `skip`, \
                         `read_only`, `write_only`, `getter` or `setter`",
                    ));
                }
            }
            Ok(())
        })?;

        if let (Some(span), Some(_)) = (this.read_only, this.write_only) {
            return Err(syn::Error::new(
                span,
                "`read_only` and `write_only` cannot be combined",
            ));
        }
        if let (Some(span), Some(_)) = (this.read_only, &this.setter) {
            return Err(syn::Error::new(span, "`read_only` field with a `setter`"));
        }
        if let (Some(span), Some(_)) = (this.write_only, &this.getter) {
            return Err(syn::Error::new(span, "`write_only` field with a `getter`"));
        }
        Ok(this)
    }
}

// -----------------------------------------------------------------------------
// Variant attributes

/// Attributes on one enum variant.
#[derive(Default)]
pub(crate) struct VariantAttributes {
    pub rename: Option<LitStr>,
}

impl VariantAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for_each_meta(attrs, |meta| match (&meta, key_of(&meta).as_str()) {
            (Meta::NameValue(pair), "rename") => {
                this.rename = Some(lit_str(pair)?);
                Ok(())
            }
            _ => Err(syn::Error::new(
                meta.span(),
                "Unknown variant attribute, expected `rename`",
            )),
        })?;
        Ok(this)
    }
}
