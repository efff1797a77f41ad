//! Parsing utilities for the `Config` derive.
//!
//! This module parses `#[config(...)]` field attributes and the shape of the
//! deriving struct.

use std::collections::HashSet;

use syn::{
    ext::IdentExt, punctuated::Punctuated, spanned::Spanned, Attribute, Data, DeriveInput, Expr,
    ExprLit, ExprUnary, Field, Fields, Generics, Ident, Lit, Meta, Path, Token, UnOp,
};

/// A `default = ...` literal, normalized to the value kind it produces.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultLit {
    /// String literal.
    Str(String),
    /// Integer literal, possibly negated.
    Int(i64),
    /// Float literal, possibly negated.
    Float(f64),
    /// Boolean literal.
    Bool(bool),
}

impl DefaultLit {
    /// Parses the right-hand side of `default = ...`.
    fn from_expr(expr: &Expr) -> syn::Result<Self> {
        match expr {
            Expr::Lit(ExprLit { lit, .. }) => Self::from_lit(lit, false),
            Expr::Unary(ExprUnary {
                op: UnOp::Neg(_),
                expr: inner,
                ..
            }) => match &**inner {
                Expr::Lit(ExprLit { lit, .. }) => Self::from_lit(lit, true),
                other => Err(syn::Error::new(other.span(), "expected a numeric literal")),
            },
            other => Err(syn::Error::new(
                other.span(),
                "expected a string, integer, float or boolean literal",
            )),
        }
    }

    fn from_lit(lit: &Lit, negative: bool) -> syn::Result<Self> {
        match lit {
            Lit::Str(s) if !negative => Ok(Self::Str(s.value())),
            Lit::Bool(b) if !negative => Ok(Self::Bool(b.value)),
            Lit::Int(i) => {
                let value: i64 = i.base10_parse()?;
                Ok(Self::Int(if negative { -value } else { value }))
            }
            Lit::Float(f) => {
                let value: f64 = f.base10_parse()?;
                if !value.is_finite() {
                    return Err(syn::Error::new(f.span(), "float default must be finite"));
                }
                Ok(Self::Float(if negative { -value } else { value }))
            }
            other => Err(syn::Error::new(
                other.span(),
                "expected a string, integer, float or boolean literal",
            )),
        }
    }
}

/// Parsed `#[config(...)]` attributes of one field.
#[derive(Debug, Default)]
pub struct FieldAttrs {
    /// Lookup key override.
    pub key: Option<String>,
    /// Default literal.
    pub default: Option<DefaultLit>,
    /// Whether the field must be set after merging.
    pub required: bool,
    /// Custom validation predicate.
    pub validate_with: Option<Path>,
    /// Whether the field is ignored entirely.
    pub skip: bool,
}

impl FieldAttrs {
    /// Collects every `#[config(...)]` attribute on a field.
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = Self::default();

        for attr in attrs.iter().filter(|a| a.path().is_ident("config")) {
            let meta_list =
                attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)?;
            for meta in meta_list {
                parsed.apply(meta)?;
            }

            if parsed.skip
                && (parsed.key.is_some()
                    || parsed.default.is_some()
                    || parsed.required
                    || parsed.validate_with.is_some())
            {
                return Err(syn::Error::new(
                    attr.span(),
                    "`skip` cannot be combined with other config attributes",
                ));
            }
        }

        Ok(parsed)
    }

    fn apply(&mut self, meta: Meta) -> syn::Result<()> {
        match meta {
            Meta::Path(path) => {
                let ident = ident_of(&path)?;
                let flag = match ident.as_str() {
                    "required" => &mut self.required,
                    "skip" => &mut self.skip,
                    _ => {
                        return Err(syn::Error::new(
                            path.span(),
                            format!("unknown attribute: {ident}"),
                        ))
                    }
                };
                if *flag {
                    return Err(duplicate(&path, &ident));
                }
                *flag = true;
            }
            Meta::NameValue(nv) => {
                let ident = ident_of(&nv.path)?;
                match ident.as_str() {
                    "key" => {
                        let key = string_lit(&nv.value)?;
                        if key.is_empty() {
                            return Err(syn::Error::new(nv.value.span(), "key must not be empty"));
                        }
                        set_once(&mut self.key, key, &nv.path, &ident)?;
                    }
                    "default" => {
                        let default = DefaultLit::from_expr(&nv.value)?;
                        set_once(&mut self.default, default, &nv.path, &ident)?;
                    }
                    "validate_with" => {
                        let path = string_lit(&nv.value)?;
                        let path = syn::parse_str::<Path>(&path)
                            .map_err(|e| syn::Error::new(nv.value.span(), e))?;
                        set_once(&mut self.validate_with, path, &nv.path, &ident)?;
                    }
                    _ => {
                        return Err(syn::Error::new(
                            nv.path.span(),
                            format!("unknown attribute: {ident}"),
                        ))
                    }
                }
            }
            Meta::List(list) => {
                return Err(syn::Error::new(
                    list.span(),
                    "expected `name` or `name = value`",
                ))
            }
        }
        Ok(())
    }
}

fn ident_of(path: &Path) -> syn::Result<String> {
    path.get_ident()
        .map(ToString::to_string)
        .ok_or_else(|| syn::Error::new(path.span(), "expected identifier"))
}

fn string_lit(expr: &Expr) -> syn::Result<String> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) => Ok(s.value()),
        _ => Err(syn::Error::new(expr.span(), "expected string literal")),
    }
}

fn set_once<T>(slot: &mut Option<T>, value: T, path: &Path, ident: &str) -> syn::Result<()> {
    if slot.is_some() {
        return Err(duplicate(path, ident));
    }
    *slot = Some(value);
    Ok(())
}

fn duplicate(path: &Path, ident: &str) -> syn::Error {
    syn::Error::new(path.span(), format!("duplicate attribute: {ident}"))
}

/// A parsed struct field.
#[derive(Debug)]
pub struct ConfigField {
    /// The field name.
    pub ident: Ident,
    /// Key looked up in decoded maps.
    pub key: String,
    /// Declared attributes.
    pub attrs: FieldAttrs,
}

impl ConfigField {
    /// Parses a named struct field.
    pub fn parse(field: &Field) -> syn::Result<Self> {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| syn::Error::new(field.span(), "expected a named field"))?;
        let attrs = FieldAttrs::from_attrs(&field.attrs)?;
        let key = attrs
            .key
            .clone()
            .unwrap_or_else(|| ident.unraw().to_string());

        Ok(Self { ident, key, attrs })
    }
}

/// A parsed `#[derive(Config)]` input.
#[derive(Debug)]
pub struct ConfigStruct {
    /// The struct name.
    pub ident: Ident,
    /// The struct generics (re-emitted on the impls).
    pub generics: Generics,
    /// Every named field, including skipped ones.
    pub fields: Vec<ConfigField>,
}

impl ConfigStruct {
    /// Parses a derive input, which must be a struct with named fields.
    pub fn parse(input: &DeriveInput) -> syn::Result<Self> {
        let Data::Struct(data) = &input.data else {
            return Err(syn::Error::new(
                input.ident.span(),
                "Config can only be derived for structs",
            ));
        };
        let Fields::Named(named) = &data.fields else {
            return Err(syn::Error::new(
                data.fields.span(),
                "Config requires a struct with named fields",
            ));
        };

        let fields = named
            .named
            .iter()
            .map(ConfigField::parse)
            .collect::<syn::Result<Vec<_>>>()?;

        let mut seen = HashSet::new();
        for field in fields.iter().filter(|f| !f.attrs.skip) {
            if !seen.insert(field.key.as_str()) {
                return Err(syn::Error::new(
                    field.ident.span(),
                    format!("duplicate configuration key: {}", field.key),
                ));
            }
        }

        Ok(Self {
            ident: input.ident.clone(),
            generics: input.generics.clone(),
            fields,
        })
    }

    /// Fields taking part in binding, defaults and validation.
    pub fn active_fields(&self) -> impl Iterator<Item = &ConfigField> {
        self.fields.iter().filter(|f| !f.attrs.skip)
    }
}
