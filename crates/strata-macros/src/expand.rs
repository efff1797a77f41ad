//! `Config` derive implementation.
//!
//! This module contains the code generation for `#[derive(Config)]`.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{parse_quote, DeriveInput, Generics};

use crate::parse::{ConfigField, ConfigStruct, DefaultLit};

/// Expands `#[derive(Config)]`.
///
/// Generates two impls for the struct:
/// 1. `strata::Config`, driven by the loader
/// 2. `strata::Field`, so the struct can be nested inside another record
pub fn expand_config(input: TokenStream) -> syn::Result<TokenStream> {
    let input: DeriveInput = syn::parse2(input)?;
    let config = ConfigStruct::parse(&input)?;

    Ok(generate_config_impl(&config))
}

fn generate_config_impl(config: &ConfigStruct) -> TokenStream {
    let name = &config.ident;
    let generics = with_field_bounds(&config.generics);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let binds = config.active_fields().map(generate_bind);
    let defaults = config.active_fields().map(generate_defaults);
    let validations = config.active_fields().map(generate_validation);

    let is_unset = config
        .active_fields()
        .map(|field| {
            let ident = &field.ident;
            quote! { ::strata::Field::is_unset(&self.#ident) }
        })
        .reduce(|acc, check| quote! { #acc && #check })
        .unwrap_or_else(|| quote! { true });

    quote! {
        impl #impl_generics ::strata::Config for #name #ty_generics #where_clause {
            #[allow(unused_variables)]
            fn bind_map(
                &mut self,
                map: &::strata::Map,
            ) -> ::core::result::Result<(), ::strata::BindError> {
                #(#binds)*
                ::core::result::Result::Ok(())
            }

            fn apply_defaults(&mut self) -> ::core::result::Result<(), ::strata::BindError> {
                #(#defaults)*
                ::core::result::Result::Ok(())
            }

            #[allow(unused_variables)]
            fn validate_fields(&self, prefix: &str, errors: &mut ::strata::ValidationErrors) {
                #(#validations)*
            }
        }

        impl #impl_generics ::strata::Field for #name #ty_generics #where_clause {
            fn bind(
                &mut self,
                value: &::strata::Value,
            ) -> ::core::result::Result<(), ::strata::BindError> {
                match value {
                    ::strata::Value::Map(map) => ::strata::Config::bind_map(self, map),
                    other => ::core::result::Result::Err(::strata::BindError::mismatch("map", other)),
                }
            }

            fn is_unset(&self) -> bool {
                #is_unset
            }

            fn apply_nested_defaults(&mut self) -> ::core::result::Result<(), ::strata::BindError> {
                ::strata::Config::apply_defaults(self)
            }

            fn validate_nested(&self, path: &str, errors: &mut ::strata::ValidationErrors) {
                ::strata::Config::validate_fields(self, path, errors);
            }
        }
    }
}

/// Every type parameter must itself be a `Field` for the generated bodies to
/// bind, default and validate it.
fn with_field_bounds(generics: &Generics) -> Generics {
    let mut generics = generics.clone();
    let params: Vec<_> = generics
        .type_params()
        .map(|param| param.ident.clone())
        .collect();

    let where_clause = generics.make_where_clause();
    for ident in params {
        where_clause
            .predicates
            .push(parse_quote! { #ident: ::strata::Field });
    }
    generics
}

/// Overwrites the field when the decoded map carries its key.
fn generate_bind(field: &ConfigField) -> TokenStream {
    let ident = &field.ident;
    let key = &field.key;

    quote! {
        if let ::core::option::Option::Some(value) = map.get(#key) {
            ::strata::Field::bind(&mut self.#ident, value).map_err(|e| e.at(#key))?;
        }
    }
}

/// Seeds the declared default into an unset field, then recurses.
fn generate_defaults(field: &ConfigField) -> TokenStream {
    let ident = &field.ident;
    let key = &field.key;

    let seed = field.attrs.default.as_ref().map(|default| {
        let value = default_value(default);
        quote! {
            if ::strata::Field::is_unset(&self.#ident) {
                ::strata::Field::bind(&mut self.#ident, &#value).map_err(|e| e.at(#key))?;
            }
        }
    });

    quote! {
        #seed
        ::strata::Field::apply_nested_defaults(&mut self.#ident).map_err(|e| e.at(#key))?;
    }
}

/// Checks `required` and `validate_with`, then recurses.
fn generate_validation(field: &ConfigField) -> TokenStream {
    let ident = &field.ident;
    let key = &field.key;

    let required = field.attrs.required.then(|| {
        quote! {
            if ::strata::Field::is_unset(&self.#ident) {
                errors.push(path.as_str(), ::strata::Constraint::Required);
            }
        }
    });

    let custom = field.attrs.validate_with.as_ref().map(|validator| {
        let name = validator
            .segments
            .last()
            .map(|segment| segment.ident.to_string())
            .unwrap_or_default();
        quote! {
            if let ::core::result::Result::Err(message) = #validator(&self.#ident) {
                errors.push(path.as_str(), ::strata::Constraint::custom(#name, message));
            }
        }
    });

    quote! {
        {
            let path = ::strata::validate::field_path(prefix, #key);
            #required
            #custom
            ::strata::Field::validate_nested(&self.#ident, &path, errors);
        }
    }
}

fn default_value(default: &DefaultLit) -> TokenStream {
    match default {
        DefaultLit::Str(s) => quote! { ::strata::Value::String(::std::string::String::from(#s)) },
        DefaultLit::Int(i) => quote! { ::strata::Value::Integer(#i) },
        DefaultLit::Float(f) => quote! { ::strata::Value::Float(#f) },
        DefaultLit::Bool(b) => quote! { ::strata::Value::Bool(#b) },
    }
}
