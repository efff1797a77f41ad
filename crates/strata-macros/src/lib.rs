//! Derive macro for strata configuration records.
//!
//! This crate provides `#[derive(Config)]`, which turns one declaration per
//! field into the binding, default and validation logic the strata loader
//! runs. Use it through the `strata` crate, which re-exports it.
//!
//! # Example
//!
//! ```rust,ignore
//! use strata::Config;
//!
//! #[derive(Debug, Default, Config)]
//! struct ServerConfig {
//!     #[config(key = "http_addr", default = "0.0.0.0:8080")]
//!     addr: String,
//!
//!     #[config(default = 30)]
//!     shutdown_timeout_secs: u64,
//!
//!     #[config(required, validate_with = "checks::non_blank")]
//!     service_name: String,
//! }
//! ```
//!
//! # Macro Expansion
//!
//! The derive generates:
//!
//! 1. `strata::Config::bind_map`, which looks up each field's key and binds
//!    the value through `strata::Field`
//! 2. `strata::Config::apply_defaults`, which binds each default literal into
//!    its field when the field is unset
//! 3. `strata::Config::validate_fields`, which records every `required` or
//!    `validate_with` failure
//! 4. `strata::Field` for the struct itself, so it can be nested in another
//!    record and merge key by key

mod expand;
mod parse;

use proc_macro::TokenStream;

/// Derives `strata::Config` and `strata::Field` for a struct with named
/// fields.
///
/// # Attributes
///
/// - `key = "name"`: lookup key in decoded maps (defaults to the field name)
/// - `default = <literal>`: string, integer, float or boolean literal applied
///   before any file is read when the field is unset
/// - `required`: validation fails if the field is unset after merging
/// - `validate_with = "path::to::fn"`: `fn(&T) -> Result<(), String>` checked
///   during validation
/// - `skip`: the field is ignored by every phase
///
/// # Generated Code
///
/// For a field `#[config(key = "key3", default = "key3default", required)]
/// key3: String` the derive generates approximately:
///
/// ```rust,ignore
/// // bind_map
/// if let Some(value) = map.get("key3") {
///     strata::Field::bind(&mut self.key3, value).map_err(|e| e.at("key3"))?;
/// }
///
/// // apply_defaults
/// if strata::Field::is_unset(&self.key3) {
///     strata::Field::bind(&mut self.key3, &Value::String("key3default".into()))?;
/// }
///
/// // validate_fields
/// if strata::Field::is_unset(&self.key3) {
///     errors.push("key3", Constraint::Required);
/// }
/// ```
#[proc_macro_derive(Config, attributes(config))]
pub fn derive_config(input: TokenStream) -> TokenStream {
    expand::expand_config(input.into())
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
