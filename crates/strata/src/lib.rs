//! Layered configuration loading for Rust services.
//!
//! This crate loads configuration from any number of files into a single
//! strongly-typed record with support for:
//! - Glob-discovered files (`/etc/app/app.*`, `/etc/app/conf.d/*.yaml`)
//! - Pluggable formats keyed by file extension (TOML, YAML and JSON built in)
//! - Ordered merging (later patterns override earlier ones)
//! - Declared defaults and aggregated validation
//!
//! # Overview
//!
//! A [`Loader`] holds a registry of [`MapDecoder`]s and an ordered list of
//! path patterns. [`Loader::load`] runs the pipeline:
//!
//! 1. Seed declared defaults into every unset field
//! 2. Expand each pattern (directories are rejected)
//! 3. Decode each file with the decoder registered for its extension into a
//!    [`Map`] and merge it into the record (files with unregistered
//!    extensions are skipped)
//! 4. Validate the record, reporting every violation at once
//!
//! Records describe their fields with `#[derive(Config)]`:
//!
//! ```no_run
//! use strata::{Config, Loader};
//!
//! #[derive(Debug, Default, Config)]
//! struct Database {
//!     #[config(required)]
//!     host: String,
//!
//!     #[config(default = 5432)]
//!     port: u16,
//! }
//!
//! #[derive(Debug, Default, Config)]
//! struct AppConfig {
//!     #[config(key = "service_name", required)]
//!     name: String,
//!
//!     #[config(default = "info")]
//!     log_level: String,
//!
//!     database: Database,
//! }
//!
//! # fn main() -> Result<(), strata::LoadError> {
//! let mut loader = Loader::with_default_formats();
//! loader.add_config_path("/etc/app/app.*");
//! loader.add_config_path("/etc/app/conf.d/*");
//!
//! let config: AppConfig = loader.load_as()?;
//! println!("connecting to {}:{}", config.database.host, config.database.port);
//! # Ok(())
//! # }
//! ```
//!
//! # Field Declarations
//!
//! | Attribute                  | Effect                                                   |
//! |----------------------------|----------------------------------------------------------|
//! | `key = "name"`             | Lookup key in decoded maps (defaults to the field name)  |
//! | `default = <literal>`      | Value applied before any file is read, if the field is unset |
//! | `required`                 | Validation fails if the field is unset after merging     |
//! | `validate_with = "path"`   | `fn(&T) -> Result<(), String>` checked during validation |
//! | `skip`                     | Field is ignored by every phase                          |
//!
//! Nested records (any field whose type also derives `Config`) merge key by
//! key, so one file can set `database.host` and another `database.port`.

#![warn(missing_docs)]

extern crate self as strata;

mod bind;
mod config;
mod decoder;
mod error;
pub mod formats;
mod loader;
pub mod validate;
mod value;

pub use bind::Field;
pub use config::Config;
pub use decoder::MapDecoder;
pub use error::{BindError, BindErrorKind, DecodeError, LoadError};
pub use loader::{file_extension, Loader};
pub use strata_macros::Config;
pub use validate::{Constraint, FieldViolation, ValidationErrors};
pub use value::{Map, Value};
