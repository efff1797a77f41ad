//! Built-in format decoders.
//!
//! [`Loader::with_default_formats`](crate::Loader::with_default_formats)
//! registers all of them under their canonical extensions.

mod json;
mod toml;
mod yaml;

pub use self::json::JsonMapDecoder;
pub use self::toml::TomlMapDecoder;
pub use self::yaml::YamlMapDecoder;
