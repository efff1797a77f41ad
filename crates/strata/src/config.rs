//! The destination record contract.
//!
//! This module provides the [`Config`] trait the [`Loader`](crate::Loader)
//! drives. It is normally implemented with `#[derive(Config)]`, which reads
//! one `#[config(...)]` declaration per field and applies it consistently
//! across default seeding, binding and validation.

use crate::validate::ValidationErrors;
use crate::{BindError, Map, Value};

/// A typed record that configuration files can be merged into.
///
/// # Example
///
/// ```
/// use strata::{Config, Map, Value};
///
/// #[derive(Debug, Default, Config)]
/// struct ServerConfig {
///     #[config(key = "http_addr", default = "0.0.0.0:8080")]
///     addr: String,
///
///     #[config(required)]
///     name: String,
/// }
///
/// let mut config = ServerConfig::default();
/// config.apply_defaults().unwrap();
/// assert_eq!(config.addr, "0.0.0.0:8080");
///
/// let file: Map = [("name".to_string(), Value::from("api"))].into_iter().collect();
/// config.bind_map(&file).unwrap();
/// assert!(config.validate().is_ok());
/// ```
pub trait Config {
    /// Merge one decoded file into `self`.
    ///
    /// Keys matching a field overwrite it (nested records merge recursively);
    /// unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`BindError`] naming the key path of the first incompatible
    /// value.
    fn bind_map(&mut self, map: &Map) -> Result<(), BindError>;

    /// Fill every unset field that declares a default.
    ///
    /// # Errors
    ///
    /// Returns [`BindError`] if a default literal does not fit its field.
    fn apply_defaults(&mut self) -> Result<(), BindError>;

    /// Check declared constraints, reporting field paths under `prefix`.
    fn validate_fields(&self, prefix: &str, errors: &mut ValidationErrors);

    /// Check every declared constraint and collect all violations.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] listing every failing field.
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        self.validate_fields("", &mut errors);
        errors.into_result()
    }
}

/// A schemaless destination: every file is deep-merged into one tree.
impl Config for Value {
    fn bind_map(&mut self, map: &Map) -> Result<(), BindError> {
        self.merge(Value::Map(map.clone()));
        Ok(())
    }

    fn apply_defaults(&mut self) -> Result<(), BindError> {
        Ok(())
    }

    fn validate_fields(&self, _prefix: &str, _errors: &mut ValidationErrors) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, Constraint};

    #[derive(Debug, Default, Config)]
    struct Database {
        #[config(required)]
        host: String,

        #[config(default = 5432)]
        port: u16,
    }

    #[derive(Debug, Default, Config)]
    struct AppConfig {
        #[config(key = "service_name", required)]
        name: String,

        database: Database,

        #[config(default = true)]
        verbose: bool,
    }

    fn map(entries: Vec<(&str, Value)>) -> Map {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn test_defaults_reach_nested_records() {
        let mut config = AppConfig::default();
        config.apply_defaults().unwrap();
        assert_eq!(config.database.port, 5432);
        assert!(config.verbose);
    }

    #[test]
    fn test_nested_binding_merges() {
        let mut config = AppConfig::default();
        config.apply_defaults().unwrap();
        config
            .bind_map(&map(vec![(
                "database",
                Value::Map(map(vec![("host", Value::from("db.internal"))])),
            )]))
            .unwrap();

        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.port, 5432);
    }

    #[test]
    fn test_validation_reports_nested_paths() {
        let config = AppConfig::default();
        let errors = config.validate().unwrap_err();

        assert_eq!(errors.len(), 2);
        assert!(errors.has("service_name", "required"));
        assert!(errors.has("database.host", "required"));
        assert_eq!(errors.violations()[0].constraint, Constraint::Required);
    }

    #[test]
    fn test_bind_error_names_nested_key() {
        let mut config = AppConfig::default();
        let err = config
            .bind_map(&map(vec![(
                "database",
                Value::Map(map(vec![("port", Value::from("not-a-port"))])),
            )]))
            .unwrap_err();
        assert_eq!(err.path(), "database.port");
    }

    #[test]
    fn test_value_destination_merges() {
        let mut value = Value::Map(Map::new());
        value.bind_map(&map(vec![("a", Value::from(1))])).unwrap();
        value.bind_map(&map(vec![("a", Value::from(2))])).unwrap();
        assert_eq!(value.get("a"), Some(&Value::Integer(2)));
        assert!(value.validate().is_ok());
    }
}
