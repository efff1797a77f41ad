//! Integration tests for `#[derive(Config)]`.
//!
//! These drive the generated code directly through the `Config` trait,
//! without touching the filesystem.

use std::collections::BTreeMap;

use strata::{BindErrorKind, Config, Map, Value};

fn map(entries: Vec<(&str, Value)>) -> Map {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

mod checks {
    pub fn non_blank(value: &String) -> Result<(), String> {
        if value.trim().is_empty() {
            Err("must not be blank".to_string())
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Default, Config)]
struct Pool {
    #[config(default = 4)]
    size: u32,
    #[config(default = 1.5)]
    backoff_secs: f64,
    #[config(required)]
    name: String,
}

#[derive(Debug, Default, Config)]
struct Service {
    #[config(key = "service-name", required, validate_with = "checks::non_blank")]
    name: String,

    #[config(default = -10)]
    nice: i32,

    #[config(default = true)]
    enabled: bool,

    #[config(skip)]
    cache: Vec<u8>,

    primary: Pool,
    replica: Option<Pool>,
    pools: Vec<Pool>,
    named: BTreeMap<String, Pool>,
}

#[test]
fn test_defaults_cover_every_literal_kind() {
    let mut service = Service::default();
    service.apply_defaults().unwrap();

    assert_eq!(service.nice, -10);
    assert!(service.enabled);
    assert_eq!(service.primary.size, 4);
    assert!((service.primary.backoff_secs - 1.5).abs() < f64::EPSILON);
    assert!(service.replica.is_none());
}

#[test]
fn test_defaults_do_not_override_set_fields() {
    let mut service = Service {
        nice: 5,
        ..Service::default()
    };
    service.apply_defaults().unwrap();
    assert_eq!(service.nice, 5);
}

#[test]
fn test_key_override_and_skip() {
    let mut service = Service::default();
    service
        .bind_map(&map(vec![
            ("service-name", Value::from("billing")),
            ("name", Value::from("ignored")),
            ("cache", Value::from(vec![Value::from(1)])),
        ]))
        .unwrap();

    assert_eq!(service.name, "billing");
    assert!(service.cache.is_empty());
}

#[test]
fn test_nested_records_created_by_files_get_defaults() {
    let mut service = Service::default();
    service.apply_defaults().unwrap();
    service
        .bind_map(&map(vec![
            ("replica", Value::Map(map(vec![("name", Value::from("ro"))]))),
            (
                "pools",
                Value::from(vec![Value::Map(map(vec![("name", Value::from("a"))]))]),
            ),
            (
                "named",
                Value::Map(map(vec![(
                    "batch",
                    Value::Map(map(vec![("size", Value::from(16))])),
                )])),
            ),
        ]))
        .unwrap();

    let replica = service.replica.as_ref().unwrap();
    assert_eq!(replica.name, "ro");
    assert_eq!(replica.size, 4);

    assert_eq!(service.pools[0].size, 4);
    assert_eq!(service.named["batch"].size, 16);
    assert!((service.named["batch"].backoff_secs - 1.5).abs() < f64::EPSILON);
}

#[test]
fn test_validation_paths_through_collections() {
    let mut service = Service::default();
    service.apply_defaults().unwrap();
    service
        .bind_map(&map(vec![
            ("service-name", Value::from("   ")),
            ("primary", Value::Map(map(vec![("name", Value::from("main"))]))),
            (
                "pools",
                Value::from(vec![
                    Value::Map(map(vec![("name", Value::from("a"))])),
                    Value::Map(map(vec![("size", Value::from(2))])),
                ]),
            ),
            (
                "named",
                Value::Map(map(vec![("batch", Value::Map(Map::new()))])),
            ),
        ]))
        .unwrap();

    let errors = service.validate().unwrap_err();
    let fields: Vec<_> = errors.fields().collect();

    assert!(errors.has("service-name", "non_blank"));
    assert!(errors.has("pools[1].name", "required"));
    assert!(errors.has("named.batch.name", "required"));
    assert!(!fields.contains(&"primary.name"));
    assert!(!fields.iter().any(|f| f.starts_with("replica")));
    assert_eq!(errors.len(), 3);
}

#[test]
fn test_nested_bind_error_path() {
    let mut service = Service::default();
    let err = service
        .bind_map(&map(vec![(
            "pools",
            Value::from(vec![
                Value::Map(Map::new()),
                Value::Map(map(vec![("size", Value::from("large"))])),
            ]),
        )]))
        .unwrap_err();

    assert_eq!(err.path(), "pools[1].size");
    assert!(matches!(err.kind(), BindErrorKind::TypeMismatch { expected: "integer", .. }));
}

#[test]
fn test_nested_record_rejects_scalar() {
    let mut service = Service::default();
    let err = service
        .bind_map(&map(vec![("primary", Value::from("main"))]))
        .unwrap_err();

    assert_eq!(err.path(), "primary");
    assert!(matches!(err.kind(), BindErrorKind::TypeMismatch { expected: "map", found: "string" }));
}

#[test]
fn test_null_clears_optional_record() {
    let mut service = Service::default();
    service
        .bind_map(&map(vec![(
            "replica",
            Value::Map(map(vec![("name", Value::from("ro"))])),
        )]))
        .unwrap();
    assert!(service.replica.is_some());

    service
        .bind_map(&map(vec![("replica", Value::Null)]))
        .unwrap();
    assert!(service.replica.is_none());
}

#[derive(Debug, Default, Config)]
struct Layered<T: Default> {
    #[config(required)]
    inner: T,
    #[config(default = "base")]
    label: String,
}

#[test]
fn test_generic_record_binds_its_parameter() {
    let mut scalar: Layered<u16> = Layered::default();
    scalar.apply_defaults().unwrap();
    scalar
        .bind_map(&map(vec![("inner", Value::from(8080))]))
        .unwrap();
    assert_eq!(scalar.inner, 8080);
    assert_eq!(scalar.label, "base");
    assert!(scalar.validate().is_ok());

    let mut nested: Layered<Pool> = Layered::default();
    nested.apply_defaults().unwrap();
    assert_eq!(nested.inner.size, 4);

    let errors = nested.validate().unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(errors.has("inner.name", "required"));

    let empty: Layered<u16> = Layered::default();
    assert!(empty.validate().unwrap_err().has("inner", "required"));
}
