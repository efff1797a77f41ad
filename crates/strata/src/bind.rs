//! Coercion of decoded [`Value`]s into typed fields.
//!
//! [`Field`] is implemented for the scalar, optional and collection types a
//! configuration record is usually made of. `#[derive(Config)]` implements it
//! for the record itself, which is how nested records bind, default and
//! validate recursively.
//!
//! Coercion rules:
//!
//! | Field type                          | Accepted value                      |
//! |-------------------------------------|-------------------------------------|
//! | `String`, `PathBuf`                 | string                              |
//! | `i8`..`i64`, `u8`..`u64`, `usize`   | integer within range                |
//! | `f32`, `f64`                        | float or integer                    |
//! | `bool`                              | boolean                             |
//! | `char`                              | one-character string                |
//! | `Option<T>`                         | null clears, anything else binds `T`|
//! | `Vec<T>`                            | array, replaced wholesale           |
//! | `HashMap`/`BTreeMap`/`IndexMap`     | map, merged per key                 |
//! | [`Value`]                           | anything, maps deep-merged          |

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::path::PathBuf;

use indexmap::IndexMap;

use crate::validate::ValidationErrors;
use crate::{BindError, Value};

/// A type that can receive a decoded [`Value`].
pub trait Field {
    /// Overwrite (or, for maps and records, merge into) `self` from `value`.
    ///
    /// # Errors
    ///
    /// Returns [`BindError`] if `value` has an incompatible shape.
    fn bind(&mut self, value: &Value) -> Result<(), BindError>;

    /// Whether the field still holds its zero value.
    ///
    /// Defaults are only applied to unset fields and `required` fails on them.
    fn is_unset(&self) -> bool;

    /// Apply declared defaults inside nested records.
    fn apply_nested_defaults(&mut self) -> Result<(), BindError> {
        Ok(())
    }

    /// Validate nested records, reporting violations under `path`.
    fn validate_nested(&self, _path: &str, _errors: &mut ValidationErrors) {}
}

impl Field for String {
    fn bind(&mut self, value: &Value) -> Result<(), BindError> {
        match value {
            Value::String(s) => {
                self.clone_from(s);
                Ok(())
            }
            other => Err(BindError::mismatch("string", other)),
        }
    }

    fn is_unset(&self) -> bool {
        self.is_empty()
    }
}

impl Field for PathBuf {
    fn bind(&mut self, value: &Value) -> Result<(), BindError> {
        match value {
            Value::String(s) => {
                *self = PathBuf::from(s);
                Ok(())
            }
            other => Err(BindError::mismatch("string", other)),
        }
    }

    fn is_unset(&self) -> bool {
        self.as_os_str().is_empty()
    }
}

impl Field for bool {
    fn bind(&mut self, value: &Value) -> Result<(), BindError> {
        match value {
            Value::Bool(b) => {
                *self = *b;
                Ok(())
            }
            other => Err(BindError::mismatch("boolean", other)),
        }
    }

    fn is_unset(&self) -> bool {
        !*self
    }
}

impl Field for char {
    fn bind(&mut self, value: &Value) -> Result<(), BindError> {
        let Value::String(s) = value else {
            return Err(BindError::mismatch("string", value));
        };

        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                *self = c;
                Ok(())
            }
            _ => Err(BindError::invalid(format!(
                "expected a single character, found \"{s}\""
            ))),
        }
    }

    fn is_unset(&self) -> bool {
        *self == '\0'
    }
}

macro_rules! integer_field {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Field for $ty {
                fn bind(&mut self, value: &Value) -> Result<(), BindError> {
                    match value {
                        Value::Integer(n) => {
                            *self = <$ty>::try_from(*n)
                                .map_err(|_| BindError::out_of_range(n, stringify!($ty)))?;
                            Ok(())
                        }
                        other => Err(BindError::mismatch("integer", other)),
                    }
                }

                fn is_unset(&self) -> bool {
                    *self == 0
                }
            }
        )*
    };
}

integer_field!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Field for f64 {
    fn bind(&mut self, value: &Value) -> Result<(), BindError> {
        match value {
            Value::Float(f) => {
                *self = *f;
                Ok(())
            }
            Value::Integer(n) => {
                *self = *n as f64;
                Ok(())
            }
            other => Err(BindError::mismatch("float", other)),
        }
    }

    #[allow(clippy::float_cmp)]
    fn is_unset(&self) -> bool {
        *self == 0.0
    }
}

impl Field for f32 {
    #[allow(clippy::cast_possible_truncation)]
    fn bind(&mut self, value: &Value) -> Result<(), BindError> {
        match value {
            Value::Float(f) => {
                *self = *f as f32;
                Ok(())
            }
            Value::Integer(n) => {
                *self = *n as f32;
                Ok(())
            }
            other => Err(BindError::mismatch("float", other)),
        }
    }

    #[allow(clippy::float_cmp)]
    fn is_unset(&self) -> bool {
        *self == 0.0
    }
}

impl<T: Field + Default> Field for Option<T> {
    fn bind(&mut self, value: &Value) -> Result<(), BindError> {
        if value.is_null() {
            *self = None;
            return Ok(());
        }
        match self {
            Some(inner) => inner.bind(value),
            None => {
                let mut inner = T::default();
                inner.apply_nested_defaults()?;
                inner.bind(value)?;
                *self = Some(inner);
                Ok(())
            }
        }
    }

    fn is_unset(&self) -> bool {
        self.is_none()
    }

    fn apply_nested_defaults(&mut self) -> Result<(), BindError> {
        match self {
            Some(inner) => inner.apply_nested_defaults(),
            None => Ok(()),
        }
    }

    fn validate_nested(&self, path: &str, errors: &mut ValidationErrors) {
        if let Some(inner) = self {
            inner.validate_nested(path, errors);
        }
    }
}

impl<T: Field + Default> Field for Vec<T> {
    fn bind(&mut self, value: &Value) -> Result<(), BindError> {
        let Value::Array(items) = value else {
            return Err(BindError::mismatch("array", value));
        };

        let mut bound = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let mut element = T::default();
            element
                .apply_nested_defaults()
                .and_then(|()| element.bind(item))
                .map_err(|e| e.at_index(index))?;
            bound.push(element);
        }
        *self = bound;
        Ok(())
    }

    fn is_unset(&self) -> bool {
        self.is_empty()
    }

    fn apply_nested_defaults(&mut self) -> Result<(), BindError> {
        for (index, element) in self.iter_mut().enumerate() {
            element
                .apply_nested_defaults()
                .map_err(|e| e.at_index(index))?;
        }
        Ok(())
    }

    fn validate_nested(&self, path: &str, errors: &mut ValidationErrors) {
        for (index, element) in self.iter().enumerate() {
            element.validate_nested(&format!("{path}[{index}]"), errors);
        }
    }
}

macro_rules! map_field {
    ($map:ident < $($bound:ident),* >) => {
        impl<T, $($bound),*> Field for $map<String, T, $($bound),*>
        where
            T: Field + Default,
            $($bound: BuildHasher + Default,)*
        {
            fn bind(&mut self, value: &Value) -> Result<(), BindError> {
                let Value::Map(entries) = value else {
                    return Err(BindError::mismatch("map", value));
                };

                for (key, item) in entries {
                    let mut seeded = Ok(());
                    let slot = self.entry(key.clone()).or_insert_with(|| {
                        let mut fresh = T::default();
                        seeded = fresh.apply_nested_defaults();
                        fresh
                    });
                    seeded
                        .and_then(|()| slot.bind(item))
                        .map_err(|e| e.at(key))?;
                }
                Ok(())
            }

            fn is_unset(&self) -> bool {
                self.is_empty()
            }

            fn apply_nested_defaults(&mut self) -> Result<(), BindError> {
                for (key, item) in self.iter_mut() {
                    item.apply_nested_defaults().map_err(|e| e.at(key))?;
                }
                Ok(())
            }

            fn validate_nested(&self, path: &str, errors: &mut ValidationErrors) {
                for (key, item) in self {
                    item.validate_nested(&crate::validate::field_path(path, key), errors);
                }
            }
        }
    };
}

map_field!(HashMap<S>);
map_field!(IndexMap<S>);
map_field!(BTreeMap<>);

impl Field for Value {
    fn bind(&mut self, value: &Value) -> Result<(), BindError> {
        self.merge(value.clone());
        Ok(())
    }

    fn is_unset(&self) -> bool {
        self.is_null()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BindErrorKind, Map};

    #[test]
    fn test_string_binds_only_strings() {
        let mut s = String::new();
        s.bind(&Value::from("hello")).unwrap();
        assert_eq!(s, "hello");

        let err = s.bind(&Value::from(1)).unwrap_err();
        assert_eq!(
            err.kind(),
            &BindErrorKind::TypeMismatch {
                expected: "string",
                found: "integer"
            }
        );
        assert_eq!(s, "hello");
    }

    #[test]
    fn test_integer_range_checked() {
        let mut port: u16 = 0;
        port.bind(&Value::from(8080)).unwrap();
        assert_eq!(port, 8080);

        let err = port.bind(&Value::from(70_000)).unwrap_err();
        assert!(matches!(err.kind(), BindErrorKind::OutOfRange { target: "u16", .. }));

        let mut unsigned: u32 = 0;
        assert!(unsigned.bind(&Value::from(-1)).is_err());
    }

    #[test]
    fn test_float_accepts_integers() {
        let mut ratio = 0.0_f64;
        ratio.bind(&Value::from(2)).unwrap();
        assert!((ratio - 2.0).abs() < f64::EPSILON);

        ratio.bind(&Value::from(0.25)).unwrap();
        assert!((ratio - 0.25).abs() < f64::EPSILON);

        assert!(ratio.bind(&Value::from("0.5")).is_err());
    }

    #[test]
    fn test_bool_binding() {
        let mut flag = false;
        assert!(flag.is_unset());
        flag.bind(&Value::from(true)).unwrap();
        assert!(flag);
        assert!(flag.bind(&Value::from("true")).is_err());
    }

    #[test]
    fn test_char_requires_single_character() {
        let mut separator = '\0';
        assert!(separator.is_unset());
        separator.bind(&Value::from(",")).unwrap();
        assert_eq!(separator, ',');

        let err = separator.bind(&Value::from("::")).unwrap_err();
        assert!(matches!(err.kind(), BindErrorKind::Invalid(_)));
        assert_eq!(err.to_string(), "expected a single character, found \"::\"");
        assert!(separator.bind(&Value::from("")).is_err());
        assert_eq!(separator, ',');
    }

    #[test]
    fn test_option_null_clears() {
        let mut name: Option<String> = None;
        assert!(name.is_unset());

        name.bind(&Value::from("db")).unwrap();
        assert_eq!(name.as_deref(), Some("db"));

        name.bind(&Value::Null).unwrap();
        assert!(name.is_none());
    }

    #[test]
    fn test_vec_replaced_wholesale() {
        let mut hosts = vec!["a".to_string(), "b".to_string()];
        hosts
            .bind(&Value::from(vec![Value::from("c")]))
            .unwrap();
        assert_eq!(hosts, vec!["c".to_string()]);
    }

    #[test]
    fn test_vec_error_carries_index() {
        let mut ports: Vec<u16> = Vec::new();
        let err = ports
            .bind(&Value::from(vec![Value::from(1), Value::from("two")]))
            .unwrap_err();
        assert_eq!(err.path(), "[1]");
    }

    #[test]
    fn test_maps_merge_per_key() {
        let mut labels: HashMap<String, String> = HashMap::new();
        labels.insert("team".to_string(), "core".to_string());
        labels.insert("tier".to_string(), "1".to_string());

        let overlay: Map = [("tier".to_string(), Value::from("2"))].into_iter().collect();
        labels.bind(&Value::Map(overlay)).unwrap();

        assert_eq!(labels["team"], "core");
        assert_eq!(labels["tier"], "2");
    }

    #[test]
    fn test_map_error_carries_key() {
        let mut limits: BTreeMap<String, u8> = BTreeMap::new();
        let overlay: Map = [("burst".to_string(), Value::from(1000))].into_iter().collect();
        let err = limits.bind(&Value::Map(overlay)).unwrap_err();
        assert_eq!(err.path(), "burst");
    }

    #[test]
    fn test_value_deep_merges() {
        let mut value = Value::Map(Map::new());
        let first: Map = [("a".to_string(), Value::from(1))].into_iter().collect();
        let second: Map = [("b".to_string(), Value::from(2))].into_iter().collect();

        value.bind(&Value::Map(first)).unwrap();
        value.bind(&Value::Map(second)).unwrap();

        assert_eq!(value.get("a"), Some(&Value::Integer(1)));
        assert_eq!(value.get("b"), Some(&Value::Integer(2)));
    }
}
