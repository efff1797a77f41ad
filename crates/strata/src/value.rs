//! Dynamically-typed values produced by format decoders.
//!
//! Every decoder turns its input into a [`Map`] of [`Value`]s. The binding
//! layer then coerces those values into the typed fields of a destination
//! record (see [`Field`](crate::Field)).

use indexmap::IndexMap;
use serde::Serialize;

/// String-keyed map produced by a single decode operation.
///
/// Insertion order follows the source document.
pub type Map = IndexMap<String, Value>;

/// A decoded configuration value.
///
/// # Example
///
/// ```
/// use strata::{Map, Value};
///
/// let mut base = Value::Map(Map::from([("port".to_string(), Value::from(8080))]));
/// base.merge(Value::Map(Map::from([("host".to_string(), Value::from("localhost"))])));
///
/// assert_eq!(base.get("port"), Some(&Value::Integer(8080)));
/// assert_eq!(base.get("host").and_then(Value::as_str), Some("localhost"));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Explicit null (YAML `~`, JSON `null`).
    #[default]
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Signed integer scalar.
    Integer(i64),
    /// Floating point scalar.
    Float(f64),
    /// String scalar.
    String(String),
    /// Ordered sequence.
    Array(Vec<Value>),
    /// Nested string-keyed map.
    Map(Map),
}

impl Value {
    /// Human readable name of this value's kind, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Map(_) => "map",
        }
    }

    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the string slice if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the nested map if this is a map.
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up `key` if this is a map.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Deep-merges `other` into `self`.
    ///
    /// Maps merge key by key, recursively. Any other combination replaces
    /// `self` with `other`.
    pub fn merge(&mut self, other: Value) {
        match (self, other) {
            (Self::Map(base), Self::Map(overlay)) => {
                for (key, value) in overlay {
                    match base.get_mut(&key) {
                        Some(existing) => existing.merge(value),
                        None => {
                            base.insert(key, value);
                        }
                    }
                }
            }
            (slot, other) => *slot = other,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::Array(value)
    }
}

impl From<Map> for Value {
    fn from(value: Map) -> Self {
        Self::Map(value)
    }
}
