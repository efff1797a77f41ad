//! JSON decoder.

use std::io::Read;

use serde_json::Value as JsonValue;

use crate::{DecodeError, Map, MapDecoder, Value};

/// Decodes JSON documents whose root is an object.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonMapDecoder;

impl MapDecoder for JsonMapDecoder {
    fn decode(&self, reader: &mut dyn Read, map: &mut Map) -> Result<(), DecodeError> {
        let document: JsonValue = serde_json::from_reader(reader)?;

        match Value::from(document) {
            Value::Map(entries) => {
                map.extend(entries);
                Ok(())
            }
            other => Err(DecodeError::NotAMap {
                found: other.type_name(),
            }),
        }
    }
}

impl From<JsonValue> for Value {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Bool(b),
            JsonValue::Number(n) => n
                .as_i64()
                .map(Self::Integer)
                .or_else(|| n.as_f64().map(Self::Float))
                .unwrap_or(Self::Null),
            JsonValue::String(s) => Self::String(s),
            JsonValue::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            JsonValue::Object(object) => Self::Map(
                object
                    .into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}
