//! TOML decoder.

use std::io::Read;

use crate::{DecodeError, Map, MapDecoder, Value};

/// Decodes TOML documents. Datetimes become their RFC 3339 string.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlMapDecoder;

impl MapDecoder for TomlMapDecoder {
    fn decode(&self, reader: &mut dyn Read, map: &mut Map) -> Result<(), DecodeError> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;

        let table: toml::Table = toml::from_str(&content)?;
        map.extend(table.into_iter().map(|(key, value)| (key, Value::from(value))));
        Ok(())
    }
}

impl From<toml::Value> for Value {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => Self::String(s),
            toml::Value::Integer(i) => Self::Integer(i),
            toml::Value::Float(f) => Self::Float(f),
            toml::Value::Boolean(b) => Self::Bool(b),
            toml::Value::Datetime(dt) => Self::String(dt.to_string()),
            toml::Value::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            toml::Value::Table(table) => Self::Map(
                table
                    .into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_nested_tables() {
        let input = r#"
            key1 = "value1"
            key2 = "value2"

            [table1]
            key3 = "value3"
        "#;

        let mut map = Map::new();
        TomlMapDecoder.decode(&mut input.as_bytes(), &mut map).unwrap();

        assert_eq!(map["key1"], Value::from("value1"));
        assert_eq!(map["key2"], Value::from("value2"));
        assert_eq!(map["table1"].get("key3"), Some(&Value::from("value3")));
    }

    #[test]
    fn test_decode_scalars() {
        let input = r#"
            port = 8080
            ratio = 0.5
            enabled = true
            started = 1979-05-27T07:32:00Z
            hosts = ["a", "b"]
        "#;

        let mut map = Map::new();
        TomlMapDecoder.decode(&mut input.as_bytes(), &mut map).unwrap();

        assert_eq!(map["port"], Value::Integer(8080));
        assert_eq!(map["ratio"], Value::Float(0.5));
        assert_eq!(map["enabled"], Value::Bool(true));
        assert_eq!(map["started"], Value::from("1979-05-27T07:32:00Z"));
        assert_eq!(
            map["hosts"],
            Value::Array(vec![Value::from("a"), Value::from("b")])
        );
    }

    #[test]
    fn test_decode_invalid() {
        let mut map = Map::new();
        let err = TomlMapDecoder
            .decode(&mut "key = ".as_bytes(), &mut map)
            .unwrap_err();
        assert!(matches!(err, DecodeError::Toml(_)));
    }
}
