//! YAML decoder.

use std::io::Read;

use serde_yaml::Value as YamlValue;

use crate::{DecodeError, Map, MapDecoder, Value};

/// Decodes YAML documents whose root is a mapping.
///
/// Scalar keys are stringified; sequence or mapping keys are rejected. An
/// empty document decodes to an empty map.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlMapDecoder;

impl MapDecoder for YamlMapDecoder {
    fn decode(&self, reader: &mut dyn Read, map: &mut Map) -> Result<(), DecodeError> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        if content.trim().is_empty() {
            return Ok(());
        }

        let document: YamlValue = serde_yaml::from_str(&content)?;

        match convert(document)? {
            Value::Map(entries) => map.extend(entries),
            Value::Null => {}
            other => {
                return Err(DecodeError::NotAMap {
                    found: other.type_name(),
                })
            }
        }
        Ok(())
    }
}

fn convert(value: YamlValue) -> Result<Value, DecodeError> {
    Ok(match value {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(b) => Value::Bool(b),
        YamlValue::Number(n) => n
            .as_i64()
            .map(Value::Integer)
            .or_else(|| n.as_f64().map(Value::Float))
            .unwrap_or(Value::Null),
        YamlValue::String(s) => Value::String(s),
        YamlValue::Sequence(items) => {
            Value::Array(items.into_iter().map(convert).collect::<Result<_, _>>()?)
        }
        YamlValue::Mapping(mapping) => {
            let mut entries = Map::with_capacity(mapping.len());
            for (key, value) in mapping {
                entries.insert(convert_key(key)?, convert(value)?);
            }
            Value::Map(entries)
        }
        YamlValue::Tagged(tagged) => convert(tagged.value)?,
    })
}

fn convert_key(key: YamlValue) -> Result<String, DecodeError> {
    match key {
        YamlValue::String(s) => Ok(s),
        YamlValue::Bool(b) => Ok(b.to_string()),
        YamlValue::Number(n) => Ok(n.to_string()),
        other => Err(DecodeError::UnsupportedKey {
            key: format!("{other:?}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(input: &str) -> Result<Map, DecodeError> {
        let mut map = Map::new();
        YamlMapDecoder.decode(&mut input.as_bytes(), &mut map)?;
        Ok(map)
    }

    #[test]
    fn test_decode_nested_mappings() {
        let map = decode(
            "
key1: value1
key2: value2
table1:
  key3: value3
",
        )
        .unwrap();

        assert_eq!(map["key1"], Value::from("value1"));
        assert_eq!(map["key2"], Value::from("value2"));
        assert_eq!(map["table1"].get("key3"), Some(&Value::from("value3")));
    }

    #[test]
    fn test_decode_scalars_and_keys() {
        let map = decode(
            "
port: 8080
ratio: 0.25
enabled: false
missing: ~
8443: tls
hosts:
  - a
  - b
",
        )
        .unwrap();

        assert_eq!(map["port"], Value::Integer(8080));
        assert_eq!(map["ratio"], Value::Float(0.25));
        assert_eq!(map["enabled"], Value::Bool(false));
        assert_eq!(map["missing"], Value::Null);
        assert_eq!(map["8443"], Value::from("tls"));
        assert_eq!(
            map["hosts"],
            Value::Array(vec![Value::from("a"), Value::from("b")])
        );
    }

    #[test]
    fn test_empty_document() {
        assert!(decode("").unwrap().is_empty());
    }

    #[test]
    fn test_root_must_be_mapping() {
        let err = decode("- a\n- b\n").unwrap_err();
        assert!(matches!(err, DecodeError::NotAMap { found: "array" }));
    }

    #[test]
    fn test_sequence_keys_rejected() {
        let err = decode("? [a, b]\n: value\n").unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedKey { .. }));
    }

    #[test]
    fn test_invalid_yaml() {
        let err = decode("key: [unclosed").unwrap_err();
        assert!(matches!(err, DecodeError::Yaml(_)));
    }
}
