//! Decoding JSON and YAML text into raw document values.

use serde_json::{Map, Number, Value};
use std::path::Path;
use yaml_rust2::{Yaml, YamlLoader};

/// Text formats a source can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Guess the format from a file extension. `None` when it isn't obvious.
    pub fn from_path(path: &Path) -> Option<Format> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Some(Format::Json),
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Some(Format::Yaml)
            }
            _ => None,
        }
    }
}

/// Decode `contents`, using `path` (if any) to pick the format.
///
/// Unknown extensions are tried as JSON first and then as YAML. An empty
/// document decodes to `null`.
pub fn parse(contents: &str, path: Option<&Path>) -> Result<Value, String> {
    match path.and_then(Format::from_path) {
        Some(Format::Json) => parse_json(contents),
        Some(Format::Yaml) => parse_yaml(contents),
        None => parse_json(contents).or_else(|_| parse_yaml(contents)),
    }
}

pub fn parse_json(contents: &str) -> Result<Value, String> {
    serde_json::from_str(contents).map_err(|e| e.to_string())
}

pub fn parse_yaml(contents: &str) -> Result<Value, String> {
    let documents = YamlLoader::load_from_str(contents).map_err(|e| e.to_string())?;
    match documents.into_iter().next() {
        Some(document) => yaml_to_json_value(&document),
        None => Ok(Value::Null),
    }
}

/// Convert a YAML value to the JSON value model used for raw documents.
///
/// Scalar mapping keys are stringified, which keeps keys like `200:` usable
/// as response codes.
fn yaml_to_json_value(value: &Yaml) -> Result<Value, String> {
    Ok(match value {
        Yaml::Null | Yaml::BadValue => Value::Null,
        Yaml::Boolean(b) => Value::Bool(*b),
        Yaml::Integer(n) => Value::Number((*n).into()),
        Yaml::Real(s) => s
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map_or(Value::Null, Value::Number),
        Yaml::String(s) => Value::String(s.clone()),
        Yaml::Array(items) => Value::Array(
            items
                .iter()
                .map(yaml_to_json_value)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Yaml::Hash(entries) => {
            let mut map = Map::new();
            for (key, value) in entries {
                map.insert(yaml_key(key)?, yaml_to_json_value(value)?);
            }
            Value::Object(map)
        }
        // YamlLoader substitutes anchors, so aliases never reach us
        Yaml::Alias(_) => Value::Null,
    })
}

fn yaml_key(key: &Yaml) -> Result<String, String> {
    match key {
        Yaml::String(s) | Yaml::Real(s) => Ok(s.clone()),
        Yaml::Integer(n) => Ok(n.to_string()),
        Yaml::Boolean(b) => Ok(b.to_string()),
        Yaml::Null => Ok("null".to_string()),
        _ => Err("mapping keys must be scalars".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_yaml_stringifies_integer_keys() {
        let value = parse_yaml("responses:\n  200:\n    description: ok\n").unwrap();
        assert_eq!(value, json!({ "responses": { "200": { "description": "ok" } } }));
    }

    #[test]
    fn test_parse_yaml_preserves_key_order() {
        let value = parse_yaml("b: 1\na: 2\nc: 3\n").unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["b", "a", "c"]);
    }

    #[test]
    fn test_parse_yaml_scalars() {
        let value = parse_yaml("a: true\nb: 1.5\nc: ~\nd: [x, 2]\n").unwrap();
        assert_eq!(value, json!({ "a": true, "b": 1.5, "c": null, "d": ["x", 2] }));
    }

    #[test]
    fn test_parse_yaml_resolves_aliases() {
        let value = parse_yaml("base: &base\n  url: /\ncopy: *base\n").unwrap();
        assert_eq!(value["copy"], json!({ "url": "/" }));
    }

    #[test]
    fn test_parse_empty_yaml_is_null() {
        assert_eq!(parse_yaml("").unwrap(), Value::Null);
    }

    #[test]
    fn test_parse_invalid_yaml() {
        assert!(parse_yaml("key: [unterminated").is_err());
    }

    #[test]
    fn test_parse_uses_extension() {
        assert!(parse("a: 1", Some(Path::new("doc.json"))).is_err());
        assert_eq!(parse("a: 1", Some(Path::new("doc.yml"))).unwrap(), json!({ "a": 1 }));
        assert_eq!(parse("{\"a\": 1}", None).unwrap(), json!({ "a": 1 }));
        assert_eq!(parse("a: 1", None).unwrap(), json!({ "a": 1 }));
    }
}
