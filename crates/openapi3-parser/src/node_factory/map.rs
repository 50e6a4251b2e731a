//! Building mappings with arbitrary keys.

use super::field::is_extension;
use super::{build_entry, type_error, BuildResult, Built, CollectionDefault, Entry, Factory};
use crate::context::Context;
use crate::validation::{Hook, Scope, Validatable};
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// A mapping whose values are all built by one factory.
#[derive(Debug, Clone)]
pub struct MapFactory {
    pub value_factory: Factory,
    pub default: CollectionDefault,
    /// Pass `x-` keys through verbatim, out of reach of the value factory
    /// and the validation hook
    pub extensions: bool,
    pub validate: Option<Hook>,
}

impl MapFactory {
    pub fn new(value_factory: impl Into<Factory>) -> Self {
        Self {
            value_factory: value_factory.into(),
            default: CollectionDefault::Empty,
            extensions: false,
            validate: None,
        }
    }

    pub fn default(mut self, default: CollectionDefault) -> Self {
        self.default = default;
        self
    }

    pub fn allow_extensions(mut self) -> Self {
        self.extensions = true;
        self
    }

    pub fn validate(mut self, validate: Hook) -> Self {
        self.validate = Some(validate);
        self
    }
}

pub(crate) fn build(map: &MapFactory, input: Option<&Value>, context: &Context) -> BuildResult {
    let default_input;
    let input = match input {
        Some(input) => input,
        None => match map.default.value(context, Value::Object(Map::new())) {
            Some(value) => {
                default_input = value;
                &default_input
            }
            None => return BuildResult::absent(),
        },
    };

    let Some(object) = input.as_object() else {
        return BuildResult::invalid(type_error("Object", context), input.clone());
    };

    let mut errors = Vec::new();
    let mut entries = IndexMap::with_capacity(object.len());
    let mut resolved = Map::new();
    let mut validated_input = Map::new();
    let mut validated_resolved = Map::new();

    for (key, value) in object {
        if map.extensions && is_extension(key) {
            resolved.insert(key.clone(), value.clone());
            entries.insert(key.clone(), Entry::Value(value.clone()));
            continue;
        }

        let (entry, value_errors) =
            build_entry(&map.value_factory, Some(value.clone()), context.next_field(key));
        errors.extend(value_errors);

        validated_input.insert(key.clone(), value.clone());
        validated_resolved.insert(key.clone(), entry.resolved_input().clone());
        resolved.insert(key.clone(), entry.resolved_input().clone());
        entries.insert(key.clone(), entry);
    }

    if let Some(validate) = map.validate {
        let validated_input = Value::Object(validated_input);
        let validated_resolved = Value::Object(validated_resolved);
        let mut validatable =
            Validatable::new(&validated_input, &validated_resolved, context, Scope::Collection);
        validate(&mut validatable);
        errors.extend(validatable.into_errors());
    }

    BuildResult {
        errors,
        resolved_input: Value::Object(resolved),
        built: Built::Map(entries),
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::{InputType, NodeFactory};
    use super::*;
    use serde_json::json;

    fn lowercase_keys() -> MapFactory {
        MapFactory::new(InputType::Integer)
            .allow_extensions()
            .validate(|validatable| {
                let context = validatable.context();
                let keys: Vec<&String> = validatable
                    .input()
                    .as_object()
                    .into_iter()
                    .flat_map(|map| map.keys())
                    .collect();
                for key in keys {
                    if key.chars().any(char::is_uppercase) {
                        validatable.add_error_at("Keys must be lowercase", &context.next_field(key));
                    }
                }
            })
    }

    #[test]
    fn test_values_keep_key_order_and_locations() {
        let factory = factory_for(
            MapFactory::new(InputType::Integer).into(),
            json!({ "b": "x", "a": 1, "c": "y" }),
        );

        assert_eq!(
            error_strings(&factory),
            [
                "#/b: Invalid type. Expected Integer",
                "#/c: Invalid type. Expected Integer",
            ]
        );
        let keys: Vec<&String> = factory.resolved_input().as_object().unwrap().keys().collect();
        assert_eq!(keys, ["b", "a", "c"]);
    }

    #[test]
    fn test_hook_errors_at_key_location() {
        let factory = factory_for(lowercase_keys().into(), json!({ "ok": 1, "Bad": 2 }));
        assert_eq!(error_strings(&factory), ["#/Bad: Keys must be lowercase"]);
    }

    #[test]
    fn test_extensions_bypass_values_and_hook() {
        let factory = factory_for(lowercase_keys().into(), json!({ "a": 1, "x-Note": "text" }));
        assert!(factory.is_valid());
        assert_eq!(factory.resolved_input()["x-Note"], json!("text"));

        let factory = factory_for(MapFactory::new(InputType::Integer).into(), json!({ "x-a": "text" }));
        assert_eq!(error_strings(&factory), ["#/x-a: Invalid type. Expected Integer"]);
    }

    #[test]
    fn test_absent_map_defaults() {
        let context = context(json!({}));

        let factory = NodeFactory::new(MapFactory::new(InputType::Any).into(), None, context.clone());
        assert_eq!(factory.resolved_input(), &json!({}));

        let factory = NodeFactory::new(
            MapFactory::new(InputType::Any)
                .default(CollectionDefault::Null)
                .into(),
            None,
            context,
        );
        assert_eq!(factory.resolved_input(), &Value::Null);
    }

    #[test]
    fn test_not_a_map() {
        let factory = factory_for(MapFactory::new(InputType::Any).into(), json!([1]));
        assert_eq!(error_strings(&factory), ["#/: Invalid type. Expected Object"]);
    }
}
