//! Parameters and headers, which share most of their fields, and the
//! examples they carry.

use super::media::{MediaType, MEDIA_TYPE};
use super::schema::{Schema, SCHEMA};
use super::{referenceable, referenceable_map, uri};
use crate::error::Result;
use crate::node::{object_node, NodeMap};
use crate::node_factory::{
    ArrayFactory, CollectionDefault, Factory, FieldSpec, InputType, MapFactory, ObjectSchema,
};
use crate::validation::Validatable;
use crate::validators;
use once_cell::sync::Lazy;
use serde_json::{Map, Value};

const LOCATIONS: [&str; 4] = ["header", "query", "cookie", "path"];

/// `form` for query and cookie parameters, `simple` for everything else.
fn default_style(input: &Map<String, Value>) -> &'static str {
    match input.get("in").and_then(Value::as_str) {
        Some("query") | Some("cookie") => "form",
        _ => "simple",
    }
}

fn default_explode(input: &Map<String, Value>) -> Value {
    let style = input
        .get("style")
        .and_then(Value::as_str)
        .unwrap_or_else(|| default_style(input));
    Value::Bool(style == "form")
}

fn mutually_exclusive_examples(validatable: &mut Validatable) {
    if let Some(input) = validatable.input().as_object() {
        let message = validators::mutually_exclusive(input, "example", "examples");
        validatable.add_optional_error(message);
    }
}

/// Fields shared by parameters and headers.
fn parameter_like(schema: ObjectSchema) -> ObjectSchema {
    schema
        .field(FieldSpec::new("description", InputType::String))
        .field(FieldSpec::new("required", InputType::Boolean).default(|_| false.into()))
        .field(FieldSpec::new("deprecated", InputType::Boolean).default(|_| false.into()))
        .field(FieldSpec::new("allowEmptyValue", InputType::Boolean).default(|_| false.into()))
        .field(FieldSpec::new("style", InputType::String).default(|input| default_style(input).into()))
        .field(FieldSpec::new("explode", InputType::Boolean).default(default_explode))
        .field(FieldSpec::new("allowReserved", InputType::Boolean).default(|_| false.into()))
        .field(FieldSpec::new("schema", referenceable(&SCHEMA)))
        .field(FieldSpec::new("example", InputType::Any))
        .field(FieldSpec::new(
            "examples",
            referenceable_map(&EXAMPLE).default(CollectionDefault::Null),
        ))
        .field(FieldSpec::new(
            "content",
            MapFactory::new(Factory::object(&MEDIA_TYPE))
                .default(CollectionDefault::Null)
                .validate(|validatable| {
                    if validatable.input().as_object().map_or(0, Map::len) != 1 {
                        validatable.add_error("Must only have one item");
                    }
                }),
        ))
}

pub static PARAMETER: Lazy<ObjectSchema> = Lazy::new(|| {
    let schema = ObjectSchema::new("Parameter")
        .allow_extensions()
        .field(FieldSpec::new("name", InputType::String).required())
        .field(FieldSpec::new("in", InputType::String).required().validate(|value| {
            match value.as_str() {
                Some(location) if LOCATIONS.contains(&location) => None,
                _ => Some("in can only be header, query, cookie, or path".to_string()),
            }
        }));

    parameter_like(schema).validate(|validatable| {
        let input = validatable.input();
        let in_path = input.get("in").and_then(Value::as_str) == Some("path");
        if in_path && input.get("required") != Some(&Value::Bool(true)) {
            let context = validatable.context();
            validatable.add_error_at(
                "Must be included and true for a path parameter",
                &context.next_field("required"),
            );
        }
        mutually_exclusive_examples(validatable);
    })
});

pub static HEADER: Lazy<ObjectSchema> = Lazy::new(|| {
    parameter_like(ObjectSchema::new("Header").allow_extensions())
        .validate(mutually_exclusive_examples)
});

pub static EXAMPLE: Lazy<ObjectSchema> = Lazy::new(|| {
    ObjectSchema::new("Example")
        .allow_extensions()
        .field(FieldSpec::new("summary", InputType::String))
        .field(FieldSpec::new("description", InputType::String))
        .field(FieldSpec::new("value", InputType::Any))
        .field(FieldSpec::new("externalValue", InputType::String).validate(uri))
        .validate(|validatable| {
            if let Some(input) = validatable.input().as_object() {
                let message = validators::mutually_exclusive(input, "value", "externalValue");
                validatable.add_optional_error(message);
            }
        })
});

/// A list of parameters, unique by name and location.
pub(crate) fn parameters() -> ArrayFactory {
    ArrayFactory::new(referenceable(&PARAMETER)).validate(|validatable| {
        let message = validators::duplicate_parameters(validatable.resolved_input());
        validatable.add_optional_error(message);
    })
}

/// Accessors shared by parameters and headers.
macro_rules! parameter_like_accessors {
    ($name:ident) => {
        impl $name {
            pub fn description(&self) -> Option<&str> {
                self.0.string("description")
            }

            pub fn required(&self) -> bool {
                self.0.boolean("required")
            }

            pub fn deprecated(&self) -> bool {
                self.0.boolean("deprecated")
            }

            pub fn allow_empty_value(&self) -> bool {
                self.0.boolean("allowEmptyValue")
            }

            /// The serialization style, defaulted from where the value goes.
            pub fn style(&self) -> &str {
                self.0.string("style").unwrap_or_default()
            }

            pub fn explode(&self) -> bool {
                self.0.boolean("explode")
            }

            pub fn allow_reserved(&self) -> bool {
                self.0.boolean("allowReserved")
            }

            pub fn schema(&self) -> Result<Option<Schema>> {
                self.0.child("schema")
            }

            pub fn example(&self) -> Option<&Value> {
                self.0.value("example")
            }

            pub fn examples(&self) -> Result<Option<NodeMap<Example>>> {
                self.0.child("examples")
            }

            pub fn content(&self) -> Result<Option<NodeMap<MediaType>>> {
                self.0.child("content")
            }
        }
    };
}

object_node!(
    /// A single operation parameter, unique by name and location.
    Parameter
);

impl Parameter {
    pub fn name(&self) -> &str {
        self.0.string("name").unwrap_or_default()
    }

    /// Where the parameter goes: header, query, cookie or path.
    pub fn location(&self) -> &str {
        self.0.string("in").unwrap_or_default()
    }
}

parameter_like_accessors!(Parameter);

object_node!(Header);

parameter_like_accessors!(Header);

object_node!(Example);

impl Example {
    pub fn summary(&self) -> Option<&str> {
        self.0.string("summary")
    }

    pub fn description(&self) -> Option<&str> {
        self.0.string("description")
    }

    pub fn value(&self) -> Option<&Value> {
        self.0.value("value")
    }

    pub fn external_value(&self) -> Option<&str> {
        self.0.string("externalValue")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeType;
    use crate::node_factory::test_support::*;
    use serde_json::json;

    fn parameter(input: Value) -> Parameter {
        let factory = factory_for(Factory::object(&PARAMETER), input);
        Parameter::from_node(factory.root_node().unwrap()).unwrap()
    }

    fn parameter_errors(input: Value) -> Vec<String> {
        error_strings(&factory_for(Factory::object(&PARAMETER), input))
    }

    #[test]
    fn test_location_must_be_known() {
        assert_eq!(
            parameter_errors(json!({ "name": "id", "in": "body" })),
            ["#/in: in can only be header, query, cookie, or path"]
        );
    }

    #[test]
    fn test_path_parameters_are_required() {
        for input in [
            json!({ "name": "id", "in": "path" }),
            json!({ "name": "id", "in": "path", "required": false }),
        ] {
            assert_eq!(
                parameter_errors(input),
                ["#/required: Must be included and true for a path parameter"]
            );
        }
        assert!(parameter_errors(json!({ "name": "id", "in": "path", "required": true })).is_empty());
    }

    #[test]
    fn test_style_and_explode_defaults() {
        let query = parameter(json!({ "name": "q", "in": "query" }));
        assert_eq!(query.style(), "form");
        assert!(query.explode());
        assert!(!query.required());

        let header = parameter(json!({ "name": "X-Id", "in": "header" }));
        assert_eq!(header.style(), "simple");
        assert!(!header.explode());

        let explicit = parameter(json!({ "name": "q", "in": "query", "style": "spaceDelimited" }));
        assert_eq!(explicit.style(), "spaceDelimited");
        assert!(!explicit.explode());

        let path = parameter(json!({ "name": "id", "in": "path", "required": true, "style": "form" }));
        assert!(path.explode());
    }

    #[test]
    fn test_content_has_one_entry() {
        let with = |content: Value| json!({ "name": "q", "in": "query", "content": content });

        assert!(parameter_errors(with(json!({ "application/json": {} }))).is_empty());
        assert_eq!(
            parameter_errors(with(json!({ "application/json": {}, "text/plain": {} }))),
            ["#/content: Must only have one item"]
        );
        assert_eq!(parameter_errors(with(json!({}))), ["#/content: Must only have one item"]);
        assert!(parameter(with(json!({ "text/plain": {} }))).content().unwrap().is_some());
        assert!(parameter(json!({ "name": "q", "in": "query" })).content().unwrap().is_none());
    }

    #[test]
    fn test_example_and_examples() {
        assert_eq!(
            parameter_errors(json!({
                "name": "q",
                "in": "query",
                "example": "a",
                "examples": { "a": { "value": "a" } }
            })),
            ["#/: example and examples are mutually exclusive fields"]
        );

        let with_examples = parameter(json!({
            "name": "q",
            "in": "query",
            "examples": { "a": { "summary": "An a", "value": "a" } }
        }));
        let example = with_examples.examples().unwrap().unwrap().get("a").unwrap().unwrap();
        assert_eq!(example.summary(), Some("An a"));
        assert_eq!(example.value(), Some(&json!("a")));
    }

    #[test]
    fn test_duplicate_parameters() {
        let factory = crate::node_factory::NodeFactory::new(
            parameters().into(),
            Some(json!([
                { "name": "id", "in": "query" },
                { "name": "id", "in": "header" },
                { "name": "id", "in": "query" }
            ])),
            context(json!({})),
        );
        assert_eq!(error_strings(&factory), ["#/: Duplicate parameters: id in query"]);
    }

    #[test]
    fn test_duplicates_found_through_references() {
        let document = json!({
            "parameters": [{ "$ref": "#/shared" }, { "name": "id", "in": "query" }],
            "shared": { "name": "id", "in": "query" }
        });
        let factory = crate::node_factory::NodeFactory::new(
            parameters().into(),
            Some(document["parameters"].clone()),
            context(document).next_field("parameters"),
        );
        assert_eq!(
            error_strings(&factory),
            ["#/parameters: Duplicate parameters: id in query"]
        );
    }

    #[test]
    fn test_header_defaults() {
        let factory = factory_for(Factory::object(&HEADER), json!({ "description": "Rate limit" }));
        let header = Header::from_node(factory.root_node().unwrap()).unwrap();
        assert_eq!(header.style(), "simple");
        assert!(!header.explode());

        let factory = factory_for(Factory::object(&HEADER), json!({ "name": "X-Rate" }));
        assert_eq!(error_strings(&factory), ["#/: Unexpected field: name"]);
    }
}
