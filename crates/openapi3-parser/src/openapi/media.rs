//! Request and response bodies.

use super::parameter::{Example, Header, EXAMPLE, HEADER};
use super::schema::{Schema, SCHEMA};
use super::server::{Server, SERVER};
use super::{referenceable, referenceable_map};
use crate::error::Result;
use crate::node::{object_node, NodeMap};
use crate::node_factory::{
    CollectionDefault, Factory, FieldSpec, InputType, MapFactory, ObjectSchema,
};
use crate::validators;
use once_cell::sync::Lazy;
use serde_json::Value;

/// Status codes (or `default`) to responses.
pub type Responses = NodeMap<Response>;

pub(crate) fn responses() -> MapFactory {
    referenceable_map(&RESPONSE)
        .allow_extensions()
        .validate(|validatable| {
            if let Some(keys) = validatable.input().as_object() {
                let message = validators::responses_keys(keys);
                validatable.add_optional_error(message);
            }
        })
}

/// Media types to their descriptions, rejecting keys that aren't media types.
fn content() -> MapFactory {
    MapFactory::new(Factory::object(&MEDIA_TYPE)).validate(|validatable| {
        let context = validatable.context();
        let keys = validatable.input().as_object().into_iter().flat_map(|map| map.keys());
        for key in keys {
            if let Some(message) = validators::media_type(key) {
                validatable.add_error_at(message, &context.next_field(key));
            }
        }
    })
}

pub static REQUEST_BODY: Lazy<ObjectSchema> = Lazy::new(|| {
    ObjectSchema::new("RequestBody")
        .allow_extensions()
        .field(FieldSpec::new("description", InputType::String))
        .field(FieldSpec::new("content", content()).required())
        .field(FieldSpec::new("required", InputType::Boolean).default(|_| false.into()))
});

pub static MEDIA_TYPE: Lazy<ObjectSchema> = Lazy::new(|| {
    ObjectSchema::new("MediaType")
        .allow_extensions()
        .field(FieldSpec::new("schema", referenceable(&SCHEMA)))
        .field(FieldSpec::new("example", InputType::Any))
        .field(FieldSpec::new(
            "examples",
            referenceable_map(&EXAMPLE).default(CollectionDefault::Null),
        ))
        .field(FieldSpec::new(
            "encoding",
            MapFactory::new(Factory::object(&ENCODING)).default(CollectionDefault::Null),
        ))
        .validate(|validatable| {
            let Some(input) = validatable.input().as_object() else {
                return;
            };
            let message = validators::mutually_exclusive(input, "example", "examples");
            validatable.add_optional_error(message);

            let Some(encoding) = input.get("encoding").and_then(Value::as_object) else {
                return;
            };
            let properties = validatable.resolved_input()["schema"]["properties"].as_object();
            let undefined: Vec<&str> = encoding
                .keys()
                .map(String::as_str)
                .filter(|key| !properties.is_some_and(|properties| properties.contains_key(*key)))
                .collect();
            if !undefined.is_empty() {
                let context = validatable.context();
                validatable.add_error_at(
                    format!(
                        "Keys are not defined as schema properties: {}",
                        undefined.join(", ")
                    ),
                    &context.next_field("encoding"),
                );
            }
        })
});

pub static ENCODING: Lazy<ObjectSchema> = Lazy::new(|| {
    ObjectSchema::new("Encoding")
        .allow_extensions()
        .field(FieldSpec::new("contentType", InputType::String))
        .field(FieldSpec::new("headers", referenceable_map(&HEADER)))
        .field(FieldSpec::new("style", InputType::String))
        .field(FieldSpec::new("explode", InputType::Boolean))
        .field(FieldSpec::new("allowReserved", InputType::Boolean).default(|_| false.into()))
});

pub static RESPONSE: Lazy<ObjectSchema> = Lazy::new(|| {
    ObjectSchema::new("Response")
        .allow_extensions()
        .field(FieldSpec::new("description", InputType::String).required())
        .field(FieldSpec::new("headers", referenceable_map(&HEADER)))
        .field(FieldSpec::new("content", content()))
        .field(FieldSpec::new(
            "links",
            referenceable_map(&LINK).validate(|validatable| {
                if let Some(keys) = validatable.input().as_object() {
                    let message = validators::component_keys(keys);
                    validatable.add_optional_error(message);
                }
            }),
        ))
});

pub static LINK: Lazy<ObjectSchema> = Lazy::new(|| {
    ObjectSchema::new("Link")
        .allow_extensions()
        .field(FieldSpec::new("operationRef", InputType::String))
        .field(FieldSpec::new("operationId", InputType::String))
        .field(FieldSpec::new("parameters", MapFactory::new(InputType::Any)))
        .field(FieldSpec::new("requestBody", InputType::Any))
        .field(FieldSpec::new("description", InputType::String))
        .field(FieldSpec::new("server", Factory::object(&SERVER)))
        .validate(|validatable| {
            if let Some(input) = validatable.input().as_object() {
                let message = validators::mutually_exclusive(input, "operationRef", "operationId");
                validatable.add_optional_error(message);
            }
        })
});

object_node!(RequestBody);

impl RequestBody {
    pub fn description(&self) -> Option<&str> {
        self.0.string("description")
    }

    pub fn content(&self) -> Result<Option<NodeMap<MediaType>>> {
        self.0.child("content")
    }

    pub fn required(&self) -> bool {
        self.0.boolean("required")
    }
}

object_node!(
    /// The schema and examples for one media type.
    MediaType
);

impl MediaType {
    pub fn schema(&self) -> Result<Option<Schema>> {
        self.0.child("schema")
    }

    pub fn example(&self) -> Option<&Value> {
        self.0.value("example")
    }

    pub fn examples(&self) -> Result<Option<NodeMap<Example>>> {
        self.0.child("examples")
    }

    pub fn encoding(&self) -> Result<Option<NodeMap<Encoding>>> {
        self.0.child("encoding")
    }
}

object_node!(Encoding);

impl Encoding {
    pub fn content_type(&self) -> Option<&str> {
        self.0.string("contentType")
    }

    pub fn headers(&self) -> Result<Option<NodeMap<Header>>> {
        self.0.child("headers")
    }

    pub fn style(&self) -> Option<&str> {
        self.0.string("style")
    }

    pub fn explode(&self) -> bool {
        self.0.boolean("explode")
    }

    pub fn allow_reserved(&self) -> bool {
        self.0.boolean("allowReserved")
    }
}

object_node!(Response);

impl Response {
    pub fn description(&self) -> &str {
        self.0.string("description").unwrap_or_default()
    }

    pub fn headers(&self) -> Result<Option<NodeMap<Header>>> {
        self.0.child("headers")
    }

    pub fn content(&self) -> Result<Option<NodeMap<MediaType>>> {
        self.0.child("content")
    }

    pub fn links(&self) -> Result<Option<NodeMap<Link>>> {
        self.0.child("links")
    }
}

object_node!(
    /// A design-time link from a response to another operation.
    Link
);

impl Link {
    pub fn operation_ref(&self) -> Option<&str> {
        self.0.string("operationRef")
    }

    pub fn operation_id(&self) -> Option<&str> {
        self.0.string("operationId")
    }

    pub fn parameters(&self) -> Result<Option<NodeMap<Value>>> {
        self.0.child("parameters")
    }

    pub fn request_body(&self) -> Option<&Value> {
        self.0.value("requestBody")
    }

    pub fn description(&self) -> Option<&str> {
        self.0.string("description")
    }

    pub fn server(&self) -> Result<Option<Server>> {
        self.0.child("server")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeType;
    use crate::node_factory::test_support::*;
    use crate::node_factory::NodeFactory;
    use serde_json::json;

    fn media_type_errors(input: Value) -> Vec<String> {
        error_strings(&factory_for(Factory::object(&MEDIA_TYPE), input))
    }

    #[test]
    fn test_response_content_keys() {
        let factory = factory_for(
            Factory::object(&RESPONSE),
            json!({
                "description": "ok",
                "content": { "application/json": {}, "bad-media-type": {} }
            }),
        );
        assert_eq!(
            error_strings(&factory),
            ["#/content/bad-media-type: \"bad-media-type\" is not a valid media type"]
        );
    }

    #[test]
    fn test_response_link_keys() {
        let factory = factory_for(
            Factory::object(&RESPONSE),
            json!({ "description": "ok", "links": { "bad key": { "operationId": "a" } } }),
        );
        assert_eq!(error_strings(&factory), ["#/links: Contains invalid keys: bad key"]);
    }

    #[test]
    fn test_response_keys() {
        let factory = NodeFactory::new(
            responses().into(),
            Some(json!({
                "200": { "description": "ok" },
                "5tsd8s": { "description": "bad" },
                "x-note": "extension"
            })),
            context(json!({})),
        );
        assert_eq!(
            error_strings(&factory),
            ["#/: Invalid responses keys: '5tsd8s' - default, status codes and status code ranges allowed"]
        );
    }

    #[test]
    fn test_encoding_keys_are_schema_properties() {
        let schema = json!({
            "type": "object",
            "properties": { "name": { "type": "string" }, "field": { "type": "string" } }
        });

        assert!(
            media_type_errors(json!({
                "schema": schema,
                "encoding": { "name": { "contentType": "text/plain" } }
            }))
            .is_empty()
        );
        assert_eq!(
            media_type_errors(json!({
                "schema": schema,
                "encoding": {
                    "key_1": { "contentType": "text/plain" },
                    "key_2": { "contentType": "text/plain" }
                }
            })),
            ["#/encoding: Keys are not defined as schema properties: key_1, key_2"]
        );
    }

    #[test]
    fn test_malformed_schema_skips_encoding_check() {
        let errors = media_type_errors(json!({ "schema": { "properties": [] }, "encoding": {} }));
        assert!(!errors.is_empty());
        assert!(errors.iter().all(|error| !error.starts_with("#/encoding")));
    }

    #[test]
    fn test_examples_default_to_nothing() {
        let factory = factory_for(Factory::object(&MEDIA_TYPE), json!({}));
        let media_type = MediaType::from_node(factory.root_node().unwrap()).unwrap();
        assert!(media_type.examples().unwrap().is_none());
        assert!(media_type.encoding().unwrap().is_none());
    }

    #[test]
    fn test_link_operation_is_exclusive() {
        let factory = factory_for(
            Factory::object(&LINK),
            json!({ "operationRef": "#/paths/~1pets/get", "operationId": "getPets" }),
        );
        assert_eq!(
            error_strings(&factory),
            ["#/: operationRef and operationId are mutually exclusive fields"]
        );
    }
}
