use super::media::{Link, RequestBody, Response, LINK, REQUEST_BODY, RESPONSE};
use super::parameter::{Example, Header, Parameter, EXAMPLE, HEADER, PARAMETER};
use super::paths::{callback, Callback};
use super::schema::{Schema, SCHEMA};
use super::security::{SecurityScheme, SECURITY_SCHEME};
use super::referenceable;
use crate::error::Result;
use crate::node::{object_node, NodeMap};
use crate::node_factory::{Factory, FieldSpec, MapFactory, ObjectSchema};
use crate::validation::Validatable;
use crate::validators;
use once_cell::sync::Lazy;
use serde_json::json;

fn component_keys(validatable: &mut Validatable) {
    if let Some(keys) = validatable.input().as_object() {
        let message = validators::component_keys(keys);
        validatable.add_optional_error(message);
    }
}

fn components(value_factory: Factory) -> MapFactory {
    MapFactory::new(value_factory).validate(component_keys)
}

pub static COMPONENTS: Lazy<ObjectSchema> = Lazy::new(|| {
    ObjectSchema::new("Components")
        .allow_extensions()
        .default(|| json!({}))
        .field(FieldSpec::new("schemas", components(referenceable(&SCHEMA))))
        .field(FieldSpec::new("responses", components(referenceable(&RESPONSE))))
        .field(FieldSpec::new("parameters", components(referenceable(&PARAMETER))))
        .field(FieldSpec::new("examples", components(referenceable(&EXAMPLE))))
        .field(FieldSpec::new("requestBodies", components(referenceable(&REQUEST_BODY))))
        .field(FieldSpec::new("headers", components(referenceable(&HEADER))))
        .field(FieldSpec::new(
            "securitySchemes",
            components(referenceable(&SECURITY_SCHEME)),
        ))
        .field(FieldSpec::new("links", components(referenceable(&LINK))))
        .field(FieldSpec::new(
            "callbacks",
            components(Factory::reference(callback().into())),
        ))
});

object_node!(
    /// Reusable objects, each keyed by a name other parts refer to.
    Components
);

impl Components {
    pub fn schemas(&self) -> Result<Option<NodeMap<Schema>>> {
        self.0.child("schemas")
    }

    pub fn responses(&self) -> Result<Option<NodeMap<Response>>> {
        self.0.child("responses")
    }

    pub fn parameters(&self) -> Result<Option<NodeMap<Parameter>>> {
        self.0.child("parameters")
    }

    pub fn examples(&self) -> Result<Option<NodeMap<Example>>> {
        self.0.child("examples")
    }

    pub fn request_bodies(&self) -> Result<Option<NodeMap<RequestBody>>> {
        self.0.child("requestBodies")
    }

    pub fn headers(&self) -> Result<Option<NodeMap<Header>>> {
        self.0.child("headers")
    }

    pub fn security_schemes(&self) -> Result<Option<NodeMap<SecurityScheme>>> {
        self.0.child("securitySchemes")
    }

    pub fn links(&self) -> Result<Option<NodeMap<Link>>> {
        self.0.child("links")
    }

    pub fn callbacks(&self) -> Result<Option<NodeMap<Callback>>> {
        self.0.child("callbacks")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeType;
    use crate::node_factory::test_support::*;

    #[test]
    fn test_invalid_keys() {
        let factory = factory_for(
            Factory::object(&COMPONENTS),
            json!({
                "schemas": { "Valid.Name-1_a": {}, "Invalid Name": {} },
                "responses": { "not/valid": { "description": "x" } }
            }),
        );
        assert_eq!(
            error_strings(&factory),
            [
                "#/schemas: Contains invalid keys: Invalid Name",
                "#/responses: Contains invalid keys: not/valid",
            ]
        );
    }

    #[test]
    fn test_references_between_components() {
        let document = json!({
            "schemas": {
                "Pet": { "type": "object", "properties": { "name": { "type": "string" } } },
                "Pets": { "type": "array", "items": { "$ref": "#/schemas/Pet" } }
            },
            "responses": {
                "GeneralError": {
                    "description": "General Error",
                    "content": { "application/json": { "schema": { "$ref": "#/schemas/Pet" } } }
                },
                "Alias": { "$ref": "#/responses/GeneralError" }
            }
        });
        let factory = factory_for(Factory::object(&COMPONENTS), document);
        assert!(factory.is_valid());

        let components = Components::from_node(factory.root_node().unwrap()).unwrap();
        let pets = components.schemas().unwrap().unwrap().get("Pets").unwrap().unwrap();
        let pet = pets.items().unwrap().unwrap();
        assert_eq!(pet.node_context().source_location().to_string(), "#/schemas/Pet");
        assert!(pet.properties().unwrap().unwrap().contains_key("name"));

        let alias = components.responses().unwrap().unwrap().get("Alias").unwrap().unwrap();
        assert_eq!(alias.description(), "General Error");
        assert_eq!(
            alias.node_context().source_location().to_string(),
            "#/responses/GeneralError"
        );
        assert_eq!(
            alias.node_context().document_location().to_string(),
            "#/responses/Alias"
        );
    }

    #[test]
    fn test_broken_reference() {
        let factory = factory_for(
            Factory::object(&COMPONENTS),
            json!({ "schemas": { "Pet": { "$ref": "#/schemas/Missing" } } }),
        );
        assert_eq!(
            error_strings(&factory),
            ["#/schemas/Pet/$ref: #/schemas/Missing was not found"]
        );
    }
}
