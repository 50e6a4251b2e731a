use super::media::{responses, RequestBody, Responses, REQUEST_BODY};
use super::parameter::{parameters, Parameter};
use super::root::{ExternalDocumentation, EXTERNAL_DOCUMENTATION};
use super::security::{self, SecurityRequirement};
use super::server::{inherited_servers, Server};
use super::referenceable;
use crate::error::Result;
use crate::node::{object_node, NodeList, NodeMap};
use crate::node_factory::{ArrayFactory, Factory, FieldSpec, InputType, MapFactory, ObjectSchema};
use crate::validators;
use once_cell::sync::Lazy;

/// Relative paths to their operations.
pub type Paths = NodeMap<PathItem>;

/// Runtime expressions to the path items called back with.
pub type Callback = NodeMap<PathItem>;

/// HTTP methods a path item can describe, in the order they're declared.
pub const METHODS: [&str; 8] = ["get", "put", "post", "delete", "options", "head", "patch", "trace"];

pub(crate) fn paths() -> MapFactory {
    MapFactory::new(referenceable(&PATH_ITEM))
        .allow_extensions()
        .validate(|validatable| {
            let Some(keys) = validatable.input().as_object() else {
                return;
            };
            let invalid = validators::path_keys(keys);
            let conflicting = validators::conflicting_paths(keys);
            validatable.add_optional_error(invalid);
            validatable.add_optional_error(conflicting);
        })
}

pub(crate) fn callback() -> MapFactory {
    MapFactory::new(referenceable(&PATH_ITEM)).allow_extensions()
}

pub static PATH_ITEM: Lazy<ObjectSchema> = Lazy::new(|| {
    METHODS
        .iter()
        .fold(
            ObjectSchema::new("PathItem")
                .allow_extensions()
                .field(FieldSpec::new("summary", InputType::String))
                .field(FieldSpec::new("description", InputType::String)),
            |schema, method| schema.field(FieldSpec::new(*method, Factory::object(&OPERATION))),
        )
        .field(FieldSpec::new("servers", inherited_servers()))
        .field(FieldSpec::new("parameters", parameters()))
});

pub static OPERATION: Lazy<ObjectSchema> = Lazy::new(|| {
    ObjectSchema::new("Operation")
        .allow_extensions()
        .field(FieldSpec::new("tags", ArrayFactory::new(InputType::String)))
        .field(FieldSpec::new("summary", InputType::String))
        .field(FieldSpec::new("description", InputType::String))
        .field(FieldSpec::new(
            "externalDocs",
            Factory::object(&EXTERNAL_DOCUMENTATION),
        ))
        .field(FieldSpec::new("operationId", InputType::String))
        .field(FieldSpec::new("parameters", parameters()))
        .field(FieldSpec::new("requestBody", referenceable(&REQUEST_BODY)))
        .field(FieldSpec::new("responses", responses()).required())
        .field(FieldSpec::new(
            "callbacks",
            MapFactory::new(Factory::reference(callback().into())),
        ))
        .field(FieldSpec::new("deprecated", InputType::Boolean).default(|_| false.into()))
        .field(FieldSpec::new("security", security::requirements()))
        .field(FieldSpec::new("servers", inherited_servers()))
});

object_node!(
    /// The operations available on a single path.
    PathItem
);

impl PathItem {
    pub fn summary(&self) -> Option<&str> {
        self.0.string("summary")
    }

    pub fn description(&self) -> Option<&str> {
        self.0.string("description")
    }

    /// The operation for an HTTP method, given in lower case.
    pub fn operation(&self, method: &str) -> Result<Option<Operation>> {
        if METHODS.contains(&method) {
            self.0.child(method)
        } else {
            Ok(None)
        }
    }

    pub fn get(&self) -> Result<Option<Operation>> {
        self.operation("get")
    }

    pub fn put(&self) -> Result<Option<Operation>> {
        self.operation("put")
    }

    pub fn post(&self) -> Result<Option<Operation>> {
        self.operation("post")
    }

    pub fn delete(&self) -> Result<Option<Operation>> {
        self.operation("delete")
    }

    pub fn options(&self) -> Result<Option<Operation>> {
        self.operation("options")
    }

    pub fn head(&self) -> Result<Option<Operation>> {
        self.operation("head")
    }

    pub fn patch(&self) -> Result<Option<Operation>> {
        self.operation("patch")
    }

    pub fn trace(&self) -> Result<Option<Operation>> {
        self.operation("trace")
    }

    /// Every described operation with its method.
    pub fn operations(&self) -> Result<Vec<(&'static str, Operation)>> {
        let mut operations = Vec::new();
        for method in METHODS {
            if let Some(operation) = self.operation(method)? {
                operations.push((method, operation));
            }
        }
        Ok(operations)
    }

    pub fn servers(&self) -> Result<Option<NodeList<Server>>> {
        self.0.child("servers")
    }

    pub fn parameters(&self) -> Result<Option<NodeList<Parameter>>> {
        self.0.child("parameters")
    }
}

object_node!(Operation);

impl Operation {
    pub fn tags(&self) -> Result<Option<NodeList<String>>> {
        self.0.child("tags")
    }

    pub fn summary(&self) -> Option<&str> {
        self.0.string("summary")
    }

    pub fn description(&self) -> Option<&str> {
        self.0.string("description")
    }

    pub fn external_docs(&self) -> Result<Option<ExternalDocumentation>> {
        self.0.child("externalDocs")
    }

    pub fn operation_id(&self) -> Option<&str> {
        self.0.string("operationId")
    }

    pub fn parameters(&self) -> Result<Option<NodeList<Parameter>>> {
        self.0.child("parameters")
    }

    pub fn request_body(&self) -> Result<Option<RequestBody>> {
        self.0.child("requestBody")
    }

    pub fn responses(&self) -> Result<Option<Responses>> {
        self.0.child("responses")
    }

    pub fn callbacks(&self) -> Result<Option<NodeMap<Callback>>> {
        self.0.child("callbacks")
    }

    pub fn deprecated(&self) -> bool {
        self.0.boolean("deprecated")
    }

    pub fn security(&self) -> Result<Option<NodeList<SecurityRequirement>>> {
        self.0.child("security")
    }

    pub fn servers(&self) -> Result<Option<NodeList<Server>>> {
        self.0.child("servers")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::node::NodeType;
    use crate::node_factory::test_support::*;
    use crate::node_factory::NodeFactory;
    use serde_json::{json, Value};

    /// A factory for the path item at `#/paths/~1test` of a document.
    fn path_item(document: Value) -> NodeFactory {
        let input = document["paths"]["/test"].clone();
        let context: Context = context(document).next_field("paths").next_field("/test");
        NodeFactory::new(referenceable(&PATH_ITEM), Some(input), context)
    }

    fn document(path_item: Value) -> Value {
        json!({
            "openapi": "3.0.0",
            "info": { "title": "Servers", "version": "1.0.0" },
            "paths": { "/test": path_item },
            "servers": [{ "url": "https://dev.example.com/v1", "description": "Development server" }]
        })
    }

    #[test]
    fn test_servers_default_to_document_servers() {
        for input in [json!({}), json!({ "servers": null }), json!({ "servers": [] })] {
            let factory = path_item(document(input));
            let item = PathItem::from_node(factory.root_node().unwrap()).unwrap();
            let server = item.servers().unwrap().unwrap().get(0).unwrap().unwrap();
            assert_eq!(server.url(), "https://dev.example.com/v1");
            assert_eq!(server.description(), Some("Development server"));
        }
    }

    #[test]
    fn test_own_servers() {
        let factory = path_item(document(json!({
            "servers": [{ "url": "https://prod.example.com/v1" }],
            "get": { "responses": {} }
        })));
        let item = PathItem::from_node(factory.root_node().unwrap()).unwrap();
        let server = item.servers().unwrap().unwrap().get(0).unwrap().unwrap();
        assert_eq!(server.url(), "https://prod.example.com/v1");

        let operations = item.operations().unwrap();
        assert_eq!(operations.len(), 1);
        assert_eq!(operations[0].0, "get");
        let operation_server = operations[0].1.servers().unwrap().unwrap().get(0).unwrap().unwrap();
        assert_eq!(operation_server.url(), "https://dev.example.com/v1");
    }

    #[test]
    fn test_reference_with_overrides_reports_own_location() {
        let mut document = document(json!({
            "$ref": "#/path_items/example",
            "summary": "Overridden"
        }));
        document["path_items"] = json!({ "example": { "summary": "Example", "description": "Shared" } });

        let factory = path_item(document);
        let item = PathItem::from_node(factory.root_node().unwrap()).unwrap();
        assert_eq!(item.summary(), Some("Overridden"));
        assert_eq!(item.description(), Some("Shared"));
        assert_eq!(item.node_context().source_location().to_string(), "#/paths/~1test");
    }

    #[test]
    fn test_pure_reference_reports_target_location() {
        let mut document = document(json!({ "$ref": "#/path_items/example" }));
        document["path_items"] = json!({ "example": { "summary": "Example" } });

        let factory = path_item(document);
        let item = PathItem::from_node(factory.root_node().unwrap()).unwrap();
        assert_eq!(
            item.node_context().source_location().to_string(),
            "#/path_items/example"
        );
        assert_eq!(item.node_context().document_location().to_string(), "#/paths/~1test");
    }

    #[test]
    fn test_operation_requires_responses() {
        let factory = factory_for(Factory::object(&OPERATION), json!({ "summary": "s" }));
        assert_eq!(error_strings(&factory), ["#/: Missing required field: responses"]);
    }

    #[test]
    fn test_operation_defaults() {
        let factory = factory_for(Factory::object(&OPERATION), json!({ "responses": {} }));
        let operation = Operation::from_node(factory.root_node().unwrap()).unwrap();
        assert!(!operation.deprecated());
        assert!(operation.parameters().unwrap().unwrap().is_empty());
        assert!(operation.request_body().unwrap().is_none());
    }

    #[test]
    fn test_path_keys() {
        let factory = NodeFactory::new(
            paths().into(),
            Some(json!({ "/pets/{id}": {}, "/pets/{name}": {}, "pets": {}, "x-internal": true })),
            context(json!({})),
        );
        assert_eq!(
            error_strings(&factory),
            [
                "#/: There are invalid paths: 'pets'",
                "#/: There are paths that conflict: '/pets/{id}', '/pets/{name}'",
            ]
        );
    }

    #[test]
    fn test_callbacks() {
        let factory = factory_for(
            Factory::object(&OPERATION),
            json!({
                "responses": {},
                "callbacks": {
                    "onEvent": { "{$request.body#/url}": { "post": { "responses": {} } } }
                }
            }),
        );
        let operation = Operation::from_node(factory.root_node().unwrap()).unwrap();
        let callback = operation.callbacks().unwrap().unwrap().get("onEvent").unwrap().unwrap();
        let item = callback.get("{$request.body#/url}").unwrap().unwrap();
        assert!(item.post().unwrap().is_some());
    }
}
