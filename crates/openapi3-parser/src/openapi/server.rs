use crate::context::Context;
use crate::error::Result;
use crate::node::{object_node, NodeList, NodeMap};
use crate::node_factory::{
    ArrayFactory, CollectionDefault, Factory, FieldSpec, InputType, MapFactory, ObjectSchema,
};
use once_cell::sync::Lazy;
use serde_json::{json, Value};

pub static SERVER: Lazy<ObjectSchema> = Lazy::new(|| {
    ObjectSchema::new("Server")
        .allow_extensions()
        .field(FieldSpec::new("url", InputType::String).required())
        .field(FieldSpec::new("description", InputType::String))
        .field(FieldSpec::new(
            "variables",
            MapFactory::new(Factory::object(&SERVER_VARIABLE)),
        ))
});

pub static SERVER_VARIABLE: Lazy<ObjectSchema> = Lazy::new(|| {
    ObjectSchema::new("ServerVariable")
        .allow_extensions()
        .field(FieldSpec::new(
            "enum",
            ArrayFactory::new(InputType::String)
                .default(CollectionDefault::Null)
                .validate(|validatable| {
                    if validatable.input().as_array().is_some_and(Vec::is_empty) {
                        validatable.add_error("Expected at least one value");
                    }
                }),
        ))
        .field(FieldSpec::new("default", InputType::String).required())
        .field(FieldSpec::new("description", InputType::String))
});

/// The single server assumed when a document names none.
fn default_servers() -> Value {
    json!([{ "url": "/" }])
}

/// Servers of the whole document, where none are given at the top level.
pub(crate) fn root_servers() -> ArrayFactory {
    ArrayFactory::new(Factory::object(&SERVER))
        .default(CollectionDefault::Supplier(|_| Some(default_servers())))
        .use_default_on_empty()
}

/// Servers of a path or operation, which fall back to the document's own.
pub(crate) fn inherited_servers() -> ArrayFactory {
    fn document_servers(context: &Context) -> Option<Value> {
        let servers = context
            .root_field("servers")
            .filter(|servers| servers.as_array().is_some_and(|servers| !servers.is_empty()));
        Some(servers.unwrap_or_else(default_servers))
    }

    ArrayFactory::new(Factory::object(&SERVER))
        .default(CollectionDefault::Supplier(document_servers))
        .use_default_on_empty()
}

object_node!(Server);

impl Server {
    pub fn url(&self) -> &str {
        self.0.string("url").unwrap_or_default()
    }

    pub fn description(&self) -> Option<&str> {
        self.0.string("description")
    }

    pub fn variables(&self) -> Result<Option<NodeMap<ServerVariable>>> {
        self.0.child("variables")
    }
}

object_node!(
    /// A substitution for a `{name}` in a server URL.
    ServerVariable
);

impl ServerVariable {
    /// The allowed values, when restricted.
    pub fn enum_values(&self) -> Result<Option<NodeList<String>>> {
        self.0.child("enum")
    }

    pub fn default_value(&self) -> &str {
        self.0.string("default").unwrap_or_default()
    }

    pub fn description(&self) -> Option<&str> {
        self.0.string("description")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeType;
    use crate::node_factory::test_support::*;

    #[test]
    fn test_server_with_variables() {
        let factory = factory_for(
            Factory::object(&SERVER),
            json!({
                "url": "https://{region}.example.com",
                "variables": {
                    "region": { "default": "eu", "enum": ["eu", "us"] }
                }
            }),
        );
        let server = Server::from_node(factory.root_node().unwrap()).unwrap();
        let region = server.variables().unwrap().unwrap().get("region").unwrap().unwrap();
        assert_eq!(region.default_value(), "eu");
        assert_eq!(region.enum_values().unwrap().unwrap().to_vec().unwrap(), ["eu", "us"]);
    }

    #[test]
    fn test_variable_enum() {
        let factory = factory_for(Factory::object(&SERVER_VARIABLE), json!({ "default": "a" }));
        let variable = ServerVariable::from_node(factory.root_node().unwrap()).unwrap();
        assert!(variable.enum_values().unwrap().is_none());

        let factory = factory_for(
            Factory::object(&SERVER_VARIABLE),
            json!({ "default": "a", "enum": [] }),
        );
        assert_eq!(error_strings(&factory), ["#/enum: Expected at least one value"]);
    }
}
