use super::info::{Info, INFO};
use super::security::SecurityRequirement;
use super::server::{root_servers, Server};
use super::{security, uri, Components, Paths, COMPONENTS};
use crate::error::Result;
use crate::node::{object_node, NodeList};
use crate::node_factory::{ArrayFactory, Factory, FieldSpec, InputType, ObjectSchema};
use crate::validators;
use once_cell::sync::Lazy;

pub static OPENAPI: Lazy<ObjectSchema> = Lazy::new(|| {
    ObjectSchema::new("Openapi")
        .allow_extensions()
        .field(FieldSpec::new("openapi", InputType::String).required())
        .field(FieldSpec::new("info", Factory::object(&INFO)).required())
        .field(FieldSpec::new("servers", root_servers()))
        .field(FieldSpec::new("paths", super::paths::paths()).required())
        .field(FieldSpec::new("components", Factory::object(&COMPONENTS)))
        .field(FieldSpec::new("security", security::requirements()))
        .field(FieldSpec::new(
            "tags",
            ArrayFactory::new(Factory::object(&TAG)).validate(|validatable| {
                let message = validators::duplicate_tags(validatable.input());
                validatable.add_optional_error(message);
            }),
        ))
        .field(FieldSpec::new(
            "externalDocs",
            Factory::object(&EXTERNAL_DOCUMENTATION),
        ))
});

pub static TAG: Lazy<ObjectSchema> = Lazy::new(|| {
    ObjectSchema::new("Tag")
        .allow_extensions()
        .field(FieldSpec::new("name", InputType::String).required())
        .field(FieldSpec::new("description", InputType::String))
        .field(FieldSpec::new(
            "externalDocs",
            Factory::object(&EXTERNAL_DOCUMENTATION),
        ))
});

pub static EXTERNAL_DOCUMENTATION: Lazy<ObjectSchema> = Lazy::new(|| {
    ObjectSchema::new("ExternalDocumentation")
        .allow_extensions()
        .field(FieldSpec::new("description", InputType::String))
        .field(FieldSpec::new("url", InputType::String).required().validate(uri))
});

object_node!(
    /// The root of an OpenAPI document.
    Openapi
);

impl Openapi {
    /// The OpenAPI version the document is written against.
    pub fn openapi(&self) -> &str {
        self.0.string("openapi").unwrap_or_default()
    }

    pub fn info(&self) -> Result<Option<Info>> {
        self.0.child("info")
    }

    /// Never empty: a document without servers is served from `/`.
    pub fn servers(&self) -> Result<Option<NodeList<Server>>> {
        self.0.child("servers")
    }

    pub fn paths(&self) -> Result<Option<Paths>> {
        self.0.child("paths")
    }

    pub fn components(&self) -> Result<Option<Components>> {
        self.0.child("components")
    }

    pub fn security(&self) -> Result<Option<NodeList<SecurityRequirement>>> {
        self.0.child("security")
    }

    pub fn tags(&self) -> Result<Option<NodeList<Tag>>> {
        self.0.child("tags")
    }

    pub fn external_docs(&self) -> Result<Option<ExternalDocumentation>> {
        self.0.child("externalDocs")
    }
}

object_node!(Tag);

impl Tag {
    pub fn name(&self) -> &str {
        self.0.string("name").unwrap_or_default()
    }

    pub fn description(&self) -> Option<&str> {
        self.0.string("description")
    }

    pub fn external_docs(&self) -> Result<Option<ExternalDocumentation>> {
        self.0.child("externalDocs")
    }
}

object_node!(ExternalDocumentation);

impl ExternalDocumentation {
    pub fn description(&self) -> Option<&str> {
        self.0.string("description")
    }

    pub fn url(&self) -> &str {
        self.0.string("url").unwrap_or_default()
    }
}
