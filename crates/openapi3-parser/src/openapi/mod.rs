//! OpenAPI 3.0 object types.
//!
//! Every type is a static field table that configures the generic object
//! builder, plus a typed view over the nodes it produces.

pub mod components;
pub mod info;
pub mod media;
pub mod parameter;
pub mod paths;
pub mod root;
pub mod schema;
pub mod security;
pub mod server;

pub use components::{Components, COMPONENTS};
pub use info::{Contact, Info, License, CONTACT, INFO, LICENSE};
pub use media::{
    Encoding, Link, MediaType, RequestBody, Response, Responses, ENCODING, LINK, MEDIA_TYPE,
    REQUEST_BODY, RESPONSE,
};
pub use parameter::{Example, Header, Parameter, EXAMPLE, HEADER, PARAMETER};
pub use paths::{Callback, Operation, PathItem, Paths, OPERATION, PATH_ITEM};
pub use root::{ExternalDocumentation, Openapi, Tag, EXTERNAL_DOCUMENTATION, OPENAPI, TAG};
pub use schema::{Discriminator, Schema, Xml, DISCRIMINATOR, SCHEMA, XML};
pub use security::{
    OauthFlow, OauthFlows, SecurityRequirement, SecurityScheme, OAUTH_FLOW, OAUTH_FLOWS,
    SECURITY_SCHEME,
};
pub use server::{Server, ServerVariable, SERVER, SERVER_VARIABLE};

use crate::node_factory::{Factory, MapFactory, ObjectSchema};
use crate::validators;
use once_cell::sync::Lazy;
use serde_json::Value;

/// The factory for a whole OpenAPI document.
pub fn root_factory() -> Factory {
    Factory::object(&OPENAPI)
}

/// An object of the given type, or a `$ref` to one.
pub(crate) fn referenceable(schema: &'static Lazy<ObjectSchema>) -> Factory {
    Factory::reference(Factory::object(schema))
}

/// A map of referenceable objects.
pub(crate) fn referenceable_map(schema: &'static Lazy<ObjectSchema>) -> MapFactory {
    MapFactory::new(referenceable(schema))
}

pub(crate) fn uri(value: &Value) -> Option<String> {
    value.as_str().and_then(validators::url)
}
