use super::uri;
use crate::error::Result;
use crate::node::object_node;
use crate::node_factory::{Factory, FieldSpec, InputType, ObjectSchema};
use crate::validators;
use once_cell::sync::Lazy;

pub static INFO: Lazy<ObjectSchema> = Lazy::new(|| {
    ObjectSchema::new("Info")
        .allow_extensions()
        .field(FieldSpec::new("title", InputType::String).required())
        .field(FieldSpec::new("description", InputType::String))
        .field(FieldSpec::new("termsOfService", InputType::String).validate(uri))
        .field(FieldSpec::new("contact", Factory::object(&CONTACT)))
        .field(FieldSpec::new("license", Factory::object(&LICENSE)))
        .field(FieldSpec::new("version", InputType::String).required())
});

pub static CONTACT: Lazy<ObjectSchema> = Lazy::new(|| {
    ObjectSchema::new("Contact")
        .allow_extensions()
        .field(FieldSpec::new("name", InputType::String))
        .field(FieldSpec::new("url", InputType::String).validate(uri))
        .field(
            FieldSpec::new("email", InputType::String)
                .validate(|value| value.as_str().and_then(validators::email)),
        )
});

pub static LICENSE: Lazy<ObjectSchema> = Lazy::new(|| {
    ObjectSchema::new("License")
        .allow_extensions()
        .field(FieldSpec::new("name", InputType::String).required())
        .field(FieldSpec::new("url", InputType::String).validate(uri))
});

object_node!(
    /// Metadata about the API.
    Info
);

impl Info {
    pub fn title(&self) -> &str {
        self.0.string("title").unwrap_or_default()
    }

    pub fn description(&self) -> Option<&str> {
        self.0.string("description")
    }

    pub fn terms_of_service(&self) -> Option<&str> {
        self.0.string("termsOfService")
    }

    pub fn contact(&self) -> Result<Option<Contact>> {
        self.0.child("contact")
    }

    pub fn license(&self) -> Result<Option<License>> {
        self.0.child("license")
    }

    /// Version of the described API, not of OpenAPI.
    pub fn version(&self) -> &str {
        self.0.string("version").unwrap_or_default()
    }
}

object_node!(Contact);

impl Contact {
    pub fn name(&self) -> Option<&str> {
        self.0.string("name")
    }

    pub fn url(&self) -> Option<&str> {
        self.0.string("url")
    }

    pub fn email(&self) -> Option<&str> {
        self.0.string("email")
    }
}

object_node!(License);

impl License {
    pub fn name(&self) -> &str {
        self.0.string("name").unwrap_or_default()
    }

    pub fn url(&self) -> Option<&str> {
        self.0.string("url")
    }
}
