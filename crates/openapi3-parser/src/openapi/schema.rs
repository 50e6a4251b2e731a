//! Schema objects, the recursive heart of most documents.

use super::root::{ExternalDocumentation, EXTERNAL_DOCUMENTATION};
use super::{referenceable, referenceable_map, uri};
use crate::error::Result;
use crate::node::{object_node, NodeList, NodeMap};
use crate::node_factory::{ArrayFactory, Factory, FieldSpec, InputType, ObjectSchema};
use once_cell::sync::Lazy;
use serde_json::{json, Value};

fn schemas() -> ArrayFactory {
    ArrayFactory::new(referenceable(&SCHEMA))
}

/// `additionalProperties` is either a flag or a schema for the extra values.
fn additional_properties(input: &Value) -> Option<Factory> {
    match input {
        Value::Bool(_) => Some(InputType::Boolean.into()),
        Value::Object(_) => Some(referenceable(&SCHEMA)),
        _ => None,
    }
}

pub static SCHEMA: Lazy<ObjectSchema> = Lazy::new(|| {
    ObjectSchema::new("Schema")
        .allow_extensions()
        .field(FieldSpec::new("title", InputType::String))
        .field(FieldSpec::new("multipleOf", InputType::Number))
        .field(FieldSpec::new("maximum", InputType::Number))
        .field(FieldSpec::new("exclusiveMaximum", InputType::Boolean).default(|_| false.into()))
        .field(FieldSpec::new("minimum", InputType::Number))
        .field(FieldSpec::new("exclusiveMinimum", InputType::Boolean).default(|_| false.into()))
        .field(FieldSpec::new("maxLength", InputType::Integer))
        .field(FieldSpec::new("minLength", InputType::Integer).default(|_| 0.into()))
        .field(FieldSpec::new("pattern", InputType::String))
        .field(FieldSpec::new("maxItems", InputType::Integer))
        .field(FieldSpec::new("minItems", InputType::Integer).default(|_| 0.into()))
        .field(FieldSpec::new("uniqueItems", InputType::Boolean).default(|_| false.into()))
        .field(FieldSpec::new("maxProperties", InputType::Integer))
        .field(FieldSpec::new("minProperties", InputType::Integer).default(|_| 0.into()))
        .field(FieldSpec::new("required", ArrayFactory::new(InputType::String)))
        .field(FieldSpec::new("enum", InputType::Array))
        .field(FieldSpec::new("type", InputType::String))
        .field(FieldSpec::new("allOf", schemas()))
        .field(FieldSpec::new("oneOf", schemas()))
        .field(FieldSpec::new("anyOf", schemas()))
        .field(FieldSpec::new("not", referenceable(&SCHEMA)))
        .field(FieldSpec::new("items", referenceable(&SCHEMA)))
        .field(FieldSpec::new("properties", referenceable_map(&SCHEMA)))
        .field(
            FieldSpec::new(
                "additionalProperties",
                Factory::Select(additional_properties, "Expected a Boolean or an Object"),
            )
            .default(|_| true.into()),
        )
        .field(FieldSpec::new("description", InputType::String))
        .field(FieldSpec::new("format", InputType::String))
        .field(FieldSpec::new("default", InputType::Any))
        .field(FieldSpec::new("nullable", InputType::Boolean).default(|_| false.into()))
        .field(FieldSpec::new("discriminator", Factory::object(&DISCRIMINATOR)))
        .field(FieldSpec::new("readOnly", InputType::Boolean).default(|_| false.into()))
        .field(FieldSpec::new("writeOnly", InputType::Boolean).default(|_| false.into()))
        .field(FieldSpec::new("xml", Factory::object(&XML)))
        .field(FieldSpec::new(
            "externalDocs",
            Factory::object(&EXTERNAL_DOCUMENTATION),
        ))
        .field(FieldSpec::new("example", InputType::Any))
        .field(FieldSpec::new("deprecated", InputType::Boolean).default(|_| false.into()))
        .validate(|validatable| {
            let input = validatable.input();
            if input["type"] == "array" && input.get("items").is_none_or(Value::is_null) {
                validatable.add_error("items must be defined for a type of array");
            }
            if input["readOnly"] == true && input["writeOnly"] == true {
                validatable.add_error("readOnly and writeOnly cannot both be true");
            }
        })
});

pub static DISCRIMINATOR: Lazy<ObjectSchema> = Lazy::new(|| {
    ObjectSchema::new("Discriminator")
        .field(FieldSpec::new("propertyName", InputType::String).required())
        .field(
            FieldSpec::new("mapping", InputType::Object)
                .default(|_| json!({}))
                .validate(|value| {
                    let all_strings = value
                        .as_object()
                        .is_some_and(|mapping| mapping.values().all(Value::is_string));
                    (!all_strings).then(|| "Expected string keys and string values".to_string())
                }),
        )
});

pub static XML: Lazy<ObjectSchema> = Lazy::new(|| {
    ObjectSchema::new("Xml")
        .allow_extensions()
        .field(FieldSpec::new("name", InputType::String))
        .field(FieldSpec::new("namespace", InputType::String).validate(uri))
        .field(FieldSpec::new("prefix", InputType::String))
        .field(FieldSpec::new("attribute", InputType::Boolean).default(|_| false.into()))
        .field(FieldSpec::new("wrapped", InputType::Boolean).default(|_| false.into()))
});

object_node!(
    /// A data type, possibly composed of or nesting other schemas.
    ///
    /// Schemas are often recursive. Walking into a field that leads back to
    /// an enclosing schema unfolds it on demand.
    Schema
);

impl Schema {
    pub fn title(&self) -> Option<&str> {
        self.0.string("title")
    }

    pub fn multiple_of(&self) -> Option<f64> {
        self.0.value("multipleOf").and_then(Value::as_f64)
    }

    pub fn maximum(&self) -> Option<f64> {
        self.0.value("maximum").and_then(Value::as_f64)
    }

    pub fn exclusive_maximum(&self) -> bool {
        self.0.boolean("exclusiveMaximum")
    }

    pub fn minimum(&self) -> Option<f64> {
        self.0.value("minimum").and_then(Value::as_f64)
    }

    pub fn exclusive_minimum(&self) -> bool {
        self.0.boolean("exclusiveMinimum")
    }

    pub fn max_length(&self) -> Option<u64> {
        self.0.value("maxLength").and_then(Value::as_u64)
    }

    pub fn min_length(&self) -> u64 {
        self.0.value("minLength").and_then(Value::as_u64).unwrap_or(0)
    }

    pub fn pattern(&self) -> Option<&str> {
        self.0.string("pattern")
    }

    pub fn max_items(&self) -> Option<u64> {
        self.0.value("maxItems").and_then(Value::as_u64)
    }

    pub fn min_items(&self) -> u64 {
        self.0.value("minItems").and_then(Value::as_u64).unwrap_or(0)
    }

    pub fn unique_items(&self) -> bool {
        self.0.boolean("uniqueItems")
    }

    pub fn max_properties(&self) -> Option<u64> {
        self.0.value("maxProperties").and_then(Value::as_u64)
    }

    pub fn min_properties(&self) -> u64 {
        self.0.value("minProperties").and_then(Value::as_u64).unwrap_or(0)
    }

    pub fn required(&self) -> Result<Option<NodeList<String>>> {
        self.0.child("required")
    }

    /// Whether `name` is listed as a required property.
    pub fn requires(&self, name: &str) -> bool {
        self.required()
            .ok()
            .flatten()
            .and_then(|required| required.to_vec().ok())
            .is_some_and(|required| required.iter().any(|value| value == name))
    }

    pub fn enum_values(&self) -> Option<&Vec<Value>> {
        self.0.value("enum").and_then(Value::as_array)
    }

    pub fn schema_type(&self) -> Option<&str> {
        self.0.string("type")
    }

    pub fn all_of(&self) -> Result<Option<NodeList<Schema>>> {
        self.0.child("allOf")
    }

    pub fn one_of(&self) -> Result<Option<NodeList<Schema>>> {
        self.0.child("oneOf")
    }

    pub fn any_of(&self) -> Result<Option<NodeList<Schema>>> {
        self.0.child("anyOf")
    }

    pub fn not(&self) -> Result<Option<Schema>> {
        self.0.child("not")
    }

    pub fn items(&self) -> Result<Option<Schema>> {
        self.0.child("items")
    }

    pub fn properties(&self) -> Result<Option<NodeMap<Schema>>> {
        self.0.child("properties")
    }

    /// False only when additional properties are switched off outright.
    pub fn additional_properties(&self) -> bool {
        self.0.value("additionalProperties") != Some(&Value::Bool(false))
    }

    /// The schema additional property values must match, if one is given.
    pub fn additional_properties_schema(&self) -> Result<Option<Schema>> {
        self.0.child("additionalProperties")
    }

    pub fn description(&self) -> Option<&str> {
        self.0.string("description")
    }

    pub fn format(&self) -> Option<&str> {
        self.0.string("format")
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.0.value("default")
    }

    pub fn nullable(&self) -> bool {
        self.0.boolean("nullable")
    }

    pub fn discriminator(&self) -> Result<Option<Discriminator>> {
        self.0.child("discriminator")
    }

    pub fn read_only(&self) -> bool {
        self.0.boolean("readOnly")
    }

    pub fn write_only(&self) -> bool {
        self.0.boolean("writeOnly")
    }

    pub fn xml(&self) -> Result<Option<Xml>> {
        self.0.child("xml")
    }

    pub fn external_docs(&self) -> Result<Option<ExternalDocumentation>> {
        self.0.child("externalDocs")
    }

    pub fn example(&self) -> Option<&Value> {
        self.0.value("example")
    }

    pub fn deprecated(&self) -> bool {
        self.0.boolean("deprecated")
    }
}

object_node!(Discriminator);

impl Discriminator {
    pub fn property_name(&self) -> &str {
        self.0.string("propertyName").unwrap_or_default()
    }

    /// Property values to the schema they select.
    pub fn mapping(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .value("mapping")
            .and_then(Value::as_object)
            .into_iter()
            .flatten()
            .filter_map(|(key, value)| Some((key.as_str(), value.as_str()?)))
    }
}

object_node!(Xml);

impl Xml {
    pub fn name(&self) -> Option<&str> {
        self.0.string("name")
    }

    pub fn namespace(&self) -> Option<&str> {
        self.0.string("namespace")
    }

    pub fn prefix(&self) -> Option<&str> {
        self.0.string("prefix")
    }

    pub fn attribute(&self) -> bool {
        self.0.boolean("attribute")
    }

    pub fn wrapped(&self) -> bool {
        self.0.boolean("wrapped")
    }
}
