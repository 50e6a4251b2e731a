//! Field declarations that configure the object builder.

use super::Factory;
use crate::validation::Hook;
use serde_json::{Map, Value};

/// Raw value shapes a scalar field can be declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    String,
    Boolean,
    Number,
    Integer,
    Object,
    Array,
    /// Anything goes (examples, defaults, enum members)
    Any,
}

impl InputType {
    pub fn name(&self) -> &'static str {
        match self {
            InputType::String => "String",
            InputType::Boolean => "Boolean",
            InputType::Number => "Number",
            InputType::Integer => "Integer",
            InputType::Object => "Object",
            InputType::Array => "Array",
            InputType::Any => "Any",
        }
    }

    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            InputType::String => value.is_string(),
            InputType::Boolean => value.is_boolean(),
            InputType::Number => value.is_number(),
            InputType::Integer => value.is_i64() || value.is_u64(),
            InputType::Object => value.is_object(),
            InputType::Array => value.is_array(),
            InputType::Any => true,
        }
    }
}

/// Default for an absent field, computed from the object's raw input so it
/// can depend on sibling fields.
pub type FieldDefault = fn(&Map<String, Value>) -> Value;

/// Validator for a single field's resolved value. Returns a message when the
/// value is rejected.
pub type FieldValidator = fn(&Value) -> Option<String>;

/// Declaration of one field of an object type.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub factory: Factory,
    pub required: bool,
    pub default: Option<FieldDefault>,
    pub validate: Option<FieldValidator>,
}

impl FieldSpec {
    pub fn new(name: &'static str, factory: impl Into<Factory>) -> Self {
        Self {
            name,
            factory: factory.into(),
            required: false,
            default: None,
            validate: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default(mut self, default: FieldDefault) -> Self {
        self.default = Some(default);
        self
    }

    pub fn validate(mut self, validate: FieldValidator) -> Self {
        self.validate = Some(validate);
        self
    }
}

/// The static table describing one object type.
#[derive(Debug)]
pub struct ObjectSchema {
    pub name: &'static str,
    pub fields: Vec<FieldSpec>,
    pub allow_extensions: bool,
    /// Input used when the object is absent from its parent
    pub default: Option<fn() -> Value>,
    /// Cross-field checks, run only once every field is valid
    pub validate: Option<Hook>,
}

impl ObjectSchema {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
            allow_extensions: false,
            default: None,
            validate: None,
        }
    }

    /// Accept undeclared `x-` prefixed keys.
    pub fn allow_extensions(mut self) -> Self {
        self.allow_extensions = true;
        self
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn default(mut self, default: fn() -> Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn validate(mut self, validate: Hook) -> Self {
        self.validate = Some(validate);
        self
    }

    pub fn declares(&self, name: &str) -> bool {
        self.fields.iter().any(|field| field.name == name)
    }

    pub fn field_spec(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// Whether an undeclared key may pass through as an extension.
pub fn is_extension(key: &str) -> bool {
    key.starts_with("x-")
}
