// Error types for building OpenAPI documents

use openapi_source::{SourceError, SourceLocation};
use std::fmt;
use thiserror::Error;

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, Error>;

/// Hard failures surfaced to callers.
///
/// Validation problems are not errors in this sense: they are collected as
/// [`ValidationError`] values and never interrupt a build.
#[derive(Debug, Error)]
pub enum Error {
    /// The root document could not be read or decoded
    #[error(transparent)]
    Source(#[from] SourceError),

    /// A node was requested from data that failed validation
    #[error("{type_name} at {location} is invalid: {}", summarize(.errors))]
    InvalidNode {
        type_name: String,
        location: String,
        errors: Vec<ValidationError>,
    },

    /// The root node was requested from an invalid document
    #[error("Document is invalid ({error_count} validation errors)")]
    InvalidDocument { error_count: usize },
}

fn summarize(errors: &[ValidationError]) -> String {
    match errors {
        [] => "no errors recorded".to_string(),
        [first] => first.to_string(),
        [first, rest @ ..] => format!("{} (and {} more)", first, rest.len()),
    }
}

/// Structured validation error kinds
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ValidationErrorKind {
    /// Input has the wrong shape for what was expected here
    InvalidType { expected: String },

    /// A required field is absent
    MissingRequiredField { field: String },

    /// A key that isn't declared, on a type that doesn't accept it
    UnexpectedField { field: String },

    /// A field or object validator rejected the value
    FieldValidation { message: String },

    /// A collection-wide rule was broken (duplicates, key patterns)
    CollectionValidation { message: String },

    /// A `$ref` did not lead to a value
    UnresolvableReference { reference: String, reason: String },
}

impl ValidationErrorKind {
    /// Get the error code for this error kind
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationErrorKind::InvalidType { .. } => "OAS-1-10",
            ValidationErrorKind::MissingRequiredField { .. } => "OAS-1-11",
            ValidationErrorKind::UnexpectedField { .. } => "OAS-1-12",
            ValidationErrorKind::FieldValidation { .. } => "OAS-1-13",
            ValidationErrorKind::CollectionValidation { .. } => "OAS-1-14",
            ValidationErrorKind::UnresolvableReference { .. } => "OAS-1-15",
        }
    }

    /// Format a human-readable message from this error kind
    pub fn message(&self) -> String {
        match self {
            ValidationErrorKind::InvalidType { expected } => {
                format!("Invalid type. Expected {}", expected)
            }
            ValidationErrorKind::MissingRequiredField { field } => {
                format!("Missing required field: {}", field)
            }
            ValidationErrorKind::UnexpectedField { field } => {
                format!("Unexpected field: {}", field)
            }
            ValidationErrorKind::FieldValidation { message }
            | ValidationErrorKind::CollectionValidation { message } => message.clone(),
            ValidationErrorKind::UnresolvableReference { reason, .. } => reason.clone(),
        }
    }
}

/// A validation problem tied to the place in the source it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub location: SourceLocation,
}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, location: SourceLocation) -> Self {
        Self { kind, location }
    }

    /// Get the human-readable message for this error
    pub fn message(&self) -> String {
        self.kind.message()
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        self.kind.error_code()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message())
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use openapi_source::{SourceCollection, SourceInput};
    use serde_json::json;

    #[test]
    fn test_messages_and_codes() {
        let kind = ValidationErrorKind::MissingRequiredField {
            field: "description".to_string(),
        };
        assert_eq!(kind.message(), "Missing required field: description");
        assert_eq!(kind.error_code(), "OAS-1-11");

        let kind = ValidationErrorKind::InvalidType {
            expected: "Object".to_string(),
        };
        assert_eq!(kind.message(), "Invalid type. Expected Object");
    }

    #[test]
    fn test_kind_serializes_tagged() {
        let kind = ValidationErrorKind::UnexpectedField {
            field: "extra".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&kind).unwrap(),
            json!({ "type": "UnexpectedField", "data": { "field": "extra" } })
        );
    }

    #[test]
    fn test_invalid_node_message() {
        let sources = SourceCollection::load(SourceInput::raw(json!({}))).unwrap();
        let location = sources.root_location().next_field("info");
        let error = Error::InvalidNode {
            type_name: "Info".to_string(),
            location: location.to_string(),
            errors: vec![
                ValidationError::new(
                    ValidationErrorKind::MissingRequiredField {
                        field: "title".to_string(),
                    },
                    location.clone(),
                ),
                ValidationError::new(
                    ValidationErrorKind::MissingRequiredField {
                        field: "version".to_string(),
                    },
                    location,
                ),
            ],
        };

        assert_eq!(
            error.to_string(),
            "Info at #/info is invalid: #/info: Missing required field: title (and 1 more)"
        );
    }
}
