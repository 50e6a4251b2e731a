//! Collecting validation errors raised by object and collection hooks.

use crate::context::Context;
use crate::error::{ValidationError, ValidationErrorKind};
use serde_json::Value;

/// What a hook is validating. Decides the kind of error it raises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scope {
    Object,
    Collection,
}

/// Handed to validation hooks once a value has been built.
///
/// Errors default to the location of the value being validated, but can be
/// placed on any other context (a single offending key, for instance).
pub struct Validatable<'a> {
    input: &'a Value,
    resolved_input: &'a Value,
    context: &'a Context,
    scope: Scope,
    errors: Vec<ValidationError>,
}

impl<'a> Validatable<'a> {
    pub(crate) fn new(
        input: &'a Value,
        resolved_input: &'a Value,
        context: &'a Context,
        scope: Scope,
    ) -> Self {
        Self {
            input,
            resolved_input,
            context,
            scope,
            errors: Vec::new(),
        }
    }

    /// The raw input, after any reference merge.
    pub fn input(&self) -> &'a Value {
        self.input
    }

    /// The input with every nested reference resolved.
    pub fn resolved_input(&self) -> &'a Value {
        self.resolved_input
    }

    pub fn context(&self) -> &'a Context {
        self.context
    }

    /// Add an error at the location being validated.
    pub fn add_error(&mut self, message: impl Into<String>) {
        let context = self.context;
        self.add_error_at(message, context);
    }

    /// Add an error at a specific location.
    pub fn add_error_at(&mut self, message: impl Into<String>, context: &Context) {
        let message = message.into();
        let kind = match self.scope {
            Scope::Object => ValidationErrorKind::FieldValidation { message },
            Scope::Collection => ValidationErrorKind::CollectionValidation { message },
        };
        self.errors
            .push(ValidationError::new(kind, context.source_location().clone()));
    }

    /// Add the message if there is one. Convenient with validators that
    /// return `Option<String>`.
    pub fn add_optional_error(&mut self, message: Option<String>) {
        if let Some(message) = message {
            self.add_error(message);
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub(crate) fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }
}

/// Validation hook run over a built object or collection.
pub type Hook = fn(&mut Validatable);

#[cfg(test)]
mod tests {
    use super::*;
    use openapi_source::{SourceCollection, SourceInput};
    use serde_json::json;
    use std::rc::Rc;

    #[test]
    fn test_errors_default_to_own_location() {
        let sources = SourceCollection::load(SourceInput::raw(json!({}))).unwrap();
        let context = Context::root(Rc::new(sources)).next_field("tags");
        let input = json!([]);

        let mut validatable = Validatable::new(&input, &input, &context, Scope::Collection);
        validatable.add_error("Duplicate tag names: a");
        validatable.add_error_at("bad key", &context.next_field("x"));
        validatable.add_optional_error(None);

        let errors = validatable.into_errors();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].location.to_string(), "#/tags");
        assert_eq!(
            errors[0].kind,
            ValidationErrorKind::CollectionValidation {
                message: "Duplicate tag names: a".to_string()
            }
        );
        assert_eq!(errors[1].location.to_string(), "#/tags/x");
    }
}
