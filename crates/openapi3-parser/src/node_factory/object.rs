//! Building objects from their field tables.

use super::field::is_extension;
use super::{build_entry, type_error, BuildResult, Built, Entry, ObjectSchema};
use crate::context::Context;
use crate::error::{ValidationError, ValidationErrorKind};
use crate::validation::{Scope, Validatable};
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Validate `input` against `schema`.
///
/// Declared fields are handled in declaration order, then undeclared keys in
/// input order. The object's own validator only runs when nothing else
/// failed.
pub(crate) fn build(schema: &ObjectSchema, input: Option<&Value>, context: &Context) -> BuildResult {
    let default_input;
    let input = match (input, schema.default) {
        (Some(input), _) => input,
        (None, Some(default)) => {
            default_input = default();
            &default_input
        }
        (None, None) => {
            return BuildResult::invalid(type_error("Object", context), Value::Null);
        }
    };

    let Some(map) = input.as_object() else {
        return BuildResult::invalid(type_error("Object", context), input.clone());
    };

    let mut errors = Vec::new();
    let mut fields = IndexMap::new();
    let mut resolved = Map::new();

    for spec in &schema.fields {
        match map.get(spec.name).filter(|value| !value.is_null()) {
            Some(value) => {
                let field_context = context.next_field(spec.name);
                let (entry, field_errors) =
                    build_entry(&spec.factory, Some(value.clone()), field_context.clone());

                if field_errors.is_empty() {
                    let message = spec.validate.and_then(|validate| validate(entry.resolved_input()));
                    if let Some(message) = message {
                        errors.push(ValidationError::new(
                            ValidationErrorKind::FieldValidation { message },
                            field_context.source_location().clone(),
                        ));
                    }
                } else {
                    errors.extend(field_errors);
                }

                resolved.insert(spec.name.to_string(), entry.resolved_input().clone());
                fields.insert(spec.name.to_string(), entry);
            }
            None if spec.required => {
                errors.push(ValidationError::new(
                    ValidationErrorKind::MissingRequiredField {
                        field: spec.name.to_string(),
                    },
                    context.source_location().clone(),
                ));
            }
            None => {
                if let Some(default) = spec.default {
                    let value = default(map);
                    resolved.insert(spec.name.to_string(), value.clone());
                    fields.insert(spec.name.to_string(), Entry::Value(value));
                } else if spec.factory.builds_when_absent() {
                    let (entry, field_errors) =
                        build_entry(&spec.factory, None, context.next_field(spec.name));
                    errors.extend(field_errors);
                    resolved.insert(spec.name.to_string(), entry.resolved_input().clone());
                    fields.insert(spec.name.to_string(), entry);
                }
            }
        }
    }

    for (key, value) in map {
        if schema.declares(key) {
            continue;
        }
        if schema.allow_extensions && is_extension(key) {
            resolved.insert(key.clone(), value.clone());
            fields.insert(key.clone(), Entry::Value(value.clone()));
        } else {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnexpectedField { field: key.clone() },
                context.source_location().clone(),
            ));
        }
    }

    let resolved_input = Value::Object(resolved);

    if errors.is_empty()
        && let Some(validate) = schema.validate
    {
        let mut validatable = Validatable::new(input, &resolved_input, context, Scope::Object);
        validate(&mut validatable);
        errors.extend(validatable.into_errors());
    }

    BuildResult {
        errors,
        resolved_input,
        built: Built::Object(fields),
    }
}
