//! Building sequences.

use super::{build_entry, type_error, BuildResult, Built, Factory};
use crate::context::Context;
use crate::validation::{Hook, Scope, Validatable};
use serde_json::Value;

/// What a collection becomes when its input is absent.
#[derive(Debug, Clone, Copy)]
pub enum CollectionDefault {
    /// An empty collection
    Empty,
    /// No value at all
    Null,
    /// Computed from the collection's context; `None` means no value
    Supplier(fn(&Context) -> Option<Value>),
}

impl CollectionDefault {
    pub(crate) fn value(&self, context: &Context, empty: Value) -> Option<Value> {
        match self {
            CollectionDefault::Empty => Some(empty),
            CollectionDefault::Null => None,
            CollectionDefault::Supplier(supply) => supply(context),
        }
    }
}

/// A list whose elements are all built by one factory.
#[derive(Debug, Clone)]
pub struct ArrayFactory {
    pub value_factory: Factory,
    pub default: CollectionDefault,
    /// Treat an empty list like an absent one
    pub use_default_on_empty: bool,
    pub validate: Option<Hook>,
}

impl ArrayFactory {
    pub fn new(value_factory: impl Into<Factory>) -> Self {
        Self {
            value_factory: value_factory.into(),
            default: CollectionDefault::Empty,
            use_default_on_empty: false,
            validate: None,
        }
    }

    pub fn default(mut self, default: CollectionDefault) -> Self {
        self.default = default;
        self
    }

    pub fn use_default_on_empty(mut self) -> Self {
        self.use_default_on_empty = true;
        self
    }

    pub fn validate(mut self, validate: Hook) -> Self {
        self.validate = Some(validate);
        self
    }
}

pub(crate) fn build(array: &ArrayFactory, input: Option<&Value>, context: &Context) -> BuildResult {
    let use_default = match input {
        None => true,
        Some(Value::Array(items)) => items.is_empty() && array.use_default_on_empty,
        Some(_) => false,
    };

    let default_input;
    let input = match input {
        Some(input) if !use_default => input,
        _ => match array.default.value(context, Value::Array(Vec::new())) {
            Some(value) => {
                default_input = value;
                &default_input
            }
            None => return BuildResult::absent(),
        },
    };

    let Some(items) = input.as_array() else {
        return BuildResult::invalid(type_error("Array", context), input.clone());
    };

    let mut errors = Vec::new();
    let mut entries = Vec::with_capacity(items.len());
    let mut resolved = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let (entry, item_errors) =
            build_entry(&array.value_factory, Some(item.clone()), context.next_field(index));
        errors.extend(item_errors);
        resolved.push(entry.resolved_input().clone());
        entries.push(entry);
    }

    let resolved_input = Value::Array(resolved);

    if let Some(validate) = array.validate {
        let mut validatable = Validatable::new(input, &resolved_input, context, Scope::Collection);
        validate(&mut validatable);
        errors.extend(validatable.into_errors());
    }

    BuildResult {
        errors,
        resolved_input,
        built: Built::Array(entries),
    }
}
