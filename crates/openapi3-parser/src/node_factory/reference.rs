//! Following `$ref` markers.
//!
//! The local input is merged over the referenced data (local keys win) and
//! the result is built by the same factory at the target's location.
//!
//! A target is built eagerly, and its errors reported, the first time a
//! reference reaches it. Every later reference to it, and any reference
//! where a recursive structure has come back around, is deferred: its
//! target is not built until someone asks for its node. This keeps the work
//! per document proportional to the number of distinct targets, even when
//! many schemas refer to each other.

use super::{type_error, BuildResult, Built, Factory, NodeFactory};
use crate::context::Context;
use crate::error::{ValidationError, ValidationErrorKind};
use once_cell::unsync::OnceCell;
use openapi_source::{ResolvedReference, SourceLocation};
use serde_json::{Map, Value};
use std::fmt;
use std::rc::Rc;

const MARKER: &str = "$ref";

/// Whether `input` asks to be resolved elsewhere.
pub(crate) fn has_marker(input: Option<&Value>) -> bool {
    input
        .and_then(Value::as_object)
        .is_some_and(|map| map.contains_key(MARKER))
}

pub(crate) fn build(factory: &Factory, input: Option<&Value>, context: &Context) -> BuildResult {
    let Some(local) = input.and_then(Value::as_object) else {
        return BuildResult::invalid(type_error("Object", context), input.cloned().unwrap_or_default());
    };
    let input = Value::Object(local.clone());
    let marker_context = context.next_field(MARKER);

    let Some(reference) = local.get(MARKER).and_then(Value::as_str) else {
        return BuildResult::invalid(type_error("String", &marker_context), input);
    };

    let resolved = match context.resolve_reference(reference) {
        Ok(resolved) => resolved,
        Err(error) => {
            return BuildResult::invalid(
                unresolvable(reference, error.to_string(), &marker_context),
                input,
            );
        }
    };

    if never_resolves(context, &resolved) {
        return BuildResult::invalid(
            unresolvable(
                reference,
                format!("Reference loop: {} never resolves to a value", reference),
                &marker_context,
            ),
            input,
        );
    }

    let pure = local.len() == 1;
    // Overrides make the built input specific to this `$ref`
    let claimed = if pure {
        resolved.location.clone()
    } else {
        context.source_location().clone()
    };
    let merged = merge(local, resolved.data);
    let successor = context.resolved_reference(resolved.location);

    if context.is_self_referencing()
        || successor.is_self_referencing()
        || !context.claim_target(&claimed, &factory.type_name())
    {
        tracing::trace!(
            reference,
            from = %context.source_location(),
            "Deferring reference to an already built target"
        );
        return BuildResult {
            errors: Vec::new(),
            resolved_input: merged.clone(),
            built: Built::Deferred(DeferredReference {
                factory: factory.clone(),
                input: merged,
                context: successor,
                pure,
                target: OnceCell::new(),
            }),
        };
    }

    let target = Rc::new(NodeFactory::new(factory.clone(), Some(merged), successor));
    BuildResult {
        errors: target.errors().to_vec(),
        resolved_input: target.resolved_input().clone(),
        built: Built::Reference { target, pure },
    }
}

fn unresolvable(reference: &str, reason: String, context: &Context) -> ValidationError {
    ValidationError::new(
        ValidationErrorKind::UnresolvableReference {
            reference: reference.to_string(),
            reason,
        },
        context.source_location().clone(),
    )
}

/// Local keys other than the marker override the referenced data.
fn merge(local: &Map<String, Value>, target: Value) -> Value {
    match target {
        Value::Object(mut merged) => {
            for (key, value) in local {
                if key != MARKER {
                    merged.insert(key.clone(), value.clone());
                }
            }
            Value::Object(merged)
        }
        // Nothing to merge into; the target's own factory reports the type
        other => other,
    }
}

/// Follow a chain of references that point straight at other references.
/// True when it comes back to a location it already visited.
fn never_resolves(context: &Context, first: &ResolvedReference) -> bool {
    let mut visited: Vec<SourceLocation> = vec![context.source_location().clone()];
    let mut location = first.location.clone();
    let mut data = first.data.clone();

    loop {
        if visited.contains(&location) {
            return true;
        }
        let Some(next) = data.get(MARKER).and_then(Value::as_str) else {
            return false;
        };
        let Ok(resolved) = context.sources().resolve_reference(next, &location) else {
            return false;
        };
        visited.push(location);
        location = resolved.location;
        data = resolved.data;
    }
}

/// A reference whose target is built only when its node is requested.
pub(crate) struct DeferredReference {
    factory: Factory,
    input: Value,
    context: Context,
    pure: bool,
    target: OnceCell<Rc<NodeFactory>>,
}

impl DeferredReference {
    pub(crate) fn target(&self) -> &Rc<NodeFactory> {
        self.target.get_or_init(|| {
            tracing::trace!(at = %self.context.source_location(), "Unfolding recursive reference");
            Rc::new(NodeFactory::new(
                self.factory.clone(),
                Some(self.input.clone()),
                self.context.clone(),
            ))
        })
    }

    pub(crate) fn pure(&self) -> bool {
        self.pure
    }
}

impl fmt::Debug for DeferredReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredReference")
            .field("context", &self.context)
            .field("pure", &self.pure)
            .finish()
    }
}
