//! Where a factory is in the document and how it got there.

use openapi_source::{
    PointerSegment, ReferenceError, ResolvedReference, SourceCollection, SourceLocation,
};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

/// The location a node factory is building from, plus the chain of `$ref`
/// locations followed to reach it (most recent first).
///
/// A context is never changed in place. Descending into a field keeps the
/// chain as it is; only following a reference makes it longer.
///
/// Every context derived from the same root also shares the record of which
/// reference targets have been built, so each target is validated once per
/// document however many references lead to it.
#[derive(Clone)]
pub struct Context {
    source_location: SourceLocation,
    reference_locations: Vec<SourceLocation>,
    sources: Rc<SourceCollection>,
    built_targets: Rc<RefCell<HashSet<(SourceLocation, String)>>>,
}

impl Context {
    /// Context for the root of the root document.
    pub fn root(sources: Rc<SourceCollection>) -> Self {
        Self {
            source_location: sources.root_location(),
            reference_locations: Vec::new(),
            sources,
            built_targets: Rc::default(),
        }
    }

    /// Context for a field (or element) within this context's data.
    pub fn next_field(&self, segment: impl Into<PointerSegment>) -> Self {
        Self {
            source_location: self.source_location.next_field(segment),
            reference_locations: self.reference_locations.clone(),
            sources: Rc::clone(&self.sources),
            built_targets: Rc::clone(&self.built_targets),
        }
    }

    /// Context for the target of a reference made from this context.
    pub fn resolved_reference(&self, target: SourceLocation) -> Self {
        let mut reference_locations = Vec::with_capacity(self.reference_locations.len() + 1);
        reference_locations.push(self.source_location.clone());
        reference_locations.extend(self.reference_locations.iter().cloned());

        Self {
            source_location: target,
            reference_locations,
            sources: Rc::clone(&self.sources),
            built_targets: Rc::clone(&self.built_targets),
        }
    }

    /// True once a reference has led back to somewhere it already passed
    /// through, meaning a recursive structure has started repeating.
    pub fn is_self_referencing(&self) -> bool {
        self.reference_locations.contains(&self.source_location)
    }

    /// Claim `location` as a reference target built by the factory named
    /// `type_name`. False when it was already claimed, by this chain or any
    /// other walk of the document.
    pub fn claim_target(&self, location: &SourceLocation, type_name: &str) -> bool {
        self.built_targets
            .borrow_mut()
            .insert((location.clone(), type_name.to_string()))
    }

    pub fn source_location(&self) -> &SourceLocation {
        &self.source_location
    }

    pub fn reference_locations(&self) -> &[SourceLocation] {
        &self.reference_locations
    }

    pub fn sources(&self) -> &Rc<SourceCollection> {
        &self.sources
    }

    /// Resolve a `$ref` string relative to this context's source.
    pub fn resolve_reference(
        &self,
        reference: &str,
    ) -> std::result::Result<ResolvedReference, ReferenceError> {
        self.sources
            .resolve_reference(reference, &self.source_location)
    }

    /// Raw value of a top level field of the root document.
    pub fn root_field(&self, key: &str) -> Option<Value> {
        self.sources.root().data().get(key).cloned()
    }
}

impl PartialEq for Context {
    fn eq(&self, other: &Self) -> bool {
        self.source_location == other.source_location
            && self.reference_locations == other.reference_locations
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let referenced_by: Vec<String> = self
            .reference_locations
            .iter()
            .map(ToString::to_string)
            .collect();
        write!(
            f,
            "Context(source_location: {}, referenced_by: {})",
            self.source_location,
            referenced_by.join(", ")
        )
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source_location)
    }
}
