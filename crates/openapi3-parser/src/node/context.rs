use crate::context::Context;
use openapi_source::{PointerSegment, SourceLocation};

/// Where a materialized node sits.
///
/// `document_location` is the path walked from the root to reach the node.
/// `source_location` is where its data came from: the target of a reference
/// when the node is a pure alias of it, otherwise the node's own place.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeContext {
    document_location: SourceLocation,
    source_location: SourceLocation,
}

impl NodeContext {
    /// Node context for a factory reached without walking any path.
    pub fn root(context: &Context) -> Self {
        Self {
            document_location: context.source_location().clone(),
            source_location: context.source_location().clone(),
        }
    }

    /// Node context for a child built by the factory at `child`.
    pub fn next_field(&self, segment: impl Into<PointerSegment>, child: &Context) -> Self {
        Self {
            document_location: self.document_location.next_field(segment),
            source_location: child.source_location().clone(),
        }
    }

    /// Node context after following a reference to `target`.
    ///
    /// A pure reference (nothing but `$ref`) takes on the target's location;
    /// one with local overrides keeps its own.
    pub fn resolved_reference(&self, target: &Context, pure: bool) -> Self {
        let source_location = if pure {
            target.source_location().clone()
        } else {
            self.source_location.clone()
        };
        Self {
            document_location: self.document_location.clone(),
            source_location,
        }
    }

    pub fn document_location(&self) -> &SourceLocation {
        &self.document_location
    }

    pub fn source_location(&self) -> &SourceLocation {
        &self.source_location
    }
}
