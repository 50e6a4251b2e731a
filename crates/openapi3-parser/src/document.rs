//! Entry point for parsing a whole OpenAPI document.

use crate::error::{Error, Result, ValidationError};
use crate::node::{Node, NodeType, ObjectNode};
use crate::node_factory::NodeFactory;
use crate::openapi::{self, Openapi};
use openapi_source::{decode, Pointer, Source, SourceCollection, SourceError, SourceInput};
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;
use std::rc::Rc;

/// A loaded OpenAPI document.
///
/// Loading only fails when the root source itself can't be read or
/// decoded. Everything else wrong with the document is reported through
/// [`Document::errors`], and the typed tree is only available once the
/// document is valid.
///
/// # Example
///
/// ```rust
/// use openapi3_parser::Document;
/// use serde_json::json;
///
/// let document = Document::from_value(json!({
///     "openapi": "3.0.3",
///     "info": { "title": "Pet store", "version": "1.0.0" },
///     "paths": {
///         "/pets": { "get": { "responses": { "200": { "description": "ok" } } } }
///     }
/// }))
/// .unwrap();
///
/// assert!(document.is_valid());
/// let root = document.root().unwrap();
/// assert_eq!(root.info().unwrap().unwrap().title(), "Pet store");
/// ```
pub struct Document {
    sources: Rc<SourceCollection>,
    root: Rc<Source>,
    factory: NodeFactory,
    warnings: Vec<String>,
}

impl Document {
    /// Load a document from a file or in-memory input.
    pub fn load(input: SourceInput) -> Result<Self> {
        let sources = Rc::new(SourceCollection::load(input)?);
        let factory = NodeFactory::for_root(openapi::root_factory(), Rc::clone(&sources));
        let root = sources.root();
        let warnings = version_warnings(root.data());
        for warning in &warnings {
            tracing::warn!("{}", warning);
        }
        Ok(Self {
            sources,
            root,
            factory,
            warnings,
        })
    }

    /// Build from already decoded data. File references can't be followed.
    pub fn from_value(value: Value) -> Result<Self> {
        Self::load(SourceInput::raw(value))
    }

    /// Decode `text` as though it were read from `path`, which decides the
    /// format and where relative file references point.
    pub fn from_str_with_path(text: &str, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let value = decode::parse(text, Some(path)).map_err(|message| SourceError::Unparsable {
            input: path.display().to_string(),
            message,
        })?;
        Self::load(SourceInput::raw_with_base_path(value, path))
    }

    pub fn is_valid(&self) -> bool {
        self.factory.is_valid()
    }

    /// Every validation error, in document order.
    ///
    /// A problem inside something referenced from several places is only
    /// listed once.
    pub fn errors(&self) -> Vec<&ValidationError> {
        let mut seen = HashSet::new();
        self.factory
            .errors()
            .iter()
            .filter(|error| seen.insert((error.location.clone(), error.message())))
            .collect()
    }

    /// Problems that don't make the document invalid.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// The `openapi` field of the root document, whatever its validity.
    pub fn openapi_version(&self) -> Option<&str> {
        self.root.data().get("openapi").and_then(Value::as_str)
    }

    /// The typed root of a valid document.
    pub fn root(&self) -> Result<Openapi> {
        let node = self.root_node()?;
        Openapi::from_node(Node::Object(node)).ok_or(Error::InvalidDocument { error_count: 0 })
    }

    /// The untyped root of a valid document.
    pub fn root_node(&self) -> Result<ObjectNode> {
        if !self.is_valid() {
            return Err(Error::InvalidDocument {
                error_count: self.errors().len(),
            });
        }
        match self.factory.root_node()? {
            Node::Object(node) => Ok(node),
            _ => Err(Error::InvalidDocument { error_count: 0 }),
        }
    }

    /// The node at `pointer` (such as `#/paths/~1pets/get`), walking from
    /// the root the way a consumer would.
    pub fn node_at(&self, pointer: &str) -> Result<Option<Node>> {
        let mut node = Node::Object(self.root_node()?);
        for segment in Pointer::from_fragment(pointer).segments() {
            match node.child(segment)? {
                Some(child) => node = child,
                None => return Ok(None),
            }
        }
        Ok(Some(node))
    }

    pub fn sources(&self) -> &Rc<SourceCollection> {
        &self.sources
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("root", &self.root)
            .field("valid", &self.is_valid())
            .finish()
    }
}

fn version_warnings(data: &Value) -> Vec<String> {
    match data.get("openapi").and_then(Value::as_str) {
        Some(version) if !version.starts_with("3.0.") => vec![format!(
            "Unsupported OpenAPI version ({}), expected 3.0.x",
            version
        )],
        _ => Vec::new(),
    }
}
