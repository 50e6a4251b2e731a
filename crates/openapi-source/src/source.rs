//! Loaded source documents and `$ref` resolution between them.

use crate::error::{ReferenceError, Result};
use crate::input::SourceInput;
use crate::pointer::{Pointer, PointerSegment};
use serde_json::Value;
use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Identifies a source within its [`SourceCollection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(pub usize);

/// A loaded document.
pub struct Source {
    id: SourceId,
    input: SourceInput,
    data: Value,
    /// How the root document would refer to this one (empty for the root)
    relative_to_root: String,
}

impl Source {
    pub fn id(&self) -> SourceId {
        self.id
    }

    pub fn input(&self) -> &SourceInput {
        &self.input
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn is_root(&self) -> bool {
        self.id == SourceId(0)
    }

    pub fn relative_to_root(&self) -> &str {
        &self.relative_to_root
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Source")
            .field("id", &self.id)
            .field("input", &self.input.to_string())
            .finish()
    }
}

/// A point in a source document: the source plus a pointer into it.
#[derive(Clone)]
pub struct SourceLocation {
    source: Rc<Source>,
    pointer: Pointer,
}

impl SourceLocation {
    pub fn new(source: Rc<Source>, pointer: Pointer) -> Self {
        Self { source, pointer }
    }

    pub fn source(&self) -> &Rc<Source> {
        &self.source
    }

    pub fn pointer(&self) -> &Pointer {
        &self.pointer
    }

    /// The location of a child field or element.
    pub fn next_field(&self, segment: impl Into<PointerSegment>) -> Self {
        Self {
            source: Rc::clone(&self.source),
            pointer: self.pointer.join(segment),
        }
    }

    /// The raw value at this location, if it exists.
    pub fn data(&self) -> Option<&Value> {
        self.pointer
            .lookup(self.source.data())
            .map(|(_, value)| value)
    }
}

impl PartialEq for SourceLocation {
    fn eq(&self, other: &Self) -> bool {
        self.source.id == other.source.id && self.pointer == other.pointer
    }
}

impl Eq for SourceLocation {}

impl Hash for SourceLocation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.id.hash(state);
        self.pointer.hash(state);
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.source.relative_to_root, self.pointer)
    }
}

impl fmt::Debug for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SourceLocation({})", self)
    }
}

/// The value a `$ref` points to and where it lives.
#[derive(Debug, Clone)]
pub struct ResolvedReference {
    pub location: SourceLocation,
    pub data: Value,
}

/// Every source taking part in one document: the root plus any documents
/// pulled in by references.
///
/// Referenced sources are loaded on first use and shared by every later
/// reference to the same input.
#[derive(Debug)]
pub struct SourceCollection {
    sources: RefCell<Vec<Rc<Source>>>,
}

impl SourceCollection {
    /// Load the root source. Fails when the root can't be read or decoded,
    /// before any building starts.
    pub fn load(root: SourceInput) -> Result<Self> {
        let data = root.load()?;
        let source = Source {
            id: SourceId(0),
            input: root,
            data,
            relative_to_root: String::new(),
        };
        Ok(Self {
            sources: RefCell::new(vec![Rc::new(source)]),
        })
    }

    pub fn root(&self) -> Rc<Source> {
        Rc::clone(&self.sources.borrow()[0])
    }

    /// The location of the root of the root document.
    pub fn root_location(&self) -> SourceLocation {
        SourceLocation::new(self.root(), Pointer::root())
    }

    /// Number of sources loaded so far.
    pub fn len(&self) -> usize {
        self.sources.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.borrow().is_empty()
    }

    /// Resolve a `$ref` string found at `from`.
    ///
    /// `reference` is `resource#fragment`, where an empty resource means the
    /// source `from` is in.
    pub fn resolve_reference(
        &self,
        reference: &str,
        from: &SourceLocation,
    ) -> std::result::Result<ResolvedReference, ReferenceError> {
        let (resource, fragment) = match reference.split_once('#') {
            Some((resource, fragment)) => (resource, fragment),
            None => (reference, ""),
        };

        let source = if resource.is_empty() {
            Rc::clone(from.source())
        } else {
            let input = from.source().input().resolve_next(resource).ok_or_else(|| {
                ReferenceError::Unsupported {
                    reference: reference.to_string(),
                }
            })?;
            self.source_for(input)
                .map_err(|source| ReferenceError::SourceUnavailable {
                    reference: reference.to_string(),
                    source,
                })?
        };

        let (pointer, data) = Pointer::from_fragment(fragment)
            .lookup(source.data())
            .ok_or_else(|| ReferenceError::NotFound {
                reference: reference.to_string(),
            })?;

        tracing::debug!(reference, target = %pointer, "Resolved reference");

        Ok(ResolvedReference {
            data: data.clone(),
            location: SourceLocation::new(source, pointer),
        })
    }

    /// Find an already loaded source for `input`, or load it.
    fn source_for(&self, input: SourceInput) -> Result<Rc<Source>> {
        if let Some(existing) = self
            .sources
            .borrow()
            .iter()
            .find(|s| s.input.is_same_document(&input))
        {
            return Ok(Rc::clone(existing));
        }

        let data = input.load()?;
        let root = self.root();
        let relative_to_root = input.relative_to(root.input());
        tracing::debug!(input = %input, "Loaded referenced source");

        let mut sources = self.sources.borrow_mut();
        let source = Rc::new(Source {
            id: SourceId(sources.len()),
            input,
            data,
            relative_to_root,
        });
        sources.push(Rc::clone(&source));
        Ok(source)
    }
}
