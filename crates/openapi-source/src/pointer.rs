//! JSON Pointer paths into a raw document.
//!
//! Pointers are rendered in URI fragment form (`#/paths/~1pets/get`), which is
//! what `$ref` strings use and what every diagnostic prints.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// One step in a pointer path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum PointerSegment {
    /// Key of a mapping
    Key(String),
    /// Index of a sequence
    Index(usize),
}

impl PointerSegment {
    /// Escape the segment per RFC 6901 (`~` → `~0`, `/` → `~1`).
    fn escaped(&self) -> String {
        match self {
            PointerSegment::Key(key) => key.replace('~', "~0").replace('/', "~1"),
            PointerSegment::Index(index) => index.to_string(),
        }
    }
}

impl fmt::Display for PointerSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointerSegment::Key(key) => write!(f, "{}", key),
            PointerSegment::Index(index) => write!(f, "{}", index),
        }
    }
}

impl From<&str> for PointerSegment {
    fn from(key: &str) -> Self {
        PointerSegment::Key(key.to_string())
    }
}

impl From<String> for PointerSegment {
    fn from(key: String) -> Self {
        PointerSegment::Key(key)
    }
}

impl From<&String> for PointerSegment {
    fn from(key: &String) -> Self {
        PointerSegment::Key(key.clone())
    }
}

impl From<usize> for PointerSegment {
    fn from(index: usize) -> Self {
        PointerSegment::Index(index)
    }
}

/// An ordered path of segments from the root of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Pointer {
    segments: Vec<PointerSegment>,
}

impl Pointer {
    /// The pointer to the document root.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn new(segments: Vec<PointerSegment>) -> Self {
        Self { segments }
    }

    /// Parse a fragment such as `#/components/schemas/Pet`, `/a/b` or `#`.
    ///
    /// Every parsed segment is a key; [`Pointer::lookup`] turns numeric keys
    /// into indices when they address a sequence.
    pub fn from_fragment(fragment: &str) -> Self {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        let segments = fragment
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| PointerSegment::Key(segment.replace("~1", "/").replace("~0", "~")))
            .collect();
        Self { segments }
    }

    pub fn segments(&self) -> &[PointerSegment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// A new pointer with `segment` appended.
    pub fn join(&self, segment: impl Into<PointerSegment>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// Find the value this pointer addresses inside `data`.
    ///
    /// Returns the value together with the canonical form of the pointer, in
    /// which segments that step into a sequence are indices. Two pointers to
    /// the same place therefore compare equal regardless of how they were
    /// written.
    pub fn lookup<'a>(&self, data: &'a Value) -> Option<(Pointer, &'a Value)> {
        let mut current = data;
        let mut canonical = Vec::with_capacity(self.segments.len());

        for segment in &self.segments {
            match current {
                Value::Object(map) => {
                    let key = segment.to_string();
                    current = map.get(&key)?;
                    canonical.push(PointerSegment::Key(key));
                }
                Value::Array(items) => {
                    let index = match segment {
                        PointerSegment::Index(index) => *index,
                        PointerSegment::Key(key) => key.parse::<usize>().ok()?,
                    };
                    current = items.get(index)?;
                    canonical.push(PointerSegment::Index(index));
                }
                _ => return None,
            }
        }

        Some((Pointer::new(canonical), current))
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#/")?;
        let rendered: Vec<String> = self.segments.iter().map(PointerSegment::escaped).collect();
        write!(f, "{}", rendered.join("/"))
    }
}
