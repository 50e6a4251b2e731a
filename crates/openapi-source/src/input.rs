//! Where a source's contents come from.

use crate::decode;
use crate::error::{Result, SourceError};
use serde_json::Value;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// The origin of a source document.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceInput {
    /// Already decoded data held in memory. `base_path`, when set, is the
    /// file the data is treated as coming from, so relative file references
    /// can still be followed.
    Raw {
        contents: Value,
        base_path: Option<PathBuf>,
    },

    /// A JSON or YAML file on disk
    File {
        path: PathBuf,
        working_directory: PathBuf,
    },
}

impl SourceInput {
    pub fn raw(contents: Value) -> Self {
        SourceInput::Raw {
            contents,
            base_path: None,
        }
    }

    pub fn raw_with_base_path(contents: Value, base_path: impl Into<PathBuf>) -> Self {
        SourceInput::Raw {
            contents,
            base_path: Some(normalize(&base_path.into())),
        }
    }

    /// A file input. Relative paths are taken relative to the current
    /// directory, falling back to the path as given.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let absolute = if path.is_absolute() {
            path
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(&path))
                .unwrap_or(path)
        };
        Self::file_in(absolute)
    }

    fn file_in(path: PathBuf) -> Self {
        let path = normalize(&path);
        let working_directory = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        SourceInput::File {
            path,
            working_directory,
        }
    }

    /// The path this input is (or is treated as) located at.
    pub fn path(&self) -> Option<&Path> {
        match self {
            SourceInput::Raw { base_path, .. } => base_path.as_deref(),
            SourceInput::File { path, .. } => Some(path),
        }
    }

    /// Read and decode the contents.
    pub fn load(&self) -> Result<Value> {
        match self {
            SourceInput::Raw { contents, .. } => Ok(contents.clone()),
            SourceInput::File { path, .. } => {
                let text = std::fs::read_to_string(path).map_err(|e| SourceError::Inaccessible {
                    input: self.to_string(),
                    message: e.to_string(),
                })?;
                decode::parse(&text, Some(path)).map_err(|message| SourceError::Unparsable {
                    input: self.to_string(),
                    message,
                })
            }
        }
    }

    /// The input a relative resource (the part of a `$ref` before `#`)
    /// points to, or `None` when this input has no location to resolve from.
    pub fn resolve_next(&self, resource: &str) -> Option<SourceInput> {
        let resource = Path::new(resource);
        if resource.is_absolute() {
            return Some(Self::file_in(resource.to_path_buf()));
        }
        let base = self.path()?.parent()?;
        Some(Self::file_in(base.join(resource)))
    }

    /// Whether both inputs stand for the same document: equal inputs, or
    /// inputs located at the same path (a file and raw data read from it).
    pub fn is_same_document(&self, other: &SourceInput) -> bool {
        self == other || self.path().is_some_and(|path| other.path() == Some(path))
    }

    /// Express this input relative to `other`, as it would be written in a
    /// `$ref` inside `other`.
    ///
    /// Returns an empty string when both are the same input and when this
    /// input has no path.
    pub fn relative_to(&self, other: &SourceInput) -> String {
        if self == other {
            return String::new();
        }
        let Some(path) = self.path() else {
            return String::new();
        };
        match other.path().and_then(Path::parent) {
            Some(base) => relative_path(path, base),
            None => path.display().to_string(),
        }
    }
}

impl fmt::Display for SourceInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceInput::Raw {
                base_path: Some(path),
                ..
            } => write!(f, "raw input ({})", path.display()),
            SourceInput::Raw { .. } => write!(f, "raw input"),
            SourceInput::File { path, .. } => write!(f, "{}", path.display()),
        }
    }
}

/// Lexically resolve `.` and `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Path of `path` relative to the directory `base`, using `..` as needed.
fn relative_path(path: &Path, base: &Path) -> String {
    let path_components: Vec<Component> = path.components().collect();
    let base_components: Vec<Component> = base.components().collect();

    let common = path_components
        .iter()
        .zip(&base_components)
        .take_while(|(a, b)| a == b)
        .count();

    if common == 0 && path.is_absolute() {
        return path.display().to_string();
    }

    let mut relative = PathBuf::new();
    for _ in common..base_components.len() {
        relative.push("..");
    }
    for component in &path_components[common..] {
        relative.push(component.as_os_str());
    }
    relative.display().to_string()
}
