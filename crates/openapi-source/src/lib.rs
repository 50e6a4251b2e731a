//! Source documents for OpenAPI parsing
//!
//! This crate loads the raw documents an OpenAPI description is made of and
//! resolves `$ref` strings between them. Documents are decoded from JSON or
//! YAML into [`serde_json::Value`], which keeps mapping key order.
//!
//! # Overview
//!
//! - [`SourceInput`]: where a document comes from (a file or in-memory data)
//! - [`SourceCollection`]: the root document plus every document loaded to
//!   follow a reference
//! - [`SourceLocation`]: a source plus a [`Pointer`] into it, rendered as
//!   `#/paths/~1pets` for the root document and `pet.yaml#/Pet` otherwise
//!
//! # Example
//!
//! ```rust
//! use openapi_source::*;
//! use serde_json::json;
//!
//! let sources = SourceCollection::load(SourceInput::raw(json!({
//!     "components": { "schemas": { "Pet": { "type": "object" } } }
//! })))
//! .unwrap();
//!
//! let resolved = sources
//!     .resolve_reference("#/components/schemas/Pet", &sources.root_location())
//!     .unwrap();
//! assert_eq!(resolved.location.to_string(), "#/components/schemas/Pet");
//! ```

pub mod decode;
pub mod error;
pub mod input;
pub mod pointer;
pub mod source;

pub use decode::Format;
pub use error::{ReferenceError, Result, SourceError};
pub use input::SourceInput;
pub use pointer::{Pointer, PointerSegment};
pub use source::{ResolvedReference, Source, SourceCollection, SourceId, SourceLocation};
