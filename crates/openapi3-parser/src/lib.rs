//! Validating parser for OpenAPI 3.0 documents
//!
//! A document is checked against the OpenAPI 3.0 object model in one pass,
//! following `$ref`s across files as it goes. Every problem found is kept as
//! a [`ValidationError`] that points at the place in the source it came
//! from. Once a document is valid, it can be walked as a tree of typed nodes
//! in which references have already been replaced by what they point to.
//!
//! # Overview
//!
//! - [`Document`]: loads a document and reports its errors
//! - [`node_factory`]: the builders that validate input and make nodes
//! - [`node`]: the untyped node tree
//! - [`openapi`]: the OpenAPI object types over that tree
//!
//! # Example
//!
//! ```rust
//! use openapi3_parser::Document;
//! use serde_json::json;
//!
//! let document = Document::from_value(json!({
//!     "openapi": "3.0.0",
//!     "info": { "title": "Pets" },
//!     "paths": {}
//! }))
//! .unwrap();
//!
//! assert!(!document.is_valid());
//! let errors: Vec<String> = document.errors().iter().map(|e| e.to_string()).collect();
//! assert_eq!(errors, ["#/info: Missing required field: version"]);
//! ```

pub mod context;
pub mod document;
pub mod error;
pub mod node;
pub mod node_factory;
pub mod openapi;
pub mod validation;
pub mod validators;

pub use context::Context;
pub use document::Document;
pub use error::{Error, Result, ValidationError, ValidationErrorKind};
pub use node::{ArrayNode, MapNode, Node, NodeContext, NodeList, NodeMap, NodeType, ObjectNode};
pub use node_factory::{Factory, NodeFactory};
pub use validation::Validatable;

// Source types callers need to load documents
pub use openapi_source::{SourceCollection, SourceError, SourceInput, SourceLocation};
