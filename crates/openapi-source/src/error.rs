// Error types for loading sources and resolving references

use thiserror::Error;

/// Result type alias for source operations.
pub type Result<T> = std::result::Result<T, SourceError>;

/// Problems making a source's contents available.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The input could not be read (missing file, permissions, ...)
    #[error("Failed to open {input}: {message}")]
    Inaccessible { input: String, message: String },

    /// The input was read but is not valid JSON or YAML
    #[error("Failed to parse {input}: {message}")]
    Unparsable { input: String, message: String },
}

impl SourceError {
    /// The input description this error refers to.
    pub fn input(&self) -> &str {
        match self {
            SourceError::Inaccessible { input, .. } | SourceError::Unparsable { input, .. } => {
                input
            }
        }
    }
}

/// Reasons a `$ref` string did not resolve to a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    /// The reference names a resource that can't be expressed relative to
    /// the current source
    #[error("{reference} is not a resolvable reference")]
    Unsupported { reference: String },

    /// The referenced source could not be loaded
    #[error("{reference} could not be resolved: {source}")]
    SourceUnavailable {
        reference: String,
        #[source]
        source: SourceError,
    },

    /// The referenced source loaded, but nothing exists at the pointer
    #[error("{reference} was not found")]
    NotFound { reference: String },
}

impl ReferenceError {
    /// The reference string that failed.
    pub fn reference(&self) -> &str {
        match self {
            ReferenceError::Unsupported { reference }
            | ReferenceError::SourceUnavailable { reference, .. }
            | ReferenceError::NotFound { reference } => reference,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_error_messages() {
        let error = ReferenceError::NotFound {
            reference: "#/components/schemas/Missing".to_string(),
        };
        assert_eq!(error.to_string(), "#/components/schemas/Missing was not found");
        assert_eq!(error.reference(), "#/components/schemas/Missing");

        let error = ReferenceError::SourceUnavailable {
            reference: "other.yaml#/Pet".to_string(),
            source: SourceError::Inaccessible {
                input: "other.yaml".to_string(),
                message: "No such file or directory".to_string(),
            },
        };
        assert_eq!(
            error.to_string(),
            "other.yaml#/Pet could not be resolved: Failed to open other.yaml: No such file or directory"
        );
    }
}
