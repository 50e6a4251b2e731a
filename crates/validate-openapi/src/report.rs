//! What gets printed about a document.

use openapi3_parser::Document;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Report {
    pub valid: bool,
    pub errors: Vec<ReportedError>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ReportedError {
    pub location: String,
    pub message: String,
    pub code: &'static str,
}

impl Report {
    pub fn new(document: &Document) -> Self {
        let errors = document
            .errors()
            .into_iter()
            .map(|error| ReportedError {
                location: error.location.to_string(),
                message: error.message(),
                code: error.error_code(),
            })
            .collect();
        Self {
            valid: document.is_valid(),
            errors,
            warnings: document.warnings().to_vec(),
        }
    }

    /// One line per problem, or a single line saying `name` is valid.
    pub fn to_text(&self, name: &str) -> String {
        let mut lines: Vec<String> = self
            .warnings
            .iter()
            .map(|warning| format!("warning: {}", warning))
            .collect();

        if self.valid {
            lines.push(format!("✓ {} is valid", name));
        } else {
            lines.extend(
                self.errors
                    .iter()
                    .map(|e| format!("{}: {} [{}]", e.location, e.message, e.code)),
            );
        }
        lines.join("\n")
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
