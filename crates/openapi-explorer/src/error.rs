//! Error types for `unrelated-openapi-explorer`.

use crate::rewrite::DocumentFormat;
use thiserror::Error;

/// Main error type for the explorer.
///
/// Only request-level and startup failures are represented here. A lookup that fails for one
/// element of a batch (unknown method, component name, ...) is reported as an error *item*
/// instead, see [`crate::render::RenderResultItem`].
#[derive(Error, Debug)]
pub enum ExplorerError {
    /// Configuration errors (invalid config, missing fields, conflicts).
    #[error("Configuration error: {0}")]
    Config(String),

    /// The source document could not be loaded.
    #[error("Failed to load OpenAPI spec: {0}")]
    DocumentLoad(String),

    #[error("Failed to load OpenAPI spec: failed to read spec file '{path}': {source}")]
    SpecReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to load OpenAPI spec: failed to parse '{location}': {source}")]
    SpecParse {
        location: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to load OpenAPI spec: spec hash mismatch. Expected: {expected}, Got: {actual}")]
    SpecHashMismatch { expected: String, actual: String },

    /// The document's major version is not served.
    #[error("Only OpenAPI v3 specifications are supported")]
    UnsupportedVersion,

    /// A required address segment is empty or malformed after normalization.
    #[error("{0}")]
    InvalidAddress(String),

    #[error("No transformer registered for format: {0}")]
    NoTransformer(DocumentFormat),

    /// The output codec failed to serialize a value.
    #[error("{0}")]
    RenderFormat(String),
}

impl ExplorerError {
    /// Whether this error happened while loading the source document.
    #[must_use]
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            ExplorerError::DocumentLoad(_)
                | ExplorerError::SpecReadFile { .. }
                | ExplorerError::SpecParse { .. }
                | ExplorerError::SpecHashMismatch { .. }
        )
    }
}

/// Result type alias for explorer operations.
pub type Result<T> = std::result::Result<T, ExplorerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_errors_share_prefix() {
        let e = ExplorerError::DocumentLoad("File not found".to_string());
        assert_eq!(e.to_string(), "Failed to load OpenAPI spec: File not found");
        assert!(e.is_load_error());

        let e = ExplorerError::SpecHashMismatch {
            expected: "sha256:aa".to_string(),
            actual: "sha256:bb".to_string(),
        };
        assert!(e.to_string().starts_with("Failed to load OpenAPI spec: "));
        assert!(e.is_load_error());
    }

    #[test]
    fn unsupported_version_message_is_fixed() {
        assert_eq!(
            ExplorerError::UnsupportedVersion.to_string(),
            "Only OpenAPI v3 specifications are supported"
        );
        assert!(!ExplorerError::UnsupportedVersion.is_load_error());
    }

    #[test]
    fn invalid_address_displays_bare_message() {
        let e = ExplorerError::InvalidAddress("No valid HTTP method specified.".to_string());
        assert_eq!(e.to_string(), "No valid HTTP method specified.");
    }
}
