//! Error types for the artifact archive
//!
//! Covers:
//! - Missing artifacts and records
//! - Malformed metadata headers
//! - Paths that escape the archive root
//! - Filesystem and JSON failures
//! - Phase transitions refused by a [`PhasePolicy`](crate::PhasePolicy)

use std::path::PathBuf;

/// Errors raised by [`ArtifactStore`](crate::ArtifactStore) operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Artifact or record does not exist
    #[error("artifact not found: {0}")]
    NotFound(String),

    /// Metadata header present but unreadable
    #[error("malformed metadata header in {path}: {source}")]
    Header {
        path: String,
        #[source]
        source: HeaderError,
    },

    /// Relative path is absolute or escapes the archive root
    #[error("invalid archive path: '{0}'")]
    InvalidPath(String),

    /// Metadata cannot be encoded losslessly
    #[error("invalid metadata: {0}")]
    InvalidMetadata(String),

    /// Filesystem failure
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Structured record could not be (de)serialized
    #[error("json error in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Phase policy refused the transition
    #[error("phase transition not allowed: {from} -> {to}")]
    PhaseTransition { from: String, to: String },
}

impl StoreError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create header error for path
    pub fn header_error(path: impl Into<String>, source: HeaderError) -> Self {
        Self::Header {
            path: path.into(),
            source,
        }
    }

    /// Whether the error means the target does not exist
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Errors in the `---` delimited metadata header
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeaderError {
    /// Opening delimiter without a closing one
    #[error("missing closing delimiter")]
    Unterminated,

    /// Header line is not `key: value`
    #[error("line {line}: expected 'key: value'")]
    MissingSeparator { line: usize },

    /// Key is empty
    #[error("line {line}: empty key")]
    EmptyKey { line: usize },

    /// Same key appears twice
    #[error("line {line}: duplicate key '{key}'")]
    DuplicateKey { line: usize, key: String },

    /// Quoted value is not a valid string literal
    #[error("line {line}: invalid quoted value")]
    InvalidQuotedValue { line: usize },

    /// Key cannot be written as a header line
    #[error("key '{0}' must be a non-empty single line without surrounding whitespace or ':'")]
    InvalidKey(String),
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let err = StoreError::NotFound("stories/x.md".to_string());
        assert_eq!(err.to_string(), "artifact not found: stories/x.md");
        assert!(err.is_not_found());
    }

    #[test]
    fn header_error_display() {
        let err = StoreError::header_error("prd/prd.md", HeaderError::MissingSeparator { line: 2 });
        assert!(err.to_string().contains("prd/prd.md"));
        assert!(err.to_string().contains("line 2"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn phase_transition_display() {
        let err = StoreError::PhaseTransition {
            from: "stories".to_string(),
            to: "ideation".to_string(),
        };
        assert_eq!(err.to_string(), "phase transition not allowed: stories -> ideation");
    }
}
