//! Error types for checklist loading
//!
//! A checklist that parses to zero items is not an error; only missing or
//! unreadable sources are.

use std::path::PathBuf;
use std::sync::Arc;

/// Errors while resolving, reading or parsing a checklist source
#[derive(Debug, Clone, thiserror::Error)]
pub enum ChecklistError {
    /// No source file for the name
    #[error("checklist not found: {name}")]
    NotFound { name: String },

    /// Name cannot address a source file
    #[error("invalid checklist name: '{0}'")]
    InvalidName(String),

    /// Source exists but is not readable text
    #[error("unreadable checklist {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },

    /// Filesystem failure
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },
}

impl ChecklistError {
    /// Classify a read failure for `path`
    pub fn from_io(name: &str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound {
                name: name.to_string(),
            },
            std::io::ErrorKind::InvalidData => Self::Unreadable {
                path: path.into(),
                source: Arc::new(source),
            },
            _ => Self::Io {
                path: path.into(),
                source: Arc::new(source),
            },
        }
    }

    /// Whether the checklist does not exist
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::InvalidName(_))
    }
}

/// Result type alias for checklist operations
pub type ChecklistResult<T> = Result<T, ChecklistError>;
