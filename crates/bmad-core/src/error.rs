//! Error types for BMAD Core
//!
//! Wraps the per-crate errors and classifies them into the small taxonomy
//! callers branch on:
//! - Missing artifacts or checklists
//! - Malformed headers, checklists or configuration
//! - Unknown validation modes
//! - Filesystem failures
//! - Requests that cannot be honoured

use bmad_artifact::StoreError;
use bmad_checklist::ChecklistError;
use bmad_validation::ValidationError;
use std::path::PathBuf;

use crate::generation::GenerationError;

/// Main BMAD error type
#[derive(Debug, thiserror::Error)]
pub enum BmadError {
    /// Archive operation failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Checklist could not be loaded
    #[error(transparent)]
    Checklist(#[from] ChecklistError),

    /// Validation request rejected
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Configuration file could not be read
    #[error("cannot read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for [`BmadConfig`](crate::BmadConfig)
    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration parsed but holds an unusable value
    #[error("invalid config value: {0}")]
    InvalidConfig(String),

    /// Tracing subscriber could not be installed
    #[error("telemetry setup failed: {0}")]
    Telemetry(String),

    /// Text generation collaborator failed
    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// None of the requested checklists could be run
    #[error("no checklist could be run (tried: {})", .0.join(", "))]
    NoChecklistsRun(Vec<String>),

    /// Tool schema could not be rendered
    #[error("schema error: {0}")]
    Schema(#[from] serde_json::Error),
}

/// Coarse error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Parse,
    InvalidMode,
    Io,
    Invalid,
}

impl BmadError {
    /// Classify the error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Store(e) => match e {
                StoreError::NotFound(_) => ErrorKind::NotFound,
                StoreError::Header { .. } | StoreError::Json { .. } => ErrorKind::Parse,
                StoreError::Io { .. } => ErrorKind::Io,
                StoreError::InvalidPath(_)
                | StoreError::InvalidMetadata(_)
                | StoreError::PhaseTransition { .. } => ErrorKind::Invalid,
            },
            Self::Checklist(e) => match e {
                ChecklistError::NotFound { .. } | ChecklistError::InvalidName(_) => ErrorKind::NotFound,
                ChecklistError::Unreadable { .. } => ErrorKind::Parse,
                ChecklistError::Io { .. } => ErrorKind::Io,
            },
            Self::Validation(ValidationError::InvalidMode(_)) => ErrorKind::InvalidMode,
            Self::ConfigRead { .. } | Self::Generation(_) => ErrorKind::Io,
            Self::ConfigParse(_) | Self::Schema(_) => ErrorKind::Parse,
            Self::NoChecklistsRun(_) => ErrorKind::NotFound,
            Self::Telemetry(_) | Self::InvalidConfig(_) => ErrorKind::Invalid,
        }
    }

    /// Whether the error means something requested does not exist
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

/// Result type alias for BMAD operations
pub type BmadResult<T> = Result<T, BmadError>;
