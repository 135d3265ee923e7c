//! Error types for validation

/// Errors raised before scoring starts
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Strictness mode string not recognised
    #[error("invalid validation mode: '{0}' (expected strict, standard or lenient)")]
    InvalidMode(String),
}
