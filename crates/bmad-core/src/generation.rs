//! Text generation collaborator boundary
//!
//! Artifact bodies come from an external language-model backed generator.
//! The core only gathers prior-artifact context, forwards the task, and
//! proposes where the result should be archived.

use crate::tools::SuggestedArtifact;
use async_trait::async_trait;
use bmad_artifact::{Category, Metadata};
use serde::{Deserialize, Serialize};

/// Tool name recorded on drafted artifacts
pub const DRAFT_ARTIFACT_TOOL: &str = "draft_artifact";

/// Generator failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// Backend reported a failure
    #[error("{0}")]
    Backend(String),

    /// Backend returned only whitespace
    #[error("generator returned an empty document")]
    EmptyOutput,
}

/// What the generator should produce
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationTask {
    /// Artifact type label, e.g. `prd`
    pub artifact_type: String,
    /// Archive path the result is proposed for
    pub target_path: String,
    /// Free-form instructions
    pub instructions: String,
    /// Categories whose latest artifact is passed along as context
    #[serde(default)]
    pub context_categories: Vec<Category>,
}

impl GenerationTask {
    #[must_use]
    pub fn new(
        artifact_type: impl Into<String>,
        target_path: impl Into<String>,
        instructions: impl Into<String>,
    ) -> Self {
        Self {
            artifact_type: artifact_type.into(),
            target_path: target_path.into(),
            instructions: instructions.into(),
            context_categories: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn with_context(mut self, category: Category) -> Self {
        self.context_categories.push(category);
        self
    }
}

/// Prior artifact handed to the generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextDocument {
    pub category: Category,
    pub path: String,
    pub content: String,
}

/// Task plus gathered context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub task: GenerationTask,
    pub context: Vec<ContextDocument>,
}

/// Produces artifact bodies
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a document body for the request
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

/// Generated body with its proposed archive location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftOutcome {
    pub body: String,
    pub suggested_path: String,
    pub suggested_metadata: Metadata,
    /// Paths of the artifacts passed as context
    pub context_paths: Vec<String>,
}

impl SuggestedArtifact for DraftOutcome {
    fn suggested_path(&self) -> &str {
        &self.suggested_path
    }

    fn body(&self) -> &str {
        &self.body
    }

    fn suggested_metadata(&self) -> &Metadata {
        &self.suggested_metadata
    }
}
