//! Stored artifacts and their advisory status
//!
//! An [`Artifact`] is a text body plus its header metadata, addressed by a
//! path relative to the archive root. Artifacts are only ever replaced
//! wholesale; there is no partial patching.

use crate::category::Category;
use crate::header::Metadata;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Metadata key holding the artifact status
pub const STATUS_KEY: &str = "status";

/// Metadata key holding the artifact type
pub const ARTIFACT_TYPE_KEY: &str = "artifact_type";

/// Metadata key for the first write time (RFC 3339)
pub const CREATED_AT_KEY: &str = "created_at";

/// Metadata key for the latest write time (RFC 3339), used to order listings
pub const UPDATED_AT_KEY: &str = "updated_at";

/// Artifact loaded from the archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Path relative to the archive root
    pub path: String,
    /// Body without the metadata header
    pub content: String,
    /// Header metadata, empty when the file has no header
    pub metadata: Metadata,
}

impl Artifact {
    /// Category owning this artifact, if it lives under one
    #[inline]
    #[must_use]
    pub fn category(&self) -> Option<Category> {
        Category::of_path(&self.path)
    }

    /// File name component of the path
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Metadata value by key
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// Parsed status, if present and recognised
    #[must_use]
    pub fn status(&self) -> Option<ArtifactStatus> {
        self.get(STATUS_KEY).and_then(|s| s.parse().ok())
    }

    /// Blake3 checksum of the body (hex)
    #[must_use]
    pub fn checksum(&self) -> String {
        blake3::hash(self.content.as_bytes()).to_hex().to_string()
    }
}

/// Advisory artifact status
///
/// The archive never enforces transitions; callers own that policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactStatus {
    Draft,
    Review,
    Approved,
    Completed,
}

impl ArtifactStatus {
    /// Lowercase label as stored in metadata
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ArtifactStatus::Draft => "draft",
            ArtifactStatus::Review => "review",
            ArtifactStatus::Approved => "approved",
            ArtifactStatus::Completed => "completed",
        }
    }

    /// Whether `next` follows the usual draft → review → approved/completed flow
    ///
    /// Moving back to draft is always allowed (course correction).
    #[must_use]
    pub fn is_forward_transition(self, next: ArtifactStatus) -> bool {
        use ArtifactStatus::{Approved, Completed, Draft, Review};
        match (self, next) {
            (_, Draft) => true,
            (Draft, Review) => true,
            (Review, Approved | Completed) => true,
            (Approved, Completed) => true,
            (a, b) => a == b,
        }
    }
}

impl fmt::Display for ArtifactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown status value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown artifact status: '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for ArtifactStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(ArtifactStatus::Draft),
            "review" => Ok(ArtifactStatus::Review),
            "approved" => Ok(ArtifactStatus::Approved),
            "completed" => Ok(ArtifactStatus::Completed),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

/// Listing entry produced by [`ArtifactStore::list_artifacts`](crate::ArtifactStore::list_artifacts)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactSummary {
    /// Path relative to the archive root
    pub path: String,
    /// Owning category
    pub category: Option<Category>,
    /// Status label, `"unknown"` when missing
    pub status: String,
    /// `created_at` metadata, empty when missing
    pub created_at: String,
    /// `updated_at` metadata, empty when missing
    pub updated_at: String,
    /// Blake3 checksum of the body
    pub checksum: String,
}

impl From<&Artifact> for ArtifactSummary {
    fn from(artifact: &Artifact) -> Self {
        let field = |key: &str| artifact.get(key).unwrap_or_default().to_string();
        Self {
            path: artifact.path.clone(),
            category: artifact.category(),
            status: artifact.get(STATUS_KEY).unwrap_or("unknown").to_string(),
            created_at: field(CREATED_AT_KEY),
            updated_at: field(UPDATED_AT_KEY),
            checksum: artifact.checksum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(path: &str, status: Option<&str>) -> Artifact {
        let mut metadata = Metadata::new();
        if let Some(s) = status {
            metadata.insert(STATUS_KEY.to_string(), s.to_string());
        }
        Artifact {
            path: path.to_string(),
            content: "Body text".to_string(),
            metadata,
        }
    }

    #[test]
    fn location_accessors() {
        let a = artifact("stories/epic1/story_1.md", Some("draft"));
        assert_eq!(a.category(), Some(Category::Stories));
        assert_eq!(a.file_name(), "story_1.md");
        assert_eq!(a.status(), Some(ArtifactStatus::Draft));
    }

    #[test]
    fn checksum_tracks_body() {
        let a = artifact("prd/prd.md", None);
        let mut b = a.clone();
        assert_eq!(a.checksum(), b.checksum());
        b.content.push('!');
        assert_ne!(a.checksum(), b.checksum());
    }

    #[test]
    fn summary_defaults() {
        let summary = ArtifactSummary::from(&artifact("notes.md", None));
        assert_eq!(summary.status, "unknown");
        assert_eq!(summary.category, None);
        assert!(summary.created_at.is_empty());
    }

    #[test]
    fn status_flow_is_advisory() {
        use ArtifactStatus::*;
        assert!(Draft.is_forward_transition(Review));
        assert!(Review.is_forward_transition(Approved));
        assert!(Review.is_forward_transition(Completed));
        assert!(Completed.is_forward_transition(Draft));
        assert!(!Draft.is_forward_transition(Completed));
        assert!(!Approved.is_forward_transition(Review));
    }

    #[test]
    fn status_parsing() {
        assert_eq!(" Review ".parse::<ArtifactStatus>(), Ok(ArtifactStatus::Review));
        let err = "done".parse::<ArtifactStatus>().unwrap_err();
        assert_eq!(err, UnknownStatus("done".to_string()));
        assert_eq!(err.to_string(), "unknown artifact status: 'done'");
    }
}
