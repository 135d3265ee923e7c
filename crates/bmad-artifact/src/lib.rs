//! BMAD Artifact Archive
//!
//! Project-local storage for methodology artifacts (briefs, PRDs,
//! architecture documents, stories, validation reports).
//!
//! # Core Concepts
//!
//! - [`ArtifactStore`]: Typed directory archive rooted at `.bmad/`
//! - [`Artifact`]: Text body plus ordered header [`Metadata`]
//! - [`ProjectMeta`]: Singleton lifecycle record with the current phase
//! - [`PhasePolicy`]: Pluggable phase transition rule ([`Unconstrained`] by default)
//!
//! # Example
//!
//! ```rust,ignore
//! use bmad_artifact::{ArtifactStore, Metadata};
//!
//! let store = ArtifactStore::for_project(".", ".bmad");
//! store.ensure_layout().await?;
//!
//! let mut metadata = Metadata::new();
//! metadata.insert("status".into(), "draft".into());
//! store.save("stories/x.md", "Body text", Some(&metadata)).await?;
//!
//! let artifact = store.load("stories/x.md").await?;
//! assert_eq!(artifact.content, "Body text");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod artifact;
mod category;
mod error;
pub mod header;
mod meta;
mod store;

pub use artifact::{
    Artifact, ArtifactStatus, ArtifactSummary, UnknownStatus, ARTIFACT_TYPE_KEY, CREATED_AT_KEY,
    STATUS_KEY, UPDATED_AT_KEY,
};
pub use category::{Category, UnknownCategory};
pub use error::{HeaderError, StoreError, StoreResult};
pub use header::Metadata;
pub use meta::{
    ForwardOnly, PhasePolicy, ProjectMeta, Unconstrained, CANONICAL_PHASES, INITIAL_PHASE,
    PROJECT_META_FILE,
};
pub use store::{is_text_document, ArtifactStore, DEFAULT_ARCHIVE_DIR, DEFAULT_METHODOLOGY_VERSION};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
