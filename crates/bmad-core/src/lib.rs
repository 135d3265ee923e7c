//! BMAD Core
//!
//! Tool-facing boundary over the artifact archive and the checklist
//! validation engine.
//!
//! # Core Concepts
//!
//! - **Bmad**: one project's archive, checklist registry and engine
//! - **Outcomes**: rendered reports with a suggested archive path and
//!   metadata, persisted only on request
//! - **Readiness**: story and PRD verdicts derived from pass rates
//! - **TextGenerator**: the external collaborator that writes artifact bodies
//!
//! # Example
//!
//! ```rust,ignore
//! use bmad_core::{Bmad, BmadConfig, RunChecklistRequest};
//!
//! let bmad = Bmad::new(BmadConfig::load("bmad.toml").await?);
//! bmad_core::init_tracing(bmad.config())?;
//!
//! let outcome = bmad
//!     .run_checklist(RunChecklistRequest::new(prd_text, "pm_checklist").with_mode("strict"))
//!     .await?;
//! println!("{}", outcome.markdown);
//! bmad.persist(&outcome).await?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod generation;
pub mod prd;
pub mod schema;
pub mod service;
pub mod story;
pub mod telemetry;
pub mod tools;

pub use config::BmadConfig;
pub use error::{BmadError, BmadResult, ErrorKind};
pub use generation::{
    ContextDocument, DraftOutcome, GenerationError, GenerationRequest, GenerationTask,
    TextGenerator,
};
pub use prd::{
    PrdReadiness, RequirementsValidationOutcome, RequirementsValidationRequest, PM_CHECKLIST,
};
pub use schema::{input_schema, tool_schemas};
pub use service::Bmad;
pub use story::{
    ChecklistRun, StoryReadiness, StoryValidationOutcome, StoryValidationRequest,
    DEFAULT_STORY_CHECKLIST,
};
pub use telemetry::init_tracing;
pub use tools::{ChecklistOutcome, RunChecklistRequest, SuggestedArtifact};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
