//! BMAD Validation
//!
//! Scores a document against a checklist definition and renders the outcome
//! as a report.
//!
//! # Core Concepts
//!
//! - **Rules**: each item maps to predicates over the document via an ordered
//!   keyword table ([`rules::KEYWORD_RULES`])
//! - **Modes**: the fraction of predicates an item needs to pass
//!   ([`ValidationMode`])
//! - **Pass rate**: passed items over all items, not-applicable included
//! - **Tiers**: excellent, good, needs improvement, requires revision
//!
//! # Example
//!
//! ```rust,ignore
//! use bmad_checklist::parse_checklist;
//! use bmad_validation::{ReportBuilder, ValidationContext, ValidationEngine, ValidationMode};
//!
//! let checklist = parse_checklist("demo", "## Clarity\n- [ ] Clear goal\n");
//! let document = "This is a clear and specific goal.";
//! let result = ValidationEngine::new().evaluate(
//!     &checklist,
//!     document,
//!     &ValidationContext::default(),
//!     ValidationMode::Standard,
//! );
//! let report = ReportBuilder::build(&result, document.chars().count());
//! assert_eq!(report.pass_rate, 100.0);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod engine;
pub mod error;
pub mod mode;
pub mod report;
pub mod result;
pub mod rules;

pub use engine::{engine_recommendations, ValidationContext, ValidationEngine};
pub use error::ValidationError;
pub use mode::ValidationMode;
pub use report::{display_name, next_steps, Report, ReportBuilder, SectionSummary, StatusTier};
pub use result::{FailedItemDetail, ItemResult, ItemStatus, SectionResult, Tally, ValidationResult};
pub use rules::{DocumentView, KeywordRule, KeywordRules, Predicate, RuleSource};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
