//! BMAD Checklists
//!
//! Turns checklist sources into structured definitions and caches them for
//! the process lifetime.
//!
//! # Source format
//!
//! ```text
//! ## Section title
//! Free prose describing the section.
//! - [ ] Item text
//! - [ ] Optional item (if applicable)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use bmad_checklist::ChecklistRegistry;
//!
//! let registry = ChecklistRegistry::new("checklists");
//! let checklist = registry.load("story_draft_checklist").await?;
//! println!("{} items", checklist.total_items);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod definition;
pub mod error;
pub mod parser;
pub mod registry;

pub use definition::{ChecklistDefinition, Item, Section, OPTIONAL_MARKERS};
pub use error::{ChecklistError, ChecklistResult};
pub use parser::{parse_checklist, ChecklistParser, ITEM_MARKER};
pub use registry::{CacheStats, ChecklistRegistry, DEFAULT_CAPACITY};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
