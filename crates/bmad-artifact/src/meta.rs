//! Project lifecycle record and phase transition policies

use crate::category::Category;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// File name of the project record under the archive root
pub const PROJECT_META_FILE: &str = "project_meta.json";

/// Phase written when an archive is first laid out
pub const INITIAL_PHASE: &str = "initialization";

/// Conventional phase order of the methodology
pub const CANONICAL_PHASES: [&str; 5] = [
    INITIAL_PHASE,
    "ideation",
    "requirements",
    "architecture",
    "stories",
];

/// Singleton project record
///
/// Rewritten wholesale on every update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMeta {
    pub project_name: String,
    pub methodology_version: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Free-form phase label
    pub current_phase: String,
    pub category_paths: IndexMap<Category, String>,
    /// Most recent entry time per phase
    #[serde(default)]
    pub phase_started_at: IndexMap<String, DateTime<Utc>>,
}

impl ProjectMeta {
    /// Fresh record in the initial phase
    #[must_use]
    pub fn new(
        project_name: impl Into<String>,
        methodology_version: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let mut meta = Self {
            project_name: project_name.into(),
            methodology_version: methodology_version.into(),
            created_at: now,
            updated_at: now,
            current_phase: INITIAL_PHASE.to_string(),
            category_paths: Category::ALL
                .into_iter()
                .map(|c| (c, c.relative_path()))
                .collect(),
            phase_started_at: IndexMap::new(),
        };
        meta.phase_started_at.insert(INITIAL_PHASE.to_string(), now);
        meta
    }

    /// Move to `phase`, stamping the entry time
    pub fn enter_phase(&mut self, phase: &str, now: DateTime<Utc>) {
        self.current_phase = phase.to_string();
        self.updated_at = now;
        self.phase_started_at.insert(phase.to_string(), now);
    }
}

/// Decides whether a phase change is allowed
pub trait PhasePolicy: Send + Sync + Debug {
    /// Return true when moving `from` → `to` is permitted
    fn allows(&self, from: &str, to: &str) -> bool;
}

/// Any phase may follow any other
#[derive(Debug, Clone, Copy, Default)]
pub struct Unconstrained;

impl PhasePolicy for Unconstrained {
    fn allows(&self, _from: &str, _to: &str) -> bool {
        true
    }
}

/// Refuses moving backwards through a known phase order
///
/// Labels outside the order are always allowed.
#[derive(Debug, Clone)]
pub struct ForwardOnly {
    order: Vec<String>,
}

impl ForwardOnly {
    /// Policy over a custom phase order
    #[must_use]
    pub fn new<I, S>(order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            order: order.into_iter().map(Into::into).collect(),
        }
    }

    fn position(&self, phase: &str) -> Option<usize> {
        self.order.iter().position(|p| p == phase)
    }
}

impl Default for ForwardOnly {
    fn default() -> Self {
        Self::new(CANONICAL_PHASES)
    }
}

impl PhasePolicy for ForwardOnly {
    fn allows(&self, from: &str, to: &str) -> bool {
        match (self.position(from), self.position(to)) {
            (Some(a), Some(b)) => b >= a,
            _ => true,
        }
    }
}
