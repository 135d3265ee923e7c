//! Testing utilities for BMAD workspace
//!
//! Temporary project directories with a checklist folder, and sample
//! checklist sources and documents.

#![allow(missing_docs)]

use bmad_artifact::ArtifactStore;
use bmad_core::BmadConfig;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const STORY_DRAFT_CHECKLIST: &str = "\
# Story Draft Checklist

## Story Structure
Basic shape of a user story.
- [ ] User story follows the As a / I want / So that format
- [ ] Clear goal for the story
- [ ] Acceptance criteria are listed

## Technical Guidance
- [ ] Technical notes reference the architecture
- [ ] Testing approach is described
- [ ] API contract documented (if applicable)
";

pub const PM_CHECKLIST: &str = "\
# Product Manager Checklist

## Problem Definition
- [ ] Clear problem statement
- [ ] Goals are measurable
- [ ] Target user identified

## Requirements
- [ ] Functional requirements listed
- [ ] Security requirements captured
- [ ] Epic breakdown present
";

pub const SAMPLE_STORY: &str = "\
# Story 1.2: Login form

As a user I want to sign in so that my data stays private.

## Goal
A clear and specific goal: authenticate returning users.

## Acceptance Criteria
- The form must validate the email field
- The form should lock after five failures
- The user story is covered by a test

## Technical Notes
Follows the architecture document; the technical stack uses the existing api.
Testing: unit tests plus an end-to-end test.
";

/// Project directory in a temp dir with sample checklists installed
pub struct TestProject {
    dir: TempDir,
    pub config: BmadConfig,
}

impl TestProject {
    /// Project with `story_draft_checklist` and `pm_checklist` installed
    pub fn new() -> Self {
        let project = Self::empty();
        project.write_checklist("story_draft_checklist", STORY_DRAFT_CHECKLIST);
        project.write_checklist("pm_checklist", PM_CHECKLIST);
        project
    }

    /// Project with an empty checklist directory
    pub fn empty() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = BmadConfig::default().with_project_root(dir.path());
        std::fs::create_dir_all(config.checklist_root()).unwrap();
        Self { dir, config }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn archive_root(&self) -> PathBuf {
        self.config.archive_root()
    }

    pub fn store(&self) -> ArtifactStore {
        ArtifactStore::for_project(self.path(), &self.config.archive_dir)
    }

    pub fn write_checklist(&self, name: &str, source: &str) -> PathBuf {
        let path = self.config.checklist_root().join(format!("{name}.md"));
        std::fs::write(&path, source).unwrap();
        path
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Fresh archive store rooted directly in a temp dir
pub fn temp_store() -> (TempDir, ArtifactStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path().join("archive"));
    (dir, store)
}
