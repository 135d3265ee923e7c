//! Multi-checklist story validation

use crate::tools::{file_name_segment, SuggestedArtifact};
use bmad_artifact::Metadata;
use bmad_validation::{display_name, ValidationResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};

/// Checklist run when a request names none
pub const DEFAULT_STORY_CHECKLIST: &str = "story_draft_checklist";

/// Artifact type recorded on story validation reports
pub const STORY_REPORT_TYPE: &str = "story_validation";

/// Tool name recorded on story validation reports
pub const VALIDATE_STORY_TOOL: &str = "validate_story";

const SLUG_SOURCE_CHARS: usize = 30;
const UNNAMED_STORY: &str = "unnamed_story";

fn default_checklists() -> Vec<String> {
    vec![DEFAULT_STORY_CHECKLIST.to_string()]
}

fn default_phase() -> String {
    "draft".to_string()
}

/// Input of [`Bmad::validate_story`](crate::Bmad::validate_story)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StoryValidationRequest {
    /// Story text
    pub story_content: String,
    /// Checklists to run, in order
    #[serde(default = "default_checklists")]
    pub checklist_types: Vec<String>,
    /// `draft`, `review` or any other label
    #[serde(default = "default_phase")]
    pub story_phase: String,
    /// `strict`, `standard` or `lenient`; configured default when absent
    #[serde(default)]
    pub validation_mode: Option<String>,
}

impl StoryValidationRequest {
    #[must_use]
    pub fn new(story_content: impl Into<String>) -> Self {
        Self {
            story_content: story_content.into(),
            checklist_types: default_checklists(),
            story_phase: default_phase(),
            validation_mode: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_checklists<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.checklist_types = names.into_iter().map(Into::into).collect();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_phase(mut self, phase: impl Into<String>) -> Self {
        self.story_phase = phase.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.validation_mode = Some(mode.into());
        self
    }
}

/// Phase-aware readiness verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoryReadiness {
    ReadyForReview,
    NeedsImprovements,
    NotReady,
    ReadyForDevelopment,
    MostlyReady,
    NeedsRevision,
    QualityMet,
    QualityConcerns,
}

impl StoryReadiness {
    /// Verdict for a story in `phase` with an unrounded pass rate
    #[must_use]
    pub fn assess(phase: &str, rate: f64) -> Self {
        match phase {
            "draft" if rate >= 80.0 => Self::ReadyForReview,
            "draft" if rate >= 60.0 => Self::NeedsImprovements,
            "draft" => Self::NotReady,
            "review" if rate >= 90.0 => Self::ReadyForDevelopment,
            "review" if rate >= 75.0 => Self::MostlyReady,
            "review" => Self::NeedsRevision,
            _ if rate >= 85.0 => Self::QualityMet,
            _ => Self::QualityConcerns,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ReadyForReview => "READY FOR REVIEW",
            Self::NeedsImprovements => "NEEDS MINOR IMPROVEMENTS",
            Self::NotReady => "NOT READY",
            Self::ReadyForDevelopment => "READY FOR DEVELOPMENT",
            Self::MostlyReady => "MOSTLY READY",
            Self::NeedsRevision => "NEEDS REVISION",
            Self::QualityMet => "QUALITY STANDARDS MET",
            Self::QualityConcerns => "QUALITY CONCERNS",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::ReadyForReview => "Story meets draft quality standards",
            Self::NeedsImprovements => "Address key issues before review",
            Self::NotReady => "Significant improvements needed",
            Self::ReadyForDevelopment => "Story meets all quality standards",
            Self::MostlyReady => "Minor refinements recommended",
            Self::NeedsRevision => "Return to draft for improvements",
            Self::QualityMet => "Story is well-defined",
            Self::QualityConcerns => "Consider improvements",
        }
    }

    /// Follow-up actions for the verdict
    #[must_use]
    pub fn next_steps(self) -> &'static [&'static str] {
        match self {
            Self::ReadyForDevelopment => &[
                "Story is ready for development implementation",
                "Assign to development team",
                "Set up development environment and dependencies",
            ],
            Self::ReadyForReview => &[
                "Move story to review phase",
                "Schedule stakeholder review",
                "Address any remaining minor issues",
            ],
            Self::NeedsImprovements | Self::MostlyReady | Self::QualityConcerns => &[
                "Address identified issues",
                "Re-validate after improvements",
                "Focus on failed checklist items",
            ],
            Self::NotReady | Self::NeedsRevision => &[
                "Significant revision required",
                "Return to story creation/refinement",
                "Address all critical quality issues",
            ],
            Self::QualityMet => &[
                "Story is ready to proceed",
                "Address any failed items for optimal quality",
            ],
        }
    }
}

impl fmt::Display for StoryReadiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of one checklist within a story validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistRun {
    pub checklist_name: String,
    pub result: ValidationResult,
}

/// Output of [`Bmad::validate_story`](crate::Bmad::validate_story)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryValidationOutcome {
    pub story_phase: String,
    /// Checklists that ran, in request order
    pub runs: Vec<ChecklistRun>,
    /// Requested checklists that do not exist
    pub skipped: Vec<String>,
    /// Percent over all items of all runs, rounded to one decimal
    pub overall_pass_rate: f64,
    pub readiness: StoryReadiness,
    pub markdown: String,
    pub suggested_path: String,
    pub suggested_metadata: Metadata,
}

impl SuggestedArtifact for StoryValidationOutcome {
    fn suggested_path(&self) -> &str {
        &self.suggested_path
    }

    fn body(&self) -> &str {
        &self.markdown
    }

    fn suggested_metadata(&self) -> &Metadata {
        &self.suggested_metadata
    }
}

/// Pass rate over the union of all runs, unrounded
#[must_use]
pub fn overall_pass_rate(runs: &[ChecklistRun]) -> f64 {
    let (passed, total) = runs.iter().fold((0usize, 0usize), |(p, t), run| {
        (p + run.result.tally.passed, t + run.result.tally.total)
    });
    if total == 0 {
        0.0
    } else {
        passed as f64 / total as f64 * 100.0
    }
}

/// File-name slug from the first characters of a story
///
/// Keeps alphanumerics and underscores, maps spaces and everything else to
/// `_`, lowercases.
#[must_use]
pub fn story_slug(story_content: &str) -> String {
    let slug: String = story_content
        .chars()
        .take(SLUG_SOURCE_CHARS)
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .flat_map(char::to_lowercase)
        .collect();
    if slug.is_empty() {
        UNNAMED_STORY.to_string()
    } else {
        slug
    }
}

/// `checklists/story_validation_<phase>_<slug>.md`
#[must_use]
pub fn story_report_path(phase: &str, story_content: &str) -> String {
    format!(
        "checklists/story_validation_{}_{}.md",
        file_name_segment(phase, "draft"),
        story_slug(story_content)
    )
}

/// Markdown story validation report
#[must_use]
pub fn render_story_report(
    runs: &[ChecklistRun],
    phase: &str,
    document_length: usize,
    rate: f64,
    readiness: StoryReadiness,
) -> String {
    let mut out = String::new();
    // writing to a String cannot fail
    let _ = write_story_report(&mut out, runs, phase, document_length, rate, readiness);
    out
}

fn write_story_report(
    out: &mut String,
    runs: &[ChecklistRun],
    phase: &str,
    document_length: usize,
    rate: f64,
    readiness: StoryReadiness,
) -> fmt::Result {
    writeln!(out, "# BMAD Story Validation Report")?;
    writeln!(out)?;
    writeln!(out, "## Story Quality Assessment")?;
    writeln!(out)?;
    writeln!(out, "### Overall Validation Summary")?;
    writeln!(out, "- **Story Phase:** {}", display_name(phase))?;
    writeln!(out, "- **Document Length:** {document_length} characters")?;
    writeln!(out, "- **Checklists Executed:** {}", runs.len())?;
    writeln!(out, "- **Overall Quality Score:** {rate:.1}%")?;
    writeln!(out)?;
    writeln!(out, "### Story Readiness Status")?;
    writeln!(out, "**{}** - {}", readiness.label(), readiness.description())?;
    writeln!(out)?;
    writeln!(out, "### Checklist Results")?;

    for run in runs {
        let tally = run.result.tally;
        writeln!(out)?;
        writeln!(out, "#### {}", display_name(&run.checklist_name))?;
        writeln!(
            out,
            "- **Score:** {:.1}% ({}/{})",
            tally.pass_rate(),
            tally.passed,
            tally.total
        )?;
        writeln!(out, "- **Failed Items:** {}", tally.failed)?;
        writeln!(out, "- **Not Applicable:** {}", tally.na)?;
        if !run.result.sections.is_empty() {
            writeln!(out, "- **Section Breakdown:**")?;
            for section in &run.result.sections {
                writeln!(
                    out,
                    "  - {}: {}/{} ({:.0}%)",
                    section.title,
                    section.tally.passed,
                    section.tally.total,
                    section.tally.pass_rate()
                )?;
            }
        }
    }

    let failed: Vec<_> = runs.iter().flat_map(|r| &r.result.failed_items).collect();
    if !failed.is_empty() {
        writeln!(out)?;
        writeln!(out, "### Critical Issues to Address")?;
        for (i, item) in failed.iter().enumerate() {
            writeln!(out, "{}. **{}:** {}", i + 1, item.section, item.text)?;
            writeln!(out, "   *Action:* {}", item.recommendation)?;
        }
    }

    writeln!(out)?;
    writeln!(out, "### Next Steps")?;
    for step in readiness.next_steps() {
        writeln!(out, "- {step}")?;
    }

    let failed_text = failed
        .iter()
        .map(|i| i.text.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(out)?;
    writeln!(out, "### Story Development Guidance")?;
    if failed_text.contains("acceptance criteria") {
        writeln!(out, "- **Focus:** Improve acceptance criteria clarity and testability")?;
    }
    if failed_text.contains("technical") {
        writeln!(out, "- **Focus:** Add more detailed technical implementation guidance")?;
    }
    if failed_text.contains("dependency") {
        writeln!(out, "- **Focus:** Clarify dependencies and prerequisites")?;
    }
    writeln!(out, "- **Remember:** Stories should be self-contained and implementable by AI agents")?;
    writeln!(out, "- **Quality:** Ensure all acceptance criteria are specific and testable")?;
    writeln!(out)?;
    writeln!(out, "---")?;
    writeln!(out, "*Generated by BMAD story validation*")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn readiness_by_phase() {
        assert_eq!(StoryReadiness::assess("draft", 80.0), StoryReadiness::ReadyForReview);
        assert_eq!(StoryReadiness::assess("draft", 79.9), StoryReadiness::NeedsImprovements);
        assert_eq!(StoryReadiness::assess("draft", 59.9), StoryReadiness::NotReady);
        assert_eq!(StoryReadiness::assess("review", 90.0), StoryReadiness::ReadyForDevelopment);
        assert_eq!(StoryReadiness::assess("review", 75.0), StoryReadiness::MostlyReady);
        assert_eq!(StoryReadiness::assess("review", 74.0), StoryReadiness::NeedsRevision);
        assert_eq!(StoryReadiness::assess("done", 85.0), StoryReadiness::QualityMet);
        assert_eq!(StoryReadiness::assess("done", 84.9), StoryReadiness::QualityConcerns);
    }

    #[test]
    fn slug_rules() {
        assert_eq!(story_slug("# Story 1.2: Login form"), "__story_1_2__login_form");
        assert_eq!(story_slug(""), "unnamed_story");
        assert_eq!(story_slug(&"Ab".repeat(40)).len(), 30);
        assert_eq!(
            story_report_path("draft", "Login"),
            "checklists/story_validation_draft_login.md"
        );
        assert_eq!(
            story_report_path("review/../final", "Login"),
            "checklists/story_validation_review____final_login.md"
        );
    }

    #[test]
    fn overall_rate_spans_runs() {
        assert_eq!(overall_pass_rate(&[]), 0.0);
    }

    #[test]
    fn request_defaults() {
        let request: StoryValidationRequest =
            serde_json::from_value(serde_json::json!({"story_content": "s"})).unwrap();
        assert_eq!(request.checklist_types, vec![DEFAULT_STORY_CHECKLIST.to_string()]);
        assert_eq!(request.story_phase, "draft");
        assert_eq!(request, StoryValidationRequest::new("s"));
    }

    #[test]
    fn report_has_guidance() {
        let md = render_story_report(&[], "draft", 10, 0.0, StoryReadiness::NotReady);
        assert!(md.contains("**NOT READY** - Significant improvements needed"));
        assert!(md.contains("- **Story Phase:** Draft"));
        assert!(md.contains("- Return to story creation/refinement"));
        assert!(!md.contains("Critical Issues"));
    }
}
