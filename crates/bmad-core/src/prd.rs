//! PRD requirements validation

use crate::tools::{file_name_segment, SuggestedArtifact};
use bmad_artifact::Metadata;
use bmad_validation::ValidationResult;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};

/// Checklist PRDs are scored against
pub const PM_CHECKLIST: &str = "pm_checklist";

/// Checklist types accepted in place of [`PM_CHECKLIST`]
pub const PM_CHECKLIST_ALIASES: [&str; 2] = ["standard", "comprehensive"];

/// Artifact type recorded on requirements validation reports
pub const REQUIREMENTS_REPORT_TYPE: &str = "requirements_validation";

/// Tool name recorded on requirements validation reports
pub const VALIDATE_REQUIREMENTS_TOOL: &str = "validate_requirements";

fn default_checklist_type() -> String {
    PM_CHECKLIST.to_string()
}

fn default_include_recommendations() -> bool {
    true
}

/// Input of [`Bmad::validate_requirements`](crate::Bmad::validate_requirements)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RequirementsValidationRequest {
    /// PRD text
    pub prd_content: String,
    /// `pm_checklist`, `standard`, `comprehensive` or another checklist name
    #[serde(default = "default_checklist_type")]
    pub checklist_type: String,
    /// `strict`, `standard` or `lenient`; configured default when absent
    #[serde(default)]
    pub validation_mode: Option<String>,
    /// Render critical issues and improvement recommendations
    #[serde(default = "default_include_recommendations")]
    pub include_recommendations: bool,
}

impl RequirementsValidationRequest {
    #[must_use]
    pub fn new(prd_content: impl Into<String>) -> Self {
        Self {
            prd_content: prd_content.into(),
            checklist_type: default_checklist_type(),
            validation_mode: None,
            include_recommendations: true,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_checklist_type(mut self, checklist_type: impl Into<String>) -> Self {
        self.checklist_type = checklist_type.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.validation_mode = Some(mode.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_recommendations(mut self, include: bool) -> Self {
        self.include_recommendations = include;
        self
    }
}

/// Checklist name for a requested checklist type
#[must_use]
pub fn resolve_checklist_type(checklist_type: &str) -> &str {
    if PM_CHECKLIST_ALIASES.contains(&checklist_type) {
        PM_CHECKLIST
    } else {
        checklist_type
    }
}

/// Whether a PRD can move on to architecture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrdReadiness {
    ReadyForArchitecture,
    MostlyReady,
    NeedsImprovement,
    NotReady,
}

impl PrdReadiness {
    /// Verdict for an unrounded pass rate
    #[must_use]
    pub fn assess(rate: f64) -> Self {
        if rate >= 90.0 {
            Self::ReadyForArchitecture
        } else if rate >= 80.0 {
            Self::MostlyReady
        } else if rate >= 70.0 {
            Self::NeedsImprovement
        } else {
            Self::NotReady
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ReadyForArchitecture => "READY FOR ARCHITECTURE",
            Self::MostlyReady => "MOSTLY READY",
            Self::NeedsImprovement => "NEEDS IMPROVEMENT",
            Self::NotReady => "NOT READY",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::ReadyForArchitecture => "PRD meets BMAD quality standards",
            Self::MostlyReady => "Minor improvements recommended before architecture phase",
            Self::NeedsImprovement => "Address key issues before proceeding",
            Self::NotReady => "Significant revision required",
        }
    }

    /// Follow-up actions for the verdict
    #[must_use]
    pub fn next_steps(self) -> &'static [&'static str] {
        match self {
            Self::ReadyForArchitecture => &[
                "PRD is ready for architecture phase",
                "Proceed with technical architecture design",
                "Consider addressing any remaining minor issues",
            ],
            Self::MostlyReady => &[
                "Address failed items for optimal quality",
                "Re-validate after improvements (optional)",
                "Can proceed to architecture with caution",
            ],
            Self::NeedsImprovement | Self::NotReady => &[
                "Address all critical issues before proceeding",
                "Re-run validation after improvements",
                "Do not proceed to architecture phase yet",
            ],
        }
    }

    /// Architecture work may start
    #[inline]
    #[must_use]
    pub const fn allows_architecture(self) -> bool {
        matches!(self, Self::ReadyForArchitecture | Self::MostlyReady)
    }
}

impl fmt::Display for PrdReadiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Output of [`Bmad::validate_requirements`](crate::Bmad::validate_requirements)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementsValidationOutcome {
    /// Checklist type as requested
    pub checklist_type: String,
    /// Checklist that actually ran
    pub checklist_name: String,
    pub result: ValidationResult,
    /// Percent, rounded to one decimal
    pub pass_rate: f64,
    pub readiness: PrdReadiness,
    pub markdown: String,
    pub suggested_path: String,
    pub suggested_metadata: Metadata,
}

impl SuggestedArtifact for RequirementsValidationOutcome {
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

/// `checklists/requirements_validation_<checklist_type>.md`
#[must_use]
pub fn requirements_report_path(checklist_type: &str) -> String {
    format!(
        "checklists/requirements_validation_{}.md",
        file_name_segment(checklist_type, PM_CHECKLIST)
    )
}

fn section_mark(rate: f64) -> &'static str {
    if rate >= 80.0 {
        "OK"
    } else if rate >= 60.0 {
        "WEAK"
    } else {
        "FAILING"
    }
}

/// Markdown requirements validation report
#[must_use]
pub fn render_requirements_report(
    result: &ValidationResult,
    document_length: usize,
    readiness: PrdReadiness,
    include_recommendations: bool,
) -> String {
    let mut out = String::new();
    // writing to a String cannot fail
    let _ = write_requirements_report(
        &mut out,
        result,
        document_length,
        readiness,
        include_recommendations,
    );
    out
}

fn write_requirements_report(
    out: &mut String,
    result: &ValidationResult,
    document_length: usize,
    readiness: PrdReadiness,
    include_recommendations: bool,
) -> fmt::Result {
    let tally = result.tally;
    writeln!(out, "# BMAD Requirements Validation Report")?;
    writeln!(out)?;
    writeln!(out, "## PRD Quality Assessment")?;
    writeln!(out)?;
    writeln!(out, "### Validation Summary")?;
    writeln!(out, "- **Document Length:** {document_length} characters")?;
    writeln!(out, "- **Total Quality Items:** {}", tally.total)?;
    writeln!(out, "- **Passed Items:** {}", tally.passed)?;
    writeln!(out, "- **Failed Items:** {}", tally.failed)?;
    writeln!(out, "- **Not Applicable:** {}", tally.na)?;
    writeln!(out, "- **Quality Score:** {:.1}%", tally.pass_rate())?;
    writeln!(out)?;
    writeln!(out, "### Readiness Assessment")?;
    writeln!(out, "**{}** - {}", readiness.label(), readiness.description())?;

    if !result.sections.is_empty() {
        writeln!(out)?;
        writeln!(out, "### Section Quality Breakdown")?;
        for section in &result.sections {
            let rate = section.tally.pass_rate();
            writeln!(
                out,
                "- **{}:** {}/{} ({rate:.0}%) {}",
                section.title,
                section.tally.passed,
                section.tally.total,
                section_mark(rate)
            )?;
        }
    }

    if include_recommendations && !result.failed_items.is_empty() {
        writeln!(out)?;
        writeln!(out, "### Critical Issues to Address")?;
        for (i, item) in result.failed_items.iter().enumerate() {
            writeln!(out, "{}. **{}:** {}", i + 1, item.section, item.text)?;
            writeln!(out, "   *Action:* {}", item.recommendation)?;
        }
    }

    if include_recommendations && !result.recommendations.is_empty() {
        writeln!(out)?;
        writeln!(out, "### Improvement Recommendations")?;
        for (i, rec) in result.recommendations.iter().enumerate() {
            writeln!(out, "{}. {rec}", i + 1)?;
        }
    }

    writeln!(out)?;
    writeln!(out, "### Next Steps")?;
    for step in readiness.next_steps() {
        writeln!(out, "- {step}")?;
    }
    writeln!(out)?;
    writeln!(out, "---")?;
    writeln!(out, "*Generated by BMAD requirements validation*")
}

#[cfg(test)]
mod tests {
    use super::*;
    use bmad_checklist::parse_checklist;
    use bmad_validation::{ValidationContext, ValidationEngine, ValidationMode};
    use pretty_assertions::assert_eq;

    fn scored(document: &str) -> ValidationResult {
        let checklist = parse_checklist(
            PM_CHECKLIST,
            "## Goals\n- [ ] Goal is measurable\n## Quality\n- [ ] Testing strategy\n",
        );
        ValidationEngine::new().evaluate(
            &checklist,
            document,
            &ValidationContext::default().with_document_type("prd"),
            ValidationMode::Standard,
        )
    }

    #[test]
    fn readiness_thresholds() {
        assert_eq!(PrdReadiness::assess(100.0), PrdReadiness::ReadyForArchitecture);
        assert_eq!(PrdReadiness::assess(90.0), PrdReadiness::ReadyForArchitecture);
        assert_eq!(PrdReadiness::assess(89.9), PrdReadiness::MostlyReady);
        assert_eq!(PrdReadiness::assess(80.0), PrdReadiness::MostlyReady);
        assert_eq!(PrdReadiness::assess(79.9), PrdReadiness::NeedsImprovement);
        assert_eq!(PrdReadiness::assess(70.0), PrdReadiness::NeedsImprovement);
        assert_eq!(PrdReadiness::assess(69.9), PrdReadiness::NotReady);
        assert!(PrdReadiness::MostlyReady.allows_architecture());
        assert!(!PrdReadiness::NeedsImprovement.allows_architecture());
    }

    #[test]
    fn aliases_resolve_to_pm_checklist() {
        assert_eq!(resolve_checklist_type("standard"), PM_CHECKLIST);
        assert_eq!(resolve_checklist_type("comprehensive"), PM_CHECKLIST);
        assert_eq!(resolve_checklist_type("pm_checklist"), PM_CHECKLIST);
        assert_eq!(resolve_checklist_type("architect_checklist"), "architect_checklist");
    }

    #[test]
    fn report_path_uses_requested_type() {
        assert_eq!(
            requirements_report_path("comprehensive"),
            "checklists/requirements_validation_comprehensive.md"
        );
        assert_eq!(
            requirements_report_path("team/pm"),
            "checklists/requirements_validation_team_pm.md"
        );
        assert_eq!(
            requirements_report_path(""),
            "checklists/requirements_validation_pm_checklist.md"
        );
    }

    #[test]
    fn recommendations_can_be_left_out() {
        let result = scored("");
        let with = render_requirements_report(&result, 0, PrdReadiness::NotReady, true);
        let without = render_requirements_report(&result, 0, PrdReadiness::NotReady, false);

        assert!(with.contains("### Critical Issues to Address"));
        assert!(with.contains("### Improvement Recommendations"));
        assert!(!without.contains("### Critical Issues to Address"));
        assert!(!without.contains("### Improvement Recommendations"));
        assert!(without.contains("**NOT READY** - Significant revision required"));
        assert!(without.contains("- Do not proceed to architecture phase yet"));
    }

    #[test]
    fn section_breakdown_marks_rates() {
        let result = scored("The goal is a testing-first rollout.");
        let markdown = render_requirements_report(&result, 36, PrdReadiness::ReadyForArchitecture, true);
        assert!(markdown.contains("- **Goals:** 1/1 (100%) OK"));
        assert!(markdown.contains("- **Quality:** 1/1 (100%) OK"));
        assert!(markdown.contains("- **Quality Score:** 100.0%"));
        assert!(!markdown.contains("### Critical Issues to Address"));
    }

    #[test]
    fn request_defaults() {
        let request: RequirementsValidationRequest =
            serde_json::from_value(serde_json::json!({ "prd_content": "text" })).unwrap();
        assert_eq!(request, RequirementsValidationRequest::new("text"));
        assert_eq!(request.checklist_type, "pm_checklist");
        assert!(request.include_recommendations);
    }
}
