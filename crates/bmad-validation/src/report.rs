//! Human-facing validation reports

use crate::result::{FailedItemDetail, ValidationResult};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};

/// Overall quality band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTier {
    Excellent,
    Good,
    NeedsImprovement,
    RequiresRevision,
}

impl StatusTier {
    /// Band for an unrounded pass rate
    #[must_use]
    pub fn from_pass_rate(rate: f64) -> Self {
        if rate >= 90.0 {
            StatusTier::Excellent
        } else if rate >= 80.0 {
            StatusTier::Good
        } else if rate >= 70.0 {
            StatusTier::NeedsImprovement
        } else {
            StatusTier::RequiresRevision
        }
    }

    /// Upper-case heading label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            StatusTier::Excellent => "EXCELLENT",
            StatusTier::Good => "GOOD",
            StatusTier::NeedsImprovement => "NEEDS IMPROVEMENT",
            StatusTier::RequiresRevision => "REQUIRES REVISION",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            StatusTier::Excellent => "Document meets BMAD quality standards",
            StatusTier::Good => "Document meets most requirements with minor improvements needed",
            StatusTier::NeedsImprovement => "Document needs improvements before proceeding",
            StatusTier::RequiresRevision => "Document requires significant revision",
        }
    }

    /// Whether the document may move on to the next phase
    #[inline]
    #[must_use]
    pub const fn is_ready(self) -> bool {
        matches!(self, StatusTier::Excellent | StatusTier::Good)
    }
}

impl fmt::Display for StatusTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-section line of a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSummary {
    pub title: String,
    pub passed: usize,
    pub total: usize,
    /// Percent, rounded to one decimal
    pub pass_rate: f64,
}

/// Rendered validation outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub checklist_name: String,
    /// Document length in characters
    pub document_length: usize,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub na: usize,
    /// Percent, rounded to one decimal
    pub pass_rate: f64,
    pub tier: StatusTier,
    pub sections: Vec<SectionSummary>,
    pub failed_items: Vec<FailedItemDetail>,
    pub recommendations: Vec<String>,
    pub next_steps: Vec<String>,
}

/// Builds [`Report`]s from validation results
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportBuilder;

impl ReportBuilder {
    /// Summarise `result` for a document of `document_length` characters
    #[must_use]
    pub fn build(result: &ValidationResult, document_length: usize) -> Report {
        let rate = result.pass_rate();
        let tier = StatusTier::from_pass_rate(rate);

        let sections = result
            .sections
            .iter()
            .map(|s| SectionSummary {
                title: s.title.clone(),
                passed: s.tally.passed,
                total: s.tally.total,
                pass_rate: round1(s.tally.pass_rate()),
            })
            .collect();

        Report {
            checklist_name: result.checklist_name.clone(),
            document_length,
            total: result.tally.total,
            passed: result.tally.passed,
            failed: result.tally.failed,
            na: result.tally.na,
            pass_rate: round1(rate),
            tier,
            sections,
            failed_items: result.failed_items.clone(),
            recommendations: result.recommendations.clone(),
            next_steps: next_steps(rate),
        }
    }
}

/// Follow-up actions for a pass rate
#[must_use]
pub fn next_steps(rate: f64) -> Vec<String> {
    let steps: &[&str] = if rate >= 80.0 {
        &[
            "Document is ready for next phase",
            "Address any failed items for optimal quality",
        ]
    } else {
        &[
            "Address all failed items before proceeding",
            "Re-run validation after improvements",
            "Consider consulting BMAD methodology documentation",
        ]
    };
    steps.iter().map(|s| (*s).to_string()).collect()
}

impl Report {
    /// Markdown document suitable for archiving under `checklists/`
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        // writing to a String cannot fail
        let _ = self.write_markdown(&mut out);
        out
    }

    fn write_markdown(&self, out: &mut String) -> fmt::Result {
        writeln!(out, "# BMAD Checklist Validation Report")?;
        writeln!(out)?;
        writeln!(out, "## Checklist: {}", display_name(&self.checklist_name))?;
        writeln!(out)?;
        writeln!(out, "### Validation Summary")?;
        writeln!(out, "- **Document Length:** {} characters", group_thousands(self.document_length))?;
        writeln!(out, "- **Total Items:** {}", self.total)?;
        writeln!(out, "- **Passed:** {}", self.passed)?;
        writeln!(out, "- **Failed:** {}", self.failed)?;
        writeln!(out, "- **Not Applicable:** {}", self.na)?;
        writeln!(out, "- **Pass Rate:** {:.1}%", self.pass_rate)?;
        writeln!(out)?;
        writeln!(out, "### Overall Status")?;
        writeln!(out, "**{}** - {}", self.tier.label(), self.tier.description())?;

        if !self.sections.is_empty() {
            writeln!(out)?;
            writeln!(out, "### Section Results")?;
            for section in &self.sections {
                writeln!(
                    out,
                    "- **{}:** {}/{} ({:.0}%)",
                    section.title, section.passed, section.total, section.pass_rate
                )?;
            }
        }

        if !self.failed_items.is_empty() {
            writeln!(out)?;
            writeln!(out, "### Failed Items Requiring Attention")?;
            for (i, item) in self.failed_items.iter().enumerate() {
                writeln!(out, "{}. **{}:** {}", i + 1, item.section, item.text)?;
                writeln!(out, "   *Recommendation:* {}", item.recommendation)?;
            }
        }

        if !self.recommendations.is_empty() {
            writeln!(out)?;
            writeln!(out, "### Specific Recommendations")?;
            for recommendation in &self.recommendations {
                writeln!(out, "- {recommendation}")?;
            }
        }

        writeln!(out)?;
        writeln!(out, "### Next Steps")?;
        for (i, step) in self.next_steps.iter().enumerate() {
            writeln!(out, "{}. {}", i + 1, step)?;
        }
        writeln!(out)?;
        writeln!(out, "---")?;
        writeln!(out, "*Generated by BMAD checklist validation*")
    }
}

/// `story_draft_checklist` -> `Story Draft Checklist`
#[must_use]
pub fn display_name(name: &str) -> String {
    name.split(['_', '-'])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
