//! Checklist evaluation

use crate::mode::ValidationMode;
use crate::result::{FailedItemDetail, ItemResult, ItemStatus, SectionResult, Tally, ValidationResult};
use crate::rules::{DocumentView, KeywordRules, RuleSource};
use bmad_checklist::{ChecklistDefinition, Item};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Pass rate below which a document needs significant work
pub const REVISION_THRESHOLD: f64 = 70.0;

/// Pass rate below which remaining failures are worth a mention
pub const POLISH_THRESHOLD: f64 = 85.0;

/// Caller-supplied context for a validation run
///
/// Carried through to reports and logs; scoring does not depend on it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ValidationContext {
    /// Kind of document under review (`prd`, `architecture`, ...)
    pub document_type: String,
    /// Project phase at validation time
    pub project_phase: String,
    /// Extra requirements the caller cares about
    pub specific_requirements: Vec<String>,
}

impl ValidationContext {
    #[inline]
    #[must_use]
    pub fn with_document_type(mut self, document_type: impl Into<String>) -> Self {
        self.document_type = document_type.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_project_phase(mut self, phase: impl Into<String>) -> Self {
        self.project_phase = phase.into();
        self
    }
}

/// Scores documents against checklist definitions
///
/// Evaluation is pure: the same checklist, document and mode always yield
/// the same result.
#[derive(Debug, Clone, Default)]
pub struct ValidationEngine<R = KeywordRules> {
    rules: R,
}

impl ValidationEngine {
    /// Engine using the keyword rule table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: RuleSource> ValidationEngine<R> {
    /// Engine using a custom rule source
    #[must_use]
    pub fn with_rules(rules: R) -> Self {
        Self { rules }
    }

    /// Score `document` against every item of `checklist`
    pub fn evaluate(
        &self,
        checklist: &ChecklistDefinition,
        document: &str,
        context: &ValidationContext,
        mode: ValidationMode,
    ) -> ValidationResult {
        let doc = DocumentView::new(document);
        let domain = doc.mentions_domain();

        let mut tally = Tally::default();
        let mut failed_items = Vec::new();
        let mut sections = Vec::with_capacity(checklist.sections.len());

        for section in &checklist.sections {
            let mut section_tally = Tally::default();
            let mut items = Vec::with_capacity(section.items.len());

            for item in &section.items {
                let result = self.evaluate_item(item, &doc, domain, mode);
                section_tally.record(result.status);
                tally.record(result.status);
                if let Some(recommendation) = &result.recommendation {
                    failed_items.push(FailedItemDetail {
                        section: section.title.clone(),
                        text: item.text.clone(),
                        recommendation: recommendation.clone(),
                    });
                }
                items.push(result);
            }

            sections.push(SectionResult {
                title: section.title.clone(),
                tally: section_tally,
                items,
            });
        }

        let mut result = ValidationResult {
            checklist_name: checklist.name.clone(),
            tally,
            sections,
            failed_items,
            recommendations: Vec::new(),
        };
        result.recommendations = engine_recommendations(&result);

        info!(
            checklist = %checklist.name,
            mode = %mode,
            document_type = %context.document_type,
            total = result.tally.total,
            passed = result.tally.passed,
            failed = result.tally.failed,
            "Checklist evaluated"
        );
        result
    }

    fn evaluate_item(
        &self,
        item: &Item,
        doc: &DocumentView<'_>,
        domain: bool,
        mode: ValidationMode,
    ) -> ItemResult {
        if item.conditional && !domain {
            return ItemResult {
                text: item.text.clone(),
                status: ItemStatus::Na,
                recommendation: None,
            };
        }

        let outcomes = self.rules.outcomes(item, doc);
        let held = outcomes.iter().filter(|&&o| o).count();
        let passed = !outcomes.is_empty() && mode.passes(held, outcomes.len());
        debug!(item = %item.text, held, total = outcomes.len(), passed, "Item scored");

        if passed {
            ItemResult {
                text: item.text.clone(),
                status: ItemStatus::Pass,
                recommendation: None,
            }
        } else {
            ItemResult {
                text: item.text.clone(),
                status: ItemStatus::Fail,
                recommendation: Some(self.rules.recommendation(item)),
            }
        }
    }
}

/// Overall advice derived from the pass rate and failure distribution
#[must_use]
pub fn engine_recommendations(result: &ValidationResult) -> Vec<String> {
    let mut recommendations = Vec::new();
    let rate = result.pass_rate();

    if rate < REVISION_THRESHOLD {
        recommendations.push("Document requires significant improvement before proceeding to next phase".to_string());
        recommendations.push("Focus on addressing failed items systematically".to_string());
    } else if rate < POLISH_THRESHOLD {
        recommendations.push("Document is good but could benefit from addressing remaining failed items".to_string());
    }

    // strict comparison keeps the first section on ties
    let worst = result
        .sections
        .iter()
        .filter(|s| s.tally.failed > 0)
        .fold(None::<&SectionResult>, |best, s| match best {
            Some(b) if b.tally.failed >= s.tally.failed => Some(b),
            _ => Some(s),
        });
    if let Some(section) = worst {
        recommendations.push(format!(
            "Pay special attention to '{}' section - {} items need improvement",
            section.title, section.tally.failed
        ));
    }

    recommendations
}
