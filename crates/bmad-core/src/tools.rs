//! Tool-facing request and outcome types
//!
//! Outcomes carry a rendered document together with where it should live in
//! the archive and the metadata it should carry. Nothing is written until the
//! caller hands an outcome to [`Bmad::persist`](crate::Bmad::persist).

use bmad_artifact::{
    ArtifactStatus, Metadata, ARTIFACT_TYPE_KEY, CREATED_AT_KEY, STATUS_KEY, UPDATED_AT_KEY,
};
use bmad_validation::{Report, ValidationContext};
use chrono::{DateTime, SecondsFormat, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Artifact type recorded on checklist validation reports
pub const VALIDATION_REPORT_TYPE: &str = "checklist_validation";

/// Tool name recorded on checklist validation reports
pub const RUN_CHECKLIST_TOOL: &str = "run_checklist";

/// Input of [`Bmad::run_checklist`](crate::Bmad::run_checklist)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RunChecklistRequest {
    /// Document text to validate
    pub document_content: String,
    /// Checklist name, e.g. `pm_checklist`
    pub checklist_name: String,
    /// Caller context
    #[serde(default)]
    pub validation_context: ValidationContext,
    /// `strict`, `standard` or `lenient`; configured default when absent
    #[serde(default)]
    pub validation_mode: Option<String>,
}

impl RunChecklistRequest {
    #[must_use]
    pub fn new(document_content: impl Into<String>, checklist_name: impl Into<String>) -> Self {
        Self {
            document_content: document_content.into(),
            checklist_name: checklist_name.into(),
            validation_context: ValidationContext::default(),
            validation_mode: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_context(mut self, context: ValidationContext) -> Self {
        self.validation_context = context;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.validation_mode = Some(mode.into());
        self
    }
}

/// Output of [`Bmad::run_checklist`](crate::Bmad::run_checklist)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistOutcome {
    pub report: Report,
    /// Report rendered as Markdown
    pub markdown: String,
    pub suggested_path: String,
    pub suggested_metadata: Metadata,
}

/// A rendered document with a proposed archive location
pub trait SuggestedArtifact {
    /// Relative archive path
    fn suggested_path(&self) -> &str;

    /// Document body
    fn body(&self) -> &str;

    /// Header metadata
    fn suggested_metadata(&self) -> &Metadata;
}

impl SuggestedArtifact for ChecklistOutcome {
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

/// Caller-supplied text made safe for one file-name segment
///
/// Alphanumerics, `-` and `_` are kept; everything else, path separators
/// included, becomes `_`. Blank input yields `fallback`.
#[must_use]
pub fn file_name_segment(value: &str, fallback: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return fallback.to_string();
    }
    value
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

/// `checklists/validation_<checklist>_<document_type|document>.md`
#[must_use]
pub fn validation_report_path(checklist_name: &str, document_type: &str) -> String {
    format!(
        "checklists/validation_{}_{}.md",
        file_name_segment(checklist_name, "checklist"),
        file_name_segment(document_type, "document")
    )
}

/// Standard metadata proposed for tool-produced artifacts
///
/// `created_at` and `updated_at` carry millisecond precision so archive
/// listings order by recency. Callers append tool-specific keys to the
/// returned map.
#[must_use]
pub fn suggested_metadata(
    artifact_type: &str,
    status: ArtifactStatus,
    tool: &str,
    methodology_version: &str,
    now: DateTime<Utc>,
) -> Metadata {
    let stamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);
    let timestamp = now.to_rfc3339_opts(SecondsFormat::Secs, true);
    let mut metadata = Metadata::new();
    metadata.insert(ARTIFACT_TYPE_KEY.to_string(), artifact_type.to_string());
    metadata.insert(STATUS_KEY.to_string(), status.as_str().to_string());
    metadata.insert(CREATED_AT_KEY.to_string(), stamp.clone());
    metadata.insert(UPDATED_AT_KEY.to_string(), stamp);
    metadata.insert("suggested_created_at".to_string(), timestamp.clone());
    metadata.insert("suggested_updated_at".to_string(), timestamp);
    metadata.insert("generated_by_tool".to_string(), tool.to_string());
    metadata.insert("bmad_version".to_string(), methodology_version.to_string());
    metadata
}

/// One-decimal percentage as written into metadata
#[must_use]
pub fn format_rate(rate: f64) -> String {
    format!("{rate:.1}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn report_path() {
        assert_eq!(
            validation_report_path("pm_checklist", "prd"),
            "checklists/validation_pm_checklist_prd.md"
        );
        assert_eq!(
            validation_report_path("pm_checklist", " "),
            "checklists/validation_pm_checklist_document.md"
        );
    }

    #[test]
    fn report_path_stays_in_checklists_dir() {
        let path = validation_report_path("pm_checklist", "api/v2 spec");
        assert_eq!(path, "checklists/validation_pm_checklist_api_v2_spec.md");
        assert_eq!(
            validation_report_path("../pm", "../../etc"),
            "checklists/validation____pm_______etc.md"
        );
        assert_eq!(file_name_segment("tech-spec_v1", "x"), "tech-spec_v1");
    }

    #[test]
    fn metadata_keys_in_order() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let metadata = suggested_metadata("prd", ArtifactStatus::Draft, "generate_prd", "1.0", now);
        let keys: Vec<&str> = metadata.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "artifact_type",
                "status",
                "created_at",
                "updated_at",
                "suggested_created_at",
                "suggested_updated_at",
                "generated_by_tool",
                "bmad_version"
            ]
        );
        assert_eq!(metadata["status"], "draft");
        assert_eq!(metadata["created_at"], "2024-05-01T12:00:00.000Z");
        assert_eq!(metadata["updated_at"], metadata["created_at"]);
        assert_eq!(metadata["suggested_created_at"], "2024-05-01T12:00:00Z");
    }

    #[test]
    fn request_defaults_from_json() {
        let request: RunChecklistRequest = serde_json::from_value(serde_json::json!({
            "document_content": "text",
            "checklist_name": "pm_checklist"
        }))
        .unwrap();
        assert_eq!(request, RunChecklistRequest::new("text", "pm_checklist"));
    }
}
