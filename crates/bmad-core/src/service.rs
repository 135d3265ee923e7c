//! The BMAD service facade

use crate::config::BmadConfig;
use crate::error::{BmadError, BmadResult};
use crate::generation::{
    ContextDocument, DraftOutcome, GenerationError, GenerationRequest, GenerationTask,
    TextGenerator, DRAFT_ARTIFACT_TOOL,
};
use crate::prd::{
    render_requirements_report, requirements_report_path, resolve_checklist_type, PrdReadiness,
    RequirementsValidationOutcome, RequirementsValidationRequest, REQUIREMENTS_REPORT_TYPE,
    VALIDATE_REQUIREMENTS_TOOL,
};
use crate::story::{
    overall_pass_rate, render_story_report, story_report_path, ChecklistRun, StoryReadiness,
    StoryValidationOutcome, StoryValidationRequest, STORY_REPORT_TYPE, VALIDATE_STORY_TOOL,
};
use crate::tools::{
    format_rate, suggested_metadata, validation_report_path, ChecklistOutcome,
    RunChecklistRequest, SuggestedArtifact, RUN_CHECKLIST_TOOL, VALIDATION_REPORT_TYPE,
};
use bmad_artifact::{
    is_text_document, ArtifactStatus, ArtifactStore, ProjectMeta, StoreError, CREATED_AT_KEY,
    UPDATED_AT_KEY,
};
use bmad_checklist::ChecklistRegistry;
use bmad_validation::{ReportBuilder, ValidationContext, ValidationEngine, ValidationMode};
use chrono::{SecondsFormat, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Archive, checklist registry and validation engine for one project
///
/// Cheap to clone; clones share the checklist cache.
#[derive(Debug, Clone)]
pub struct Bmad {
    config: Arc<BmadConfig>,
    store: ArtifactStore,
    registry: ChecklistRegistry,
    engine: ValidationEngine,
}

impl Bmad {
    /// Create from configuration
    #[must_use]
    pub fn new(config: BmadConfig) -> Self {
        let store = ArtifactStore::for_project(&config.project_root, &config.archive_dir)
            .with_methodology_version(config.methodology_version.clone());
        let registry = ChecklistRegistry::with_capacity(config.checklist_root(), config.cache_capacity);
        Self {
            config: Arc::new(config),
            store,
            registry,
            engine: ValidationEngine::new(),
        }
    }

    /// Replace the archive store, e.g. to install a phase policy
    #[must_use]
    pub fn with_store(mut self, store: ArtifactStore) -> Self {
        self.store = store;
        self
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &BmadConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    #[inline]
    #[must_use]
    pub fn registry(&self) -> &ChecklistRegistry {
        &self.registry
    }

    /// Lay out the archive and return the project record
    ///
    /// # Errors
    /// Propagates archive failures
    pub async fn init(&self) -> BmadResult<ProjectMeta> {
        Ok(self.store.ensure_layout().await?)
    }

    /// Names of the checklists that can be run
    ///
    /// # Errors
    /// Propagates checklist directory read failures
    pub async fn available_checklists(&self) -> BmadResult<Vec<String>> {
        Ok(self.registry.list().await?)
    }

    /// Score a document against one checklist
    ///
    /// # Errors
    /// - `ErrorKind::InvalidMode` for an unknown mode string
    /// - `ErrorKind::NotFound` when the checklist does not exist
    pub async fn run_checklist(&self, request: RunChecklistRequest) -> BmadResult<ChecklistOutcome> {
        let mode = self.resolve_mode(request.validation_mode.as_deref())?;
        let checklist = self.registry.load(&request.checklist_name).await?;

        let result = self.engine.evaluate(
            &checklist,
            &request.document_content,
            &request.validation_context,
            mode,
        );
        let report = ReportBuilder::build(&result, request.document_content.chars().count());
        let markdown = report.to_markdown();

        let mut metadata = suggested_metadata(
            VALIDATION_REPORT_TYPE,
            ArtifactStatus::Completed,
            RUN_CHECKLIST_TOOL,
            &self.config.methodology_version,
            Utc::now(),
        );
        metadata.insert("checklist_name".to_string(), request.checklist_name.clone());
        metadata.insert("validation_mode".to_string(), mode.to_string());
        metadata.insert("pass_rate".to_string(), format_rate(report.pass_rate));

        info!(
            checklist = %request.checklist_name,
            pass_rate = report.pass_rate,
            tier = %report.tier,
            "Checklist run complete"
        );

        Ok(ChecklistOutcome {
            suggested_path: validation_report_path(
                &request.checklist_name,
                &request.validation_context.document_type,
            ),
            report,
            markdown,
            suggested_metadata: metadata,
        })
    }

    /// Score a story against several checklists
    ///
    /// Missing checklists are skipped with a warning.
    ///
    /// # Errors
    /// - `ErrorKind::InvalidMode` for an unknown mode string
    /// - `BmadError::NoChecklistsRun` when none of the checklists exist
    pub async fn validate_story(
        &self,
        request: StoryValidationRequest,
    ) -> BmadResult<StoryValidationOutcome> {
        let mode = self.resolve_mode(request.validation_mode.as_deref())?;
        let context = ValidationContext::default()
            .with_document_type("story")
            .with_project_phase(request.story_phase.clone());

        let mut runs = Vec::with_capacity(request.checklist_types.len());
        let mut skipped = Vec::new();
        for name in &request.checklist_types {
            match self.registry.load(name).await {
                Ok(checklist) => runs.push(ChecklistRun {
                    checklist_name: name.clone(),
                    result: self.engine.evaluate(&checklist, &request.story_content, &context, mode),
                }),
                Err(e) if e.is_not_found() => {
                    warn!(checklist = %name, "Checklist not found, skipping");
                    skipped.push(name.clone());
                }
                Err(e) => return Err(e.into()),
            }
        }
        if runs.is_empty() {
            return Err(BmadError::NoChecklistsRun(request.checklist_types));
        }

        let rate = overall_pass_rate(&runs);
        let readiness = StoryReadiness::assess(&request.story_phase, rate);
        let rounded = (rate * 10.0).round() / 10.0;
        let markdown = render_story_report(
            &runs,
            &request.story_phase,
            request.story_content.chars().count(),
            rate,
            readiness,
        );

        let mut metadata = suggested_metadata(
            STORY_REPORT_TYPE,
            ArtifactStatus::Completed,
            VALIDATE_STORY_TOOL,
            &self.config.methodology_version,
            Utc::now(),
        );
        metadata.insert("story_phase".to_string(), request.story_phase.clone());
        metadata.insert("validation_mode".to_string(), mode.to_string());
        metadata.insert("overall_pass_rate".to_string(), format_rate(rounded));
        metadata.insert("checklists_run".to_string(), runs.len().to_string());

        info!(
            phase = %request.story_phase,
            checklists = runs.len(),
            skipped = skipped.len(),
            pass_rate = rounded,
            readiness = %readiness,
            "Story validation complete"
        );

        Ok(StoryValidationOutcome {
            suggested_path: story_report_path(&request.story_phase, &request.story_content),
            story_phase: request.story_phase,
            runs,
            skipped,
            overall_pass_rate: rounded,
            readiness,
            markdown,
            suggested_metadata: metadata,
        })
    }

    /// Score a PRD against the PM checklist and judge architecture readiness
    ///
    /// `standard` and `comprehensive` name the PM checklist.
    ///
    /// # Errors
    /// - `ErrorKind::InvalidMode` for an unknown mode string
    /// - `ErrorKind::NotFound` when the checklist does not exist
    pub async fn validate_requirements(
        &self,
        request: RequirementsValidationRequest,
    ) -> BmadResult<RequirementsValidationOutcome> {
        let mode = self.resolve_mode(request.validation_mode.as_deref())?;
        let checklist_name = resolve_checklist_type(&request.checklist_type).to_string();
        let checklist = self.registry.load(&checklist_name).await?;

        let context = ValidationContext::default().with_document_type("prd");
        let result = self.engine.evaluate(&checklist, &request.prd_content, &context, mode);
        let rate = result.pass_rate();
        let readiness = PrdReadiness::assess(rate);
        let rounded = (rate * 10.0).round() / 10.0;
        let markdown = render_requirements_report(
            &result,
            request.prd_content.chars().count(),
            readiness,
            request.include_recommendations,
        );

        let mut metadata = suggested_metadata(
            REQUIREMENTS_REPORT_TYPE,
            ArtifactStatus::Completed,
            VALIDATE_REQUIREMENTS_TOOL,
            &self.config.methodology_version,
            Utc::now(),
        );
        metadata.insert("checklist_type".to_string(), request.checklist_type.clone());
        metadata.insert("validation_mode".to_string(), mode.to_string());
        metadata.insert("pass_rate".to_string(), format_rate(rounded));

        info!(
            checklist = %checklist_name,
            pass_rate = rounded,
            readiness = %readiness,
            "Requirements validation complete"
        );

        Ok(RequirementsValidationOutcome {
            suggested_path: requirements_report_path(&request.checklist_type),
            checklist_type: request.checklist_type,
            checklist_name,
            result,
            pass_rate: rounded,
            readiness,
            markdown,
            suggested_metadata: metadata,
        })
    }

    /// Archive a suggested artifact at its suggested path
    ///
    /// A missing `updated_at` is stamped with the current time. Overwriting an
    /// archived artifact keeps its original `created_at`.
    ///
    /// # Errors
    /// Propagates archive failures
    pub async fn persist<A>(&self, artifact: &A) -> BmadResult<PathBuf>
    where
        A: SuggestedArtifact + ?Sized,
    {
        let path = artifact.suggested_path();
        let mut metadata = artifact.suggested_metadata().clone();
        let updated_at = metadata
            .entry(UPDATED_AT_KEY.to_string())
            .or_insert_with(|| Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
            .clone();

        let created_at = if is_text_document(path) {
            self.archived_created_at(path).await?
        } else {
            None
        };
        match created_at {
            Some(original) => {
                metadata.insert(CREATED_AT_KEY.to_string(), original);
            }
            None => {
                metadata.entry(CREATED_AT_KEY.to_string()).or_insert(updated_at);
            }
        }

        Ok(self.store.save(path, artifact.body(), Some(&metadata)).await?)
    }

    /// Generate an artifact body with prior-artifact context
    ///
    /// The latest artifact of each requested context category is passed to
    /// the generator. Nothing is written to the archive.
    ///
    /// # Errors
    /// - `BmadError::Generation` when the generator fails or returns nothing
    /// - archive read failures while gathering context
    pub async fn draft_artifact<G>(&self, generator: &G, task: GenerationTask) -> BmadResult<DraftOutcome>
    where
        G: TextGenerator + ?Sized,
    {
        let mut context = Vec::new();
        for &category in &task.context_categories {
            if let Some(artifact) = self.store.latest_artifact(category).await? {
                context.push(ContextDocument {
                    category,
                    path: artifact.path,
                    content: artifact.content,
                });
            }
        }

        let request = GenerationRequest { task, context };
        let body = generator.generate(&request).await?;
        if body.trim().is_empty() {
            return Err(GenerationError::EmptyOutput.into());
        }

        let GenerationRequest { task, context } = request;
        let suggested_metadata = suggested_metadata(
            &task.artifact_type,
            ArtifactStatus::Draft,
            DRAFT_ARTIFACT_TOOL,
            &self.config.methodology_version,
            Utc::now(),
        );
        info!(
            artifact_type = %task.artifact_type,
            path = %task.target_path,
            context = context.len(),
            "Drafted artifact"
        );

        Ok(DraftOutcome {
            body,
            suggested_path: task.target_path,
            suggested_metadata,
            context_paths: context.into_iter().map(|c| c.path).collect(),
        })
    }

    async fn archived_created_at(&self, path: &str) -> BmadResult<Option<String>> {
        match self.store.load(path).await {
            Ok(existing) => Ok(existing.get(CREATED_AT_KEY).map(str::to_string)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(StoreError::Header { path, source }) => {
                warn!(%path, error = %source, "Overwriting artifact with unreadable header");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn resolve_mode(&self, mode: Option<&str>) -> BmadResult<ValidationMode> {
        match mode {
            Some(raw) => Ok(raw.parse::<ValidationMode>()?),
            None => Ok(self.config.default_mode),
        }
    }
}
