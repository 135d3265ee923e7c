//! Artifact archive on the local filesystem
//!
//! Layout:
//!
//! ```text
//! <root>/
//!   project_meta.json
//!   ideation/ prd/ architecture/ stories/ checklists/ decisions/
//! ```
//!
//! Every write goes through a temp file in the target directory followed by a
//! rename, so concurrent writers to one path leave exactly one complete file
//! (last writer wins) and readers never observe a torn write.

use crate::artifact::{Artifact, ArtifactSummary};
use crate::category::Category;
use crate::error::{StoreError, StoreResult};
use crate::header::{self, Metadata};
use crate::meta::{PhasePolicy, ProjectMeta, Unconstrained, PROJECT_META_FILE};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Default archive directory inside a project
pub const DEFAULT_ARCHIVE_DIR: &str = ".bmad";

/// Default methodology version stamped into new project records
pub const DEFAULT_METHODOLOGY_VERSION: &str = "1.0";

/// File extensions that carry a metadata header
const TEXT_EXTENSIONS: [&str; 2] = ["md", "markdown"];

/// Whether a path names a text document (header-bearing)
#[must_use]
pub fn is_text_document(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| TEXT_EXTENSIONS.iter().any(|t| t.eq_ignore_ascii_case(ext)))
}

/// Filesystem-backed artifact archive
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
    project_name: Option<String>,
    methodology_version: String,
    policy: Arc<dyn PhasePolicy>,
}

impl ArtifactStore {
    /// Archive rooted at `root`
    ///
    /// The project name defaults to the root directory's own name.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            project_name: None,
            methodology_version: DEFAULT_METHODOLOGY_VERSION.to_string(),
            policy: Arc::new(Unconstrained),
        }
    }

    /// Archive at `<project_root>/<archive_dir>`, named after the project directory
    #[must_use]
    pub fn for_project(project_root: impl AsRef<Path>, archive_dir: &str) -> Self {
        let project_root = project_root.as_ref();
        let mut store = Self::new(project_root.join(archive_dir));
        store.project_name = project_root
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string);
        store
    }

    /// Override the project name used for new records
    #[must_use]
    pub fn with_project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = Some(name.into());
        self
    }

    /// Override the methodology version used for new records
    #[must_use]
    pub fn with_methodology_version(mut self, version: impl Into<String>) -> Self {
        self.methodology_version = version.into();
        self
    }

    /// Install a phase transition policy
    #[must_use]
    pub fn with_policy(mut self, policy: impl PhasePolicy + 'static) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    /// Archive root directory
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn default_project_name(&self) -> String {
        self.project_name.clone().unwrap_or_else(|| {
            self.root
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("project")
                .to_string()
        })
    }

    /// Resolve a relative archive path, refusing anything that escapes the root
    fn resolve(&self, relative_path: &str) -> StoreResult<PathBuf> {
        let path = Path::new(relative_path);
        let clean = !relative_path.is_empty()
            && path
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if clean {
            Ok(self.root.join(path))
        } else {
            Err(StoreError::InvalidPath(relative_path.to_string()))
        }
    }

    /// Create category directories and the project record if missing
    ///
    /// Idempotent; an existing record is returned untouched.
    ///
    /// # Errors
    /// Returns `StoreError::Io` when directories cannot be created
    pub async fn ensure_layout(&self) -> StoreResult<ProjectMeta> {
        for category in Category::ALL {
            let dir = self.root.join(category.as_str());
            tokio::fs::create_dir_all(&dir)
                .await
                .map_err(|e| StoreError::io_error(&dir, e))?;
        }

        match self.load_json::<ProjectMeta>(PROJECT_META_FILE).await {
            Ok(meta) => Ok(meta),
            Err(StoreError::NotFound(_)) => {
                let meta = ProjectMeta::new(
                    self.default_project_name(),
                    self.methodology_version.clone(),
                    Utc::now(),
                );
                self.save_json(PROJECT_META_FILE, &meta).await?;
                info!(project = %meta.project_name, root = %self.root.display(), "initialized archive");
                Ok(meta)
            }
            Err(e) => Err(e),
        }
    }

    /// Write an artifact, replacing any previous file
    ///
    /// Text documents get a metadata header when `metadata` is given. Other
    /// files are written raw and `metadata` is ignored.
    ///
    /// # Errors
    /// - `StoreError::InvalidPath` for paths escaping the root
    /// - `StoreError::InvalidMetadata` for keys that cannot round-trip
    /// - `StoreError::Io` on write failure
    pub async fn save(
        &self,
        relative_path: &str,
        content: &str,
        metadata: Option<&Metadata>,
    ) -> StoreResult<PathBuf> {
        let full_path = self.resolve(relative_path)?;
        let text = is_text_document(relative_path);

        let file_content = match metadata {
            Some(m) if text => encode_header(m, content)?,
            // a bare body that looks like a header would be misread on load
            None if text && header::has_header(content) => {
                encode_header(&Metadata::new(), content)?
            }
            Some(_) => {
                debug!(path = relative_path, "metadata ignored for non-text artifact");
                content.to_string()
            }
            None => content.to_string(),
        };

        write_atomic(&full_path, file_content.as_bytes()).await?;
        info!(path = relative_path, bytes = file_content.len(), "saved artifact");
        Ok(full_path)
    }

    /// Read an artifact, splitting off its metadata header
    ///
    /// # Errors
    /// - `StoreError::NotFound` when the file is absent
    /// - `StoreError::Header` when a header opens but cannot be parsed
    /// - `StoreError::Io` on read failure
    pub async fn load(&self, relative_path: &str) -> StoreResult<Artifact> {
        let full_path = self.resolve(relative_path)?;
        let raw = read_to_string(&full_path, relative_path).await?;

        let decoded = if is_text_document(relative_path) {
            header::decode(&raw).map_err(|e| StoreError::header_error(relative_path, e))?
        } else {
            None
        };

        let (metadata, content) = match decoded {
            Some((metadata, body)) => (metadata, body.to_string()),
            None => (Metadata::new(), raw),
        };

        Ok(Artifact {
            path: relative_path.to_string(),
            content,
            metadata,
        })
    }

    /// Whether an artifact exists
    ///
    /// # Errors
    /// Returns `StoreError::InvalidPath` for paths escaping the root and
    /// `StoreError::Io` when existence cannot be determined
    pub async fn exists(&self, relative_path: &str) -> StoreResult<bool> {
        let full_path = self.resolve(relative_path)?;
        match tokio::fs::try_exists(&full_path).await {
            Ok(found) => Ok(found),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::io_error(full_path, e)),
        }
    }

    /// Remove an artifact; returns false when it did not exist
    ///
    /// # Errors
    /// Returns `StoreError::Io` when removal fails for another reason
    pub async fn delete_artifact(&self, relative_path: &str) -> StoreResult<bool> {
        let full_path = self.resolve(relative_path)?;
        match tokio::fs::remove_file(&full_path).await {
            Ok(()) => {
                info!(path = relative_path, "deleted artifact");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::io_error(full_path, e)),
        }
    }

    /// Summaries of text artifacts, newest `updated_at` first
    ///
    /// Unreadable artifacts are logged and skipped.
    ///
    /// # Errors
    /// Returns `StoreError::Io` when a directory cannot be read
    pub async fn list_artifacts(
        &self,
        category: Option<Category>,
        status: Option<&str>,
    ) -> StoreResult<Vec<ArtifactSummary>> {
        let start = match category {
            Some(c) => self.root.join(c.as_str()),
            None => self.root.clone(),
        };

        let mut summaries = Vec::new();
        for relative in self.walk_text_documents(&start).await? {
            let artifact = match self.load(&relative).await {
                Ok(a) => a,
                Err(e) => {
                    warn!(path = %relative, error = %e, "skipping unreadable artifact");
                    continue;
                }
            };
            let summary = ArtifactSummary::from(&artifact);
            if status.is_some_and(|s| summary.status != s) {
                continue;
            }
            summaries.push(summary);
        }

        summaries.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| a.path.cmp(&b.path))
        });
        Ok(summaries)
    }

    /// Most recently updated artifact in a category, for generation context
    ///
    /// # Errors
    /// Propagates listing and load failures
    pub async fn latest_artifact(&self, category: Category) -> StoreResult<Option<Artifact>> {
        let summaries = self.list_artifacts(Some(category), None).await?;
        match summaries.first() {
            Some(summary) => self.load(&summary.path).await.map(Some),
            None => Ok(None),
        }
    }

    async fn walk_text_documents(&self, start: &Path) -> StoreResult<Vec<String>> {
        let mut found = Vec::new();
        let mut pending = vec![start.to_path_buf()];

        while let Some(dir) = pending.pop() {
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(StoreError::io_error(&dir, e)),
            };
            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| StoreError::io_error(&dir, e))?
            {
                let path = entry.path();
                let file_type = entry
                    .file_type()
                    .await
                    .map_err(|e| StoreError::io_error(&path, e))?;
                if file_type.is_dir() {
                    pending.push(path);
                    continue;
                }
                let Some(relative) = self.relative_of(&path) else {
                    continue;
                };
                let hidden = relative.rsplit('/').next().is_some_and(|n| n.starts_with('.'));
                if !hidden && is_text_document(&relative) {
                    found.push(relative);
                }
            }
        }

        Ok(found)
    }

    fn relative_of(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let parts: Option<Vec<&str>> = relative.components().map(|c| c.as_os_str().to_str()).collect();
        Some(parts?.join("/"))
    }

    /// Write a JSON record (pretty-printed)
    ///
    /// # Errors
    /// Returns `StoreError::Json` or `StoreError::Io`
    pub async fn save_json<T: Serialize>(&self, relative_path: &str, value: &T) -> StoreResult<PathBuf> {
        let full_path = self.resolve(relative_path)?;
        let json = serde_json::to_string_pretty(value).map_err(|e| StoreError::Json {
            path: relative_path.to_string(),
            source: e,
        })?;
        write_atomic(&full_path, json.as_bytes()).await?;
        debug!(path = relative_path, "saved json record");
        Ok(full_path)
    }

    /// Read a JSON record
    ///
    /// # Errors
    /// Returns `StoreError::NotFound`, `StoreError::Json` or `StoreError::Io`
    pub async fn load_json<T: DeserializeOwned>(&self, relative_path: &str) -> StoreResult<T> {
        let full_path = self.resolve(relative_path)?;
        let raw = read_to_string(&full_path, relative_path).await?;
        serde_json::from_str(&raw).map_err(|e| StoreError::Json {
            path: relative_path.to_string(),
            source: e,
        })
    }

    /// Current project record, laying out the archive on first access
    ///
    /// # Errors
    /// Propagates layout and read failures
    pub async fn project_meta(&self) -> StoreResult<ProjectMeta> {
        match self.load_json::<ProjectMeta>(PROJECT_META_FILE).await {
            Err(StoreError::NotFound(_)) => self.ensure_layout().await,
            other => other,
        }
    }

    /// Rewrite the project record with a new phase
    ///
    /// The read-modify-write is not serialized here; concurrent callers end
    /// with one complete record carrying one of their phases.
    ///
    /// # Errors
    /// - `StoreError::PhaseTransition` when the installed policy refuses
    /// - read/write failures otherwise
    pub async fn update_project_phase(&self, phase: &str) -> StoreResult<ProjectMeta> {
        let mut meta = self.project_meta().await?;
        if !self.policy.allows(&meta.current_phase, phase) {
            return Err(StoreError::PhaseTransition {
                from: meta.current_phase,
                to: phase.to_string(),
            });
        }

        let previous = std::mem::take(&mut meta.current_phase);
        meta.enter_phase(phase, Utc::now());
        self.save_json(PROJECT_META_FILE, &meta).await?;
        info!(from = %previous, to = phase, "updated project phase");
        Ok(meta)
    }
}

fn encode_header(metadata: &Metadata, content: &str) -> StoreResult<String> {
    header::encode(metadata, content).map_err(|e| StoreError::InvalidMetadata(e.to_string()))
}

async fn read_to_string(full_path: &Path, relative_path: &str) -> StoreResult<String> {
    tokio::fs::read_to_string(full_path).await.map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            StoreError::NotFound(relative_path.to_string())
        } else {
            StoreError::io_error(full_path, e)
        }
    })
}

/// Write through a sibling temp file and rename into place
async fn write_atomic(full_path: &Path, bytes: &[u8]) -> StoreResult<()> {
    let parent = full_path
        .parent()
        .ok_or_else(|| StoreError::InvalidPath(full_path.display().to_string()))?;
    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|e| StoreError::io_error(parent, e))?;

    let file_name = full_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("artifact");
    let temp_path = parent.join(format!(".{file_name}.{}.tmp", uuid::Uuid::new_v4()));

    if let Err(e) = tokio::fs::write(&temp_path, bytes).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(StoreError::io_error(&temp_path, e));
    }
    if let Err(e) = tokio::fs::rename(&temp_path, full_path).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(StoreError::io_error(full_path, e));
    }
    Ok(())
}
