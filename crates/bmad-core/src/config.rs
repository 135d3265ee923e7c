//! Runtime configuration

use crate::error::{BmadError, BmadResult};
use bmad_artifact::{DEFAULT_ARCHIVE_DIR, DEFAULT_METHODOLOGY_VERSION};
use bmad_checklist::DEFAULT_CAPACITY;
use bmad_validation::ValidationMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for a [`Bmad`](crate::Bmad) instance
///
/// Every field has a default, so a TOML file only lists what it overrides:
///
/// ```toml
/// project_root = "/work/shop"
/// default_mode = "strict"
/// json_logs = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BmadConfig {
    /// Project directory holding the archive
    pub project_root: PathBuf,
    /// Archive directory name under the project root
    pub archive_dir: String,
    /// Checklist sources, relative to the project root unless absolute
    pub checklist_dir: PathBuf,
    /// Methodology version recorded in new projects and suggested metadata
    pub methodology_version: String,
    /// Mode used when a request names none
    pub default_mode: ValidationMode,
    /// Maximum cached checklist definitions, at least 1
    pub cache_capacity: u64,
    /// `tracing` filter directive used when `RUST_LOG` is unset
    pub log_filter: String,
    /// Emit logs as JSON lines
    pub json_logs: bool,
}

impl Default for BmadConfig {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            archive_dir: DEFAULT_ARCHIVE_DIR.to_string(),
            checklist_dir: PathBuf::from("checklists"),
            methodology_version: DEFAULT_METHODOLOGY_VERSION.to_string(),
            default_mode: ValidationMode::Standard,
            cache_capacity: DEFAULT_CAPACITY,
            log_filter: "info".to_string(),
            json_logs: false,
        }
    }
}

impl BmadConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from TOML text
    ///
    /// # Errors
    /// - `BmadError::ConfigParse` on invalid TOML or mistyped fields
    /// - `BmadError::InvalidConfig` when [`validate`](Self::validate) rejects it
    pub fn from_toml_str(source: &str) -> BmadResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that parse but cannot be used
    ///
    /// # Errors
    /// `BmadError::InvalidConfig` when `cache_capacity` is 0
    pub fn validate(&self) -> BmadResult<()> {
        if self.cache_capacity == 0 {
            return Err(BmadError::InvalidConfig(
                "cache_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    /// - `BmadError::ConfigRead` when the file cannot be read
    /// - `BmadError::ConfigParse` on invalid contents
    pub async fn load(path: impl AsRef<Path>) -> BmadResult<Self> {
        let path = path.as_ref();
        let source = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| BmadError::ConfigRead {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_toml_str(&source)
    }

    /// Archive root directory
    #[must_use]
    pub fn archive_root(&self) -> PathBuf {
        self.project_root.join(&self.archive_dir)
    }

    /// Checklist directory resolved against the project root
    #[must_use]
    pub fn checklist_root(&self) -> PathBuf {
        if self.checklist_dir.is_absolute() {
            self.checklist_dir.clone()
        } else {
            self.project_root.join(&self.checklist_dir)
        }
    }

    /// With project root
    #[inline]
    #[must_use]
    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = root.into();
        self
    }

    /// With archive directory name
    #[inline]
    #[must_use]
    pub fn with_archive_dir(mut self, dir: impl Into<String>) -> Self {
        self.archive_dir = dir.into();
        self
    }

    /// With checklist directory
    #[inline]
    #[must_use]
    pub fn with_checklist_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.checklist_dir = dir.into();
        self
    }

    /// With methodology version
    #[inline]
    #[must_use]
    pub fn with_methodology_version(mut self, version: impl Into<String>) -> Self {
        self.methodology_version = version.into();
        self
    }

    /// With default validation mode
    #[inline]
    #[must_use]
    pub fn with_default_mode(mut self, mode: ValidationMode) -> Self {
        self.default_mode = mode;
        self
    }

    /// With checklist cache capacity
    #[inline]
    #[must_use]
    pub fn with_cache_capacity(mut self, capacity: u64) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// With log filter directive
    #[inline]
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// With JSON log output
    #[inline]
    #[must_use]
    pub fn with_json_logs(mut self, json: bool) -> Self {
        self.json_logs = json;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let config = BmadConfig::new();
        assert_eq!(config.archive_dir, ".bmad");
        assert_eq!(config.methodology_version, "1.0");
        assert_eq!(config.default_mode, ValidationMode::Standard);
        assert_eq!(config.archive_root(), PathBuf::from("./.bmad"));
        assert_eq!(config.checklist_root(), PathBuf::from("./checklists"));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = BmadConfig::from_toml_str(
            r#"
            project_root = "/work/shop"
            default_mode = "strict"
            json_logs = true
            "#,
        )
        .unwrap();
        assert_eq!(config.project_root, PathBuf::from("/work/shop"));
        assert_eq!(config.default_mode, ValidationMode::Strict);
        assert!(config.json_logs);
        assert_eq!(config.cache_capacity, DEFAULT_CAPACITY);
        assert_eq!(config.archive_root(), PathBuf::from("/work/shop/.bmad"));
    }

    #[test]
    fn invalid_toml_is_parse_error() {
        let err = BmadConfig::from_toml_str("default_mode = \"loose\"").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn zero_cache_capacity_rejected() {
        let err = BmadConfig::from_toml_str("cache_capacity = 0").unwrap_err();
        assert!(matches!(err, BmadError::InvalidConfig(_)));
        assert_eq!(err.kind(), ErrorKind::Invalid);
        assert!(BmadConfig::new().with_cache_capacity(0).validate().is_err());
        assert!(BmadConfig::new().validate().is_ok());
    }

    #[test]
    fn absolute_checklist_dir_wins() {
        let config = BmadConfig::new()
            .with_project_root("/p")
            .with_checklist_dir("/shared/checklists");
        assert_eq!(config.checklist_root(), PathBuf::from("/shared/checklists"));
    }

    #[tokio::test]
    async fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bmad.toml");
        let expected = BmadConfig::new()
            .with_archive_dir(".archive")
            .with_log_filter("bmad_core=debug");
        tokio::fs::write(&path, toml::to_string(&expected).unwrap())
            .await
            .unwrap();

        assert_eq!(BmadConfig::load(&path).await.unwrap(), expected);

        let missing = BmadConfig::load(dir.path().join("absent.toml")).await.unwrap_err();
        assert_eq!(missing.kind(), ErrorKind::Io);
    }
}
