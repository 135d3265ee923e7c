//! Checklist registry backed by a moka cache
//!
//! Each checklist is parsed at most once per registry: concurrent first
//! loads of one name are coalesced by [`Cache::try_get_with`], and later loads
//! are lock-free cache hits.
//!
//! The cache is bounded. Once more than `max_capacity` checklists have been
//! loaded, least-used definitions may be evicted and are parsed again on
//! their next load.

use crate::definition::ChecklistDefinition;
use crate::error::{ChecklistError, ChecklistResult};
use crate::parser::ChecklistParser;
use moka::future::Cache;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// File extension of checklist sources
pub const CHECKLIST_EXTENSION: &str = "md";

/// Default number of cached definitions
pub const DEFAULT_CAPACITY: u64 = 256;

/// Statistics for cache monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of entries in cache (approximate)
    pub entry_count: u64,
    /// Number of sources parsed so far
    pub parses: u64,
}

/// Named checklists loaded from a directory of `<name>.md` sources
#[derive(Debug, Clone)]
pub struct ChecklistRegistry {
    dir: PathBuf,
    cache: Cache<String, Arc<ChecklistDefinition>>,
    /// Sources registered in memory, consulted before the directory
    inline: Arc<RwLock<HashMap<String, String>>>,
    parses: Arc<AtomicU64>,
    parser: ChecklistParser,
}

impl ChecklistRegistry {
    /// Registry over `dir` with the default capacity
    #[inline]
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_capacity(dir, DEFAULT_CAPACITY)
    }

    /// Registry over `dir` caching at most `max_capacity` definitions
    ///
    /// A capacity of 0 is raised to 1 so the cache stays in effect.
    #[must_use]
    pub fn with_capacity(dir: impl Into<PathBuf>, max_capacity: u64) -> Self {
        Self {
            dir: dir.into(),
            cache: Cache::new(max_capacity.max(1)),
            inline: Arc::new(RwLock::new(HashMap::new())),
            parses: Arc::new(AtomicU64::new(0)),
            parser: ChecklistParser::new(),
        }
    }

    /// Source directory
    #[inline]
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn source_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{CHECKLIST_EXTENSION}"))
    }

    /// Load a checklist definition, parsing it on first use
    ///
    /// # Errors
    /// - `ChecklistError::InvalidName` for names that are not plain identifiers
    /// - `ChecklistError::NotFound` when no source exists
    /// - `ChecklistError::Unreadable` / `ChecklistError::Io` on read failure
    pub async fn load(&self, name: &str) -> ChecklistResult<Arc<ChecklistDefinition>> {
        validate_name(name)?;
        self.cache
            .try_get_with(name.to_string(), self.read_and_parse(name))
            .await
            .map_err(|shared| (*shared).clone())
    }

    async fn read_and_parse(&self, name: &str) -> ChecklistResult<Arc<ChecklistDefinition>> {
        let inline = self.inline.read().get(name).cloned();
        let source = match inline {
            Some(source) => source,
            None => {
                let path = self.source_path(name);
                tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|e| ChecklistError::from_io(name, &path, e))?
            }
        };

        let definition = self.parser.parse(name, &source);
        self.parses.fetch_add(1, Ordering::Relaxed);
        debug!(
            checklist = name,
            sections = definition.sections.len(),
            items = definition.total_items,
            "parsed checklist"
        );
        Ok(Arc::new(definition))
    }

    /// Register checklist source text under `name`, replacing any cached copy
    ///
    /// # Errors
    /// Returns `ChecklistError::InvalidName` for names that are not plain identifiers
    pub async fn register(&self, name: &str, source: impl Into<String>) -> ChecklistResult<()> {
        validate_name(name)?;
        self.inline.write().insert(name.to_string(), source.into());
        self.cache.invalidate(name).await;
        Ok(())
    }

    /// Drop the cached definition for `name`
    pub async fn invalidate(&self, name: &str) {
        self.cache.invalidate(name).await;
    }

    /// Drop all cached definitions
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Whether `name` is currently cached
    #[must_use]
    pub fn is_cached(&self, name: &str) -> bool {
        self.cache.contains_key(name)
    }

    /// Names of available checklists (directory and registered), sorted
    ///
    /// # Errors
    /// Returns `ChecklistError::Io` when the directory exists but cannot be read
    pub async fn list(&self) -> ChecklistResult<Vec<String>> {
        let mut names: Vec<String> = self.inline.read().keys().cloned().collect();

        match tokio::fs::read_dir(&self.dir).await {
            Ok(mut entries) => {
                while let Some(entry) = entries
                    .next_entry()
                    .await
                    .map_err(|e| ChecklistError::from_io("", &self.dir, e))?
                {
                    let path = entry.path();
                    let is_source = path
                        .extension()
                        .and_then(|e| e.to_str())
                        .is_some_and(|e| e == CHECKLIST_EXTENSION);
                    if let (true, Some(stem)) = (is_source, path.file_stem().and_then(|s| s.to_str())) {
                        names.push(stem.to_string());
                    }
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(ChecklistError::from_io("", &self.dir, e)),
        }

        names.sort();
        names.dedup();
        Ok(names)
    }

    /// Cache statistics
    pub async fn stats(&self) -> CacheStats {
        self.cache.run_pending_tasks().await;
        CacheStats {
            entry_count: self.cache.entry_count(),
            parses: self.parses.load(Ordering::Relaxed),
        }
    }
}

/// Checklist names are plain identifiers: `[A-Za-z0-9_-]+`
fn validate_name(name: &str) -> ChecklistResult<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(ChecklistError::InvalidName(name.to_string()))
    }
}
