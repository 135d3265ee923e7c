//! Archive categories
//!
//! Each category owns one top-level directory under the archive root.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Top-level archive category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Project briefs and ideation notes
    Ideation,
    /// Product requirement documents
    Prd,
    /// Architecture documents
    Architecture,
    /// User stories
    Stories,
    /// Checklist validation reports
    Checklists,
    /// Decision logs and course corrections
    Decisions,
}

impl Category {
    /// All categories in layout order
    pub const ALL: [Category; 6] = [
        Category::Ideation,
        Category::Prd,
        Category::Architecture,
        Category::Stories,
        Category::Checklists,
        Category::Decisions,
    ];

    /// Directory name under the archive root
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Ideation => "ideation",
            Category::Prd => "prd",
            Category::Architecture => "architecture",
            Category::Stories => "stories",
            Category::Checklists => "checklists",
            Category::Decisions => "decisions",
        }
    }

    /// Relative path recorded in the project record (`"prd/"`)
    #[must_use]
    pub fn relative_path(self) -> String {
        format!("{}/", self.as_str())
    }

    /// Category owning a relative archive path, from its first component
    #[must_use]
    pub fn of_path(relative_path: &str) -> Option<Category> {
        let (first, rest) = relative_path.split_once('/')?;
        if rest.is_empty() {
            return None;
        }
        first.parse().ok()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown category name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_all_names() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>(), Ok(category));
        }
        assert!("templates".parse::<Category>().is_err());
    }

    #[test]
    fn category_of_path() {
        assert_eq!(Category::of_path("stories/x.md"), Some(Category::Stories));
        assert_eq!(Category::of_path("prd/v2/prd.md"), Some(Category::Prd));
        assert_eq!(Category::of_path("notes.md"), None);
        assert_eq!(Category::of_path("other/notes.md"), None);
        assert_eq!(Category::of_path("stories/"), None);
    }

    #[test]
    fn relative_path_has_trailing_slash() {
        assert_eq!(Category::Decisions.relative_path(), "decisions/");
    }
}
