//! In-memory checklist definitions

use serde::{Deserialize, Serialize};

/// Phrases marking an item as conditional on the document's domain
pub const OPTIONAL_MARKERS: [&str; 3] = ["if applicable", "if needed", "optional"];

/// Parsed checklist
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChecklistDefinition {
    /// Checklist name (source file stem)
    pub name: String,
    /// Sections in source order
    pub sections: Vec<Section>,
    /// Item count across all sections
    pub total_items: usize,
}

impl ChecklistDefinition {
    /// Empty definition
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sections: Vec::new(),
            total_items: 0,
        }
    }

    /// Whether the source yielded no items
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_items == 0
    }

    /// All items with their section titles, in source order
    pub fn items(&self) -> impl Iterator<Item = (&str, &Item)> {
        self.sections
            .iter()
            .flat_map(|s| s.items.iter().map(move |i| (s.title.as_str(), i)))
    }
}

/// Checklist section (level-2 heading)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    /// Prose under the heading, space-joined
    pub description: String,
    pub items: Vec<Item>,
}

impl Section {
    /// Section with no prose or items yet
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            items: Vec::new(),
        }
    }

    pub(crate) fn push_description(&mut self, line: &str) {
        if !self.description.is_empty() {
            self.description.push(' ');
        }
        self.description.push_str(line);
    }
}

/// Single checklist item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub text: String,
    /// Item only applies to some documents (`optional`, `if applicable`, ...)
    pub conditional: bool,
}

impl Item {
    /// Item from its text, deriving the applicability flag
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let lower = text.to_lowercase();
        let conditional = OPTIONAL_MARKERS.iter().any(|m| lower.contains(m));
        Self { text, conditional }
    }
}
