//! Checklist source parser
//!
//! Line-oriented: `## ` headings open sections, `- [ ]` lines add items, any
//! other non-empty line is section prose. Malformed input degrades to an
//! empty definition; parsing never fails.

use crate::definition::{ChecklistDefinition, Item, Section};

/// Unchecked checkbox marker opening an item line
pub const ITEM_MARKER: &str = "- [ ]";

/// Checklist source parser
#[derive(Debug, Clone, Copy, Default)]
pub struct ChecklistParser;

impl ChecklistParser {
    /// Create new checklist parser
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse checklist source text
    #[must_use]
    pub fn parse(&self, name: &str, source: &str) -> ChecklistDefinition {
        let mut checklist = ChecklistDefinition::new(name);
        let mut current: Option<Section> = None;

        for line in source.lines().map(str::trim) {
            if line.is_empty() {
                continue;
            }

            if line.starts_with('#') {
                if is_section_heading(line) {
                    if let Some(section) = current.take() {
                        checklist.sections.push(section);
                    }
                    current = Some(Section::new(line.trim_start_matches('#').trim()));
                }
                continue;
            }

            let Some(section) = current.as_mut() else {
                continue;
            };

            if let Some(text) = line.strip_prefix(ITEM_MARKER) {
                section.items.push(Item::new(text.trim()));
                checklist.total_items += 1;
            } else {
                section.push_description(line);
            }
        }

        if let Some(section) = current.take() {
            checklist.sections.push(section);
        }

        checklist
    }
}

/// Level-2 heading (`##`, not `###`)
fn is_section_heading(line: &str) -> bool {
    line.starts_with("##") && !line.starts_with("###")
}

/// Parse checklist source text with the default parser
#[inline]
#[must_use]
pub fn parse_checklist(name: &str, source: &str) -> ChecklistDefinition {
    ChecklistParser::new().parse(name, source)
}
