//! Keyword-to-predicate rule table
//!
//! Each checklist item is mapped onto a list of predicates over the document
//! by substring matching its lowercased text against an ordered keyword table.
//! Every matching row contributes one predicate; an item matching nothing is
//! judged by [`FALLBACK`].

use bmad_checklist::Item;

/// Document markers that make conditional items applicable
pub const DOMAIN_TRIGGERS: [&str; 4] = ["ui", "frontend", "api", "database"];

/// Recommendation used when no keyword in [`RECOMMENDATIONS`] matches
pub const GENERIC_RECOMMENDATION: &str = "Review and enhance this aspect of the document";

/// Predicate used when no keyword in [`KEYWORD_RULES`] matches
pub const FALLBACK: Predicate = Predicate::LongerThan(100);

/// A check over a lowercased document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    /// Any needle occurs as a substring
    ContainsAny(&'static [&'static str]),
    /// Character occurs at least `min` times
    MinCount {
        /// Counted character
        needle: char,
        /// Inclusive lower bound
        min: usize,
    },
    /// Document length in characters is greater than the bound
    LongerThan(usize),
    /// Document length in characters is less than the bound
    ShorterThan(usize),
}

impl Predicate {
    /// Evaluate against a prepared document
    #[must_use]
    pub fn holds(&self, doc: &DocumentView<'_>) -> bool {
        match *self {
            Predicate::ContainsAny(needles) => needles.iter().any(|n| doc.lower.contains(n)),
            Predicate::MinCount { needle, min } => {
                doc.lower.chars().filter(|&c| c == needle).count() >= min
            }
            Predicate::LongerThan(bound) => doc.char_len > bound,
            Predicate::ShorterThan(bound) => doc.char_len < bound,
        }
    }
}

/// One row of the keyword table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordRule {
    pub keyword: &'static str,
    pub predicate: Predicate,
}

const fn rule(keyword: &'static str, predicate: Predicate) -> KeywordRule {
    KeywordRule { keyword, predicate }
}

/// Ordered keyword table
pub const KEYWORD_RULES: &[KeywordRule] = &[
    rule("clear", Predicate::ContainsAny(&["clear", "clearly", "specific", "detailed"])),
    rule("goal", Predicate::ContainsAny(&["goal"])),
    rule("requirement", Predicate::ContainsAny(&["requirement", "must", "should", "shall"])),
    rule("user", Predicate::ContainsAny(&["user"])),
    rule("story", Predicate::ContainsAny(&["story"])),
    rule("acceptance", Predicate::ContainsAny(&["acceptance", "criteria"])),
    rule("epic", Predicate::ContainsAny(&["epic"])),
    rule("architecture", Predicate::ContainsAny(&["architecture"])),
    rule("technical", Predicate::ContainsAny(&["technical", "technology", "tech"])),
    rule("testing", Predicate::ContainsAny(&["test", "testing", "quality"])),
    rule("security", Predicate::ContainsAny(&["security"])),
    rule("section", Predicate::MinCount { needle: '#', min: 3 }),
    rule("list", Predicate::MinCount { needle: '-', min: 3 }),
    rule("table", Predicate::ContainsAny(&["|"])),
    rule("comprehensive", Predicate::LongerThan(2000)),
    rule("detailed", Predicate::LongerThan(1000)),
    rule("brief", Predicate::ShorterThan(1000)),
];

/// Failure recommendations, first match on the lowercased item text wins
pub const RECOMMENDATIONS: &[(&str, &str)] = &[
    ("clear", "Add more specific and detailed explanations"),
    ("goal", "Define clear, measurable goals"),
    ("requirement", "Add explicit requirements with clear language"),
    ("testing", "Include testing strategy and requirements"),
];

/// Document prepared once per evaluation
#[derive(Debug, Clone)]
pub struct DocumentView<'a> {
    /// Original text
    pub raw: &'a str,
    /// Lowercased text
    pub lower: String,
    /// Length in characters
    pub char_len: usize,
}

impl<'a> DocumentView<'a> {
    #[must_use]
    pub fn new(raw: &'a str) -> Self {
        Self {
            raw,
            lower: raw.to_lowercase(),
            char_len: raw.chars().count(),
        }
    }

    /// Whether any domain trigger occurs in the document
    #[must_use]
    pub fn mentions_domain(&self) -> bool {
        DOMAIN_TRIGGERS.iter().any(|t| self.lower.contains(t))
    }
}

/// Source of per-item predicate outcomes
///
/// The engine only needs the list of outcomes to compute a ratio, so an
/// evaluator with richer heuristics can replace the keyword table.
pub trait RuleSource: Send + Sync {
    /// Outcome of every predicate derived for `item`; never empty
    fn outcomes(&self, item: &Item, doc: &DocumentView<'_>) -> Vec<bool>;

    /// Advice attached to a failed item
    fn recommendation(&self, item: &Item) -> String {
        keyword_recommendation(&item.text.to_lowercase()).to_string()
    }
}

/// Default [`RuleSource`] backed by [`KEYWORD_RULES`]
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordRules;

impl KeywordRules {
    /// Predicates derived for an item's text
    #[must_use]
    pub fn derive(item_text: &str) -> Vec<Predicate> {
        let lower = item_text.to_lowercase();
        let predicates: Vec<Predicate> = KEYWORD_RULES
            .iter()
            .filter(|r| lower.contains(r.keyword))
            .map(|r| r.predicate)
            .collect();
        if predicates.is_empty() {
            vec![FALLBACK]
        } else {
            predicates
        }
    }
}

impl RuleSource for KeywordRules {
    fn outcomes(&self, item: &Item, doc: &DocumentView<'_>) -> Vec<bool> {
        Self::derive(&item.text)
            .iter()
            .map(|p| p.holds(doc))
            .collect()
    }
}

/// Recommendation for a lowercased item text
#[must_use]
pub fn keyword_recommendation(lower_text: &str) -> &'static str {
    RECOMMENDATIONS
        .iter()
        .find(|(keyword, _)| lower_text.contains(*keyword))
        .map_or(GENERIC_RECOMMENDATION, |&(_, advice)| advice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn derive_in_table_order() {
        let predicates = KeywordRules::derive("Clear goal with user testing");
        assert_eq!(
            predicates,
            vec![
                KEYWORD_RULES[0].predicate,
                KEYWORD_RULES[1].predicate,
                KEYWORD_RULES[3].predicate,
                KEYWORD_RULES[9].predicate,
            ]
        );
    }

    #[test]
    fn derive_falls_back() {
        assert_eq!(KeywordRules::derive("Nothing matches here"), vec![FALLBACK]);
    }

    #[test]
    fn detailed_item_only_matches_its_row() {
        let predicates = KeywordRules::derive("Detailed design");
        assert_eq!(predicates, vec![Predicate::LongerThan(1000)]);
    }

    #[test]
    fn predicates_over_document() {
        let doc = DocumentView::new("# A\n## B\n### C\n- x | y");
        assert!(Predicate::MinCount { needle: '#', min: 3 }.holds(&doc));
        assert!(!Predicate::MinCount { needle: '-', min: 3 }.holds(&doc));
        assert!(Predicate::ContainsAny(&["|"]).holds(&doc));
        assert!(Predicate::ShorterThan(1000).holds(&doc));
        assert!(!Predicate::LongerThan(100).holds(&doc));
    }

    #[test]
    fn length_counts_characters() {
        let text = "é".repeat(101);
        let doc = DocumentView::new(&text);
        assert_eq!(doc.char_len, 101);
        assert!(FALLBACK.holds(&doc));
    }

    #[test]
    fn matching_is_case_insensitive() {
        let doc = DocumentView::new("The GOAL is Security");
        assert!(Predicate::ContainsAny(&["goal"]).holds(&doc));
        assert!(Predicate::ContainsAny(&["security"]).holds(&doc));
    }

    #[test]
    fn domain_triggers() {
        assert!(DocumentView::new("REST API layer").mentions_domain());
        assert!(!DocumentView::new("plain prose").mentions_domain());
    }

    #[test]
    fn recommendation_first_match_wins() {
        assert_eq!(
            keyword_recommendation("clear goal"),
            "Add more specific and detailed explanations"
        );
        assert_eq!(
            keyword_recommendation("testing requirement"),
            "Add explicit requirements with clear language"
        );
        assert_eq!(keyword_recommendation("security"), GENERIC_RECOMMENDATION);
    }

    #[test]
    fn default_recommendation_uses_item_text() {
        let item = Item::new("Goals are Measurable");
        assert_eq!(KeywordRules.recommendation(&item), "Define clear, measurable goals");
    }
}
