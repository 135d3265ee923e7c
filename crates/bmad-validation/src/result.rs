//! Validation outcome types

use serde::{Deserialize, Serialize};

/// Verdict for one checklist item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Pass,
    Fail,
    /// Conditional item that does not apply to the document
    Na,
}

impl ItemStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ItemStatus::Pass => "pass",
            ItemStatus::Fail => "fail",
            ItemStatus::Na => "na",
        }
    }
}

/// Per-item verdict
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemResult {
    pub text: String,
    pub status: ItemStatus,
    /// Present only on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

/// Item counts
///
/// `total == passed + failed + na` holds for every value built through
/// [`Tally::record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tally {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub na: usize,
}

impl Tally {
    /// Count one verdict
    #[inline]
    pub fn record(&mut self, status: ItemStatus) {
        self.total += 1;
        match status {
            ItemStatus::Pass => self.passed += 1,
            ItemStatus::Fail => self.failed += 1,
            ItemStatus::Na => self.na += 1,
        }
    }

    /// `passed / total * 100`, or 0 when there are no items
    ///
    /// Not-applicable items stay in the denominator.
    #[must_use]
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.passed as f64 / self.total as f64 * 100.0
        }
    }
}

/// Verdicts for one checklist section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionResult {
    pub title: String,
    #[serde(flatten)]
    pub tally: Tally,
    pub items: Vec<ItemResult>,
}

/// Failed item carried to the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedItemDetail {
    pub section: String,
    pub text: String,
    pub recommendation: String,
}

/// Outcome of scoring one document against one checklist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub checklist_name: String,
    #[serde(flatten)]
    pub tally: Tally,
    pub sections: Vec<SectionResult>,
    /// Failed items in checklist order
    pub failed_items: Vec<FailedItemDetail>,
    /// Overall advice
    pub recommendations: Vec<String>,
}

impl ValidationResult {
    /// Overall pass rate in percent
    #[inline]
    #[must_use]
    pub fn pass_rate(&self) -> f64 {
        self.tally.pass_rate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_records() {
        let mut tally = Tally::default();
        for status in [ItemStatus::Pass, ItemStatus::Fail, ItemStatus::Na, ItemStatus::Pass] {
            tally.record(status);
        }
        assert_eq!(
            tally,
            Tally {
                total: 4,
                passed: 2,
                failed: 1,
                na: 1
            }
        );
        assert!((tally.pass_rate() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_tally_rate_is_zero() {
        assert_eq!(Tally::default().pass_rate(), 0.0);
    }

    #[test]
    fn status_serializes_lowercase() {
        let item = ItemResult {
            text: "x".into(),
            status: ItemStatus::Na,
            recommendation: None,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json, serde_json::json!({"text": "x", "status": "na"}));
    }
}
