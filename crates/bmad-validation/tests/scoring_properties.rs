//! Property tests for checklist scoring

use bmad_checklist::parse_checklist;
use bmad_validation::{
    ReportBuilder, StatusTier, ValidationContext, ValidationEngine, ValidationMode,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const CLARITY: &str = "## Clarity\n- [ ] Clear problem statement\n- [ ] Goal is measurable\n";

const ITEM_TEXTS: &[&str] = &[
    "Clear goal",
    "User story with acceptance criteria",
    "Technical architecture",
    "Testing strategy",
    "Security review (if applicable)",
    "Section headers",
    "List of epics",
    "Comprehensive detailed table",
    "Brief summary",
    "Something unrelated",
];

const WORDS: &[&str] = &[
    "clear", "goal", "user", "story", "epic", "api", "security", "test", "#", "-", "|",
    "architecture", "criteria", "plain", "words", "\n",
];

fn checklist_source() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::collection::vec(prop::sample::select(ITEM_TEXTS), 0..5), 0..4)
        .prop_map(|sections| {
            let mut source = String::new();
            for (i, items) in sections.iter().enumerate() {
                source.push_str(&format!("## Section {i}\n"));
                for item in items {
                    source.push_str(&format!("- [ ] {item}\n"));
                }
            }
            source
        })
}

fn document() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(WORDS), 0..400).prop_map(|w| w.join(" "))
}

fn mode() -> impl Strategy<Value = ValidationMode> {
    prop::sample::select(ValidationMode::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn counts_add_up(source in checklist_source(), doc in document(), mode in mode()) {
        let checklist = parse_checklist("p", &source);
        let result = ValidationEngine::new().evaluate(&checklist, &doc, &ValidationContext::default(), mode);

        prop_assert_eq!(result.tally.total, checklist.total_items);
        prop_assert_eq!(result.tally.total, result.tally.passed + result.tally.failed + result.tally.na);
        for section in &result.sections {
            prop_assert_eq!(section.tally.total, section.items.len());
            prop_assert_eq!(section.tally.total, section.tally.passed + section.tally.failed + section.tally.na);
        }
        prop_assert_eq!(result.failed_items.len(), result.tally.failed);
        let rate = result.pass_rate();
        prop_assert!((0.0..=100.0).contains(&rate));
    }

    #[test]
    fn evaluation_is_deterministic(source in checklist_source(), doc in document(), mode in mode()) {
        let checklist = parse_checklist("p", &source);
        let engine = ValidationEngine::new();
        let ctx = ValidationContext::default();
        prop_assert_eq!(
            engine.evaluate(&checklist, &doc, &ctx, mode),
            engine.evaluate(&checklist, &doc, &ctx, mode)
        );
    }

    #[test]
    fn looser_modes_pass_at_least_as_much(source in checklist_source(), doc in document()) {
        let checklist = parse_checklist("p", &source);
        let engine = ValidationEngine::new();
        let ctx = ValidationContext::default();
        let passed: Vec<usize> = ValidationMode::ALL
            .iter()
            .map(|&m| engine.evaluate(&checklist, &doc, &ctx, m).tally.passed)
            .collect();
        // ALL is ordered lenient, standard, strict
        prop_assert!(passed[0] >= passed[1]);
        prop_assert!(passed[1] >= passed[2]);
    }

    #[test]
    fn tier_matches_rate(source in checklist_source(), doc in document(), mode in mode()) {
        let checklist = parse_checklist("p", &source);
        let result = ValidationEngine::new().evaluate(&checklist, &doc, &ValidationContext::default(), mode);
        let report = ReportBuilder::build(&result, doc.chars().count());
        prop_assert_eq!(report.tier, StatusTier::from_pass_rate(result.pass_rate()));
        prop_assert_eq!(report.tier.is_ready(), report.next_steps.len() == 2);
    }
}

#[test]
fn clarity_document_is_excellent() {
    let checklist = parse_checklist("clarity", CLARITY);
    let doc = "This is a clear and specific goal.";
    let result = ValidationEngine::new().evaluate(
        &checklist,
        doc,
        &ValidationContext::default(),
        ValidationMode::Standard,
    );
    let report = ReportBuilder::build(&result, doc.chars().count());

    assert_eq!(report.total, 2);
    assert_eq!(report.passed, 2);
    assert_eq!(report.pass_rate, 100.0);
    assert_eq!(report.tier, StatusTier::Excellent);
    assert_eq!(report.document_length, 34);
    assert!(report.failed_items.is_empty());
}

#[test]
fn empty_document_requires_revision_in_any_mode() {
    let checklist = parse_checklist("clarity", CLARITY);
    for mode in ValidationMode::ALL {
        let result =
            ValidationEngine::new().evaluate(&checklist, "", &ValidationContext::default(), mode);
        let report = ReportBuilder::build(&result, 0);

        assert_eq!(report.total, 2, "{mode}");
        assert_eq!(report.failed, 2, "{mode}");
        assert_eq!(report.pass_rate, 0.0, "{mode}");
        assert_eq!(report.tier, StatusTier::RequiresRevision, "{mode}");
        assert!(!report.recommendations.is_empty(), "{mode}");
    }
}

#[test]
fn empty_document_requires_revision() {
    let checklist = parse_checklist(
        "mixed",
        "## Scope\n- [ ] Clear goal\n- [ ] User story\n## Quality\n- [ ] Testing strategy\n",
    );
    let result = ValidationEngine::new().evaluate(
        &checklist,
        "",
        &ValidationContext::default(),
        ValidationMode::Lenient,
    );
    let report = ReportBuilder::build(&result, 0);

    assert_eq!(report.pass_rate, 0.0);
    assert_eq!(report.tier, StatusTier::RequiresRevision);
    assert_eq!(report.failed, 3);
    assert!(!report.recommendations.is_empty());
    assert_eq!(
        report.failed_items[2].recommendation,
        "Include testing strategy and requirements"
    );
}
