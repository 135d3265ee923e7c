//! The checklists shipped in the repository parse as expected

use bmad_checklist::ChecklistRegistry;
use pretty_assertions::assert_eq;

fn registry() -> ChecklistRegistry {
    ChecklistRegistry::new(concat!(env!("CARGO_MANIFEST_DIR"), "/../../checklists"))
}

#[tokio::test]
async fn bundled_checklists_are_listed() {
    assert_eq!(
        registry().list().await.unwrap(),
        vec!["architect_checklist", "pm_checklist", "story_draft_checklist"]
    );
}

#[tokio::test]
async fn bundled_item_counts() {
    let registry = registry();
    for (name, sections, items) in [
        ("story_draft_checklist", 4, 12),
        ("pm_checklist", 5, 15),
        ("architect_checklist", 4, 11),
    ] {
        let checklist = registry.load(name).await.unwrap();
        assert_eq!(checklist.sections.len(), sections, "{name}");
        assert_eq!(checklist.total_items, items, "{name}");
    }
}

#[tokio::test]
async fn conditional_items_are_flagged() {
    let checklist = registry().load("story_draft_checklist").await.unwrap();
    let conditional: Vec<&str> = checklist
        .items()
        .filter(|(_, item)| item.conditional)
        .map(|(_, item)| item.text.as_str())
        .collect();
    assert_eq!(
        conditional,
        vec![
            "API endpoints and payloads are documented (if applicable)",
            "Database changes are described (if applicable)",
            "Security considerations noted (if needed)",
        ]
    );
}
