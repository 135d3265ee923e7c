//! Round-trip and listing behaviour of the artifact archive.
//!
//! The central guarantee: `load(path)` after `save(path, content, metadata)`
//! returns the body byte-for-byte and a metadata map with the same entries.

use bmad_artifact::{ArtifactStore, Category, Metadata, StoreError};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn metadata(pairs: &[(&str, &str)]) -> Metadata {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,15}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn save_then_load_reproduces_body_and_metadata(
        content in any::<String>(),
        pairs in prop::collection::vec((key_strategy(), any::<String>()), 0..6),
    ) {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let metadata: Metadata = pairs.into_iter().collect();

        let rt = tokio::runtime::Runtime::new().unwrap();
        let artifact = rt.block_on(async {
            store.save("stories/prop.md", &content, Some(&metadata)).await.unwrap();
            store.load("stories/prop.md").await.unwrap()
        });

        prop_assert_eq!(artifact.content, content);
        prop_assert_eq!(artifact.metadata, metadata);
    }

    #[test]
    fn bare_bodies_roundtrip(content in any::<String>()) {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());

        let rt = tokio::runtime::Runtime::new().unwrap();
        let artifact = rt.block_on(async {
            store.save("ideation/brief.md", &content, None).await.unwrap();
            store.load("ideation/brief.md").await.unwrap()
        });

        prop_assert_eq!(artifact.content, content);
        prop_assert!(artifact.metadata.is_empty());
    }
}

#[tokio::test]
async fn metadata_order_is_preserved_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    let m = metadata(&[
        ("artifact_type", "prd"),
        ("status", "review"),
        ("generated_by", "generate_prd"),
    ]);
    let path = store.save("prd/prd.md", "# PRD\n", Some(&m)).await.unwrap();

    let raw = tokio::fs::read_to_string(path).await.unwrap();
    assert_eq!(
        raw,
        "---\nartifact_type: prd\nstatus: review\ngenerated_by: generate_prd\n---\n\n# PRD\n"
    );
}

#[tokio::test]
async fn hand_written_header_is_read() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    store.ensure_layout().await.unwrap();
    tokio::fs::write(
        dir.path().join("architecture/arch.md"),
        "---\nstatus: approved\nowner: Platform team\n---\n\n# Architecture\n",
    )
    .await
    .unwrap();

    let artifact = store.load("architecture/arch.md").await.unwrap();
    assert_eq!(artifact.metadata, metadata(&[("status", "approved"), ("owner", "Platform team")]));
    assert_eq!(artifact.content, "# Architecture\n");
}

#[tokio::test]
async fn listing_filters_and_orders() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    store.ensure_layout().await.unwrap();

    store
        .save(
            "stories/one.md",
            "one",
            Some(&metadata(&[("status", "draft"), ("updated_at", "2024-01-01T00:00:00Z")])),
        )
        .await
        .unwrap();
    store
        .save(
            "stories/nested/two.md",
            "two",
            Some(&metadata(&[("status", "review"), ("updated_at", "2024-03-01T00:00:00Z")])),
        )
        .await
        .unwrap();
    store
        .save(
            "prd/prd.md",
            "prd",
            Some(&metadata(&[("status", "draft"), ("updated_at", "2024-02-01T00:00:00Z")])),
        )
        .await
        .unwrap();
    store.save("decisions/raw.json", "{}", None).await.unwrap();

    let all = store.list_artifacts(None, None).await.unwrap();
    let paths: Vec<&str> = all.iter().map(|s| s.path.as_str()).collect();
    assert_eq!(paths, vec!["stories/nested/two.md", "prd/prd.md", "stories/one.md"]);

    let stories = store.list_artifacts(Some(Category::Stories), None).await.unwrap();
    assert_eq!(stories.len(), 2);
    assert!(stories.iter().all(|s| s.category == Some(Category::Stories)));

    let drafts = store.list_artifacts(None, Some("draft")).await.unwrap();
    assert_eq!(drafts.len(), 2);

    let latest = store.latest_artifact(Category::Stories).await.unwrap().unwrap();
    assert_eq!(latest.content, "two");
    assert!(store.latest_artifact(Category::Decisions).await.unwrap().is_none());
}

#[tokio::test]
async fn listing_skips_unreadable_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    store.ensure_layout().await.unwrap();
    store.save("stories/good.md", "ok", None).await.unwrap();
    tokio::fs::write(dir.path().join("stories/bad.md"), "---\nbroken\n")
        .await
        .unwrap();

    let listed = store.list_artifacts(Some(Category::Stories), None).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].path, "stories/good.md");
    assert_eq!(listed[0].status, "unknown");

    let err = store.load("stories/bad.md").await.unwrap_err();
    assert!(matches!(err, StoreError::Header { .. }));
}

#[tokio::test]
async fn escaping_paths_are_refused() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path().join("archive"));
    let err = store.save("../outside.md", "x", None).await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidPath(_)));
    assert!(!dir.path().join("outside.md").exists());
}
