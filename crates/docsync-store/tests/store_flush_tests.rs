use std::fs;

use docsync_core::{EntityKind, ExErrorKind};
use docsync_store::config::ProjectSettings;
use docsync_store::document::NodeRef;
use docsync_store::{DocumentStore, EntityIndex};
use serde_json::json;
use tempfile::TempDir;

#[test]
fn test_flush_continues_past_a_failing_file() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("blocker"), "a file, not a directory").unwrap();

    let good = root.join("models").join("schema.yml");
    let bad = root.join("blocker").join("schema.yml");

    let mut store = DocumentStore::new();
    store
        .create(&bad)
        .append_entity(EntityKind::Model, &json!({"name": "broken"}))
        .unwrap();
    store
        .create(&good)
        .append_entity(EntityKind::Model, &json!({"name": "orders"}))
        .unwrap();
    store.mark_dirty(&bad);
    store.mark_dirty(&good);

    let report = store.flush_all();

    assert_eq!(report.written, vec![good.clone()]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].path, bad);
    assert_eq!(report.failed[0].error.kind(), ExErrorKind::Write);
    assert!(store.is_dirty(&bad));
    assert!(!store.is_dirty(&good));
    assert!(fs::read_to_string(&good).unwrap().contains("- name: orders"));
}

#[test]
fn test_scan_aborts_on_parse_error_without_partial_index() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("models")).unwrap();
    fs::write(root.join("models/a.yml"), "models:\n  - name: fine\n").unwrap();
    fs::write(root.join("models/b.yml"), "models:\n  - name: [unclosed\n").unwrap();

    let mut store = DocumentStore::new();
    let err = EntityIndex::scan(root, &ProjectSettings::default(), &mut store).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Parse);
    assert!(err.path().unwrap().ends_with("b.yml"));
    assert!(store.is_empty());
}

#[test]
fn test_scan_rejects_non_mapping_document() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("seeds")).unwrap();
    fs::write(root.join("seeds/list.yml"), "- just\n- a list\n").unwrap();

    let mut store = DocumentStore::new();
    let err = EntityIndex::scan(root, &ProjectSettings::default(), &mut store).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Parse);
}

#[test]
fn test_scan_then_edit_then_flush_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("models/staging")).unwrap();
    fs::create_dir_all(root.join("snapshots")).unwrap();
    let schema = root.join("models/staging/schema.yml");
    let original = "version: 2\nmodels:\n  # keep me\n  - name: stg_orders\n";
    fs::write(&schema, original).unwrap();
    fs::write(root.join("snapshots/empty.yml"), "").unwrap();

    let mut store = DocumentStore::new();
    let index = EntityIndex::scan(root, &ProjectSettings::default(), &mut store).unwrap();
    assert_eq!(index.documents_scanned(), 1);

    let location = index.lookup("stg_orders").unwrap().clone();
    assert_eq!(location.node(), NodeRef::entity(EntityKind::Model, 0));

    store
        .get_mut(&location.path)
        .unwrap()
        .set_field(location.node(), "description", &json!("Staged orders"))
        .unwrap();
    store.mark_dirty(&location.path);
    let report = store.flush_all();

    assert!(report.is_complete());
    assert_eq!(
        fs::read_to_string(&schema).unwrap(),
        "version: 2\nmodels:\n  # keep me\n  - name: stg_orders\n    description: Staged orders\n"
    );
}
