use std::fs;

use pocketdesk_core::{open_file_store, Completion, StoreError, StorePaths};

#[test]
fn roundtrip_through_restart() {
    let dir = tempfile::tempdir().unwrap();
    let paths = StorePaths::in_dir(dir.path());

    let (mut store, report) = open_file_store(&paths).unwrap();
    assert!(report.skipped.is_empty());
    store.add_todo("buy milk", Some("2026-01-05")).unwrap();
    store.add_todo("call mom", None).unwrap();
    store.add_todo("fix bike", Some("2026-02-11")).unwrap();
    store.complete_todo(2).unwrap();
    store.delete_todo(1).unwrap();
    store.add_expense("coffee", "3.2", Some("2026-01-05")).unwrap();
    store.add_expense("books", "41.99", None).unwrap();
    let before = store.data().clone();
    drop(store);

    let (mut reopened, report) = open_file_store(&paths).unwrap();
    assert!(report.skipped.is_empty());
    assert_eq!(reopened.data(), &before);

    // "call mom" moved to position 1 after the delete and stays done.
    assert_eq!(reopened.list_todos()[0].content, "call mom");
    assert!(matches!(reopened.complete_todo(1).unwrap(), Completion::AlreadyDone(_)));
}

#[test]
fn mirror_is_rendered_on_every_mutation() {
    let dir = tempfile::tempdir().unwrap();
    let paths = StorePaths::in_dir(dir.path());
    let (mut store, _) = open_file_store(&paths).unwrap();

    store.add_todo("water plants", None).unwrap();
    let first = fs::read_to_string(&paths.mirror).unwrap();
    assert!(first.contains("water plants"));
    assert!(first.contains("[ ]"));

    store.complete_todo(1).unwrap();
    store.add_expense("soil", "7.50", None).unwrap();
    let second = fs::read_to_string(&paths.mirror).unwrap();
    assert!(second.contains("[x]"));
    assert!(second.contains("soil"));
    assert!(second.contains("Grand total: 7.50"));
}

#[test]
fn mirror_failure_is_best_effort() {
    let dir = tempfile::tempdir().unwrap();
    let paths = StorePaths::in_dir(dir.path());
    fs::create_dir(&paths.mirror).unwrap();

    let (mut store, _) = open_file_store(&paths).unwrap();
    store.add_todo("still committed", None).unwrap();
    assert!(store.take_mirror_warning().is_some());

    let (reopened, _) = open_file_store(&paths).unwrap();
    assert_eq!(reopened.list_todos().len(), 1);
}

#[test]
fn failed_primary_write_is_not_committed() {
    let dir = tempfile::tempdir().unwrap();
    let paths = StorePaths::in_dir(dir.path());
    let (mut store, _) = open_file_store(&paths).unwrap();
    store.add_todo("kept", None).unwrap();

    // Occupy the temp-file slot so the next write cannot start.
    let temp = paths.primary.with_extension("json.tmp");
    fs::create_dir(&temp).unwrap();
    fs::write(temp.join("occupied"), "x").unwrap();

    let result = store.add_todo("lost", None);
    assert!(matches!(result, Err(StoreError::PersistFailure { .. })));
    assert_eq!(store.list_todos().len(), 1);

    let (reopened, _) = open_file_store(&paths).unwrap();
    let contents: Vec<&str> = reopened.list_todos().iter().map(|t| t.content.as_str()).collect();
    assert_eq!(contents, vec!["kept"]);
}

#[test]
fn malformed_records_are_skipped_with_report() {
    let dir = tempfile::tempdir().unwrap();
    let paths = StorePaths::in_dir(dir.path());
    fs::write(
        &paths.primary,
        r#"{
            "todos": [
                {"id": "0b7e5f9c-3a52-4b8e-9a51-2f7d8c1e4a10", "content": "valid", "done": true, "date": "2026-01-05"},
                {"id": "0b7e5f9c-3a52-4b8e-9a51-2f7d8c1e4a11", "content": "bad", "done": false, "date": "05/01/2026"},
                "not even an object"
            ],
            "expenses": [
                {"id": "0b7e5f9c-3a52-4b8e-9a51-2f7d8c1e4a12", "item": "tea", "amount": 3.5, "time": "2026-01-05"}
            ]
        }"#,
    )
    .unwrap();

    let (store, report) = open_file_store(&paths).unwrap();
    assert_eq!(store.list_todos().len(), 1);
    assert!(store.list_todos()[0].done);
    assert!(store.list_expenses().is_empty());
    assert_eq!(report.skipped.len(), 3);
}

#[test]
fn corrupt_file_fails_to_open() {
    let dir = tempfile::tempdir().unwrap();
    let paths = StorePaths::in_dir(dir.path());
    fs::write(&paths.primary, "{ this is not json").unwrap();

    assert!(matches!(open_file_store(&paths), Err(StoreError::CorruptStore { .. })));
}

#[test]
fn oversized_expense_leaves_disk_and_memory_in_step() {
    let dir = tempfile::tempdir().unwrap();
    let paths = StorePaths::in_dir(dir.path());
    let (mut store, _) = open_file_store(&paths).unwrap();

    store.add_expense("car", "999999999.99", Some("2026-03-01")).unwrap();
    let result = store.add_expense("yacht", "90000000000000000", Some("2026-03-02"));
    assert!(matches!(result, Err(StoreError::InvalidAmount(_))));

    let month = store.expenses_for_month("2026-03").unwrap();
    assert_eq!(month.total.to_string(), "999999999.99");
    let in_memory = store.data().clone();
    drop(store);

    let (reopened, report) = open_file_store(&paths).unwrap();
    assert!(report.skipped.is_empty());
    assert_eq!(reopened.data(), &in_memory);
    assert!(fs::read_to_string(&paths.mirror).unwrap().contains("Grand total: 999999999.99"));
}
