mod common;

use common::{date, ledger_path, reopen, temp_store};
use dime_track::{Category, LedgerError, TransactionKind};
use std::fs;
use uuid::Uuid;

#[test]
fn added_transaction_survives_restart() {
    let (mut store, temp) = temp_store();
    let created = store
        .add_transaction(
            TransactionKind::Expense,
            "Groceries",
            150.0,
            Some(Category::FoodAndDining),
            date(2025, 1, 2),
        )
        .expect("add expense");
    drop(store);

    let store = reopen(&temp);
    assert_eq!(store.transactions(), &[created]);
}

#[test]
fn removed_transaction_stays_removed_after_restart() {
    let (mut store, temp) = temp_store();
    let salary = store
        .add_transaction(TransactionKind::Income, "Salary", 3000.0, None, date(2025, 1, 1))
        .unwrap();
    let gas = store
        .add_transaction(
            TransactionKind::Expense,
            "Gas",
            50.0,
            Some(Category::Transportation),
            date(2025, 1, 3),
        )
        .unwrap();
    store.remove_transaction(salary.id).expect("remove salary");
    drop(store);

    let store = reopen(&temp);
    assert!(store.transaction(salary.id).is_none());
    assert_eq!(store.transactions(), &[gas]);
}

#[test]
fn removing_unknown_id_fails_and_keeps_file() {
    let (mut store, temp) = temp_store();
    store
        .add_transaction(TransactionKind::Income, "Salary", 3000.0, None, date(2025, 1, 1))
        .unwrap();
    let before = fs::read_to_string(ledger_path(&temp)).unwrap();
    let snapshot = store.ledger().clone();

    let missing = Uuid::new_v4();
    let err = store.remove_transaction(missing).expect_err("unknown id");
    assert!(matches!(err, LedgerError::NotFound(id) if id == missing));
    assert_eq!(store.ledger(), &snapshot);
    assert_eq!(fs::read_to_string(ledger_path(&temp)).unwrap(), before);
}

fn tmp_path_for(path: &std::path::Path) -> std::path::PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.tmp", existing),
        None => String::from("tmp"),
    };
    tmp.set_extension(ext);
    tmp
}

#[test]
fn failed_save_preserves_previous_file_and_memory() {
    let (mut store, temp) = temp_store();
    store
        .add_transaction(TransactionKind::Income, "Salary", 3000.0, None, date(2025, 1, 1))
        .unwrap();
    let path = ledger_path(&temp);
    let original = fs::read_to_string(&path).expect("read original file");
    let snapshot = store.ledger().clone();

    // A directory where the temp file should go makes the staging write fail.
    fs::create_dir_all(tmp_path_for(&path)).unwrap();

    let err = store
        .add_transaction(
            TransactionKind::Expense,
            "Groceries",
            150.0,
            Some(Category::FoodAndDining),
            date(2025, 1, 2),
        )
        .expect_err("save must fail while the temp path is blocked");
    assert!(matches!(err, LedgerError::Persistence { .. }), "{err:?}");
    assert_eq!(store.ledger(), &snapshot, "memory rolled back");
    assert_eq!(fs::read_to_string(&path).unwrap(), original, "file untouched");

    let err = store
        .remove_transaction(snapshot.transactions[0].id)
        .expect_err("remove must fail too");
    assert!(err.is_persistence());
    assert_eq!(store.ledger(), &snapshot);
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn corrupt_file_is_reported_not_replaced() {
    let (_store, temp) = temp_store();
    let path = ledger_path(&temp);
    fs::write(&path, "{\"transactions\": [ {\"id\": 3 ").unwrap();

    let storage = dime_track::JsonStorage::in_dir(Some(temp.path().to_path_buf()));
    let err = dime_track::LedgerStore::open(Box::new(storage))
        .err()
        .expect("corrupt file must fail to open");
    assert!(matches!(err, LedgerError::CorruptData { .. }), "{err:?}");
    assert!(fs::read_to_string(&path).unwrap().starts_with("{\"transactions\""));
}

#[test]
fn open_fresh_moves_corrupt_file_aside() {
    let temp = tempfile::TempDir::new().unwrap();
    let path = ledger_path(&temp);
    fs::write(&path, "not json at all").unwrap();

    let storage = dime_track::JsonStorage::in_dir(Some(temp.path().to_path_buf()));
    let (mut store, moved) = dime_track::LedgerStore::open_fresh(Box::new(storage)).unwrap();
    let moved = moved.expect("file moved aside");
    assert_eq!(fs::read_to_string(moved).unwrap(), "not json at all");
    assert!(store.ledger().is_empty());

    store
        .add_transaction(TransactionKind::Income, "Salary", 10.0, None, date(2025, 2, 1))
        .unwrap();
    assert_eq!(reopen(&temp).transactions().len(), 1);
}

#[test]
fn legacy_document_is_upgraded_on_next_save() {
    let temp = tempfile::TempDir::new().unwrap();
    let path = ledger_path(&temp);
    fs::write(
        &path,
        r#"{
  "income_entries": [
    {"amount": 3000.0, "label": "Salary", "date": "2025-01-01", "timestamp": "2025-01-01T08:00:00.000001"}
  ],
  "expense_entries": [
    {"amount": 150.0, "label": "Groceries", "category": "Food & Dining", "date": "2025-01-02", "timestamp": "2025-01-02T08:00:00"},
    {"amount": 50.0, "label": "Gas", "category": "Transportation", "date": "2025-01-03", "timestamp": "2025-01-03T08:00:00"}
  ]
}"#,
    )
    .unwrap();

    let mut store = reopen(&temp);
    assert_eq!(store.transactions().len(), 3);
    assert_eq!(store.transactions_of(TransactionKind::Expense).len(), 2);

    let groceries = store.transactions()[1].id;
    store.remove_transaction(groceries).unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"schema_version\": 1"));
    assert!(!raw.contains("income_entries"));
    assert_eq!(reopen(&temp).transactions().len(), 2);
}

#[test]
fn legacy_ids_survive_restart_without_changes() {
    let temp = tempfile::TempDir::new().unwrap();
    let path = ledger_path(&temp);
    fs::write(
        &path,
        r#"{
  "income_entries": [
    {"amount": 3000.0, "label": "Salary", "date": "2025-01-01"}
  ],
  "expense_entries": [
    {"amount": 150.0, "label": "Groceries", "category": "Food & Dining", "date": "2025-01-02"}
  ]
}"#,
    )
    .unwrap();

    let first: Vec<_> = reopen(&temp).transactions().iter().map(|t| t.id).collect();
    let mut store = reopen(&temp);
    let second: Vec<_> = store.transactions().iter().map(|t| t.id).collect();
    assert_eq!(first, second);

    store.remove_transaction(first[1]).unwrap();
    assert_eq!(reopen(&temp).transactions()[0].id, first[0]);
}

#[test]
fn foreign_json_object_is_corrupt_and_kept() {
    let temp = tempfile::TempDir::new().unwrap();
    let path = ledger_path(&temp);
    let foreign = r#"{"entries": [{"amount": 5}]}"#;
    fs::write(&path, foreign).unwrap();

    let storage = dime_track::JsonStorage::in_dir(Some(temp.path().to_path_buf()));
    let err = dime_track::LedgerStore::open(Box::new(storage))
        .err()
        .expect("foreign document must not open");
    assert!(matches!(err, LedgerError::CorruptData { .. }), "{err:?}");
    assert_eq!(fs::read_to_string(&path).unwrap(), foreign);
}
