// Integration tests for driver failure mapping
// Each CRUD statement is forced to fail and must surface its own error kind

use docstore_store::schema::{ensure_table, DEFAULT_TABLE};
use docstore_store::{ResourceStore, StoreErrorKind};
use rusqlite::{ffi, Connection};
use serde_json::{json, Map, Value};

fn setup_test_db() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    ensure_table(&mut conn, DEFAULT_TABLE).unwrap();
    conn
}

fn fields(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

fn block(conn: &Connection, event: &str) {
    conn.execute_batch(&format!(
        "CREATE TRIGGER block_{event} BEFORE {event} ON collection
         BEGIN SELECT RAISE(ABORT, '{event} blocked'); END;",
        event = event
    ))
    .unwrap();
}

#[test]
fn test_duplicate_id_fails_with_insert_error() {
    let conn = setup_test_db();
    let fixed_id = "0123456789abcdef0123456789abcdef";
    let store = ResourceStore::new(&conn, DEFAULT_TABLE)
        .unwrap()
        .with_id_generator(move || fixed_id.to_string());

    let first = store.create(fields(json!({"n": 1}))).unwrap();
    assert_eq!(first.id(), Some(fixed_id));

    let err = store.create(fields(json!({"n": 2}))).unwrap_err();

    assert_eq!(err.kind(), StoreErrorKind::Insert);
    assert_eq!(err.op(), Some("create"));
    assert_eq!(err.driver_code(), Some(ffi::SQLITE_CONSTRAINT_PRIMARYKEY));
    assert!(err.message().contains("UNIQUE constraint failed"));
    assert_eq!(err.resource_id(), Some(fixed_id));

    // The first record is untouched
    assert_eq!(store.fetch(fixed_id).unwrap(), first);
}

#[test]
fn test_missing_table_fails_with_fetch_error() {
    let conn = Connection::open_in_memory().unwrap();
    let store = ResourceStore::new(&conn, "missing").unwrap();

    let err = store.fetch("abc").unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::Fetch);
    assert!(!err.is_not_found());
    assert_eq!(err.driver_code(), Some(ffi::SQLITE_ERROR));
    assert!(err.message().contains("no such table"));

    let err = store.fetch_all(Some(10), None).unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::Fetch);
    assert_eq!(err.op(), Some("fetch_all"));

    let err = store.count().unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::Fetch);

    let err = store.create(fields(json!({}))).unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::Insert);
}

#[test]
fn test_patch_write_failure_is_patch_error() {
    let conn = setup_test_db();
    let store = ResourceStore::new(&conn, DEFAULT_TABLE).unwrap();
    let created = store.create(fields(json!({"foo": "bar"}))).unwrap();
    let id = created.id().unwrap().to_string();
    block(&conn, "UPDATE");

    let err = store.patch(&id, fields(json!({"foo": "FOO"}))).unwrap_err();

    assert_eq!(err.kind(), StoreErrorKind::Patch);
    assert_eq!(err.code(), "ERR_PATCH");
    assert_eq!(err.driver_code(), Some(ffi::SQLITE_CONSTRAINT_TRIGGER));
    assert!(err.message().contains("UPDATE blocked"));
    assert_eq!(store.fetch(&id).unwrap(), created);
}

#[test]
fn test_update_failure_is_update_error() {
    let conn = setup_test_db();
    let store = ResourceStore::new(&conn, DEFAULT_TABLE).unwrap();
    let id = store.create(fields(json!({"foo": "bar"}))).unwrap().id().unwrap().to_string();
    block(&conn, "UPDATE");

    let err = store.update(&id, fields(json!({"x": 1}))).unwrap_err();

    assert_eq!(err.kind(), StoreErrorKind::Update);
    assert_eq!(err.op(), Some("update"));
    assert_eq!(err.resource_id(), Some(id.as_str()));
}

#[test]
fn test_delete_failure_reuses_update_kind() {
    let conn = setup_test_db();
    let store = ResourceStore::new(&conn, DEFAULT_TABLE).unwrap();
    let id = store.create(fields(json!({"foo": "bar"}))).unwrap().id().unwrap().to_string();
    block(&conn, "DELETE");

    let err = store.delete(&id).unwrap_err();

    assert_eq!(err.kind(), StoreErrorKind::Update);
    assert_eq!(err.op(), Some("delete"));
    assert!(err.message().contains("DELETE blocked"));
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn test_insert_failure_from_trigger() {
    let conn = setup_test_db();
    let store = ResourceStore::new(&conn, DEFAULT_TABLE).unwrap();
    block(&conn, "INSERT");

    let err = store.create(fields(json!({"foo": "bar"}))).unwrap_err();

    assert_eq!(err.kind(), StoreErrorKind::Insert);
    assert_eq!(err.driver_code(), Some(ffi::SQLITE_CONSTRAINT_TRIGGER));
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn test_corrupt_document_fails_with_fetch_error() {
    let conn = setup_test_db();
    conn.execute(
        "INSERT INTO collection (id, data) VALUES ('broken', '[1, 2, 3]')",
        [],
    )
    .unwrap();
    let store = ResourceStore::new(&conn, DEFAULT_TABLE).unwrap();

    let err = store.fetch("broken").unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::Fetch);
    assert!(!err.is_not_found());
    assert_eq!(err.resource_id(), Some("broken"));

    let err = store.fetch_all(None, None).unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::Fetch);
}

#[test]
fn test_without_rowid_table_cannot_list() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("CREATE TABLE keyed (id TEXT PRIMARY KEY, data TEXT) WITHOUT ROWID")
        .unwrap();
    let store = ResourceStore::new(&conn, "keyed").unwrap();
    let created = store.create(fields(json!({"foo": "bar"}))).unwrap();

    assert_eq!(store.fetch(created.id().unwrap()).unwrap(), created);

    let err = store.fetch_all(None, None).unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::Fetch);
    assert_eq!(err.op(), Some("fetch_all"));
    assert!(err.message().contains("rowid"));
}
