use herdbook_core::{KeyValueStore, SqliteKeyValueStore};

#[test]
fn missing_key_reads_as_none() {
    let store = SqliteKeyValueStore::open_in_memory().unwrap();
    assert_eq!(store.get("herdbook.cows").unwrap(), None);
}

#[test]
fn set_overwrites_previous_value() {
    let mut store = SqliteKeyValueStore::open_in_memory().unwrap();
    store.set("k", "[]").unwrap();
    store.set("k", "[1]").unwrap();

    assert_eq!(store.get("k").unwrap().as_deref(), Some("[1]"));
    let rows: i64 = store
        .connection()
        .query_row("SELECT COUNT(*) FROM kv_entries;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn remove_is_idempotent() {
    let mut store = SqliteKeyValueStore::open_in_memory().unwrap();
    store.set("k", "v").unwrap();

    store.remove("k").unwrap();
    store.remove("k").unwrap();
    assert_eq!(store.get("k").unwrap(), None);
}

#[test]
fn values_survive_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kv.sqlite3");

    {
        let mut store = SqliteKeyValueStore::open(&path).unwrap();
        store.set("herdbook.cows", r#"[{"id":"1"}]"#).unwrap();
    }

    let reopened = SqliteKeyValueStore::open(&path).unwrap();
    assert_eq!(
        reopened.get("herdbook.cows").unwrap().as_deref(),
        Some(r#"[{"id":"1"}]"#)
    );
}
