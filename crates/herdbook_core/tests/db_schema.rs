use herdbook_core::db::schema::SCHEMA_VERSION;
use herdbook_core::db::{open_db, open_db_in_memory, DbError};
use herdbook_core::{HerdStore, SqliteKeyValueStore, COWS_STORAGE_KEY};
use rusqlite::Connection;

#[test]
fn fresh_database_gets_kv_table_and_version() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), SCHEMA_VERSION);
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM kv_entries;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 0);
}

#[test]
fn unversioned_file_with_herd_document_is_adopted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");

    let legacy = Connection::open(&path).unwrap();
    legacy
        .execute_batch(
            "CREATE TABLE kv_entries (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL DEFAULT 0
            );",
        )
        .unwrap();
    legacy
        .execute(
            "INSERT INTO kv_entries (key, value) VALUES (?1, ?2);",
            [
                COWS_STORAGE_KEY,
                r#"[{"id":"7","earTag":"COW-007","sex":"Female","pen":"C1","status":"Active","createdAt":1,"lastEventDate":1,"events":[]}]"#,
            ],
        )
        .unwrap();
    drop(legacy);

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), SCHEMA_VERSION);

    let store = HerdStore::open(SqliteKeyValueStore::new(conn));
    assert_eq!(store.cows().len(), 1);
    assert_eq!(store.cows()[0].ear_tag, "COW-007");
}

#[test]
fn reopening_keeps_stored_entries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("herdbook.db");

    let first = open_db(&path).unwrap();
    first
        .execute(
            "INSERT INTO kv_entries (key, value) VALUES ('herdbook.note', 'kept');",
            [],
        )
        .unwrap();
    drop(first);

    let second = open_db(&path).unwrap();
    let value: String = second
        .query_row(
            "SELECT value FROM kv_entries WHERE key = 'herdbook.note';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(value, "kept");
    assert_eq!(schema_version(&second), SCHEMA_VERSION);
}

#[test]
fn newer_schema_version_is_rejected_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, SCHEMA_VERSION);
        }
        other => panic!("unexpected error: {other}"),
    }

    let conn = Connection::open(&path).unwrap();
    let tables: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(tables, 0);
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}
