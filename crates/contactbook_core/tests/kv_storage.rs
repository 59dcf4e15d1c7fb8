use contactbook_core::db::migrations::latest_version;
use contactbook_core::db::{open_db, open_db_in_memory, DbError};
use contactbook_core::{KeyValueStorage, SqliteKeyValueStorage, StorageError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "kv_entries");
}

#[test]
fn open_db_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("deeper").join("contacts.db");

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    assert!(path.exists());
}

#[test]
fn opening_same_database_twice_keeps_entries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.db");

    let first = SqliteKeyValueStorage::open(&path).unwrap();
    first.set_item("darkMode", "true").unwrap();
    drop(first);

    let second = SqliteKeyValueStorage::open(&path).unwrap();
    assert_eq!(schema_version(second.connection()), latest_version());
    assert_eq!(
        second.get_item("darkMode").unwrap().as_deref(),
        Some("true")
    );
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
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
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }

    let err = SqliteKeyValueStorage::open(&path)
        .err()
        .expect("storage open should fail");
    assert!(matches!(
        err,
        StorageError::Db(DbError::UnsupportedSchemaVersion { .. })
    ));
}

#[test]
fn keys_are_sorted_and_remove_item_deletes() {
    let storage = SqliteKeyValueStorage::open_in_memory().unwrap();
    storage.set_item("darkMode", "false").unwrap();
    storage.set_item("contacts", "[]").unwrap();

    assert_eq!(
        storage.keys().unwrap(),
        vec!["contacts".to_string(), "darkMode".to_string()]
    );

    storage.remove_item("darkMode").unwrap();
    assert!(storage.get_item("darkMode").unwrap().is_none());
    assert_eq!(storage.keys().unwrap(), vec!["contacts".to_string()]);
}

#[test]
fn values_keep_unicode_and_markup_verbatim() {
    let storage = SqliteKeyValueStorage::open_in_memory().unwrap();
    let value = r#"[{"name":"<b>Zoë</b> & co"}]"#;
    storage.set_item("contacts", value).unwrap();
    assert_eq!(storage.get_item("contacts").unwrap().as_deref(), Some(value));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
