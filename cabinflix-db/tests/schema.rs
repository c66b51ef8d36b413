use cabinflix_db::open_memory;
use cabinflix_db::schema::{CURRENT_VERSION, create_schema, get_schema_version};
use cabinflix_db::{Connection, SchemaError, open_database};
use tempfile::TempDir;

#[test]
fn create_schema_in_memory() {
    let conn = open_memory().unwrap();
    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_VERSION);
}

#[test]
fn fresh_database_starts_at_version_one() {
    assert_eq!(CURRENT_VERSION, 1);
    let conn = open_memory().unwrap();
    let provenance: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM pragma_table_info('movies')
             WHERE name IN ('source_title', 'origin')",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(provenance, 2);
}

#[test]
fn schema_is_idempotent() {
    let conn = open_memory().unwrap();
    create_schema(&conn).unwrap();
}

#[test]
fn foreign_keys_enabled() {
    let conn = open_memory().unwrap();
    let fk: i32 = conn
        .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
        .unwrap();
    assert_eq!(fk, 1);
}

#[test]
fn all_tables_exist() {
    let conn = open_memory().unwrap();
    let tables = ["schema_version", "movies", "genres", "movie_genres", "sync_log"];
    for table in tables {
        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1)",
                [table],
                |row| row.get(0),
            )
            .unwrap();
        assert!(exists, "table '{}' should exist", table);
    }
}

#[test]
fn open_database_on_disk_twice() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("catalog.db");
    {
        let conn = open_database(&path).unwrap();
        conn.execute("INSERT INTO movies (title) VALUES ('Heat')", [])
            .unwrap();
    }
    let conn = open_database(&path).unwrap();
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM movies", [], |r| r.get(0))
        .unwrap();
    assert_eq!(n, 1);
    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_VERSION);
}

#[test]
fn newer_schema_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("future.db");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE schema_version (version INTEGER NOT NULL);
             INSERT INTO schema_version (version) VALUES (99);",
        )
        .unwrap();
    }
    assert!(matches!(
        open_database(&path),
        Err(SchemaError::VersionMismatch { expected: CURRENT_VERSION, found: 99 })
    ));
}
