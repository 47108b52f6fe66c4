use addressbook_core::db::migrations::latest_version;
use addressbook_core::db::{open_db, open_db_in_memory, DbError};
use addressbook_core::{RepoError, SqliteAddressRepository};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "addresses");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("address_book.sqlite3");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute(
            "INSERT INTO addresses (locality, city, latitude_e6, longitude_e6)
             VALUES ('Main St', 'Springfield', 40000000, -75000000);",
            [],
        )
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let count: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM addresses;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn repository_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let err = SqliteAddressRepository::try_new(&conn).err().unwrap();
    assert!(matches!(
        err,
        RepoError::Db(DbError::SchemaNotMigrated {
            db_version: 0,
            ..
        })
    ));
}

#[test]
fn storage_checks_reject_out_of_range_rows() {
    let conn = open_db_in_memory().unwrap();

    let lat_err = conn.execute(
        "INSERT INTO addresses (locality, city, latitude_e6, longitude_e6)
         VALUES ('x', 'y', 95000000, 0);",
        [],
    );
    assert!(lat_err.is_err());

    let lon_err = conn.execute(
        "INSERT INTO addresses (locality, city, latitude_e6, longitude_e6)
         VALUES ('x', 'y', 0, -180000001);",
        [],
    );
    assert!(lon_err.is_err());

    let long_city = "c".repeat(257);
    let text_err = conn.execute(
        "INSERT INTO addresses (locality, city, latitude_e6, longitude_e6)
         VALUES ('x', ?1, 0, 0);",
        [long_city.as_str()],
    );
    assert!(text_err.is_err());
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
