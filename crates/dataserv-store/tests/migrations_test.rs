// Integration tests for the migration framework

use rusqlite::Connection;

fn setup_test_db() -> Connection {
    Connection::open_in_memory().expect("Failed to create in-memory database")
}

fn get_table_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<String>, _>>()
        .unwrap()
}

#[test]
fn test_apply_migrations_on_empty_db() {
    let mut conn = setup_test_db();

    let result = dataserv_store::migrations::apply_migrations(&mut conn);
    assert!(
        result.is_ok(),
        "Migrations should succeed: {:?}",
        result.err()
    );

    assert_eq!(get_table_names(&conn), vec!["farmers", "schema_version"]);
}

#[test]
fn test_migrations_are_idempotent() {
    let mut conn = setup_test_db();
    dataserv_store::migrations::apply_migrations(&mut conn).unwrap();
    dataserv_store::migrations::apply_migrations(&mut conn).unwrap();

    let applied = dataserv_store::migrations::applied_migrations(&conn).unwrap();
    assert_eq!(applied, vec!["001_farmers"]);
}

#[test]
fn test_checksum_recorded_for_each_migration() {
    let mut conn = setup_test_db();
    dataserv_store::migrations::apply_migrations(&mut conn).unwrap();

    let checksum: String = conn
        .query_row(
            "SELECT checksum FROM schema_version WHERE migration_id = '001_farmers'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(checksum.len(), 64);
    assert!(checksum.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn test_tampered_checksum_blocks_startup() {
    let mut conn = setup_test_db();
    dataserv_store::migrations::apply_migrations(&mut conn).unwrap();
    conn.execute("UPDATE schema_version SET checksum = 'deadbeef'", [])
        .unwrap();

    let err = dataserv_store::migrations::apply_migrations(&mut conn).unwrap_err();
    assert_eq!(err.kind(), dataserv_core::ExErrorKind::Persistence);
}

#[test]
fn test_address_is_primary_key() {
    let mut conn = setup_test_db();
    dataserv_store::migrations::apply_migrations(&mut conn).unwrap();

    conn.execute(
        "INSERT INTO farmers (address, last_seen, last_audit) VALUES ('1a', 0, 0)",
        [],
    )
    .unwrap();
    let dup = conn.execute(
        "INSERT INTO farmers (address, last_seen, last_audit) VALUES ('1a', 1, 1)",
        [],
    );
    assert!(dup.is_err());
}
