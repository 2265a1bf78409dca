use rusqlite::Connection;
use seiscat_store::migrations::{applied_migrations, apply_migrations};

fn tables(conn: &Connection) -> Vec<String> {
    conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .map(|name| name.unwrap())
        .collect()
}

#[test]
fn test_fresh_database_gets_history_and_catalog_tables() {
    let mut conn = Connection::open_in_memory().unwrap();
    apply_migrations(&mut conn).unwrap();

    let tables = tables(&conn);
    for name in [
        "command_history",
        "events",
        "hypocentres",
        "phases",
        "schema_version",
    ] {
        assert!(tables.iter().any(|t| t == name), "no table {name}: {tables:?}");
    }
}

#[test]
fn test_second_run_applies_nothing() {
    let mut conn = Connection::open_in_memory().unwrap();
    apply_migrations(&mut conn).unwrap();
    apply_migrations(&mut conn).unwrap();

    assert_eq!(
        applied_migrations(&conn).unwrap(),
        vec!["001_command_history", "002_catalog"]
    );
}

#[test]
fn test_reopened_file_keeps_its_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".seiscat").join("catalog.db");

    apply_migrations(&mut seiscat_store::db::open(&path).unwrap()).unwrap();

    let mut conn = seiscat_store::db::open(&path).unwrap();
    apply_migrations(&mut conn).unwrap();
    assert_eq!(applied_migrations(&conn).unwrap().len(), 2);
}
