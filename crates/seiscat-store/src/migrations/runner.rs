#![allow(clippy::result_large_err)]

use crate::errors::{checksum_mismatch, from_rusqlite, migration_error, Result};
use crate::migrations::checksums::compute_checksum;
use crate::migrations::embedded::{Migration, MIGRATIONS};
use rusqlite::Connection;
use std::collections::HashMap;

const SCHEMA_VERSION_DDL: &str = "CREATE TABLE IF NOT EXISTS schema_version (
    id           INTEGER PRIMARY KEY,
    migration_id TEXT    NOT NULL UNIQUE,
    applied_at   INTEGER NOT NULL,
    checksum     TEXT    NOT NULL
)";

/// Bring the schema up to date
///
/// # Errors
///
/// `Persistence` when a migration fails, a recorded checksum differs from
/// the embedded SQL, or the database records an unknown migration.
pub fn apply_migrations(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(SCHEMA_VERSION_DDL)
        .map_err(from_rusqlite)?;

    let recorded = recorded_checksums(conn)?;
    if let Some(unknown) = recorded
        .keys()
        .find(|id| !MIGRATIONS.iter().any(|m| m.id == id.as_str()))
    {
        return Err(migration_error(
            unknown,
            "recorded in the database but unknown to this build",
        ));
    }

    for migration in MIGRATIONS {
        let checksum = compute_checksum(migration.sql);
        match recorded.get(migration.id) {
            Some(existing) if *existing != checksum => {
                return Err(checksum_mismatch(migration.id, existing, &checksum));
            }
            Some(_) => {}
            None => apply_one(conn, migration, &checksum)?,
        }
    }
    Ok(())
}

/// Ids of the migrations recorded as applied, in application order
pub fn applied_migrations(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT migration_id FROM schema_version ORDER BY id")
        .map_err(from_rusqlite)?;
    let ids = stmt
        .query_map([], |row| row.get(0))
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<String>, _>>()
        .map_err(from_rusqlite)?;
    Ok(ids)
}

fn recorded_checksums(conn: &Connection) -> Result<HashMap<String, String>> {
    let mut stmt = conn
        .prepare("SELECT migration_id, checksum FROM schema_version")
        .map_err(from_rusqlite)?;
    let rows = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<HashMap<String, String>, _>>()
        .map_err(from_rusqlite)?;
    Ok(rows)
}

fn apply_one(conn: &mut Connection, migration: &Migration, checksum: &str) -> Result<()> {
    let tx = conn.transaction().map_err(from_rusqlite)?;
    tx.execute_batch(migration.sql)
        .map_err(|e| migration_error(migration.id, &e.to_string()))?;
    tx.execute(
        "INSERT INTO schema_version (migration_id, applied_at, checksum) VALUES (?1, ?2, ?3)",
        rusqlite::params![migration.id, chrono::Utc::now().timestamp(), checksum],
    )
    .map_err(from_rusqlite)?;
    tx.commit().map_err(from_rusqlite)?;

    tracing::debug!(op = "migration", migration_id = migration.id, "applied");
    Ok(())
}
