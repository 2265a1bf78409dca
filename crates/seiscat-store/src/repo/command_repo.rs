//! Command history repository
//!
//! Each row keeps both serialized halves of an envelope in the canonical
//! array shape, plus the analyst-readable text rendered at insert time.

#![allow(clippy::result_large_err)]

use crate::errors::{command_not_found, from_rusqlite, not_pending, Result};
use seiscat_core::model::records::to_canonical_json;
use seiscat_core::render::render_provenance;
use seiscat_core::{CommandEnvelope, CommandType, DataType, ExError, MergeSource};
use rusqlite::{Connection, OptionalExtension, Row};

/// Lifecycle of a stored command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Pending,
    Executed,
    Failed,
    /// Folded into a later merge command
    Merged,
}

impl CommandStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandStatus::Pending => "pending",
            CommandStatus::Executed => "executed",
            CommandStatus::Failed => "failed",
            CommandStatus::Merged => "merged",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "pending" => Some(CommandStatus::Pending),
            "executed" => Some(CommandStatus::Executed),
            "failed" => Some(CommandStatus::Failed),
            "merged" => Some(CommandStatus::Merged),
            _ => None,
        }
    }
}

impl std::fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the command history
#[derive(Debug, Clone, PartialEq)]
pub struct StoredCommand {
    pub id: i64,
    pub command_type: CommandType,
    pub data_type: DataType,
    pub target_id: i64,
    pub evid: Option<i64>,
    pub agency: String,
    pub analyst: String,
    pub system_command: String,
    pub provenance: String,
    pub readable: String,
    pub status: CommandStatus,
    pub merged_into: Option<i64>,
    pub created_at: i64,
    pub executed_at: Option<i64>,
}

impl StoredCommand {
    pub fn to_merge_source(&self) -> MergeSource {
        MergeSource {
            command_id: self.id,
            system_command: self.system_command.clone(),
            provenance: self.provenance.clone(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == CommandStatus::Pending
    }
}

/// Row filter for history listings
#[derive(Debug, Clone, Copy, Default)]
pub struct HistoryFilter {
    pub status: Option<CommandStatus>,
    pub evid: Option<i64>,
}

const SELECT_COLUMNS: &str = "SELECT id, command_type, data_type, target_id, evid, agency, analyst,
        system_command, provenance, readable, status, merged_into, created_at, executed_at
     FROM command_history";

fn row_to_command(row: &Row<'_>) -> rusqlite::Result<StoredCommand> {
    let status: String = row.get(10)?;
    let status = CommandStatus::parse(&status).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            10,
            rusqlite::types::Type::Text,
            format!("unknown command status '{}'", status).into(),
        )
    })?;
    Ok(StoredCommand {
        id: row.get(0)?,
        command_type: CommandType::parse(&row.get::<_, String>(1)?),
        data_type: DataType::parse(&row.get::<_, String>(2)?),
        target_id: row.get(3)?,
        evid: row.get(4)?,
        agency: row.get(5)?,
        analyst: row.get(6)?,
        system_command: row.get(7)?,
        provenance: row.get(8)?,
        readable: row.get(9)?,
        status,
        merged_into: row.get(11)?,
        created_at: row.get(12)?,
        executed_at: row.get(13)?,
    })
}

/// SQLite repository for the command history
pub struct CommandRepo;

impl CommandRepo {
    /// Append a pending command and return its history id
    ///
    /// `evid` is the event the command belongs to, used to list an event's
    /// pending work; it may differ from the envelope's target id.
    pub fn insert(
        conn: &Connection,
        envelope: &CommandEnvelope,
        evid: Option<i64>,
        analyst: &str,
    ) -> Result<i64> {
        let provenance_record = envelope.to_provenance_record();
        let system_command = to_canonical_json(&[envelope.to_system_command()])
            .map_err(ExError::from)?;
        let provenance = to_canonical_json(std::slice::from_ref(&provenance_record))
            .map_err(ExError::from)?;
        let readable = render_provenance(&provenance_record);

        conn.execute(
            "INSERT INTO command_history
                (command_type, data_type, target_id, evid, agency, analyst,
                 system_command, provenance, readable, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 'pending', ?10)",
            rusqlite::params![
                envelope.command_type().as_str(),
                envelope.data_type().as_str(),
                envelope.target_id(),
                evid,
                envelope.agency(),
                analyst,
                system_command,
                provenance,
                readable,
                chrono::Utc::now().timestamp(),
            ],
        )
        .map_err(from_rusqlite)?;

        Ok(conn.last_insert_rowid())
    }

    /// Get a command by id
    pub fn get(conn: &Connection, id: i64) -> Result<Option<StoredCommand>> {
        conn.query_row(
            &format!("{} WHERE id = ?1", SELECT_COLUMNS),
            [id],
            row_to_command,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// Get a command by id, failing with NotFound if absent
    pub fn require(conn: &Connection, id: i64) -> Result<StoredCommand> {
        Self::get(conn, id)?.ok_or_else(|| command_not_found(id))
    }

    /// Get a command that must still be pending
    pub fn require_pending(conn: &Connection, id: i64) -> Result<StoredCommand> {
        let cmd = Self::require(conn, id)?;
        if !cmd.is_pending() {
            return Err(not_pending(id, cmd.status.as_str()));
        }
        Ok(cmd)
    }

    /// List commands in insertion order
    pub fn list(conn: &Connection, filter: &HistoryFilter) -> Result<Vec<StoredCommand>> {
        let sql = format!(
            "{} WHERE (?1 IS NULL OR status = ?1) AND (?2 IS NULL OR evid = ?2) ORDER BY id",
            SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql).map_err(from_rusqlite)?;
        let rows = stmt
            .query_map(
                rusqlite::params![filter.status.map(|s| s.as_str()), filter.evid],
                row_to_command,
            )
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(rows)
    }

    /// Mark pending commands as folded into `merged_into`
    pub fn mark_merged(conn: &Connection, ids: &[i64], merged_into: i64) -> Result<()> {
        for &id in ids {
            let changed = conn
                .execute(
                    "UPDATE command_history SET status = 'merged', merged_into = ?1
                     WHERE id = ?2 AND status = 'pending'",
                    rusqlite::params![merged_into, id],
                )
                .map_err(from_rusqlite)?;
            if changed == 0 {
                let current = Self::require(conn, id)?;
                return Err(not_pending(id, current.status.as_str()));
            }
        }
        Ok(())
    }

    /// Record the outcome of executing a pending command
    pub fn mark_outcome(conn: &Connection, id: i64, status: CommandStatus) -> Result<()> {
        let changed = conn
            .execute(
                "UPDATE command_history SET status = ?1, executed_at = ?2
                 WHERE id = ?3 AND status = 'pending'",
                rusqlite::params![status.as_str(), chrono::Utc::now().timestamp(), id],
            )
            .map_err(from_rusqlite)?;
        if changed == 0 {
            let current = Self::require(conn, id)?;
            return Err(not_pending(id, current.status.as_str()));
        }
        Ok(())
    }
}
