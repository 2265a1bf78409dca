//! SQLite implementation of the store-side operations
//!
//! Each operation reports a sentinel instead of failing outright, so a
//! command that is well formed but not applicable to the current catalog
//! state fails the surrounding transaction without being an error.
//!
//! | Sentinel | Meaning |
//! |---|---|
//! | 0 | applied |
//! | 1 | target row not found |
//! | 2 | rejected by catalog rules (prime hypocentre, wrong event) |
//! | 3 | field not editable |

use rusqlite::types::Value as SqlValue;
use rusqlite::{Connection, OptionalExtension};
use seiscat_core::{ExecutableStatement, Result, SeisCatError, StatementExecutor};
use serde_json::Value;

pub const SENTINEL_OK: i64 = 0;
pub const SENTINEL_NOT_FOUND: i64 = 1;
pub const SENTINEL_REJECTED: i64 = 2;
pub const SENTINEL_NOT_EDITABLE: i64 = 3;

/// Storage class an editable column accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Real,
    Integer,
    /// NOT NULL 0/1 column; takes a boolean or 0/1
    Flag,
    Text,
}

impl ColumnKind {
    /// Bound value for `value`, or `None` when the column cannot hold it
    fn bind(self, value: &Value) -> Option<SqlValue> {
        match (self, value) {
            (ColumnKind::Flag, Value::Bool(b)) => Some(SqlValue::Integer(i64::from(*b))),
            (ColumnKind::Flag, Value::Number(n)) => match n.as_i64() {
                Some(i @ (0 | 1)) => Some(SqlValue::Integer(i)),
                _ => None,
            },
            (ColumnKind::Flag, _) => None,
            (_, Value::Null) => Some(SqlValue::Null),
            (ColumnKind::Real, Value::Number(n)) => n.as_f64().map(SqlValue::Real),
            (ColumnKind::Integer, Value::Number(n)) => n.as_i64().map(SqlValue::Integer),
            (ColumnKind::Text, Value::String(s)) => Some(SqlValue::Text(s.clone())),
            _ => None,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            ColumnKind::Real => "a number or null",
            ColumnKind::Integer => "an integer or null",
            ColumnKind::Flag => "a boolean or 0/1",
            ColumnKind::Text => "a string or null",
        }
    }
}

/// Catalog table whose whitelisted columns analysts may edit
struct EditableTable {
    table: &'static str,
    key: &'static str,
    /// Extra WHERE clause selecting rows that may still be edited
    live: &'static str,
    fields: &'static [(&'static str, ColumnKind)],
}

const HYPOCENTRES: EditableTable = EditableTable {
    table: "hypocentres",
    key: "hypid",
    live: " AND deprecated = 0",
    fields: &[
        ("depth", ColumnKind::Real),
        ("time", ColumnKind::Text),
        ("lat", ColumnKind::Real),
        ("lon", ColumnKind::Real),
        ("fix_depth", ColumnKind::Flag),
        ("nass", ColumnKind::Integer),
        ("ndef", ColumnKind::Integer),
        ("sdobs", ColumnKind::Real),
    ],
};

const PHASES: EditableTable = EditableTable {
    table: "phases",
    key: "phid",
    live: "",
    fields: &[
        ("phase", ColumnKind::Text),
        ("nondef", ColumnKind::Flag),
        ("timedef", ColumnKind::Flag),
        ("azimdef", ColumnKind::Flag),
        ("slowdef", ColumnKind::Flag),
        ("putative", ColumnKind::Flag),
    ],
};

/// Executes statements against the catalog tables of one connection
///
/// Callers own the transaction; the executor only issues statements.
pub struct SqliteStatementExecutor<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteStatementExecutor<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    fn event_exists(&self, evid: i64) -> Result<bool> {
        self.exists("SELECT 1 FROM events WHERE evid = ?1", evid)
    }

    fn exists(&self, sql: &str, id: i64) -> Result<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(sql, [id], |row| row.get(0))
            .optional()
            .map_err(storage)?;
        Ok(found.is_some())
    }

    /// Event a live hypocentre belongs to and whether it is that event's prime
    fn hypocentre_owner(&self, hypid: i64) -> Result<Option<(i64, bool)>> {
        self.conn
            .query_row(
                "SELECT h.evid, COALESCE(e.prime_hypid = h.hypid, 0)
                 FROM hypocentres h LEFT JOIN events e ON e.evid = h.evid
                 WHERE h.hypid = ?1 AND h.deprecated = 0",
                [hypid],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .map_err(storage)
    }

    fn set_event_flag(&self, evid: i64, column: &'static str, value: bool) -> Result<i64> {
        let changed = self
            .conn
            .execute(
                &format!("UPDATE events SET {} = ?1 WHERE evid = ?2", column),
                rusqlite::params![value, evid],
            )
            .map_err(storage)?;
        Ok(if changed == 0 {
            SENTINEL_NOT_FOUND
        } else {
            SENTINEL_OK
        })
    }

    fn set_prime(&self, evid: i64, hypid: i64) -> Result<i64> {
        if !self.event_exists(evid)? {
            return Ok(SENTINEL_NOT_FOUND);
        }
        match self.hypocentre_owner(hypid)? {
            None => Ok(SENTINEL_NOT_FOUND),
            Some((owner, _)) if owner != evid => Ok(SENTINEL_REJECTED),
            Some(_) => {
                self.conn
                    .execute(
                        "UPDATE events SET prime_hypid = ?1 WHERE evid = ?2",
                        [hypid, evid],
                    )
                    .map_err(storage)?;
                Ok(SENTINEL_OK)
            }
        }
    }

    fn move_hypocentre(&self, hypid: i64, evid: i64) -> Result<i64> {
        if !self.event_exists(evid)? {
            return Ok(SENTINEL_NOT_FOUND);
        }
        match self.hypocentre_owner(hypid)? {
            None => Ok(SENTINEL_NOT_FOUND),
            Some((_, true)) => Ok(SENTINEL_REJECTED),
            Some(_) => {
                self.reassign(hypid, evid)?;
                Ok(SENTINEL_OK)
            }
        }
    }

    fn delete_hypocentre(&self, hypid: i64) -> Result<i64> {
        match self.hypocentre_owner(hypid)? {
            None => Ok(SENTINEL_NOT_FOUND),
            Some((_, true)) => Ok(SENTINEL_REJECTED),
            Some(_) => {
                self.conn
                    .execute(
                        "UPDATE hypocentres SET deprecated = 1 WHERE hypid = ?1",
                        [hypid],
                    )
                    .map_err(storage)?;
                Ok(SENTINEL_OK)
            }
        }
    }

    /// Split a non-prime hypocentre into a new event it is prime of
    fn create_event(&self, hypid: i64) -> Result<i64> {
        match self.hypocentre_owner(hypid)? {
            None => Ok(SENTINEL_NOT_FOUND),
            Some((_, true)) => Ok(SENTINEL_REJECTED),
            Some(_) => {
                let evid: i64 = self
                    .conn
                    .query_row("SELECT COALESCE(MAX(evid), 0) + 1 FROM events", [], |row| {
                        row.get(0)
                    })
                    .map_err(storage)?;
                self.conn
                    .execute(
                        "INSERT INTO events (evid, prime_hypid) VALUES (?1, ?2)",
                        [evid, hypid],
                    )
                    .map_err(storage)?;
                self.reassign(hypid, evid)?;
                tracing::debug!(op = "create_event", hypid, evid, "created event");
                Ok(SENTINEL_OK)
            }
        }
    }

    /// Move a hypocentre and its associated phases to `evid`
    fn reassign(&self, hypid: i64, evid: i64) -> Result<()> {
        self.conn
            .execute(
                "UPDATE hypocentres SET evid = ?1 WHERE hypid = ?2",
                [evid, hypid],
            )
            .map_err(storage)?;
        self.conn
            .execute("UPDATE phases SET evid = ?1 WHERE hypid = ?2", [evid, hypid])
            .map_err(storage)?;
        Ok(())
    }

    /// Set one whitelisted column of a live row
    ///
    /// A value the column cannot hold is an error, not a sentinel.
    fn edit_field(&self, target: &EditableTable, statement: &ExecutableStatement) -> Result<i64> {
        expect_arity(statement, 3)?;
        let id = int_param(statement, 0)?;
        let field = text_param(statement, 1)?;
        let Some((column, kind)) = target.fields.iter().find(|(c, _)| *c == field) else {
            return Ok(SENTINEL_NOT_EDITABLE);
        };
        let value = kind.bind(&statement.params[2]).ok_or_else(|| {
            invalid(
                statement,
                format!("{} takes {}, got {}", column, kind.describe(), statement.params[2]),
            )
        })?;
        let changed = self
            .conn
            .execute(
                &format!(
                    "UPDATE {} SET {} = ?1 WHERE {} = ?2{}",
                    target.table, column, target.key, target.live
                ),
                rusqlite::params![value, id],
            )
            .map_err(storage)?;
        Ok(if changed == 0 {
            SENTINEL_NOT_FOUND
        } else {
            SENTINEL_OK
        })
    }
}

impl StatementExecutor for SqliteStatementExecutor<'_> {
    fn execute(&self, statement: &ExecutableStatement) -> Result<i64> {
        let sentinel = match statement.name.as_str() {
            "set_prime" => {
                expect_arity(statement, 2)?;
                self.set_prime(int_param(statement, 0)?, int_param(statement, 1)?)?
            }
            "banish_event" => {
                expect_arity(statement, 1)?;
                self.set_event_flag(int_param(statement, 0)?, "banished", true)?
            }
            "unbanish_event" => {
                expect_arity(statement, 1)?;
                self.set_event_flag(int_param(statement, 0)?, "banished", false)?
            }
            "move_hypocentre" => {
                expect_arity(statement, 2)?;
                self.move_hypocentre(int_param(statement, 0)?, int_param(statement, 1)?)?
            }
            "delete_hypocentre" => {
                expect_arity(statement, 1)?;
                self.delete_hypocentre(int_param(statement, 0)?)?
            }
            "create_event" => {
                expect_arity(statement, 1)?;
                self.create_event(int_param(statement, 0)?)?
            }
            "edit_hypocentre" => self.edit_field(&HYPOCENTRES, statement)?,
            "edit_phase" => self.edit_field(&PHASES, statement)?,
            "assess_event" => {
                expect_arity(statement, 1)?;
                self.set_event_flag(int_param(statement, 0)?, "assessed", true)?
            }
            "commit_event" => {
                expect_arity(statement, 1)?;
                self.set_event_flag(int_param(statement, 0)?, "committed", true)?
            }
            other => {
                return Err(SeisCatError::UnknownStatement {
                    name: other.to_string(),
                })
            }
        };

        tracing::debug!(
            op = "execute_statement",
            statement = %statement,
            sentinel,
            "statement executed"
        );
        Ok(sentinel)
    }
}

fn storage(err: rusqlite::Error) -> SeisCatError {
    SeisCatError::Storage {
        message: err.to_string(),
    }
}

fn invalid(statement: &ExecutableStatement, reason: String) -> SeisCatError {
    SeisCatError::InvalidStatementParams {
        statement: statement.name.clone(),
        reason,
    }
}

fn expect_arity(statement: &ExecutableStatement, arity: usize) -> Result<()> {
    if statement.params.len() == arity {
        Ok(())
    } else {
        Err(invalid(
            statement,
            format!("expected {} parameter(s), got {}", arity, statement.params.len()),
        ))
    }
}

fn int_param(statement: &ExecutableStatement, index: usize) -> Result<i64> {
    statement.params[index]
        .as_i64()
        .ok_or_else(|| invalid(statement, format!("parameter {} must be an integer", index + 1)))
}

fn text_param(statement: &ExecutableStatement, index: usize) -> Result<&str> {
    statement.params[index]
        .as_str()
        .ok_or_else(|| invalid(statement, format!("parameter {} must be a string", index + 1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_column_kinds_bind_only_matching_values() {
        assert_eq!(ColumnKind::Real.bind(&json!(33)), Some(SqlValue::Real(33.0)));
        assert_eq!(ColumnKind::Real.bind(&json!(null)), Some(SqlValue::Null));
        assert_eq!(ColumnKind::Real.bind(&json!("deep")), None);
        assert_eq!(ColumnKind::Integer.bind(&json!(12)), Some(SqlValue::Integer(12)));
        assert_eq!(ColumnKind::Integer.bind(&json!(1.5)), None);
        assert_eq!(ColumnKind::Flag.bind(&json!(true)), Some(SqlValue::Integer(1)));
        assert_eq!(ColumnKind::Flag.bind(&json!(0)), Some(SqlValue::Integer(0)));
        assert_eq!(ColumnKind::Flag.bind(&json!(2)), None);
        assert_eq!(ColumnKind::Flag.bind(&json!(null)), None);
        assert_eq!(ColumnKind::Flag.bind(&json!("yes")), None);
        assert_eq!(
            ColumnKind::Text.bind(&json!("Pn")),
            Some(SqlValue::Text("Pn".to_string()))
        );
        assert_eq!(ColumnKind::Text.bind(&json!(5)), None);
    }

    #[test]
    fn test_arity_is_checked() {
        let conn = Connection::open_in_memory().unwrap();
        let exec = SqliteStatementExecutor::new(&conn);
        let err = exec
            .execute(&ExecutableStatement::new("set_prime").param(1))
            .unwrap_err();
        assert!(matches!(err, SeisCatError::InvalidStatementParams { .. }));
    }

    #[test]
    fn test_unknown_statement() {
        let conn = Connection::open_in_memory().unwrap();
        let exec = SqliteStatementExecutor::new(&conn);
        let err = exec
            .execute(&ExecutableStatement::new("drop_everything"))
            .unwrap_err();
        assert_eq!(
            err,
            SeisCatError::UnknownStatement {
                name: "drop_everything".to_string()
            }
        );
    }
}
