//! Execution of a pending command against the catalog.
//!
//! ## Pipeline
//! 1. Load the command; it must be pending
//! 2. Parse its system command (a merge carries several)
//! 3. Check a locator is configured if any command needs one
//! 4. Run every statement and mark the command executed in one
//!    transaction; a non-zero sentinel rolls the whole command back and
//!    marks it failed
//! 5. Run the locator once per system command carrying arguments; the
//!    output file collects every run of this execution

#![allow(clippy::result_large_err)]

use crate::locator::{run_locator, LocatorConfig, OutputMode};
use seiscat_core::errors::{ExError, ExErrorKind};
use seiscat_core::executor::run_statements;
use seiscat_core::model::records::parse_system_commands;
use seiscat_core::SystemCommand;
use seiscat_store::errors::{from_rusqlite, Result};
use seiscat_store::{CommandRepo, CommandStatus, SqliteStatementExecutor};
use rusqlite::Connection;

const OP_EXECUTE: &str = "execute_command";

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct ExecuteResult {
    pub command_id: i64,
    pub statements_run: usize,
    /// Locator stdout, one entry per locator run
    pub locator_output: Vec<Vec<String>>,
}

/// Execute pending command `command_id`.
///
/// # Errors
///
/// - `NotFound` / `NotPending` for a missing or already handled command
/// - `Parse` when the stored system command cannot be read (command marked failed)
/// - `Config` when locator arguments are present but no locator is configured
/// - `StatementFailed` / `UnknownStatement` / `InvalidInput` when a
///   statement fails (command marked failed, catalog unchanged)
/// - `ExternalProcess` when the locator fails after the statements committed
pub fn execute_command(
    conn: &mut Connection,
    command_id: i64,
    locator: Option<&LocatorConfig>,
) -> Result<ExecuteResult> {
    let stored = CommandRepo::require_pending(conn, command_id)?;

    let commands = match parse_system_commands(&stored.system_command) {
        Ok(commands) => commands,
        Err(e) => {
            tracing::error!(op = OP_EXECUTE, command_id, error = %e, "unreadable system command");
            CommandRepo::mark_outcome(conn, command_id, CommandStatus::Failed)?;
            return Err(ExError::from(e)
                .with_op(OP_EXECUTE)
                .with_command_id(command_id));
        }
    };

    let needs_locator = commands.iter().any(|c| !c.locator_arg_str.trim().is_empty());
    if needs_locator && locator.is_none() {
        return Err(ExError::new(ExErrorKind::Config)
            .with_op(OP_EXECUTE)
            .with_command_id(command_id)
            .with_message("command has locator arguments but no locator is configured"));
    }

    let statements_run = match run_in_transaction(conn, command_id, &commands) {
        Ok(count) => count,
        Err(e) => {
            tracing::warn!(op = OP_EXECUTE, command_id, error = %e, "command rolled back");
            CommandRepo::mark_outcome(conn, command_id, CommandStatus::Failed)?;
            return Err(e.with_op(OP_EXECUTE).with_command_id(command_id));
        }
    };

    let mut locator_output = Vec::new();
    if let Some(config) = locator {
        let runs = commands.iter().filter(|c| !c.locator_arg_str.trim().is_empty());
        for (index, command) in runs.enumerate() {
            let mode = if index == 0 {
                OutputMode::Replace
            } else {
                OutputMode::Append
            };
            let lines = run_locator(config, command.id, &command.locator_arg_str, mode)
                .map_err(|e| e.with_command_id(command_id))?;
            locator_output.push(lines);
        }
    }

    Ok(ExecuteResult {
        command_id,
        statements_run,
        locator_output,
    })
}

/// Run every statement of `commands`; nothing is kept unless all succeed
fn run_in_transaction(
    conn: &mut Connection,
    command_id: i64,
    commands: &[SystemCommand],
) -> Result<usize> {
    let tx = conn.transaction().map_err(from_rusqlite)?;
    let mut count = 0;
    {
        let executor = SqliteStatementExecutor::new(&tx);
        for command in commands {
            count += run_statements(&executor, command.statements())
                .map_err(|e| ExError::from(e).with_target_id(command.id))?;
        }
    }
    CommandRepo::mark_outcome(&tx, command_id, CommandStatus::Executed)?;
    tx.commit().map_err(from_rusqlite)?;
    Ok(count)
}
