//! Store failures expressed as `ExError`

use seiscat_core::errors::{ExError, ExErrorKind};

pub type Result<T> = std::result::Result<T, ExError>;

fn persistence(op: &str, message: String) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op(op)
        .with_message(message)
}

pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    persistence("sqlite", err.to_string())
}

pub fn migration_error(migration_id: &str, reason: &str) -> ExError {
    persistence("migration", format!("{migration_id}: {reason}"))
}

/// The SQL embedded for `migration_id` no longer matches what was applied
pub fn checksum_mismatch(migration_id: &str, recorded: &str, embedded: &str) -> ExError {
    persistence(
        "migration_checksum",
        format!("{migration_id} was applied with checksum {recorded}, this build embeds {embedded}"),
    )
}

pub fn command_not_found(command_id: i64) -> ExError {
    ExError::new(ExErrorKind::NotFound)
        .with_op("load_command")
        .with_command_id(command_id)
        .with_message(format!("no command {command_id} in history"))
}

/// `status` is the stored status of a command that had to be pending
pub fn not_pending(command_id: i64, status: &str) -> ExError {
    ExError::new(ExErrorKind::NotPending)
        .with_command_id(command_id)
        .with_message(format!("command {command_id} is already {status}"))
}

pub fn io_error(op: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(op)
        .with_message(err.to_string())
}
