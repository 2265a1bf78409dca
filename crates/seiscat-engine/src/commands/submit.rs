//! Submission of a built envelope to the command history.

#![allow(clippy::result_large_err)]

use seiscat_core::errors::ExError;
use seiscat_core::{CommandEnvelope, SeisCatError};
use seiscat_store::errors::Result;
use seiscat_store::CommandRepo;
use rusqlite::Connection;

/// Options for submitting a command.
#[derive(Debug, Clone, Default)]
pub struct SubmitOptions {
    /// Event the command belongs to; defaults to the envelope's target for
    /// event-level commands.
    pub evid: Option<i64>,
    pub analyst: String,
    /// Refuse envelopes that carry validation warnings
    pub strict: bool,
}

/// Result of a successful submission.
#[derive(Debug, Clone)]
pub struct SubmitResult {
    pub command_id: i64,
    /// Analyst-readable text stored with the command
    pub readable: String,
    pub warnings: Vec<String>,
}

/// Append `envelope` to the history as a pending command.
///
/// # Errors
///
/// - `NotDispatchable` when the envelope has no executable effect
/// - `ValidationRejected` in strict mode when warnings were raised
/// - `Persistence` on storage failure
pub fn submit_command(
    conn: &Connection,
    envelope: &CommandEnvelope,
    options: &SubmitOptions,
) -> Result<SubmitResult> {
    envelope.ensure_dispatchable().map_err(|e| {
        ExError::from(e)
            .with_op("submit_command")
            .with_target_id(envelope.target_id())
    })?;

    let warnings: Vec<String> = envelope.warnings().iter().map(|w| w.to_string()).collect();
    if options.strict && !warnings.is_empty() {
        return Err(ExError::from(SeisCatError::ValidationRejected { warnings })
            .with_op("submit_command")
            .with_target_id(envelope.target_id()));
    }

    let evid = options.evid.or_else(|| {
        matches!(envelope.data_type(), seiscat_core::DataType::SeisEvent)
            .then_some(envelope.target_id())
    });

    let command_id = CommandRepo::insert(conn, envelope, evid, &options.analyst)?;
    let stored = CommandRepo::require(conn, command_id)?;

    Ok(SubmitResult {
        command_id,
        readable: stored.readable,
        warnings,
    })
}
