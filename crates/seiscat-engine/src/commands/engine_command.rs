//! Engine-level commands that touch the database or the locator.

#![allow(clippy::result_large_err)]

use crate::commands::execute::{execute_command, ExecuteResult};
use crate::commands::merge::{merge_pending, MergeRequest, MergeResult};
use crate::commands::submit::{submit_command, SubmitOptions, SubmitResult};
use crate::locator::LocatorConfig;
use seiscat_core::core_types::RequestContext;
use seiscat_core::{log_op_end, log_op_error, log_op_start, CommandEnvelope, ExError};
use seiscat_store::errors::Result;
use rusqlite::Connection;
use std::time::Instant;

/// Engine-level commands.
#[derive(Debug, Clone)]
pub enum EngineCommand {
    /// Append a built envelope to the history.
    Submit {
        envelope: CommandEnvelope,
        options: SubmitOptions,
    },
    /// Merge pending commands into one batch.
    Merge(MergeRequest),
    /// Execute a pending command.
    Execute { command_id: i64 },
}

impl EngineCommand {
    fn op(&self) -> &'static str {
        match self {
            EngineCommand::Submit { .. } => "submit_command",
            EngineCommand::Merge(_) => "merge_pending",
            EngineCommand::Execute { .. } => "execute_command",
        }
    }
}

/// Result of applying an engine command.
#[derive(Debug, Clone)]
pub enum EngineCommandResult {
    Submitted(SubmitResult),
    Merged(MergeResult),
    Executed(ExecuteResult),
}

/// Apply an engine command, logging its boundaries under `ctx`.
///
/// Errors are tagged with the request id of `ctx`.
pub fn apply_engine_command(
    cmd: EngineCommand,
    conn: &mut Connection,
    locator: Option<&LocatorConfig>,
    ctx: &RequestContext,
) -> Result<EngineCommandResult> {
    let op = cmd.op();
    let started = Instant::now();
    log_op_start!(op, request_id = ctx.request_id.as_str());

    let result = match cmd {
        EngineCommand::Submit { envelope, options } => {
            submit_command(conn, &envelope, &options).map(EngineCommandResult::Submitted)
        }
        EngineCommand::Merge(request) => {
            merge_pending(conn, &request).map(EngineCommandResult::Merged)
        }
        EngineCommand::Execute { command_id } => {
            execute_command(conn, command_id, locator).map(EngineCommandResult::Executed)
        }
    };

    let duration_ms = started.elapsed().as_millis() as u64;
    match result {
        Ok(result) => {
            log_op_end!(op, duration_ms = duration_ms, request_id = ctx.request_id.as_str());
            Ok(result)
        }
        Err(err) => {
            log_op_error!(op, err.clone(), duration_ms = duration_ms, request_id = ctx.request_id.as_str());
            let mut err: ExError = err.with_request_id(ctx.request_id.clone());
            if let Some(trace_id) = &ctx.trace_id {
                err = err.with_trace_id(trace_id.clone());
            }
            Err(err)
        }
    }
}
