//! Merging pending commands into one batch.

#![allow(clippy::result_large_err)]

use seiscat_core::errors::{ExError, ExErrorKind};
use seiscat_core::merge_commands;
use seiscat_store::errors::{from_rusqlite, Result};
use rusqlite::Connection;
use seiscat_store::CommandRepo;
use std::collections::HashSet;

/// Request to merge pending commands, in selection order.
#[derive(Debug, Clone)]
pub struct MergeRequest {
    pub command_ids: Vec<i64>,
    pub evid: i64,
    pub agency: String,
    pub analyst: String,
}

/// Result of a merge.
#[derive(Debug, Clone)]
pub struct MergeResult {
    /// History id of the new merge command
    pub command_id: i64,
    pub summary: String,
    /// Sources now marked as merged
    pub consumed_ids: Vec<i64>,
    /// Sources left pending because they could not be read
    pub skipped_ids: Vec<i64>,
}

/// Merge pending commands into a new pending merge command.
///
/// Inserting the merge and marking its sources happen in one transaction.
///
/// # Errors
///
/// - `InvalidInput` when the selection names a command twice
/// - `NotFound` / `NotPending` for a source that is missing or not pending
/// - `EmptyMerge` when no source could be read
/// - `Persistence` on storage failure
pub fn merge_pending(conn: &mut Connection, request: &MergeRequest) -> Result<MergeResult> {
    let mut seen = HashSet::with_capacity(request.command_ids.len());
    if let Some(dup) = request.command_ids.iter().find(|id| !seen.insert(**id)) {
        return Err(ExError::new(ExErrorKind::InvalidInput)
            .with_op("merge_pending")
            .with_command_id(*dup)
            .with_message(format!("command {} is selected more than once", dup)));
    }

    let sources = request
        .command_ids
        .iter()
        .map(|&id| CommandRepo::require_pending(conn, id).map(|c| c.to_merge_source()))
        .collect::<Result<Vec<_>>>()?;

    let merged = merge_commands(&sources, request.evid, &request.agency)
        .map_err(|e| ExError::from(e).with_op("merge_pending").with_target_id(request.evid))?;

    let tx = conn.transaction().map_err(from_rusqlite)?;
    let command_id =
        CommandRepo::insert(&tx, merged.envelope(), Some(request.evid), &request.analyst)?;
    CommandRepo::mark_merged(&tx, merged.consumed_ids(), command_id)?;
    tx.commit().map_err(from_rusqlite)?;

    Ok(MergeResult {
        command_id,
        summary: merged.summary().to_string(),
        consumed_ids: merged.consumed_ids().to_vec(),
        skipped_ids: merged.skipped_ids().to_vec(),
    })
}
