//! Operations acting on the analyst's current selection.

#![allow(clippy::result_large_err)]

use seiscat_core::SessionContext;
use seiscat_store::errors::Result;
use seiscat_store::{CommandRepo, CommandStatus, HistoryFilter, StoredCommand};
use rusqlite::Connection;

/// Pending commands of the selected event, oldest first.
///
/// Empty when no event is selected.
pub fn pending_for_selection(
    conn: &Connection,
    session: &SessionContext,
) -> Result<Vec<StoredCommand>> {
    let Some(evid) = session.selection().evid else {
        return Ok(Vec::new());
    };
    CommandRepo::list(
        conn,
        &HistoryFilter {
            status: Some(CommandStatus::Pending),
            evid: Some(evid),
        },
    )
}
