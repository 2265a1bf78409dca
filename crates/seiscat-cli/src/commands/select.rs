//! Select command
//!
//! Usage: seiscat select <EVID> [--hypid <HYPID>]

use super::{CliResult, Context};
use clap::Args;
use seiscat_core::{Selection, SessionContext};
use seiscat_engine::commands::selection::pending_for_selection;

#[derive(Debug, Args)]
pub struct SelectArgs {
    /// Event to select
    pub evid: i64,

    /// Hypocentre to select within the event
    #[arg(long)]
    pub hypid: Option<i64>,
}

pub fn execute(args: SelectArgs, ctx: &Context) -> CliResult {
    let conn = ctx.open_db()?;
    let mut session = SessionContext::new(ctx.settings.analyst.clone());
    session.subscribe(Box::new(|_old: &Selection, new: &Selection| {
        match (new.evid, new.hypid) {
            (Some(evid), Some(hypid)) => println!("Selected event {} hypocentre {}", evid, hypid),
            (Some(evid), None) => println!("Selected event {}", evid),
            _ => println!("Selection cleared"),
        }
    }));

    session.select_event(args.evid);
    if let Some(hypid) = args.hypid {
        session.select_hypocentre(hypid);
    }

    let pending = pending_for_selection(&conn, &session)?;
    if pending.is_empty() {
        println!("No pending commands");
    }
    for cmd in pending {
        println!("{}\t{}\t{}", cmd.id, cmd.command_type, cmd.readable);
    }
    Ok(())
}
