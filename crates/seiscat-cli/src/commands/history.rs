//! History command
//!
//! Usage: seiscat history [--status <STATUS>] [--evid <EVID>]

use super::{CliResult, Context};
use clap::Args;
use seiscat_store::{CommandRepo, CommandStatus, HistoryFilter};

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Only commands with this status (pending, executed, failed, merged)
    #[arg(long)]
    pub status: Option<String>,

    /// Only commands belonging to this event
    #[arg(long)]
    pub evid: Option<i64>,
}

pub fn execute(args: HistoryArgs, ctx: &Context) -> CliResult {
    let status = match args.status.as_deref() {
        Some(text) => Some(
            CommandStatus::parse(text).ok_or_else(|| format!("unknown status '{}'", text))?,
        ),
        None => None,
    };
    let conn = ctx.open_db()?;

    let commands = CommandRepo::list(
        &conn,
        &HistoryFilter {
            status,
            evid: args.evid,
        },
    )?;
    for cmd in commands {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            cmd.id, cmd.status, cmd.command_type, cmd.target_id, cmd.readable
        );
    }
    Ok(())
}
