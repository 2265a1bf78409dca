//! Merge command
//!
//! Usage: seiscat merge <IDS>... --evid <EVID> [--agency <AGENCY>]

use super::{CliResult, Context};
use clap::Args;
use seiscat_core::core_types::RequestContext;
use seiscat_engine::commands::merge::MergeRequest;
use seiscat_engine::{apply_engine_command, EngineCommand, EngineCommandResult};

#[derive(Debug, Args)]
pub struct MergeArgs {
    /// History ids to merge, in order
    #[arg(required = true)]
    pub ids: Vec<i64>,

    /// Event the merged batch targets
    #[arg(long)]
    pub evid: i64,

    /// Agency (default: configured default_agency)
    #[arg(long)]
    pub agency: Option<String>,
}

pub fn execute(args: MergeArgs, ctx: &Context) -> CliResult {
    let mut conn = ctx.open_db()?;
    let request = MergeRequest {
        command_ids: args.ids,
        evid: args.evid,
        agency: ctx.agency(args.agency),
        analyst: ctx.settings.analyst.clone(),
    };

    if let EngineCommandResult::Merged(result) = apply_engine_command(
        EngineCommand::Merge(request),
        &mut conn,
        None,
        &RequestContext::new(),
    )? {
        for id in &result.skipped_ids {
            eprintln!("warning: command {} could not be read and was left pending", id);
        }
        println!(
            "✓ Merged {} command(s) into {}: {}",
            result.consumed_ids.len(),
            result.command_id,
            result.summary
        );
    }
    Ok(())
}
