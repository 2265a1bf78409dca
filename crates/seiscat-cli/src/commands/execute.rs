//! Execute command
//!
//! Usage: seiscat execute <ID>

use super::{CliResult, Context};
use clap::Args;
use seiscat_core::core_types::RequestContext;
use seiscat_engine::{apply_engine_command, EngineCommand, EngineCommandResult};

#[derive(Debug, Args)]
pub struct ExecuteArgs {
    /// History id of a pending command
    pub id: i64,
}

pub fn execute(args: ExecuteArgs, ctx: &Context) -> CliResult {
    let mut conn = ctx.open_db()?;

    if let EngineCommandResult::Executed(result) = apply_engine_command(
        EngineCommand::Execute {
            command_id: args.id,
        },
        &mut conn,
        ctx.settings.locator.as_ref(),
        &RequestContext::new(),
    )? {
        for line in result.locator_output.iter().flatten() {
            println!("{}", line);
        }
        println!(
            "✓ Executed command {} ({} statement(s))",
            result.command_id, result.statements_run
        );
    }
    Ok(())
}
