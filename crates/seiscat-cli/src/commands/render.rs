//! `seiscat render <ID> [--output FILE]`: analyst-readable text of a stored command

use super::{CliResult, Context};
use clap::Args;
use seiscat_core::render::render_provenance_json;
use seiscat_store::CommandRepo;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// History id of the command
    pub id: i64,

    /// Write the text to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn execute(args: RenderArgs, ctx: &Context) -> CliResult {
    let stored = CommandRepo::require(&ctx.open_db()?, args.id)?;
    let text = render_provenance_json(&stored.provenance)?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, &text)?;
            println!("Wrote command {} to {}", stored.id, path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}
