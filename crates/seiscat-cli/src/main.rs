//! SeisCat CLI
//!
//! Command-line interface for recording, merging and executing analyst
//! edits to a seismic catalog.

use clap::{Parser, Subcommand};
use seiscat_core::logging_facility::{init, Profile};
use std::path::PathBuf;

mod commands;
mod config;

#[derive(Debug, Parser)]
#[command(name = "seiscat")]
#[command(about = "SeisCat - Seismic catalog command history", long_about = None)]
struct Cli {
    /// Database path
    #[arg(long, global = true, default_value = ".seiscat/catalog.db")]
    db: PathBuf,

    /// Configuration file (missing file means defaults)
    #[arg(long, global = true, default_value = ".seiscat/config.toml")]
    config: PathBuf,

    /// Analyst name recorded with new commands (overrides the config file)
    #[arg(long, global = true)]
    analyst: Option<String>,

    /// Emit JSON structured logs
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create the database and apply migrations
    Init,
    /// Build and submit a pending command
    Record(commands::record::RecordArgs),
    /// List stored commands
    History(commands::history::HistoryArgs),
    /// Render a stored command's provenance
    Render(commands::render::RenderArgs),
    /// Merge pending commands into one batch
    Merge(commands::merge::MergeArgs),
    /// Execute a pending command
    Execute(commands::execute::ExecuteArgs),
    /// Select an event and list its pending commands
    Select(commands::select::SelectArgs),
}

fn main() {
    let cli = Cli::parse();

    init(if cli.json_logs {
        Profile::Production
    } else {
        Profile::Development
    });

    let result = config::Settings::load(&cli.config).and_then(|mut settings| {
        if let Some(analyst) = cli.analyst {
            settings.analyst = analyst;
        }
        let ctx = commands::Context {
            db: cli.db,
            settings,
        };
        match cli.command {
            Commands::Init => commands::init::execute(&ctx),
            Commands::Record(args) => commands::record::execute(args, &ctx),
            Commands::History(args) => commands::history::execute(args, &ctx),
            Commands::Render(args) => commands::render::execute(args, &ctx),
            Commands::Merge(args) => commands::merge::execute(args, &ctx),
            Commands::Execute(args) => commands::execute::execute(args, &ctx),
            Commands::Select(args) => commands::select::execute(args, &ctx),
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
