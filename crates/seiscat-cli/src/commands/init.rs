//! Init command
//!
//! Usage: seiscat init

use super::{CliResult, Context};

pub fn execute(ctx: &Context) -> CliResult {
    let conn = ctx.open_db()?;
    let applied = seiscat_store::migrations::applied_migrations(&conn)?;
    println!(
        "✓ Initialized {} ({} migrations)",
        ctx.db.display(),
        applied.len()
    );
    Ok(())
}
