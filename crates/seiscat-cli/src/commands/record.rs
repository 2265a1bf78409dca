//! Record command
//!
//! Usage: seiscat record <COMMAND_TYPE> --data-type <TYPE> --id <ID>
//!            [--agency A] [--evid E] [--edit name=new[|old]]...
//!            [--attr name=new[|old]]... [--stmt name[:p1,p2]]...
//!            [--loc token]... [--strict]

use super::{CliResult, Context};
use clap::Args;
use seiscat_core::core_types::RequestContext;
use seiscat_core::{CommandEnvelope, ExecutableStatement};
use seiscat_engine::commands::submit::SubmitOptions;
use seiscat_engine::{apply_engine_command, EngineCommand, EngineCommandResult};
use serde_json::Value;

#[derive(Debug, Args)]
pub struct RecordArgs {
    /// Command type (e.g. hypocentreedit, setprime, seiseventrelocate)
    pub command_type: String,

    /// Data type of the target (seisevent, hypocentre, phase)
    #[arg(long)]
    pub data_type: String,

    /// Target id (evid, hypid or phid)
    #[arg(long)]
    pub id: i64,

    /// Agency (default: configured default_agency)
    #[arg(long)]
    pub agency: Option<String>,

    /// Event the command belongs to
    #[arg(long)]
    pub evid: Option<i64>,

    /// Field edit recorded as attribute plus edit statement
    #[arg(long = "edit", value_name = "NAME=NEW[|OLD]")]
    pub edits: Vec<String>,

    /// Attribute change recorded in provenance only
    #[arg(long = "attr", value_name = "NAME=NEW[|OLD]")]
    pub attrs: Vec<String>,

    /// Executable statement
    #[arg(long = "stmt", value_name = "NAME[:P1,P2...]")]
    pub stmts: Vec<String>,

    /// Locator argument token
    #[arg(long = "loc")]
    pub locs: Vec<String>,

    /// Refuse the command if any validation warning is raised
    #[arg(long)]
    pub strict: bool,
}

/// Parse a command-line value: JSON if it parses, otherwise a string
fn parse_value(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Parse `name=new[|old]`
fn parse_change(arg: &str) -> Result<(String, Value, Option<Value>), String> {
    let (name, rest) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=NEW[|OLD], got '{}'", arg))?;
    let (new, old) = match rest.split_once('|') {
        Some((new, old)) => (new, Some(parse_value(old))),
        None => (rest, None),
    };
    Ok((name.trim().to_string(), parse_value(new), old))
}

/// Parse `name[:p1,p2...]`
fn parse_statement(arg: &str) -> ExecutableStatement {
    match arg.split_once(':') {
        Some((name, params)) => params
            .split(',')
            .filter(|p| !p.trim().is_empty())
            .fold(ExecutableStatement::new(name.trim()), |stmt, p| {
                stmt.param(parse_value(p.trim()))
            }),
        None => ExecutableStatement::new(arg.trim()),
    }
}

fn build_envelope(args: &RecordArgs, agency: String) -> Result<CommandEnvelope, String> {
    let mut envelope = CommandEnvelope::new(
        args.command_type.as_str(),
        args.data_type.as_str(),
        args.id,
        agency,
    );
    for arg in &args.edits {
        let (name, new, old) = parse_change(arg)?;
        envelope.record_field_edit(name, new, old);
    }
    for arg in &args.attrs {
        let (name, new, old) = parse_change(arg)?;
        envelope.add_attribute(name, Some(new), old);
    }
    for arg in &args.stmts {
        envelope.add_executable_statement(parse_statement(arg));
    }
    for token in &args.locs {
        envelope.add_locator_argument(token);
    }
    Ok(envelope)
}

pub fn execute(args: RecordArgs, ctx: &Context) -> CliResult {
    let envelope = build_envelope(&args, ctx.agency(args.agency.clone()))?;
    let mut conn = ctx.open_db()?;

    let cmd = EngineCommand::Submit {
        envelope,
        options: SubmitOptions {
            evid: args.evid,
            analyst: ctx.settings.analyst.clone(),
            strict: args.strict,
        },
    };
    if let EngineCommandResult::Submitted(result) =
        apply_engine_command(cmd, &mut conn, None, &RequestContext::new())?
    {
        for warning in &result.warnings {
            eprintln!("warning: {}", warning);
        }
        println!("✓ Recorded command {}: {}", result.command_id, result.readable);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_change_with_old_value() {
        let (name, new, old) = parse_change("depth=33|10").unwrap();
        assert_eq!(name, "depth");
        assert_eq!(new, json!(33));
        assert_eq!(old, Some(json!(10)));
    }

    #[test]
    fn test_parse_change_keeps_colons_in_values() {
        let (_, new, old) = parse_change("time=2020-01-01T10:00:00").unwrap();
        assert_eq!(new, json!("2020-01-01T10:00:00"));
        assert_eq!(old, None);
        assert!(parse_change("depth").is_err());
    }

    #[test]
    fn test_parse_statement() {
        let stmt = parse_statement("edit_phase:9001,phase,Pn");
        assert_eq!(stmt.to_string(), "edit_phase(9001, \"phase\", \"Pn\")");
        assert!(parse_statement("commit_event").params.is_empty());
    }
}
