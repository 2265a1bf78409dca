//! Command merger
//!
//! Combines several stored commands, picked by the analyst in a given order,
//! into one `merge` envelope for batch execution (typically right before a
//! relocation). Statements and locator arguments are accumulated in
//! selection order; the provenance of the batch is a numbered summary of
//! each source's readable text.

use crate::envelope::CommandEnvelope;
use crate::errors::{Result, SeisCatError};
use crate::model::records::{parse_provenance_records, parse_system_commands};
use crate::model::{AttributeName, CommandType, DataType};
use crate::render::render_records;
use serde_json::Value;

const OP_MERGE: &str = "merge_commands";

/// Locator flag controlling the grid search stage
const GRIDSEARCH_ON: &str = "do_gridsearch=1";
const GRIDSEARCH_OFF: &str = "do_gridsearch=0";

/// One stored command selected for merging
#[derive(Debug, Clone, PartialEq)]
pub struct MergeSource {
    pub command_id: i64,
    /// Persisted system command text
    pub system_command: String,
    /// Persisted provenance text
    pub provenance: String,
}

/// Result of merging: the new envelope plus bookkeeping for the caller
#[derive(Debug, Clone)]
pub struct MergedCommand {
    envelope: CommandEnvelope,
    summary: String,
    consumed: Vec<i64>,
    skipped: Vec<i64>,
}

impl MergedCommand {
    pub fn envelope(&self) -> &CommandEnvelope {
        &self.envelope
    }

    pub fn into_envelope(self) -> CommandEnvelope {
        self.envelope
    }

    /// Numbered readable text of every merged source
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Source ids folded into the batch, in selection order
    pub fn consumed_ids(&self) -> &[i64] {
        &self.consumed
    }

    /// Source ids whose system command could not be parsed
    pub fn skipped_ids(&self) -> &[i64] {
        &self.skipped
    }
}

/// Merge `sources` into one envelope targeting event `evid`
///
/// A source whose system command cannot be parsed is logged and skipped;
/// its selection number is not reused. A source may itself be a previous
/// merge (an array of system commands); its elements are flattened.
///
/// # Errors
///
/// Returns `SeisCatError::EmptyMerge` if no source could be read.
pub fn merge_commands(sources: &[MergeSource], evid: i64, agency: &str) -> Result<MergedCommand> {
    let mut envelope = CommandEnvelope::new(CommandType::Merge, DataType::SeisEvent, evid, agency);
    let mut summary = String::new();
    let mut consumed = Vec::with_capacity(sources.len());
    let mut skipped = Vec::new();

    for (index, source) in sources.iter().enumerate() {
        let commands = match parse_system_commands(&source.system_command) {
            Ok(commands) => commands,
            Err(e) => {
                tracing::error!(
                    op = OP_MERGE,
                    command_id = source.command_id,
                    error = %e,
                    "skipping merge source with unreadable system command"
                );
                skipped.push(source.command_id);
                continue;
            }
        };

        for command in &commands {
            for stmt in command.statements() {
                envelope.add_executable_statement(stmt.clone());
            }
            envelope.add_locator_argument(&command.locator_arg_str);
        }

        match parse_provenance_records(&source.provenance) {
            Ok(records) => {
                summary.push_str(&format!("[{}] {}", index + 1, render_records(&records)));
            }
            Err(e) => {
                tracing::error!(
                    op = OP_MERGE,
                    command_id = source.command_id,
                    error = %e,
                    "merge source has unreadable provenance; omitted from summary"
                );
            }
        }

        consumed.push(source.command_id);
    }

    if consumed.is_empty() {
        return Err(SeisCatError::EmptyMerge {
            selected: sources.len(),
        });
    }

    let args = envelope.locator_arguments();
    if !args.contains(GRIDSEARCH_ON) && !args.contains(GRIDSEARCH_OFF) {
        envelope.add_locator_argument(GRIDSEARCH_OFF);
    }

    envelope.add_attribute(
        AttributeName::AnalystReadableCommand,
        Some(Value::String(summary.clone())),
        None,
    );

    tracing::debug!(
        op = OP_MERGE,
        target_id = evid,
        source_count = consumed.len(),
        statement_count = envelope.statements().len(),
        "merged commands"
    );

    Ok(MergedCommand {
        envelope,
        summary,
        consumed,
        skipped,
    })
}
