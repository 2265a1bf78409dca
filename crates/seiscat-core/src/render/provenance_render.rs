//! Analyst-readable rendering of provenance records
//!
//! Pure and deterministic. Each command type has one rendering arm; types
//! without a dedicated arm (`assess`, `commit`, unrecognized text) fall back
//! to `"<commandType> <id> "`.

use crate::errors::Result;
use crate::model::attribute::display_value;
use crate::model::records::parse_provenance_records;
use crate::model::{AttributeName, AttributeRecord, CommandType, ProvenanceRecord};

/// Separator written after each record when rendering several
const BATCH_SEPARATOR: &str = "; ";

/// Render one provenance record
///
/// # Example
///
/// ```
/// use seiscat_core::model::{CommandType, DataType, ProvenanceRecord};
/// use seiscat_core::render::render_provenance;
///
/// let record = ProvenanceRecord {
///     command_type: CommandType::SeisEventBanish,
///     data_type: DataType::SeisEvent,
///     id: 12345,
///     agency: "ISC".to_string(),
///     attribute_array: None,
/// };
/// assert_eq!(render_provenance(&record), "Banish 12345 ");
/// ```
pub fn render_provenance(record: &ProvenanceRecord) -> String {
    let attrs = record.attributes();
    match &record.command_type {
        CommandType::SetPrime => format!("Setprime {} ", record.agency),
        CommandType::MoveHypocentre => format!("Move {} ", record.agency),
        CommandType::DeleteHypocentre => format!("Delete {} ", record.agency),
        CommandType::CreateEvent => format!("Create {} ", record.agency),
        CommandType::SeisEventBanish => format!("Banish {} ", record.id),
        CommandType::SeisEventUnbanish => format!("Unbanish {} ", record.id),
        CommandType::HypocentreEdit => {
            format!("Change {} {}", record.agency, render_attributes(attrs))
        }
        CommandType::PhaseEdit => format!("Change {} {}", record.id, render_attributes(attrs)),
        CommandType::SeisEventRelocate => {
            format!("Relocate {} {}", record.agency, render_attributes(attrs))
        }
        CommandType::Merge => format!("Merge {}", render_merge_attributes(attrs)),
        CommandType::Assess | CommandType::Commit | CommandType::Unrecognized(_) => {
            format!("{} {} ", record.command_type, record.id)
        }
    }
}

/// Render several records, each followed by `"; "`
pub fn render_provenance_batch(records: &[ProvenanceRecord]) -> String {
    records
        .iter()
        .map(|r| format!("{}{}", render_provenance(r), BATCH_SEPARATOR))
        .collect()
}

/// Render records read back from storage
///
/// A single record renders on its own; several render as a batch.
pub fn render_records(records: &[ProvenanceRecord]) -> String {
    match records {
        [single] => render_provenance(single),
        many => render_provenance_batch(many),
    }
}

/// Parse persisted provenance text (object or array) and render it
///
/// # Errors
///
/// Returns `SeisCatError::Parse` if the text is not a provenance record or
/// an array of them.
pub fn render_provenance_json(text: &str) -> Result<String> {
    let records = parse_provenance_records(text).inspect_err(|e| {
        tracing::error!(op = "render_provenance", error = %e, "cannot render provenance");
    })?;
    Ok(render_records(&records))
}

/// `name=value, ` for each attribute; `reason` is skipped and an absent new
/// value renders as a single space
fn render_attributes(attrs: &[AttributeRecord]) -> String {
    let mut out = String::new();
    for attr in attrs {
        if attr.name == AttributeName::Reason {
            continue;
        }
        match &attr.new_value {
            None => out.push(' '),
            Some(value) => {
                out.push_str(attr.name.as_str());
                out.push('=');
                out.push_str(&display_value(value));
                out.push_str(", ");
            }
        }
    }
    out
}

/// Merge records carry the batch summary as a value; new and old values
/// are concatenated as they are
fn render_merge_attributes(attrs: &[AttributeRecord]) -> String {
    let mut out = String::new();
    for attr in attrs {
        let new = attr.new_value.as_ref().map(display_value).unwrap_or_default();
        let old = attr.old_value.as_ref().map(display_value).unwrap_or_default();
        out.push_str(&new);
        out.push(' ');
        out.push_str(&old);
    }
    out
}
