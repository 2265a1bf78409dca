//! Serialized halves of a command envelope
//!
//! A command is persisted as two independent JSON documents: the system
//! command (what to execute) and the provenance record (what changed, for
//! audit). Both are written in a canonical array shape, one element per
//! envelope; the readers also accept a bare object.

use crate::errors::{Result, SeisCatError};
use crate::model::{AttributeRecord, CommandType, DataType, ExecutableStatement};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Executable half of a command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemCommand {
    pub command_type: CommandType,
    pub data_type: DataType,
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql_function_array: Option<Vec<ExecutableStatement>>,
    #[serde(default)]
    pub locator_arg_str: String,
}

impl SystemCommand {
    /// Statements to run, empty when the command only drives the locator
    pub fn statements(&self) -> &[ExecutableStatement] {
        self.sql_function_array.as_deref().unwrap_or(&[])
    }
}

/// Audit half of a command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvenanceRecord {
    pub command_type: CommandType,
    pub data_type: DataType,
    pub id: i64,
    #[serde(default)]
    pub agency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_array: Option<Vec<AttributeRecord>>,
}

impl ProvenanceRecord {
    pub fn attributes(&self) -> &[AttributeRecord] {
        self.attribute_array.as_deref().unwrap_or(&[])
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

fn parse_one_or_many<T: DeserializeOwned>(text: &str, what: &str) -> Result<Vec<T>> {
    let parsed: OneOrMany<T> =
        serde_json::from_str(text).map_err(|e| SeisCatError::Parse {
            what: what.to_string(),
            message: e.to_string(),
        })?;
    Ok(match parsed {
        OneOrMany::Many(items) => items,
        OneOrMany::One(item) => vec![item],
    })
}

/// Parse a persisted system command (object or array of objects)
pub fn parse_system_commands(text: &str) -> Result<Vec<SystemCommand>> {
    parse_one_or_many(text, "system command")
}

/// Parse a persisted provenance record (object or array of objects)
pub fn parse_provenance_records(text: &str) -> Result<Vec<ProvenanceRecord>> {
    parse_one_or_many(text, "provenance record")
}

/// Serialize records in the canonical array shape
pub fn to_canonical_json<T: Serialize>(records: &[T]) -> Result<String> {
    Ok(serde_json::to_string(records)?)
}
