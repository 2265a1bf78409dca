//! SeisCat Core - command and provenance encoding for seismic catalog edits
//!
//! This crate provides the data contract used to record analyst edits to a
//! seismic catalog (events, hypocentres, phases), including:
//! - Closed enumerations for command types, data types and attribute names
//! - The `CommandEnvelope` builder with its system-command and provenance halves
//! - The command merger used to batch pending edits before relocation
//! - The analyst-readable renderer for provenance records
//! - A session context with explicit selection observers
//! - Error and logging facilities shared by the store and engine crates

pub use seiscat_core_types as core_types;

pub mod envelope;
pub mod errors;
pub mod executor;
pub mod logging_facility;
pub mod merge;
pub mod model;
pub mod render;
pub mod session;

// Re-export commonly used types
pub use envelope::{CommandEnvelope, ValidationWarning};
pub use errors::{ExError, ExErrorKind, Result, SeisCatError};
pub use executor::StatementExecutor;
pub use merge::{merge_commands, MergeSource, MergedCommand};
pub use model::{
    AttributeName, AttributeRecord, CommandType, DataType, ExecutableStatement,
    ProvenanceRecord, SystemCommand,
};
pub use session::{Selection, SelectionObserver, SessionContext, SubscriptionId};
