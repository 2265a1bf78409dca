//! Repository layer
//!
//! Bridges core command envelopes and catalog rows to SQLite.

pub mod catalog_repo;
pub mod command_repo;

pub use catalog_repo::{CatalogRepo, EventRow, HypocentreRow, PhaseRow};
pub use command_repo::{CommandRepo, CommandStatus, HistoryFilter, StoredCommand};
