//! SQLite side of the seismic catalog workbench
//!
//! `migrations` owns the schema, `repo` reads and writes the command history
//! and the catalog tables, and `executor` runs store-side operations named
//! by executable statements.

pub mod db;
pub mod errors;
pub mod executor;
pub mod migrations;
pub mod repo;

pub use errors::Result;
pub use executor::SqliteStatementExecutor;
pub use repo::{CatalogRepo, CommandRepo, CommandStatus, HistoryFilter, StoredCommand};
