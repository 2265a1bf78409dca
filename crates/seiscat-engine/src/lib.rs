//! SeisCat Engine - Orchestration layer
//!
//! Coordinates core command encoding with the SQLite store: submitting
//! envelopes to the history, merging pending commands, executing them
//! against the catalog and driving the external relocation process.

pub mod commands;
pub mod locator;

pub use commands::engine_command::{apply_engine_command, EngineCommand, EngineCommandResult};
pub use locator::{LocatorConfig, OutputMode};
