//! Command orchestration layer.
//!
//! Each operation runs over one `rusqlite::Connection` and returns
//! `Result<T, ExError>` like the store layer.

pub mod engine_command;
pub mod execute;
pub mod merge;
pub mod selection;
pub mod submit;
