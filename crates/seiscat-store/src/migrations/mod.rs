//! Schema migrations
//!
//! Each migration runs once, in its own transaction, and its SHA256 is
//! recorded in `schema_version`. Later runs compare the recorded checksum
//! with the embedded SQL and refuse to continue on a mismatch, and refuse a
//! database that records migrations this build does not know.

mod checksums;
mod embedded;
mod runner;

pub use runner::{applied_migrations, apply_migrations};
