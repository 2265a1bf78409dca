//! CLI command implementations

use crate::config::Settings;
use rusqlite::Connection;
use std::path::PathBuf;

pub mod execute;
pub mod history;
pub mod init;
pub mod merge;
pub mod record;
pub mod render;
pub mod select;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Global options shared by every command
#[derive(Debug)]
pub struct Context {
    pub db: PathBuf,
    pub settings: Settings,
}

impl Context {
    /// Open the configured database, bringing its schema up to date
    pub fn open_db(&self) -> Result<Connection, Box<dyn std::error::Error>> {
        let mut conn = seiscat_store::db::open(&self.db)?;
        seiscat_store::db::configure(&conn)?;
        seiscat_store::migrations::apply_migrations(&mut conn)?;
        Ok(conn)
    }

    /// Agency from the command line, else the configured default
    pub fn agency(&self, flag: Option<String>) -> String {
        flag.unwrap_or_else(|| self.settings.default_agency.clone())
    }
}
