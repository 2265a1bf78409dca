//! Configuration file
//!
//! ```toml
//! analyst = "jdoe"
//! default_agency = "ISC"
//!
//! [locator]
//! program = "/usr/local/bin/iloc"
//! remote_host = "locator.example.org"
//! output_path = "relocation.out"
//! ```

use seiscat_engine::LocatorConfig;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub analyst: String,
    #[serde(default)]
    pub default_agency: String,
    #[serde(default)]
    pub locator: Option<LocatorConfig>,
}

impl Settings {
    /// Load settings from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text).map_err(|e| format!("{}: {}", path.display(), e).into())
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}
