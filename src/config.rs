//! Configuration Management
//!
//! Optional defaults for the command-line flags, read from
//! `<config dir>/gcptally/config.json`. Flags given on the command line win.

use serde::Deserialize;
use std::path::PathBuf;

/// User configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Default for --verbose
    #[serde(default)]
    pub verbose: Option<bool>,
    /// Default for --log-level
    #[serde(default)]
    pub log_level: Option<String>,
}

impl Config {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("gcptally").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Effective verbosity (CLI flag wins over config)
    pub fn effective_verbose(&self, flag: bool) -> bool {
        flag || self.verbose.unwrap_or(false)
    }
}
