//! Configuration loading
//!
//! Reads `~/.config/daycache/config.toml`. A missing file is not an error;
//! every field has a default.

pub mod types;

use std::fs;
use std::path::{Path, PathBuf};

pub use types::{ApiConfig, Config, SuggestMode, SuggestionConfig};

use crate::error::ConfigError;

const CONFIG_DIR: &str = "daycache";
const CONFIG_FILE: &str = "config.toml";

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|p| p.join(".config").join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Load the user's config file, falling back to defaults when absent
pub fn load_config() -> Result<Config, ConfigError> {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => {
            log::debug!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}

pub fn load_config_from_path(path: &Path) -> Result<Config, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    parse_config(&contents)
}

/// Parse and validate config TOML
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
