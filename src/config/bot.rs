//! Bot presentation settings loaded from an optional `config.toml`.
//!
//! The file only carries things that are safe to commit (prefixes, the
//! description shown in help). Secrets stay in the environment.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// The `[bot]` table
    #[serde(default)]
    pub bot: BotConfig,
}

/// The `[bot]` table
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct BotConfig {
    /// Description shown at the top of the help output
    pub description: Option<String>,
    /// Primary prefix for text commands
    pub prefix: String,
    /// Extra prefixes accepted alongside the primary one
    pub additional_prefixes: Vec<String>,
    /// Whether mentioning the bot works as a prefix
    pub mention_as_prefix: bool,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            description: None,
            prefix: "!".to_string(),
            additional_prefixes: vec!["?".to_string(), "$".to_string()],
            mention_as_prefix: true,
        }
    }
}

/// Loads bot configuration from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read, the TOML syntax is invalid
/// or the primary prefix is empty.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    parse_config(&contents)
}

/// Parses and validates the contents of a config.toml file.
pub fn parse_config(contents: &str) -> Result<Config> {
    let config: Config = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;

    if config.bot.prefix.trim().is_empty() {
        return Err(Error::Config {
            message: "bot.prefix cannot be empty".to_string(),
        });
    }

    Ok(config)
}

/// Loads ./config.toml, falling back to defaults when the file does not exist
pub fn load_default_config() -> Result<Config> {
    let path = Path::new("config.toml");
    if path.exists() {
        load_config(path)
    } else {
        tracing::debug!("No config.toml found, using default bot settings");
        Ok(Config::default())
    }
}
