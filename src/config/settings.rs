//! Runtime settings read from the environment (and `.env` via `dotenvy`).
//!
//! Everything except the bot token has a default so a bare checkout can run
//! against a local `SQLite` file.

use crate::errors::{Error, Result};
use std::time::Duration;

/// Default database location when `DATABASE_URL` is unset.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/asdana.sqlite?mode=rwc";
/// Default seconds between expiry sweeps.
pub const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 3600;
/// Default number of expired menus removed per sweep.
pub const DEFAULT_CLEANUP_BATCH_SIZE: u64 = 100;
/// Default log filter when neither `RUST_LOG` nor `LOG_LEVEL` is set.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Settings for the expiry sweeper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepSettings {
    /// Delay between successful sweeps (`CLEANUP_INTERVAL_MENUS`)
    pub interval: Duration,
    /// Maximum records deleted per sweep (`CLEANUP_BATCH_SIZE_MENUS`)
    pub batch_size: u64,
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_CLEANUP_INTERVAL_SECS),
            batch_size: DEFAULT_CLEANUP_BATCH_SIZE,
        }
    }
}

/// Process-wide settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// `SeaORM` connection string
    pub database_url: String,
    /// Guild used for fast command registration during development
    pub testing_guild_id: Option<u64>,
    /// Fallback tracing filter
    pub log_level: String,
    /// Menu expiry sweeper settings
    pub sweep: SweepSettings,
}

impl Settings {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let interval_secs = parse_or(get("CLEANUP_INTERVAL_MENUS"), "CLEANUP_INTERVAL_MENUS")?
            .unwrap_or(DEFAULT_CLEANUP_INTERVAL_SECS);
        let batch_size = parse_or(get("CLEANUP_BATCH_SIZE_MENUS"), "CLEANUP_BATCH_SIZE_MENUS")?
            .unwrap_or(DEFAULT_CLEANUP_BATCH_SIZE);

        if interval_secs == 0 {
            return Err(Error::Config {
                message: "CLEANUP_INTERVAL_MENUS must be greater than zero".to_string(),
            });
        }
        if batch_size == 0 {
            return Err(Error::Config {
                message: "CLEANUP_BATCH_SIZE_MENUS must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            testing_guild_id: parse_or(get("TESTING_GUILD_ID"), "TESTING_GUILD_ID")?,
            log_level: get("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            sweep: SweepSettings {
                interval: Duration::from_secs(interval_secs),
                batch_size,
            },
        })
    }
}

fn parse_or(value: Option<String>, key: &str) -> Result<Option<u64>> {
    value
        .map(|raw| {
            raw.trim().parse::<u64>().map_err(|e| Error::Config {
                message: format!("{key} must be a non-negative integer, got {raw:?}: {e}"),
            })
        })
        .transpose()
}
