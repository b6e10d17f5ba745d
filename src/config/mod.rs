/// Database connection and table creation
pub mod database;

/// Bot presentation settings from config.toml
pub mod bot;

/// Runtime settings from environment variables
pub mod settings;

pub use settings::{Settings, SweepSettings};
