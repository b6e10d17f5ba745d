//! Unified error type for the bot, the menu subsystem and the persistence layer.

use thiserror::Error;

/// All errors produced by Asdana.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or missing configuration
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the problem
        message: String,
    },

    /// Any failure reported by `SeaORM` or the underlying driver
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O failures (config files, signal handling)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or malformed environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// String formatting failure while building a response
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// A menu request or a stored menu record that cannot be used
    #[error("Invalid menu: {message}")]
    InvalidMenu {
        /// What is wrong with the menu
        message: String,
    },

    /// A Discord id that does not fit the database column
    #[error("Snowflake {id} is out of range")]
    InvalidSnowflake {
        /// The offending id
        id: String,
    },

    /// Menu payload (de)serialization failure
    #[error("Menu payload error: {0}")]
    Payload(#[from] serde_json::Error),

    /// Failure reported by the messaging collaborator that is not a Discord error
    #[error("Messaging error: {message}")]
    Messaging {
        /// Description of the failed call
        message: String,
    },

    /// Serenity/Poise framework error
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
