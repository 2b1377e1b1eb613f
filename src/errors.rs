//! Unified error type for the bot.

use thiserror::Error;

/// Every failure the bot can surface, from startup configuration to a single
/// completion request.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or unreadable configuration
    #[error("Configuration error: {message}")]
    Config {
        /// Human readable description of what was wrong
        message: String,
    },

    /// Database error from `SeaORM`
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or non-unicode environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Malformed TOML in the application config file
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Transport-level failure talking to the completion backend
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The completion backend answered, but not with something usable
    #[error("Completion backend error: {message}")]
    Completion {
        /// What the backend returned or why it was rejected
        message: String,
    },

    /// A platform id (user, channel, message) that is not a valid snowflake
    #[error("Invalid id: {value}")]
    InvalidId {
        /// The offending raw value
        value: String,
    },

    /// Serenity/Poise framework error
    #[error("Serenity/Poise framework error: {0}")]
    #[allow(clippy::enum_variant_names)]
    FrameworkError(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::FrameworkError(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
