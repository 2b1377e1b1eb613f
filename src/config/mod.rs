//! Configuration management.
//!
//! Two sources feed the bot: the authorization policy comes from environment
//! variables (see [`policy`]), everything else from an optional `config.toml`.

/// Database connection and table creation
pub mod database;

/// Authorization policy read from environment variables
pub mod policy;

pub use policy::PolicyConfig;

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::{fs, path::Path};

/// Default location of the TOML application config.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Application settings loaded from `config.toml`.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Completion backend settings
    pub completion: CompletionConfig,
    /// Unprompted reply settings
    pub auto_reply: AutoReplyConfig,
    /// Where direct-message users get sent
    pub redirect: RedirectConfig,
}

/// Settings for the OpenAI-compatible completion backend.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CompletionConfig {
    /// Base URL of the API, without the `/chat/completions` suffix
    pub base_url: String,
    /// Model name sent with every request
    pub model: String,
    /// System prompt prepended to every conversation
    pub system_prompt: String,
    /// Upper bound on generated tokens
    pub max_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            system_prompt: "You are a friendly and concise assistant in a Discord server. \
                            Answer in plain Discord markdown."
                .to_string(),
            max_tokens: 512,
            timeout_secs: 60,
        }
    }
}

/// Settings for the probabilistic reply to questions nobody asked the bot.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct AutoReplyConfig {
    /// Chance in `[0, 1]` that an eligible question gets answered
    pub probability: f64,
}

impl Default for AutoReplyConfig {
    fn default() -> Self {
        Self { probability: 0.04 }
    }
}

/// The official server that direct messages are redirected to.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RedirectConfig {
    /// Display name used as the link text
    pub server_name: String,
    /// Invite link
    pub invite_url: String,
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self {
            server_name: "AirReps Discord server".to_string(),
            invite_url: "https://airreps.link/discord".to_string(),
        }
    }
}

/// Parses and validates an [`AppConfig`] from TOML text.
pub fn parse_app_config(contents: &str) -> Result<AppConfig> {
    let app_config: AppConfig = toml::from_str(contents)?;

    let probability = app_config.auto_reply.probability;
    if !(0.0..=1.0).contains(&probability) {
        return Err(Error::Config {
            message: format!("auto_reply.probability must be within [0, 1], got {probability}"),
        });
    }
    if app_config.completion.model.trim().is_empty() {
        return Err(Error::Config {
            message: "completion.model cannot be empty".to_string(),
        });
    }

    Ok(app_config)
}

/// Loads the application config from `path`.
///
/// A missing file is not an error: every section has defaults. A file that
/// exists but cannot be read or parsed is.
pub fn load_app_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    if !path_ref.exists() {
        tracing::info!("No config file at {:?}, using defaults", path_ref);
        return Ok(AppConfig::default());
    }

    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = fs::read_to_string(path_ref)
        .inspect_err(|e| tracing::error!("Failed to read config file {:?}: {}", path_ref, e))?;
    parse_app_config(&contents)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() -> Result<()> {
        let config = parse_app_config("")?;
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.auto_reply.probability, 0.04);
        assert_eq!(config.redirect.invite_url, "https://airreps.link/discord");
        Ok(())
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() -> Result<()> {
        let config = parse_app_config(
            r#"
            [completion]
            model = "gpt-4o"
            max_tokens = 1024

            [auto_reply]
            probability = 0.5
            "#,
        )?;
        assert_eq!(config.completion.model, "gpt-4o");
        assert_eq!(config.completion.max_tokens, 1024);
        assert_eq!(config.completion.timeout_secs, 60);
        assert_eq!(config.auto_reply.probability, 0.5);
        assert_eq!(config.redirect, RedirectConfig::default());
        Ok(())
    }

    #[test]
    fn test_probability_out_of_range_is_rejected() {
        let result = parse_app_config("[auto_reply]\nprobability = 1.5\n");
        assert!(matches!(result.unwrap_err(), Error::Config { message: _ }));
    }

    #[test]
    fn test_blank_model_is_rejected() {
        let result = parse_app_config("[completion]\nmodel = \"  \"\n");
        assert!(matches!(result.unwrap_err(), Error::Config { message: _ }));
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        let result = parse_app_config("[completion\nmodel = 1");
        assert!(matches!(result.unwrap_err(), Error::Toml(_)));
    }

    #[test]
    fn test_missing_file_yields_defaults() -> Result<()> {
        let config = load_app_config("definitely/not/here/config.toml")?;
        assert_eq!(config, AppConfig::default());
        Ok(())
    }

    #[test]
    fn test_unreadable_file_is_an_io_error() {
        let result = load_app_config(std::env::temp_dir());
        assert!(matches!(result.unwrap_err(), Error::Io(_)));
    }
}
