//! Authorization policy configuration.
//!
//! Read once at startup from the environment and never mutated afterwards.
//! Parsing never fails: a malformed value falls back to its documented default
//! and logs a warning.

use std::collections::HashSet;
use tracing::warn;

/// Comma-separated admin user ids. Absent means nobody is an admin.
pub const ADMIN_IDS_VAR: &str = "AdminIds";
/// Comma-separated guild ids the bot serves. Absent means every guild.
pub const SERVER_WHITELIST_VAR: &str = "ServerWhitelist";
/// `"true"` turns on command logging.
pub const LOGGING_VAR: &str = "Logging";
/// Channel id that command log records are mirrored into.
pub const COMMAND_LOGGING_VAR: &str = "CommandLogging";
/// `"true"` restricts completions to whitelisted authors.
pub const GPT_WHITELIST_REQUIRED_VAR: &str = "GptWhitelistRequired";

/// Immutable authorization settings shared by every handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyConfig {
    /// Users allowed to run staff commands
    pub admin_ids: HashSet<String>,
    /// `None` is open mode: every guild is served
    pub server_whitelist: Option<HashSet<String>>,
    /// Whether chat-command invocations are logged
    pub logging: bool,
    /// Channel that log records are mirrored into
    pub command_log_channel: Option<u64>,
    /// Whether completions require the author to be whitelisted
    pub require_gpt_whitelist: bool,
}

impl PolicyConfig {
    /// Builds the policy from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the policy from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let admin_ids = lookup(ADMIN_IDS_VAR)
            .map(|raw| parse_id_list(&raw))
            .unwrap_or_default();

        // A set-but-empty allow-list would lock the bot out of every guild;
        // treat it like an unset one.
        let server_whitelist = lookup(SERVER_WHITELIST_VAR)
            .map(|raw| parse_id_list(&raw))
            .filter(|ids| {
                if ids.is_empty() {
                    warn!("{SERVER_WHITELIST_VAR} is set but lists no guilds, serving all guilds");
                }
                !ids.is_empty()
            });

        let command_log_channel = lookup(COMMAND_LOGGING_VAR).and_then(|raw| {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<u64>() {
                Ok(0) | Err(_) => {
                    warn!("Ignoring {COMMAND_LOGGING_VAR}={trimmed:?}: not a channel id");
                    None
                }
                Ok(id) => Some(id),
            }
        });

        Self {
            admin_ids,
            server_whitelist,
            logging: lookup(LOGGING_VAR).is_some_and(|raw| parse_flag(&raw)),
            command_log_channel,
            require_gpt_whitelist: lookup(GPT_WHITELIST_REQUIRED_VAR)
                .is_some_and(|raw| parse_flag(&raw)),
        }
    }
}

/// Splits a comma-separated id list, trimming items and dropping empty ones.
#[must_use]
pub fn parse_id_list(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn parse_flag(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("true")
}
