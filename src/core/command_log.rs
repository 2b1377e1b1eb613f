//! Command invocation log records.

use crate::{
    config::PolicyConfig,
    core::{
        gate::{self, InteractionKind},
        message::{EMBED_COLOUR, EmbedPayload},
    },
};
use chrono::{DateTime, Local, Utc};

/// One logged chat-command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLogRecord {
    /// Name of the guild the command ran in
    pub guild_name: String,
    /// Unix timestamp, second resolution
    pub timestamp_secs: i64,
    /// Executor's account username
    pub executor_name: String,
    /// Executor's display name
    pub executor_display_name: String,
    /// Textual form of the invocation, e.g. `/whitelist option:Add user:...`
    pub command_text: String,
}

impl CommandLogRecord {
    /// Builds a record stamped with `at`.
    #[must_use]
    pub fn new(
        guild_name: impl Into<String>,
        executor_name: impl Into<String>,
        executor_display_name: impl Into<String>,
        command_text: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            guild_name: guild_name.into(),
            timestamp_secs: at.timestamp(),
            executor_name: executor_name.into(),
            executor_display_name: executor_display_name.into(),
            command_text: command_text.into(),
        }
    }

    /// The operator console banner.
    #[must_use]
    pub fn console_banner(&self) -> String {
        let when = DateTime::from_timestamp(self.timestamp_secs, 0)
            .unwrap_or_default()
            .with_timezone(&Local)
            .format("%b %-d, %-I:%M %p");
        format!(
            "~~~~ {when} ~~~~\n🔧 Command: {}\n🔍 Executor: {} (Guild: {})",
            self.command_text, self.executor_display_name, self.guild_name
        )
    }

    /// The embed mirrored into the log channel. The date uses Discord's
    /// `<t:...>` timestamp markup so every reader sees their own timezone.
    #[must_use]
    pub fn embed(&self) -> EmbedPayload {
        EmbedPayload {
            colour: EMBED_COLOUR,
            fields: vec![(
                format!(
                    "Guild: {} | Date: <t:{}>",
                    self.guild_name, self.timestamp_secs
                ),
                format!(
                    "```kotlin\n{} executed the '{}' command\n```",
                    self.executor_name, self.command_text
                ),
            )],
            ..EmbedPayload::default()
        }
    }
}

/// The record for a finished invocation of `kind`, emitted whether the command
/// succeeded or failed. `None` when the invocation is not logged.
#[must_use]
pub fn record_for(
    kind: InteractionKind,
    policy: &PolicyConfig,
    guild_name: impl Into<String>,
    executor_name: impl Into<String>,
    executor_display_name: impl Into<String>,
    command_text: impl Into<String>,
    at: DateTime<Utc>,
) -> Option<CommandLogRecord> {
    gate::should_log(kind, policy).then(|| {
        CommandLogRecord::new(
            guild_name,
            executor_name,
            executor_display_name,
            command_text,
            at,
        )
    })
}
