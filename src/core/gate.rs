//! Interaction gate.
//!
//! Decides whether an interaction may reach the command dispatcher at all and
//! whether its invocation gets logged. Rejections are silent: no reply, no log
//! record.

use crate::{config::PolicyConfig, core::policy};

/// The kinds of interaction the platform delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    /// Slash command
    ChatCommand,
    /// User or message context-menu command
    ContextMenuCommand,
    /// Select-menu choice
    SelectMenu,
    /// Button press
    Button,
    /// Autocomplete request
    Autocomplete,
    /// Modal submission
    ModalSubmit,
    /// Anything else (pings, unknown future kinds)
    Other,
}

impl InteractionKind {
    /// Whether the gate lets this kind through.
    #[must_use]
    pub const fn is_dispatchable(self) -> bool {
        matches!(
            self,
            Self::ChatCommand | Self::ContextMenuCommand | Self::SelectMenu | Self::Button
        )
    }
}

/// The kind of channel an interaction happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    /// A standard guild text channel
    GuildText,
    /// Threads, voice, forums, DMs and the rest
    Other,
}

/// What the gate needs to know about an interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionFacts {
    /// `None` outside guilds
    pub guild_id: Option<String>,
    /// `None` when the channel could not be resolved
    pub channel_kind: Option<ChannelKind>,
    /// Interaction kind
    pub kind: InteractionKind,
}

/// Why an interaction was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Not inside a guild
    OutsideGuild,
    /// Inside a guild, but not in a standard text channel
    NotTextChannel,
    /// A kind the gate never dispatches
    UnsupportedKind,
    /// The guild is not on the server whitelist
    GuildNotAllowed,
}

/// The gate's verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Hand the interaction to the dispatcher
    Dispatch {
        /// Emit a command log record after dispatch
        log: bool,
    },
    /// Drop the interaction silently
    Ignore(IgnoreReason),
}

/// Runs the gate checks in order: guild, channel, kind, server whitelist.
#[must_use]
pub fn admit(facts: &InteractionFacts, policy: &PolicyConfig) -> Admission {
    let Some(guild_id) = facts.guild_id.as_deref() else {
        return Admission::Ignore(IgnoreReason::OutsideGuild);
    };

    if facts.channel_kind != Some(ChannelKind::GuildText) {
        return Admission::Ignore(IgnoreReason::NotTextChannel);
    }

    if !facts.kind.is_dispatchable() {
        return Admission::Ignore(IgnoreReason::UnsupportedKind);
    }

    if !policy::is_guild_allowed(policy, guild_id) {
        return Admission::Ignore(IgnoreReason::GuildNotAllowed);
    }

    Admission::Dispatch {
        log: should_log(facts.kind, policy),
    }
}

/// Only chat commands are logged, and only with logging enabled.
#[must_use]
pub fn should_log(kind: InteractionKind, policy: &PolicyConfig) -> bool {
    policy.logging && kind == InteractionKind::ChatCommand
}
