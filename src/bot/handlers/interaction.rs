//! Interaction gate hooks.
//!
//! `admit_command` runs as poise's global command check, so a rejected
//! interaction never reaches the command. `record_invocation` runs after the
//! command, whether it succeeded or failed, and emits the log record.

use crate::{
    bot::{Context, handlers::message::to_embed},
    core::{
        command_log::{self, CommandLogRecord},
        gate::{self, Admission, ChannelKind, InteractionFacts, InteractionKind},
    },
    errors::Result,
};
use chrono::Utc;
use poise::serenity_prelude as serenity;
use tracing::{debug, info};

/// Maps an application command type to the gate's interaction kind.
#[must_use]
pub fn command_kind(kind: serenity::CommandType) -> InteractionKind {
    match kind {
        serenity::CommandType::ChatInput => InteractionKind::ChatCommand,
        serenity::CommandType::User | serenity::CommandType::Message => {
            InteractionKind::ContextMenuCommand
        }
        _ => InteractionKind::Other,
    }
}

/// Maps a channel type to the gate's channel kind.
#[must_use]
pub fn channel_kind(kind: serenity::ChannelType) -> ChannelKind {
    if kind == serenity::ChannelType::Text {
        ChannelKind::GuildText
    } else {
        ChannelKind::Other
    }
}

fn invocation_kind(ctx: Context<'_>) -> InteractionKind {
    match ctx {
        poise::Context::Application(app) => command_kind(app.interaction.data.kind),
        poise::Context::Prefix(_) => InteractionKind::Other,
    }
}

async fn interaction_facts(ctx: Context<'_>) -> InteractionFacts {
    let channel_kind = ctx
        .guild_channel()
        .await
        .map(|channel| channel_kind(channel.kind));

    InteractionFacts {
        guild_id: ctx.guild_id().map(|id| id.to_string()),
        channel_kind,
        kind: invocation_kind(ctx),
    }
}

/// Global command check: lets the command run only if the gate admits it.
pub async fn admit_command(ctx: Context<'_>) -> Result<bool> {
    let facts = interaction_facts(ctx).await;
    match gate::admit(&facts, &ctx.data().policy) {
        Admission::Dispatch { .. } => Ok(true),
        Admission::Ignore(reason) => {
            debug!(
                ?reason,
                command = %ctx.command().name,
                guild = ?facts.guild_id,
                "Ignoring interaction"
            );
            Ok(false)
        }
    }
}

/// Emits the command log record for a finished invocation, if logging is on.
pub async fn record_invocation(ctx: Context<'_>) {
    let policy = &ctx.data().policy;
    let guild_name = ctx
        .guild()
        .map(|guild| guild.name.clone())
        .or_else(|| ctx.guild_id().map(|id| id.to_string()))
        .unwrap_or_default();
    let author = ctx.author();
    let Some(record) = command_log::record_for(
        invocation_kind(ctx),
        policy,
        guild_name,
        author.name.as_str(),
        author.display_name(),
        ctx.invocation_string(),
        Utc::now(),
    ) else {
        return;
    };

    info!(
        guild = %record.guild_name,
        executor = %record.executor_name,
        command = %record.command_text,
        "{}",
        record.console_banner()
    );

    if let Some(channel_id) = policy.command_log_channel {
        mirror_to_channel(ctx.serenity_context(), channel_id, &record).await;
    }
}

/// Sends `record` to the log channel. An unresolvable or non-text channel is
/// skipped silently.
async fn mirror_to_channel(ctx: &serenity::Context, channel_id: u64, record: &CommandLogRecord) {
    let channel = match serenity::ChannelId::new(channel_id).to_channel(ctx).await {
        Ok(serenity::Channel::Guild(channel)) if channel.kind == serenity::ChannelType::Text => {
            channel
        }
        Ok(_) => {
            debug!("Log channel {} is not a guild text channel", channel_id);
            return;
        }
        Err(e) => {
            debug!("Log channel {} could not be resolved: {}", channel_id, e);
            return;
        }
    };

    let message = serenity::CreateMessage::new().embed(to_embed(&record.embed()));
    if let Err(e) = channel.send_message(ctx, message).await {
        debug!("Failed to mirror command log to {}: {}", channel_id, e);
    }
}
