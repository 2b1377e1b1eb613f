//! Message event handler.
//!
//! Converts serenity messages into the core's [`InboundMessage`], lets the
//! decision engine pick an action and carries it out. Every failure ends here:
//! it is logged and the message is dropped.

use crate::{
    bot::BotData,
    core::{
        decision::ResponseEngine,
        message::{
            Author, EmbedPayload, InboundMessage, MessageFetcher, ReplyChannel, ReplyPayload,
        },
        responder::Responder,
    },
    errors::{Error, Result},
};
use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use tracing::{debug, error, instrument};

/// Parses a non-zero Discord snowflake.
pub fn parse_snowflake(raw: &str) -> Result<u64> {
    raw.parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
        .ok_or_else(|| Error::InvalidId {
            value: raw.to_string(),
        })
}

fn to_author(user: &serenity::User) -> Author {
    Author {
        id: user.id.to_string(),
        name: user.name.clone(),
        display_name: user.display_name().to_string(),
        is_bot: user.bot,
    }
}

/// The bot's user and its roles in the guild a message came from.
#[derive(Debug, Clone)]
pub struct BotMember {
    /// Bot user id
    pub id: serenity::UserId,
    /// Roles the bot holds in the guild, empty outside guilds
    pub roles: Vec<serenity::RoleId>,
}

impl BotMember {
    /// Looks the bot's roles in `guild_id` up in the cache.
    #[must_use]
    pub fn lookup(
        ctx: &serenity::Context,
        guild_id: Option<serenity::GuildId>,
        id: serenity::UserId,
    ) -> Self {
        let roles = guild_id
            .and_then(|guild_id| {
                ctx.cache
                    .guild(guild_id)
                    .and_then(|guild| guild.members.get(&id).map(|member| member.roles.clone()))
            })
            .unwrap_or_default();
        Self { id, roles }
    }

    /// Whether `message` pings the bot by user, by one of its roles, or with
    /// `@everyone`/`@here`.
    #[must_use]
    pub fn is_mentioned_in(&self, message: &serenity::Message) -> bool {
        message.mention_everyone
            || message.mentions.iter().any(|user| user.id == self.id)
            || message
                .mention_roles
                .iter()
                .any(|role| self.roles.contains(role))
    }
}

/// The core's view of a serenity message, with mentions resolved for `bot`.
#[must_use]
pub fn to_inbound(message: &serenity::Message, bot: &BotMember) -> InboundMessage {
    let mut mentions: Vec<String> = message.mentions.iter().map(|u| u.id.to_string()).collect();
    let bot_id = bot.id.to_string();
    if bot.is_mentioned_in(message) && !mentions.contains(&bot_id) {
        mentions.push(bot_id);
    }

    InboundMessage {
        id: message.id.to_string(),
        author: to_author(&message.author),
        guild_id: message.guild_id.map(|id| id.to_string()),
        content: message.content.clone(),
        mentions,
        reference: message
            .message_reference
            .as_ref()
            .and_then(|reference| reference.message_id)
            .map(|id| id.to_string()),
    }
}

/// Renders a core embed with serenity's builder.
#[must_use]
pub fn to_embed(payload: &EmbedPayload) -> serenity::CreateEmbed {
    let mut embed = serenity::CreateEmbed::new().colour(payload.colour);
    if let Some(title) = &payload.title {
        embed = embed.title(title);
    }
    if let Some(description) = &payload.description {
        embed = embed.description(description);
    }
    for (name, value) in &payload.fields {
        embed = embed.field(name, value, false);
    }
    embed
}

/// The channel a message arrived in, seen through the core's traits.
pub struct SerenityChannel<'a> {
    ctx: &'a serenity::Context,
    message: &'a serenity::Message,
    bot: &'a BotMember,
}

impl<'a> SerenityChannel<'a> {
    /// Wraps the channel `message` was sent in.
    #[must_use]
    pub const fn new(
        ctx: &'a serenity::Context,
        message: &'a serenity::Message,
        bot: &'a BotMember,
    ) -> Self {
        Self { ctx, message, bot }
    }
}

#[async_trait]
impl MessageFetcher for SerenityChannel<'_> {
    async fn fetch_message(&self, message_id: &str) -> Result<InboundMessage> {
        let id = serenity::MessageId::new(parse_snowflake(message_id)?);
        let fetched = self.message.channel_id.message(self.ctx, id).await?;
        Ok(to_inbound(&fetched, self.bot))
    }
}

#[async_trait]
impl ReplyChannel for SerenityChannel<'_> {
    async fn send_typing(&self) -> Result<()> {
        self.message.channel_id.broadcast_typing(self.ctx).await?;
        Ok(())
    }

    async fn reply(&self, payload: ReplyPayload) -> Result<()> {
        match payload {
            ReplyPayload::Text(text) => {
                self.message.reply(self.ctx, text).await?;
            }
            ReplyPayload::Embed(embed) => {
                let builder = serenity::CreateMessage::new()
                    .embed(to_embed(&embed))
                    .reference_message(self.message);
                self.message
                    .channel_id
                    .send_message(self.ctx, builder)
                    .await?;
            }
        }
        Ok(())
    }
}

/// Handles one `MESSAGE_CREATE` event.
#[instrument(skip_all, fields(message_id = %new_message.id, author = %new_message.author.id))]
pub async fn on_message(
    ctx: &serenity::Context,
    new_message: &serenity::Message,
    bot_id: serenity::UserId,
    data: &BotData,
) {
    let bot = BotMember::lookup(ctx, new_message.guild_id, bot_id);
    let message = to_inbound(new_message, &bot);
    let bot_id = bot_id.to_string();
    let bot_name = ctx.cache.current_user().name.clone();
    let channel = SerenityChannel::new(ctx, new_message, &bot);

    let engine = ResponseEngine::new(&bot_id, data.app_config.auto_reply.probability);
    let draw = rand::random::<f64>();
    let action = engine.decide(&message, draw, &channel).await;
    debug!(?action, "Decided response");

    let responder = Responder {
        policy: &data.policy,
        redirect: &data.app_config.redirect,
        bot_name: &bot_name,
        backend: data.completion.as_ref(),
        whitelist: &data.whitelist,
    };
    if let Err(e) = responder.execute(&message, &action, &channel).await {
        error!("Failed to respond to message {}: {}", message.id, e);
    }
}
