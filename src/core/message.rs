//! Platform-neutral view of chat messages and the seams to the platform.
//!
//! The decision engine never sees serenity types. The bot layer converts
//! incoming messages into [`InboundMessage`] and implements [`MessageFetcher`]
//! and [`ReplyChannel`] on top of the Discord client.

use crate::errors::Result;
use async_trait::async_trait;

/// Colour shared by every embed the bot sends (`#EC645D`).
pub const EMBED_COLOUR: u32 = 0x00EC_645D;

/// The speaker of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    /// Platform user id
    pub id: String,
    /// Account username
    pub name: String,
    /// Name shown in the client (global name, falling back to username)
    pub display_name: String,
    /// Whether the account is a bot
    pub is_bot: bool,
}

/// A message as the decision engine sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Platform message id
    pub id: String,
    /// Who sent it
    pub author: Author,
    /// `None` for direct messages
    pub guild_id: Option<String>,
    /// Raw text, mention tokens included
    pub content: String,
    /// Ids of the users the message addresses, directly or through a role or
    /// `@everyone`/`@here` mention
    pub mentions: Vec<String>,
    /// Id of the message this one replies to
    pub reference: Option<String>,
}

impl InboundMessage {
    /// Whether the message addresses `user_id`.
    #[must_use]
    pub fn mentions_user(&self, user_id: &str) -> bool {
        self.mentions.iter().any(|id| id == user_id)
    }

    /// Whether the message was sent inside a guild.
    #[must_use]
    pub const fn is_in_guild(&self) -> bool {
        self.guild_id.is_some()
    }
}

/// The text and speaker forwarded to the completion backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationTarget {
    /// Text to complete
    pub content: String,
    /// Who said it
    pub author: Author,
}

impl ConversationTarget {
    /// Targets `message` as spoken by its own author.
    #[must_use]
    pub fn from_message(message: &InboundMessage) -> Self {
        Self {
            content: message.content.clone(),
            author: message.author.clone(),
        }
    }
}

/// A rich reply.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EmbedPayload {
    /// Sidebar colour
    pub colour: u32,
    /// Optional title
    pub title: Option<String>,
    /// Optional body text
    pub description: Option<String>,
    /// `(name, value)` pairs, rendered non-inline
    pub fields: Vec<(String, String)>,
}

/// What the bot sends back into a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyPayload {
    /// Plain message content
    Text(String),
    /// A single embed
    Embed(EmbedPayload),
}

/// Looks up other messages in the channel an event came from.
#[async_trait]
pub trait MessageFetcher: Send + Sync {
    /// Fetches the message with id `message_id`.
    async fn fetch_message(&self, message_id: &str) -> Result<InboundMessage>;
}

/// Sends output back to the channel an event came from.
#[async_trait]
pub trait ReplyChannel: Send + Sync {
    /// Shows the typing indicator.
    async fn send_typing(&self) -> Result<()>;

    /// Replies to the triggering message.
    async fn reply(&self, payload: ReplyPayload) -> Result<()>;
}
