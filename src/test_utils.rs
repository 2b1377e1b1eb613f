//! Shared test utilities.
//!
//! Provides an in-memory whitelist store, message builders with sensible
//! defaults, and recording fakes for the platform and the completion backend.

#![allow(clippy::unwrap_used)]

use crate::{
    core::{
        completion::CompletionBackend,
        message::{Author, InboundMessage, MessageFetcher, ReplyChannel, ReplyPayload},
        whitelist::DatabaseWhitelistStore,
    },
    errors::{Error, Result},
};
use async_trait::async_trait;
use std::{collections::HashMap, sync::Mutex};

/// User id of the bot in every test.
pub const BOT_ID: &str = "42";

/// Guild id used for guild messages.
pub const GUILD_ID: &str = "900";

/// Creates a whitelist store over an in-memory `SQLite` database with all
/// tables initialized.
pub async fn setup_test_store() -> Result<DatabaseWhitelistStore> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(DatabaseWhitelistStore::new(db))
}

/// A human author whose names derive from `id`.
pub fn human(id: &str) -> Author {
    Author {
        id: id.to_string(),
        name: format!("user{id}"),
        display_name: format!("User {id}"),
        is_bot: false,
    }
}

/// The bot itself.
pub fn bot_author() -> Author {
    Author {
        id: BOT_ID.to_string(),
        name: "helper".to_string(),
        display_name: "Helper".to_string(),
        is_bot: true,
    }
}

/// A guild message with no mentions and no reference.
pub fn message(id: &str, author: Author, content: &str) -> InboundMessage {
    InboundMessage {
        id: id.to_string(),
        author,
        guild_id: Some(GUILD_ID.to_string()),
        content: content.to_string(),
        mentions: Vec::new(),
        reference: None,
    }
}

impl InboundMessage {
    /// Makes this message a reply to `message_id`.
    #[must_use]
    pub fn replying_to(mut self, message_id: &str) -> Self {
        self.reference = Some(message_id.to_string());
        self
    }

    /// Adds `user_id` to the mentions.
    #[must_use]
    pub fn mentioning(mut self, user_id: &str) -> Self {
        self.mentions.push(user_id.to_string());
        self
    }

    /// Moves this message into a direct-message channel.
    #[must_use]
    pub fn in_dm(mut self) -> Self {
        self.guild_id = None;
        self
    }
}

/// Something the fake platform was asked to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    /// Typing indicator
    Typing,
    /// Reply to the triggering message
    Reply(ReplyPayload),
}

/// A channel whose history is a fixed set of messages. Records every fetch
/// and everything sent.
#[derive(Debug, Default)]
pub struct FakePlatform {
    history: HashMap<String, InboundMessage>,
    fetched: Mutex<Vec<String>>,
    sent: Mutex<Vec<Sent>>,
}

impl FakePlatform {
    /// Adds `message` to the channel history.
    #[must_use]
    pub fn with_message(mut self, message: InboundMessage) -> Self {
        self.history.insert(message.id.clone(), message);
        self
    }

    /// Ids of every message fetched so far, in order.
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }

    /// Everything sent so far, in order.
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageFetcher for FakePlatform {
    async fn fetch_message(&self, message_id: &str) -> Result<InboundMessage> {
        self.fetched.lock().unwrap().push(message_id.to_string());
        self.history
            .get(message_id)
            .cloned()
            .ok_or_else(|| Error::InvalidId {
                value: message_id.to_string(),
            })
    }
}

#[async_trait]
impl ReplyChannel for FakePlatform {
    async fn send_typing(&self) -> Result<()> {
        self.sent.lock().unwrap().push(Sent::Typing);
        Ok(())
    }

    async fn reply(&self, payload: ReplyPayload) -> Result<()> {
        self.sent.lock().unwrap().push(Sent::Reply(payload));
        Ok(())
    }
}

/// A completion backend with a canned answer (or a canned failure).
/// Records `(content, user id)` of every request.
#[derive(Debug)]
pub struct FakeBackend {
    answer: Option<String>,
    requests: Mutex<Vec<(String, String)>>,
}

impl FakeBackend {
    /// Always answers `text`.
    pub fn replying(text: &str) -> Self {
        Self {
            answer: Some(text.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always fails.
    pub fn failing() -> Self {
        Self {
            answer: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every `(content, user id)` pair requested so far.
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionBackend for FakeBackend {
    async fn complete(&self, content: &str, user: &Author) -> Result<ReplyPayload> {
        self.requests
            .lock()
            .unwrap()
            .push((content.to_string(), user.id.clone()));
        self.answer
            .clone()
            .map(ReplyPayload::Text)
            .ok_or_else(|| Error::Completion {
                message: "backend unavailable".to_string(),
            })
    }
}
