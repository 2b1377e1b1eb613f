//! Response decision engine for the message path.
//!
//! Every inbound message ends in exactly one [`ResponseAction`]. The checks
//! run in a fixed order: self-filter, DM redirect, probabilistic auto-reply,
//! reply chain, direct mention.

use crate::core::{
    message::{ConversationTarget, InboundMessage, MessageFetcher},
    reply_chain::{resolve_reply_chain, strip_mentions},
};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, error};

#[allow(clippy::expect_used)] // Pattern is a compile-time constant
static QUESTION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.{5,100}\?$").expect("question pattern is valid"));

/// What to do with a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseAction {
    /// Do nothing
    Ignore,
    /// Point a direct-message user at the official server
    RedirectToGuild,
    /// Answer an unprompted question
    AutoReply(ConversationTarget),
    /// Answer within a reply chain
    ReplyChain(ConversationTarget),
    /// Answer a direct mention
    Mention(ConversationTarget),
}

impl ResponseAction {
    /// The conversation to complete, if this action involves the backend.
    #[must_use]
    pub const fn target(&self) -> Option<&ConversationTarget> {
        match self {
            Self::AutoReply(target) | Self::ReplyChain(target) | Self::Mention(target) => {
                Some(target)
            }
            Self::Ignore | Self::RedirectToGuild => None,
        }
    }
}

/// Whether `content` looks like a standalone question worth answering
/// unprompted: after removing mentions it is non-empty, at most one line,
/// and 5 to 100 characters followed by a question mark.
#[must_use]
pub fn is_eligible_question(content: &str) -> bool {
    let stripped = strip_mentions(content);
    !stripped.trim().is_empty() && QUESTION_PATTERN.is_match(&stripped)
}

/// Whether to auto-reply, given a uniform `draw` in `[0, 1)`.
#[must_use]
pub fn should_respond(content: &str, draw: f64, probability: f64) -> bool {
    draw <= probability && is_eligible_question(content)
}

/// Decides the response to each message for one bot identity.
#[derive(Debug, Clone, Copy)]
pub struct ResponseEngine<'a> {
    bot_id: &'a str,
    probability: f64,
}

impl<'a> ResponseEngine<'a> {
    /// Creates an engine for the bot user `bot_id` that auto-replies with
    /// the given `probability`.
    #[must_use]
    pub const fn new(bot_id: &'a str, probability: f64) -> Self {
        Self {
            bot_id,
            probability,
        }
    }

    /// Decides what to do with `message`.
    ///
    /// `draw` is the uniform random sample for the auto-reply roll. A failure
    /// fetching the replied-to message is logged and yields
    /// [`ResponseAction::Ignore`].
    pub async fn decide<F>(&self, message: &InboundMessage, draw: f64, fetcher: &F) -> ResponseAction
    where
        F: MessageFetcher + ?Sized,
    {
        if message.author.is_bot {
            return ResponseAction::Ignore;
        }

        if !message.is_in_guild() {
            return ResponseAction::RedirectToGuild;
        }

        if should_respond(&message.content, draw, self.probability) {
            return ResponseAction::AutoReply(ConversationTarget::from_message(message));
        }

        if let Some(reference_id) = message.reference.as_deref() {
            let referenced = match fetcher.fetch_message(reference_id).await {
                Ok(referenced) => referenced,
                Err(e) => {
                    error!(
                        "Error fetching replied message {} for {}: {}",
                        reference_id, message.id, e
                    );
                    return ResponseAction::Ignore;
                }
            };

            return resolve_reply_chain(message, &referenced, self.bot_id).map_or_else(
                || {
                    debug!("Reply {} needs no response", message.id);
                    ResponseAction::Ignore
                },
                ResponseAction::ReplyChain,
            );
        }

        if message.mentions_user(self.bot_id) {
            return ResponseAction::Mention(ConversationTarget::from_message(message));
        }

        ResponseAction::Ignore
    }
}
