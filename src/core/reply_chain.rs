//! Reply-chain resolution.
//!
//! When a message replies to another one, decides which of the two should be
//! sent to the completion backend and as whose words.

use crate::core::message::{ConversationTarget, InboundMessage};
use regex::Regex;
use std::{borrow::Cow, sync::LazyLock};

#[allow(clippy::expect_used)] // Pattern is a compile-time constant
static MENTION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<@!?\d+>").expect("mention pattern is valid"));

/// Removes every `<@id>` / `<@!id>` user mention token from `text`.
#[must_use]
pub fn strip_mentions(text: &str) -> Cow<'_, str> {
    MENTION_PATTERN.replace_all(text, "")
}

/// Picks what to forward when `current` replies to `referenced`.
///
/// * A referenced message with no text besides mentions yields nothing.
/// * A human answering the bot gets their own message completed. This branch
///   wins even when the human also mentions the bot, so the bot never
///   re-answers its own previous answer.
/// * A human mentioning the bot under someone else's message gets that
///   message completed, attributed to its author.
#[must_use]
pub fn resolve_reply_chain(
    current: &InboundMessage,
    referenced: &InboundMessage,
    bot_id: &str,
) -> Option<ConversationTarget> {
    if strip_mentions(&referenced.content).trim().is_empty() {
        return None;
    }

    let replies_to_bot = referenced.author.id == bot_id;

    if replies_to_bot && current.author.id != bot_id {
        Some(ConversationTarget::from_message(current))
    } else if current.mentions_user(bot_id) && !current.author.is_bot {
        Some(ConversationTarget::from_message(referenced))
    } else {
        None
    }
}
