//! Carries out the decision engine's verdict for one message.

use crate::{
    config::{PolicyConfig, RedirectConfig},
    core::{
        completion::{self, CompletionBackend},
        decision::ResponseAction,
        message::{EMBED_COLOUR, EmbedPayload, InboundMessage, ReplyChannel, ReplyPayload},
        policy,
        whitelist::WhitelistStore,
    },
    errors::Result,
};
use tracing::debug;

/// The embed sent to users who message the bot outside a guild.
#[must_use]
pub fn redirect_payload(bot_name: &str, redirect: &RedirectConfig) -> ReplyPayload {
    ReplyPayload::Embed(EmbedPayload {
        colour: EMBED_COLOUR,
        fields: vec![(
            format!("**{bot_name}**"),
            format!(
                "To better assist you, please use our bot within the [{}]({}).\n\
                 Head over there for a seamless experience. See you on the server!",
                redirect.server_name, redirect.invite_url
            ),
        )],
        ..EmbedPayload::default()
    })
}

/// Executes [`ResponseAction`]s against a channel.
pub struct Responder<'a> {
    /// Authorization settings, for the optional completion gate
    pub policy: &'a PolicyConfig,
    /// Redirect target for direct messages
    pub redirect: &'a RedirectConfig,
    /// Name shown in the redirect embed
    pub bot_name: &'a str,
    /// Completion backend
    pub backend: &'a dyn CompletionBackend,
    /// GPT whitelist
    pub whitelist: &'a dyn WhitelistStore,
}

impl Responder<'_> {
    /// Performs `action`, triggered by `message`, on `channel`.
    ///
    /// When completions require whitelisting, a completion action for an
    /// author who is not on the whitelist is dropped silently.
    pub async fn execute<C>(
        &self,
        message: &InboundMessage,
        action: &ResponseAction,
        channel: &C,
    ) -> Result<()>
    where
        C: ReplyChannel + ?Sized,
    {
        match action {
            ResponseAction::Ignore => Ok(()),
            ResponseAction::RedirectToGuild => {
                channel
                    .reply(redirect_payload(self.bot_name, self.redirect))
                    .await
            }
            ResponseAction::AutoReply(target)
            | ResponseAction::ReplyChain(target)
            | ResponseAction::Mention(target) => {
                if self.policy.require_gpt_whitelist
                    && !policy::is_user_whitelisted(self.whitelist, &message.author.id).await?
                {
                    debug!(
                        "Author {} is not whitelisted, dropping message {}",
                        message.author.id, message.id
                    );
                    return Ok(());
                }
                completion::invoke(channel, self.backend, target).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::panic)]
    use super::*;
    use crate::core::message::ConversationTarget;
    use crate::errors::Error;
    use crate::test_utils::{FakeBackend, FakePlatform, Sent, human, message, setup_test_store};

    fn gated_policy() -> PolicyConfig {
        PolicyConfig {
            require_gpt_whitelist: true,
            ..PolicyConfig::default()
        }
    }

    #[tokio::test]
    async fn test_redirect_sends_embed_only() -> Result<()> {
        let store = setup_test_store().await?;
        let backend = FakeBackend::replying("unused");
        let policy = PolicyConfig::default();
        let redirect = RedirectConfig::default();
        let responder = Responder {
            policy: &policy,
            redirect: &redirect,
            bot_name: "Helper",
            backend: &backend,
            whitelist: &store,
        };
        let platform = FakePlatform::default();
        let msg = message("1", human("5"), "hi").in_dm();

        responder
            .execute(&msg, &ResponseAction::RedirectToGuild, &platform)
            .await?;

        let sent = platform.sent();
        assert_eq!(sent.len(), 1);
        let Sent::Reply(ReplyPayload::Embed(embed)) = &sent[0] else {
            panic!("expected an embed reply, got {sent:?}");
        };
        assert_eq!(embed.colour, EMBED_COLOUR);
        assert_eq!(embed.fields[0].0, "**Helper**");
        assert!(embed.fields[0].1.contains("https://airreps.link/discord"));
        assert!(backend.requests().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_ignore_does_nothing() -> Result<()> {
        let store = setup_test_store().await?;
        let backend = FakeBackend::replying("unused");
        let policy = PolicyConfig::default();
        let redirect = RedirectConfig::default();
        let responder = Responder {
            policy: &policy,
            redirect: &redirect,
            bot_name: "Helper",
            backend: &backend,
            whitelist: &store,
        };
        let platform = FakePlatform::default();

        responder
            .execute(&message("1", human("5"), "hi"), &ResponseAction::Ignore, &platform)
            .await?;

        assert!(platform.sent().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_completion_without_gate_ignores_whitelist() -> Result<()> {
        let store = setup_test_store().await?;
        let backend = FakeBackend::replying("Sure.");
        let policy = PolicyConfig::default();
        let redirect = RedirectConfig::default();
        let responder = Responder {
            policy: &policy,
            redirect: &redirect,
            bot_name: "Helper",
            backend: &backend,
            whitelist: &store,
        };
        let platform = FakePlatform::default();
        let msg = message("1", human("5"), "help me?");
        let action = ResponseAction::Mention(ConversationTarget::from_message(&msg));

        responder.execute(&msg, &action, &platform).await?;

        assert_eq!(
            platform.sent(),
            vec![Sent::Typing, Sent::Reply(ReplyPayload::Text("Sure.".to_string()))]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_gate_drops_unlisted_author() -> Result<()> {
        let store = setup_test_store().await?;
        let backend = FakeBackend::replying("Sure.");
        let policy = gated_policy();
        let redirect = RedirectConfig::default();
        let responder = Responder {
            policy: &policy,
            redirect: &redirect,
            bot_name: "Helper",
            backend: &backend,
            whitelist: &store,
        };
        let platform = FakePlatform::default();
        let msg = message("1", human("5"), "help me?");
        let action = ResponseAction::Mention(ConversationTarget::from_message(&msg));

        responder.execute(&msg, &action, &platform).await?;

        assert!(platform.sent().is_empty());
        assert!(backend.requests().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_gate_checks_speaker_not_forwarded_author() -> Result<()> {
        let store = setup_test_store().await?;
        store.insert("5").await?;
        let backend = FakeBackend::replying("Sure.");
        let policy = gated_policy();
        let redirect = RedirectConfig::default();
        let responder = Responder {
            policy: &policy,
            redirect: &redirect,
            bot_name: "Helper",
            backend: &backend,
            whitelist: &store,
        };
        let platform = FakePlatform::default();
        let referenced = message("1", human("9"), "are these legit");
        let msg = message("2", human("5"), "<@42>").replying_to("1");
        let action = ResponseAction::ReplyChain(ConversationTarget::from_message(&referenced));

        responder.execute(&msg, &action, &platform).await?;

        assert_eq!(
            backend.requests(),
            vec![("are these legit".to_string(), "9".to_string())]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_backend_failure_sends_no_reply() -> Result<()> {
        let store = setup_test_store().await?;
        let backend = FakeBackend::failing();
        let policy = PolicyConfig::default();
        let redirect = RedirectConfig::default();
        let responder = Responder {
            policy: &policy,
            redirect: &redirect,
            bot_name: "Helper",
            backend: &backend,
            whitelist: &store,
        };
        let platform = FakePlatform::default();
        let msg = message("1", human("5"), "is this a real one?");
        let action = ResponseAction::AutoReply(ConversationTarget::from_message(&msg));

        let result = responder.execute(&msg, &action, &platform).await;

        assert!(matches!(result, Err(Error::Completion { .. })));
        assert_eq!(platform.sent(), vec![Sent::Typing]);
        assert_eq!(backend.requests().len(), 1);
        Ok(())
    }
}
