//! Completion invocation.
//!
//! The backend itself is opaque; this module only defines its interface and
//! the typing-complete-reply sequence around it.

use crate::{
    core::message::{Author, ConversationTarget, ReplyChannel, ReplyPayload},
    errors::Result,
};
use async_trait::async_trait;
use tracing::instrument;

/// A generative-text service.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Produces a reply to `content` said by `user`.
    async fn complete(&self, content: &str, user: &Author) -> Result<ReplyPayload>;
}

/// Sends a typing indicator, asks the backend about `target` and replies with
/// whatever it returns. Nothing is retried.
#[instrument(skip_all, fields(author = %target.author.id))]
pub async fn invoke<C, B>(channel: &C, backend: &B, target: &ConversationTarget) -> Result<()>
where
    C: ReplyChannel + ?Sized,
    B: CompletionBackend + ?Sized,
{
    channel.send_typing().await?;
    let payload = backend.complete(&target.content, &target.author).await?;
    channel.reply(payload).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::test_utils::{FakeBackend, FakePlatform, Sent, human, message};

    #[tokio::test]
    async fn test_invoke_types_then_replies() -> Result<()> {
        let platform = FakePlatform::default();
        let backend = FakeBackend::replying("Yes, those are genuine.");
        let target = ConversationTarget::from_message(&message("1", human("5"), "real?"));

        invoke(&platform, &backend, &target).await?;

        assert_eq!(
            platform.sent(),
            vec![
                Sent::Typing,
                Sent::Reply(ReplyPayload::Text("Yes, those are genuine.".to_string()))
            ]
        );
        assert_eq!(backend.requests(), vec![("real?".to_string(), "5".to_string())]);
        Ok(())
    }

    #[tokio::test]
    async fn test_backend_failure_propagates_without_reply() {
        let platform = FakePlatform::default();
        let backend = FakeBackend::failing();
        let target = ConversationTarget::from_message(&message("1", human("5"), "real?"));

        let result = invoke(&platform, &backend, &target).await;

        assert!(matches!(result, Err(Error::Completion { .. })));
        assert_eq!(platform.sent(), vec![Sent::Typing]);
    }
}
