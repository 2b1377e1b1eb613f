//! Discord event handlers and framework hooks.

/// Interaction gate hooks (command check and invocation logging)
pub mod interaction;
/// Message event handler driving the response decision engine
pub mod message;

use crate::{bot::BotData, errors::Result};
use poise::serenity_prelude as serenity;

/// Routes gateway events that poise does not handle itself.
pub async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    framework: poise::FrameworkContext<'_, BotData, crate::errors::Error>,
    data: &BotData,
) -> Result<()> {
    if let serenity::FullEvent::Message { new_message } = event {
        message::on_message(ctx, new_message, framework.bot_id, data).await;
    }
    Ok(())
}
