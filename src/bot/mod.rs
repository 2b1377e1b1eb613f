//! Bot layer - Discord-specific interface.
//!
//! Wires the framework-agnostic core into poise: the `/whitelist` command,
//! the interaction gate hooks and the message event handler.

/// Discord command implementations
pub mod commands;
/// Discord event handlers and framework hooks
pub mod handlers;

use crate::{
    config::{AppConfig, PolicyConfig},
    core::{completion::CompletionBackend, whitelist::DatabaseWhitelistStore},
    errors::Error,
};
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Shared data available to all commands and event handlers.
pub struct BotData {
    /// Authorization policy, read once at startup
    pub policy: PolicyConfig,
    /// Settings from `config.toml`
    pub app_config: AppConfig,
    /// GPT whitelist
    pub whitelist: DatabaseWhitelistStore,
    /// Completion backend used by the message path
    pub completion: Arc<dyn CompletionBackend>,
}

impl BotData {
    /// Bundles the shared state handed to every handler.
    #[must_use]
    pub fn new(
        policy: PolicyConfig,
        app_config: AppConfig,
        whitelist: DatabaseWhitelistStore,
        completion: Arc<dyn CompletionBackend>,
    ) -> Self {
        Self {
            policy,
            app_config,
            whitelist,
            completion,
        }
    }
}

/// Poise context for this bot.
pub type Context<'a> = poise::Context<'a, BotData, Error>;

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        // Dispatcher failures are logged and swallowed; the user gets no
        // compensating reply.
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error executing command `{}`: {}", ctx.command().name, error);
            handlers::interaction::record_invocation(ctx).await;
        }
        // The gate rejected the interaction; stay silent.
        poise::FrameworkError::CommandCheckFailed { error: None, .. } => {}
        poise::FrameworkError::CommandCheckFailed {
            error: Some(error),
            ctx,
            ..
        } => {
            error!("Gate check for `{}` failed: {}", ctx.command().name, error);
        }
        poise::FrameworkError::EventHandler { error, event, .. } => {
            error!("Error handling {} event: {}", event.snake_case_name(), error);
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Builds the framework and runs the client until it stops.
#[instrument(skip_all)]
pub async fn run_bot(token: String, data: BotData) -> Result<(), serenity::Error> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![commands::whitelist()],
            command_check: Some(|ctx| Box::pin(handlers::interaction::admit_command(ctx))),
            post_command: |ctx| Box::pin(handlers::interaction::record_invocation(ctx)),
            event_handler: |ctx, event, framework, data| {
                Box::pin(handlers::event_handler(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::DIRECT_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {:?}", e))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {:?}", e))
}
