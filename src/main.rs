use gpt_gatekeeper::{
    backend::OpenAiBackend,
    bot::{self, BotData},
    config::{self, PolicyConfig, database},
    core::whitelist::DatabaseWhitelistStore,
    errors::{Error, Result},
};
use dotenvy::dotenv;
use std::{env, sync::Arc};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, non-fatal since env vars can be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Policy from the environment, everything else from config.toml
    let policy = PolicyConfig::from_env();
    info!(
        admins = policy.admin_ids.len(),
        open_mode = policy.server_whitelist.is_none(),
        logging = policy.logging,
        gpt_whitelist_required = policy.require_gpt_whitelist,
        "Loaded authorization policy"
    );

    let config_path =
        env::var("CONFIG_PATH").unwrap_or_else(|_| config::DEFAULT_CONFIG_PATH.to_string());
    let app_config = config::load_app_config(&config_path)
        .inspect_err(|e| error!("Failed to load {}: {}", config_path, e))?;

    // 4. Database and whitelist store
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;
    let whitelist = DatabaseWhitelistStore::new(db);

    // 5. Completion backend
    let api_key = env::var("OPENAI_API_KEY")
        .inspect_err(|e| error!("OPENAI_API_KEY not found: {}", e))?;
    let completion = OpenAiBackend::new(&api_key, app_config.completion.clone())?;

    // 6. Run the bot
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))?;

    let data = BotData::new(policy, app_config, whitelist, Arc::new(completion));
    bot::run_bot(token, data).await.map_err(Error::from)?;

    Ok(())
}
