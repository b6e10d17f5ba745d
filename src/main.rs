use asdana::{
    bot,
    config::{self, Settings, settings::DEFAULT_LOG_LEVEL},
    errors::{Error, Result},
    logging,
};
use dotenvy::dotenv;
use std::env;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load .env so LOG_LEVEL and friends are visible below
    let dotenv_result = dotenv();

    // 2. Settings first, so LOG_LEVEL reaches the subscriber
    let settings = Settings::from_env();

    // 3. Initialize tracing: RUST_LOG wins, then LOG_LEVEL
    logging::init(
        settings
            .as_ref()
            .map_or(DEFAULT_LOG_LEVEL, |settings| settings.log_level.as_str()),
    );

    if dotenv_result.is_err() {
        info!("No .env file loaded, using the process environment.");
    }

    // 4. Settings and bot configuration
    let settings = settings.inspect_err(|e| error!("Invalid settings: {e}"))?;
    let bot_config = config::bot::load_default_config()
        .inspect_err(|e| error!("Invalid config.toml: {e}"))?
        .bot;
    info!("Configuration loaded.");

    // 5. Database
    let database = config::database::create_connection(&settings.database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    config::database::create_tables(&database)
        .await
        .inspect(|()| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {e}"))?;

    // 6. Run the bot; the token is read right before use and never stored
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {e}"))
        .map_err(Error::EnvVar)?;

    let shutdown = CancellationToken::new();
    let result = bot::run_bot(token, settings, bot_config, database.clone(), shutdown.clone()).await;

    // 7. Stop background work and release the database
    shutdown.cancel();
    if let Err(e) = database.close().await {
        error!("Failed to close database: {e}");
    }

    result
}
