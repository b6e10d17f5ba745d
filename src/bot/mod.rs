//! Bot layer - Discord-specific interface and command handlers
//!
//! This module wires the poise framework: the command table, the gateway
//! event handler feeding reaction menus, startup restoration of menus and
//! the background expiry sweeper.

/// Discord command implementations
pub mod commands;
/// Gateway event handlers
pub mod handlers;
/// Serenity-backed menu messenger
pub mod messenger;

use crate::{
    config::{Settings, bot::BotConfig},
    errors::{Error, Result},
    menus::{MenuService, SharedMessenger, sweeper},
};
use messenger::SerenityMessenger;
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument};

/// Shared data available to all bot commands and event handlers.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Reaction menu subsystem
    pub menus: MenuService,
    /// Process settings
    pub settings: Settings,
    /// Bot configuration from `config.toml`
    pub config: BotConfig,
}

/// Poise context with our data and error types.
pub type Context<'a> = poise::Context<'a, BotData, Error>;

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to set up bot: {error}");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {error}", ctx.command().qualified_name);
            if let Err(e) = ctx.say(format!("An error occurred: {error}")).await {
                error!("Failed to send error message: {e}");
            }
        }
        poise::FrameworkError::EventHandler { error, event, .. } => {
            error!("Error handling {}: {error}", event.snake_case_name());
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {e}");
            }
        }
    }
}

fn prefix_options(config: &BotConfig) -> poise::PrefixFrameworkOptions<BotData, Error> {
    // Prefixes live for the whole process
    let additional_prefixes = config
        .additional_prefixes
        .iter()
        .map(|prefix| poise::Prefix::Literal(Box::leak(prefix.clone().into_boxed_str())))
        .collect();

    poise::PrefixFrameworkOptions {
        prefix: Some(config.prefix.clone()),
        additional_prefixes,
        mention_as_prefix: config.mention_as_prefix,
        ..Default::default()
    }
}

async fn register_commands(
    ctx: &serenity::Context,
    commands: &[poise::Command<BotData, Error>],
    testing_guild_id: Option<u64>,
) -> Result<()> {
    if let Some(guild_id) = testing_guild_id {
        info!(guild_id, "Registering commands in testing guild...");
        poise::builtins::register_in_guild(ctx, commands, serenity::GuildId::new(guild_id))
            .await?;
    } else {
        info!("Registering commands globally...");
        poise::builtins::register_globally(ctx, commands).await?;
    }
    Ok(())
}

/// Runs the bot until the gateway shuts down.
///
/// Cancelling `shutdown` (or Ctrl+C) stops the sweeper and closes all shards.
#[instrument(skip_all)]
pub async fn run_bot(
    token: String,
    settings: Settings,
    config: BotConfig,
    database: DatabaseConnection,
    shutdown: CancellationToken,
) -> Result<()> {
    let commands = commands::all();
    commands::validate_command_table(&commands)?;

    let sweeper_shutdown = shutdown.clone();
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands,
            prefix_options: prefix_options(&config),
            on_error: |error| Box::pin(on_error(error)),
            event_handler: |ctx, event, framework, data| {
                Box::pin(handlers::event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                register_commands(ctx, &framework.options().commands, settings.testing_guild_id)
                    .await?;

                let messenger: SharedMessenger =
                    Arc::new(SerenityMessenger::new(Arc::clone(&ctx.http)));
                let menus = MenuService::new(database.clone(), messenger);

                if let Err(e) = menus.restore().await {
                    error!("Failed to restore menus: {e}");
                }

                tokio::spawn(sweeper::run(
                    database.clone(),
                    menus.registry().clone(),
                    settings.sweep,
                    sweeper::TokioSleeper,
                    sweeper_shutdown,
                ));

                Ok(BotData {
                    database,
                    menus,
                    settings,
                    config,
                })
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::GUILD_MESSAGE_REACTIONS
        | serenity::GatewayIntents::DIRECT_MESSAGE_REACTIONS
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::Client::builder(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {e}"))?;

    let shard_manager = Arc::clone(&client.shard_manager);
    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => info!("Ctrl+C received, shutting down..."),
            () = shutdown.cancelled() => {}
        }
        shutdown.cancel();
        shard_manager.shutdown_all().await;
    });

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {e}"))?;

    info!("Bot stopped");
    Ok(())
}
