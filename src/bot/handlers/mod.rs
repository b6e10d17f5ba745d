//! Discord gateway event handlers
//!
//! Slash and prefix commands are routed by poise; everything else the bot
//! listens to arrives here through [`event_handler`].

/// Reaction events driving menus
pub mod reactions;

use crate::{bot::BotData, errors::Error};
use poise::serenity_prelude as serenity;
use tracing::info;

/// Handles the gateway events poise passes through.
pub async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    framework: poise::FrameworkContext<'_, BotData, Error>,
    data: &BotData,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            info!(
                guilds = data_about_bot.guilds.len(),
                "{} is connected", data_about_bot.user.name
            );
        }
        serenity::FullEvent::ReactionAdd { add_reaction } => {
            reactions::on_reaction_add(ctx, add_reaction, framework.bot_id, data).await?;
        }
        _ => {}
    }
    Ok(())
}
