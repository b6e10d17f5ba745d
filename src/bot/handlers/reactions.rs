//! Gateway reaction events → menu dispatch.

use crate::{
    bot::BotData,
    errors::Result,
    menus::{DispatchOutcome, ReactionEvent, Reactor},
};
use poise::serenity_prelude as serenity;
use tracing::{debug, warn};

/// Converts a serenity reaction into a menu event.
///
/// `bot_id` is our own user id; reactions we add count as bot reactions.
/// Without a guild member attached (direct messages) the user is looked up.
pub async fn reaction_event(
    ctx: &serenity::Context,
    reaction: &serenity::Reaction,
    bot_id: serenity::UserId,
) -> Option<ReactionEvent> {
    let Some(user_id) = reaction.user_id else {
        warn!("Reaction without user_id, skipping");
        return None;
    };

    let (name, is_bot) = match &reaction.member {
        Some(member) => (member.user.name.clone(), member.user.bot),
        None => match reaction.user(ctx).await {
            Ok(user) => (user.name, user.bot),
            Err(e) => {
                debug!(user_id = user_id.get(), "Could not resolve reacting user: {e}");
                (String::new(), false)
            }
        },
    };

    Some(ReactionEvent {
        user: Reactor {
            id: user_id.get(),
            name,
            is_bot: is_bot || user_id == bot_id,
        },
        message_id: reaction.message_id.get(),
        channel_id: reaction.channel_id.get(),
        guild_id: reaction.guild_id.map(serenity::GuildId::get),
        emoji: reaction.emoji.to_string(),
    })
}

/// Routes a reaction-add to the menu subsystem.
pub async fn on_reaction_add(
    ctx: &serenity::Context,
    reaction: &serenity::Reaction,
    bot_id: serenity::UserId,
    data: &BotData,
) -> Result<()> {
    let Some(event) = reaction_event(ctx, reaction, bot_id).await else {
        return Ok(());
    };

    let outcome = data.menus.dispatch(&event).await;
    if outcome != DispatchOutcome::NoMenu && outcome != DispatchOutcome::IgnoredBot {
        debug!(
            message_id = event.message_id,
            emoji = %event.emoji,
            ?outcome,
            "Dispatched menu reaction"
        );
    }
    Ok(())
}
