//! Server information commands.

mod inner {
    #![allow(missing_docs)]

    use crate::{bot::Context, errors::Result};

    const GUILD_ONLY: &str = "This command must be used in a server.";

    /// Shows who owns this server.
    #[poise::command(slash_command, prefix_command)]
    pub async fn owner(ctx: Context<'_>) -> Result<()> {
        // The cache reference must not live across an await
        let owner = ctx
            .guild()
            .map(|guild| (guild.name.clone(), guild.owner_id));

        let reply = match owner {
            Some((name, owner_id)) => {
                format!("The owner of the {name} server is <@{owner_id}>.")
            }
            None => GUILD_ONLY.to_string(),
        };
        ctx.say(reply).await?;
        Ok(())
    }

    /// Shows the server's name, id, owner and member count.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ginfo(ctx: Context<'_>) -> Result<()> {
        let info = ctx.guild().map(|guild| {
            (
                guild.name.clone(),
                guild.id,
                guild.owner_id,
                guild.member_count,
            )
        });

        let Some((name, id, owner_id, member_count)) = info else {
            ctx.say(GUILD_ONLY).await?;
            return Ok(());
        };

        let embed = poise::serenity_prelude::CreateEmbed::new()
            .title(name)
            .field("ID", id.to_string(), true)
            .field("Owner", format!("<@{owner_id}>"), true)
            .field("Members", member_count.to_string(), true);
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }
}

pub use inner::*;
