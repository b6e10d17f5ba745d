//! General Discord commands - ping and help.
//! These don't touch the database or the menu subsystem.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{bot::Context, errors::Result};

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: Context<'_>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: Context<'_>) -> Result<()> {
        let help_text = "**Asdana Help**\n\
        Commands work as slash commands or with the configured prefix.\n\n\
        **Server**\n\
        • `/owner` - Shows who owns this server.\n\
        • `/ginfo` - Shows the server's name, id, owner and member count.\n\n\
        **Random**\n\
        • `/random [floor] [ceiling]` - Picks a number, 1 to 100 by default.\n\
        • `/roll [sides]` - Rolls a die (20 sides unless told otherwise).\n\
        • `/choose <options...>` - Picks one of the space-separated options.\n\n\
        **Menus**\n\
        • `/menu confirm` - Posts a ✅/🚫 confirmation menu.\n\
        • `/menu poll <options...>` - Posts a poll with one reaction per option.\n\
        • `/menu pages <text>` - Posts a paged menu; separate pages with `|`.\n\n\
        **Utility**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        let reply = match &ctx.data().config.description {
            Some(description) => format!("{description}\n\n{help_text}"),
            None => help_text.to_string(),
        };
        ctx.say(reply).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
