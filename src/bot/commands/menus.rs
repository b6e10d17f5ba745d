//! Menu commands - one per menu kind.

use crate::menus::{MenuOrigin, Reactor};

/// Reactions used for poll options, in order.
pub const POLL_EMOJIS: [&str; 10] = ["1️⃣", "2️⃣", "3️⃣", "4️⃣", "5️⃣", "6️⃣", "7️⃣", "8️⃣", "9️⃣", "🔟"];

/// Splits `|`-separated text into trimmed, non-empty pages.
pub fn split_pages(text: &str) -> Vec<String> {
    text.split('|')
        .map(str::trim)
        .filter(|page| !page.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Pairs each space-separated option with a poll emoji. Extra options are dropped.
pub fn poll_options(text: &str) -> Vec<(&'static str, String)> {
    POLL_EMOJIS
        .iter()
        .copied()
        .zip(text.split_whitespace().map(ToString::to_string))
        .collect()
}

fn origin(author: &poise::serenity_prelude::User, channel_id: u64, guild_id: Option<u64>) -> MenuOrigin {
    MenuOrigin {
        author: Reactor::new(author.id.get(), author.name.clone()),
        channel_id,
        guild_id,
    }
}

mod inner {
    #![allow(missing_docs)]

    use super::{origin, poll_options, split_pages};
    use crate::{
        bot::Context,
        errors::Result,
        menus::{
            callback,
            factory::{self, MenuOption},
            handlers::announce_for_author,
        },
    };
    use std::sync::Arc;

    async fn acknowledge(ctx: Context<'_>) -> Result<()> {
        // Slash invocations need a reply of their own
        if let poise::Context::Application(_) = ctx {
            ctx.send(
                poise::CreateReply::default()
                    .content("Menu created.")
                    .ephemeral(true),
            )
            .await?;
        }
        Ok(())
    }

    fn menu_origin(ctx: Context<'_>) -> crate::menus::MenuOrigin {
        origin(
            ctx.author(),
            ctx.channel_id().get(),
            ctx.guild_id().map(|id| id.get()),
        )
    }

    /// Reaction menus.
    #[poise::command(
        slash_command,
        prefix_command,
        subcommands("confirm", "poll", "pages"),
        subcommand_required
    )]
    pub async fn menu(_ctx: Context<'_>) -> Result<()> {
        Ok(())
    }

    /// Posts a confirmation menu only you can answer.
    #[poise::command(slash_command, prefix_command)]
    pub async fn confirm(ctx: Context<'_>) -> Result<()> {
        let service = &ctx.data().menus;
        let origin = menu_origin(ctx);
        let on_confirm = announce_for_author(origin.author.id, &service.deps().messenger, |user| {
            format!("{} confirmed the action!", user.mention())
        });

        factory::confirm_menu(
            service,
            origin,
            "Confirmation",
            "Do you want to continue?",
            on_confirm,
            None,
            None,
        )
        .await?;
        acknowledge(ctx).await
    }

    /// Posts a poll with one reaction per option (at most ten).
    #[poise::command(slash_command, prefix_command)]
    pub async fn poll(
        ctx: Context<'_>,
        #[description = "Options separated by spaces"]
        #[rest]
        options: String,
    ) -> Result<()> {
        let choices = poll_options(&options);
        if choices.len() < 2 {
            ctx.say("A poll needs at least two options.").await?;
            return Ok(());
        }

        let service = &ctx.data().menus;
        let options = choices
            .into_iter()
            .map(|(emoji, label)| {
                let messenger = Arc::clone(&service.deps().messenger);
                let vote = label.clone();
                MenuOption {
                    emoji: emoji.to_string(),
                    label,
                    on_select: callback(move |interaction| {
                        let messenger = Arc::clone(&messenger);
                        let text = format!("{} voted for {vote}", interaction.user.mention());
                        async move { messenger.say(interaction.channel_id, &text).await }
                    }),
                }
            })
            .collect();

        factory::options_menu(
            service,
            menu_origin(ctx),
            "Poll",
            "React to vote.",
            options,
            None,
        )
        .await?;
        acknowledge(ctx).await
    }

    /// Posts a paged menu; separate pages with `|`.
    #[poise::command(slash_command, prefix_command)]
    pub async fn pages(
        ctx: Context<'_>,
        #[description = "Page texts separated by |"]
        #[rest]
        text: String,
    ) -> Result<()> {
        let service = &ctx.data().menus;
        factory::paginated_menu(service, menu_origin(ctx), "Pages", split_pages(&text), None)
            .await?;
        acknowledge(ctx).await
    }
}

pub use inner::*;
