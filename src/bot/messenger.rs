//! Discord implementation of the menu [`Messenger`] over serenity's HTTP client.

use crate::{
    errors::{Error, Result},
    menus::{
        messenger::Messenger,
        types::{EmbedField, MenuEmbed},
    },
};
use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use std::sync::Arc;

/// Sends menu traffic through the bot's HTTP client.
#[derive(Clone)]
pub struct SerenityMessenger {
    http: Arc<serenity::Http>,
}

impl SerenityMessenger {
    /// Wraps the HTTP client the framework hands out on setup.
    #[must_use]
    pub const fn new(http: Arc<serenity::Http>) -> Self {
        Self { http }
    }
}

fn reaction_type(emoji: &str) -> Result<serenity::ReactionType> {
    serenity::ReactionType::try_from(emoji).map_err(|_| Error::Messaging {
        message: format!("not a valid reaction emoji: {emoji}"),
    })
}

/// Builds the Discord embed for a menu. Empty title or body are omitted.
pub fn create_embed(embed: &MenuEmbed) -> serenity::CreateEmbed {
    let mut builder = serenity::CreateEmbed::new().colour(embed.color);
    if !embed.title.is_empty() {
        builder = builder.title(&embed.title);
    }
    if !embed.description.is_empty() {
        builder = builder.description(&embed.description);
    }
    builder.fields(
        embed
            .fields
            .iter()
            .map(|field| (field.name.clone(), field.value.clone(), true)),
    )
}

/// Reads a Discord embed back into a [`MenuEmbed`].
#[must_use]
pub fn menu_embed(embed: &serenity::Embed) -> MenuEmbed {
    MenuEmbed {
        title: embed.title.clone().unwrap_or_default(),
        description: embed.description.clone().unwrap_or_default(),
        color: embed.colour.map_or(0, |colour| colour.0),
        fields: embed
            .fields
            .iter()
            .map(|field| EmbedField {
                name: field.name.clone(),
                value: field.value.clone(),
            })
            .collect(),
    }
}

fn is_not_found(error: &serenity::Error) -> bool {
    matches!(
        error,
        serenity::Error::Http(serenity::HttpError::UnsuccessfulRequest(response))
            if response.status_code.as_u16() == 404
    )
}

#[async_trait]
impl Messenger for SerenityMessenger {
    async fn send_embed(&self, channel_id: u64, embed: &MenuEmbed) -> Result<u64> {
        let message = serenity::ChannelId::new(channel_id)
            .send_message(
                &*self.http,
                serenity::CreateMessage::new().embed(create_embed(embed)),
            )
            .await?;
        Ok(message.id.get())
    }

    async fn add_reaction(&self, channel_id: u64, message_id: u64, emoji: &str) -> Result<()> {
        serenity::ChannelId::new(channel_id)
            .create_reaction(
                &*self.http,
                serenity::MessageId::new(message_id),
                reaction_type(emoji)?,
            )
            .await?;
        Ok(())
    }

    async fn remove_reaction(
        &self,
        channel_id: u64,
        message_id: u64,
        user_id: u64,
        emoji: &str,
    ) -> Result<()> {
        serenity::ChannelId::new(channel_id)
            .delete_reaction(
                &*self.http,
                serenity::MessageId::new(message_id),
                Some(serenity::UserId::new(user_id)),
                reaction_type(emoji)?,
            )
            .await?;
        Ok(())
    }

    async fn edit_embed(&self, channel_id: u64, message_id: u64, embed: &MenuEmbed) -> Result<()> {
        serenity::ChannelId::new(channel_id)
            .edit_message(
                &*self.http,
                serenity::MessageId::new(message_id),
                serenity::EditMessage::new().embed(create_embed(embed)),
            )
            .await?;
        Ok(())
    }

    async fn fetch_embed(&self, channel_id: u64, message_id: u64) -> Result<Option<MenuEmbed>> {
        match serenity::ChannelId::new(channel_id)
            .message(&*self.http, serenity::MessageId::new(message_id))
            .await
        {
            Ok(message) => Ok(message.embeds.first().map(menu_embed)),
            Err(e) if is_not_found(&e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn say(&self, channel_id: u64, content: &str) -> Result<()> {
        serenity::ChannelId::new(channel_id)
            .say(&*self.http, content)
            .await?;
        Ok(())
    }
}
