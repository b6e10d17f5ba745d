//! The messaging seam between the menu subsystem and the chat platform.
//!
//! The menu code only ever talks to Discord through this trait; the bot layer
//! provides the serenity implementation and tests provide a recording fake.

use crate::{errors::Result, menus::types::MenuEmbed};
use async_trait::async_trait;
use std::sync::Arc;

/// Outbound operations the menu subsystem needs from the chat platform.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Sends an embed to a channel and returns the new message id.
    async fn send_embed(&self, channel_id: u64, embed: &MenuEmbed) -> Result<u64>;

    /// Adds the bot's own reaction to a message.
    async fn add_reaction(&self, channel_id: u64, message_id: u64, emoji: &str) -> Result<()>;

    /// Removes `user_id`'s reaction from a message.
    async fn remove_reaction(
        &self,
        channel_id: u64,
        message_id: u64,
        user_id: u64,
        emoji: &str,
    ) -> Result<()>;

    /// Replaces the embed of an existing message.
    async fn edit_embed(&self, channel_id: u64, message_id: u64, embed: &MenuEmbed) -> Result<()>;

    /// Fetches the first embed of a message.
    ///
    /// `Ok(None)` means the message (or its embed) no longer exists.
    async fn fetch_embed(&self, channel_id: u64, message_id: u64) -> Result<Option<MenuEmbed>>;

    /// Sends a plain text message to a channel.
    async fn say(&self, channel_id: u64, content: &str) -> Result<()>;
}

/// Shared handle to the messenger.
pub type SharedMessenger = Arc<dyn Messenger>;
