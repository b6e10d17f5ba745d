//! Shared test utilities for Asdana.
//!
//! This module provides an in-memory database, menu record fixtures and a
//! recording fake of the chat platform.

use crate::{
    core,
    entities::{MenuType, menu},
    errors::{Error, Result},
    menus::{
        MenuService,
        dispatcher::ReactionEvent,
        messenger::{Messenger, SharedMessenger},
        service::MenuOrigin,
        types::{MenuEmbed, Reactor},
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, prelude::Json};
use serde_json::json;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

/// Discord id of the user that authors fixture menus.
pub const TEST_AUTHOR_ID: u64 = 456;
/// Username stored for [`TEST_AUTHOR_ID`].
pub const TEST_AUTHOR_NAME: &str = "test_author";
/// Channel of fixture menus.
pub const TEST_CHANNEL_ID: u64 = 789;
/// Guild of fixture menus.
pub const TEST_GUILD_ID: u64 = 321;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all database tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a [`MenuService`] over a fresh database and a recording messenger.
pub async fn setup_menu_service() -> Result<(MenuService, RecordingMessenger)> {
    let db = setup_test_db().await?;
    let messenger = RecordingMessenger::new();
    Ok((MenuService::new(db, messenger.shared()), messenger))
}

/// The fixture author in the fixture guild channel.
pub fn test_origin() -> MenuOrigin {
    MenuOrigin {
        author: Reactor::new(TEST_AUTHOR_ID, TEST_AUTHOR_NAME),
        channel_id: TEST_CHANNEL_ID,
        guild_id: Some(TEST_GUILD_ID),
    }
}

/// A reaction by a non-bot user on a fixture channel message.
pub fn test_reaction(message_id: u64, user_id: u64, emoji: &str) -> ReactionEvent {
    ReactionEvent {
        user: Reactor::new(user_id, "reactor"),
        message_id,
        channel_id: TEST_CHANNEL_ID,
        guild_id: Some(TEST_GUILD_ID),
        emoji: emoji.to_string(),
    }
}

/// Inserts a menu record authored by [`TEST_AUTHOR_ID`] with a payload
/// matching its type.
///
/// # Defaults
/// * confirm: ✅ and 🚫
/// * options: 1️⃣ and 2️⃣
/// * paginated: ⬅️ and ➡️ over two pages, on page 0
/// * custom: no reactions
pub async fn insert_test_menu(
    db: &DatabaseConnection,
    message_id: u64,
    menu_type: MenuType,
    expires_at: Option<DateTime<Utc>>,
) -> Result<menu::Model> {
    let (reactions, pages) = match menu_type {
        MenuType::Confirm => (json!(["✅", "🚫"]), None),
        MenuType::Options => (json!(["1️⃣", "2️⃣"]), None),
        MenuType::Paginated => (json!(["⬅️", "➡️"]), Some(json!(["First", "Second"]))),
        MenuType::Custom => (json!([]), None),
    };

    let mut data = json!({
        "title": "Test menu",
        "description": "First",
        "reactions": reactions,
        "author_id": TEST_AUTHOR_ID,
        "channel_id": TEST_CHANNEL_ID,
        "guild_id": TEST_GUILD_ID,
    });
    if let (Some(pages), Some(object)) = (pages, data.as_object_mut()) {
        object.insert("pages".to_string(), pages);
    }

    let current_page = (menu_type == MenuType::Paginated).then_some(0);
    insert_test_menu_with_data(db, message_id, menu_type, current_page, expires_at, data).await
}

/// Inserts a menu record with a custom payload.
pub async fn insert_test_menu_with_data(
    db: &DatabaseConnection,
    message_id: u64,
    menu_type: MenuType,
    current_page: Option<i32>,
    expires_at: Option<DateTime<Utc>>,
    data: Json,
) -> Result<menu::Model> {
    let author = core::user::get_or_create_user(db, TEST_AUTHOR_ID, TEST_AUTHOR_NAME).await?;

    core::menu::insert_menu(
        db,
        core::menu::NewMenuRecord {
            message_id,
            channel_id: TEST_CHANNEL_ID,
            guild_id: Some(TEST_GUILD_ID),
            author_id: TEST_AUTHOR_ID,
            user_id: author.id,
            menu_type,
            current_page,
            created_at: Utc::now(),
            expires_at,
            data,
        },
    )
    .await
}

/// One outbound effect observed by [`RecordingMessenger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessengerCall {
    /// An embed was posted as a new message
    Sent {
        /// Channel posted to
        channel_id: u64,
        /// Id handed back for the new message
        message_id: u64,
        /// What was posted
        embed: MenuEmbed,
    },
    /// The bot reacted to a message
    ReactionAdded {
        /// Channel of the message
        channel_id: u64,
        /// Message reacted to
        message_id: u64,
        /// Emoji added
        emoji: String,
    },
    /// A user's reaction was taken off a message
    ReactionRemoved {
        /// Channel of the message
        channel_id: u64,
        /// Message the reaction was on
        message_id: u64,
        /// Whose reaction it was
        user_id: u64,
        /// Emoji removed
        emoji: String,
    },
    /// A message's embed was replaced
    Edited {
        /// Channel of the message
        channel_id: u64,
        /// Message edited
        message_id: u64,
        /// The new embed
        embed: MenuEmbed,
    },
    /// A plain text message was posted
    Said {
        /// Channel posted to
        channel_id: u64,
        /// Text posted
        content: String,
    },
}

#[derive(Default)]
struct Recording {
    calls: Vec<MessengerCall>,
    messages: HashMap<u64, MenuEmbed>,
    next_message_id: u64,
    fail_add_reaction: bool,
    fail_remove_reaction: bool,
    fail_fetch: bool,
}

/// In-memory [`Messenger`] that records every successful call.
///
/// Sent messages are kept so they can be fetched back; fetching a message
/// that was never sent or seeded returns `Ok(None)`.
#[derive(Clone, Default)]
pub struct RecordingMessenger {
    inner: Arc<Mutex<Recording>>,
}

impl RecordingMessenger {
    /// An empty recorder; sent messages get ids from 1000 up.
    pub fn new() -> Self {
        let messenger = Self::default();
        messenger.with(|r| r.next_message_id = 1000);
        messenger
    }

    /// The same recorder behind the trait object the menu code takes.
    pub fn shared(&self) -> SharedMessenger {
        Arc::new(self.clone())
    }

    fn with<T>(&self, f: impl FnOnce(&mut Recording) -> T) -> T {
        f(&mut self.inner.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Makes a message fetchable, as if it already existed on Discord.
    pub fn seed_message(&self, message_id: u64, embed: MenuEmbed) {
        self.with(|r| r.messages.insert(message_id, embed));
    }

    /// Makes every `add_reaction` fail while `fail` is set.
    pub fn fail_add_reaction(&self, fail: bool) {
        self.with(|r| r.fail_add_reaction = fail);
    }

    /// Makes every `remove_reaction` fail while `fail` is set.
    pub fn fail_remove_reaction(&self, fail: bool) {
        self.with(|r| r.fail_remove_reaction = fail);
    }

    /// Makes every `fetch_embed` fail while `fail` is set.
    pub fn fail_fetch(&self, fail: bool) {
        self.with(|r| r.fail_fetch = fail);
    }

    /// Every successful call, in order.
    pub fn calls(&self) -> Vec<MessengerCall> {
        self.with(|r| r.calls.clone())
    }

    /// Embeds sent, as `(channel_id, embed)`.
    pub fn sent(&self) -> Vec<(u64, MenuEmbed)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                MessengerCall::Sent {
                    channel_id, embed, ..
                } => Some((channel_id, embed)),
                _ => None,
            })
            .collect()
    }

    /// Emojis the bot added to `message_id`, in order.
    pub fn reactions_added(&self, message_id: u64) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                MessengerCall::ReactionAdded {
                    message_id: id,
                    emoji,
                    ..
                } if id == message_id => Some(emoji),
                _ => None,
            })
            .collect()
    }

    /// Reactions removed, as `(message_id, user_id, emoji)`.
    pub fn reactions_removed(&self) -> Vec<(u64, u64, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                MessengerCall::ReactionRemoved {
                    message_id,
                    user_id,
                    emoji,
                    ..
                } => Some((message_id, user_id, emoji)),
                _ => None,
            })
            .collect()
    }

    /// Embed edits, as `(message_id, embed)`.
    pub fn edits(&self) -> Vec<(u64, MenuEmbed)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                MessengerCall::Edited {
                    message_id, embed, ..
                } => Some((message_id, embed)),
                _ => None,
            })
            .collect()
    }

    /// Plain messages, as `(channel_id, content)`.
    pub fn said(&self) -> Vec<(u64, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                MessengerCall::Said {
                    channel_id,
                    content,
                } => Some((channel_id, content)),
                _ => None,
            })
            .collect()
    }
}

fn injected(operation: &str) -> Error {
    Error::Messaging {
        message: format!("injected {operation} failure"),
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send_embed(&self, channel_id: u64, embed: &MenuEmbed) -> Result<u64> {
        Ok(self.with(|r| {
            let message_id = r.next_message_id;
            r.next_message_id += 1;
            r.messages.insert(message_id, embed.clone());
            r.calls.push(MessengerCall::Sent {
                channel_id,
                message_id,
                embed: embed.clone(),
            });
            message_id
        }))
    }

    async fn add_reaction(&self, channel_id: u64, message_id: u64, emoji: &str) -> Result<()> {
        self.with(|r| {
            if r.fail_add_reaction {
                return Err(injected("add reaction"));
            }
            r.calls.push(MessengerCall::ReactionAdded {
                channel_id,
                message_id,
                emoji: emoji.to_string(),
            });
            Ok(())
        })
    }

    async fn remove_reaction(
        &self,
        channel_id: u64,
        message_id: u64,
        user_id: u64,
        emoji: &str,
    ) -> Result<()> {
        self.with(|r| {
            if r.fail_remove_reaction {
                return Err(injected("remove reaction"));
            }
            r.calls.push(MessengerCall::ReactionRemoved {
                channel_id,
                message_id,
                user_id,
                emoji: emoji.to_string(),
            });
            Ok(())
        })
    }

    async fn edit_embed(&self, channel_id: u64, message_id: u64, embed: &MenuEmbed) -> Result<()> {
        self.with(|r| {
            r.messages.insert(message_id, embed.clone());
            r.calls.push(MessengerCall::Edited {
                channel_id,
                message_id,
                embed: embed.clone(),
            });
        });
        Ok(())
    }

    async fn fetch_embed(&self, _channel_id: u64, message_id: u64) -> Result<Option<MenuEmbed>> {
        self.with(|r| {
            if r.fail_fetch {
                return Err(injected("fetch"));
            }
            Ok(r.messages.get(&message_id).cloned())
        })
    }

    async fn say(&self, channel_id: u64, content: &str) -> Result<()> {
        self.with(|r| {
            r.calls.push(MessengerCall::Said {
                channel_id,
                content: content.to_string(),
            });
        });
        Ok(())
    }
}
