//! Menu creation and the service handle the bot layer holds on to.

use crate::{
    core::{self, menu::NewMenuRecord},
    entities::MenuType,
    errors::Result,
    menus::{
        dispatcher::{self, DispatchOutcome, ReactionEvent},
        handlers::HandlerDeps,
        messenger::SharedMessenger,
        registry::{ActiveMenu, MenuRegistry},
        restore::{self, RestoreSummary},
        sweeper,
        types::{
            DEFAULT_COLOR, EmbedField, MenuEmbed, MenuPayload, MenuTimeout, ReactionCallback,
            Reactor, classify,
        },
    },
};
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use serde_json::{Map, Value};
use tracing::{info, instrument, warn};

/// Timeout used when a request does not set one.
pub const DEFAULT_TIMEOUT: MenuTimeout = MenuTimeout::Seconds(60);

/// Where a menu is created and on whose behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOrigin {
    /// The invoking user, who becomes the menu's author
    pub author: Reactor,
    /// Channel to post the menu in
    pub channel_id: u64,
    /// Guild of the channel, None in direct messages
    pub guild_id: Option<u64>,
}

/// Builder for a new menu.
pub struct MenuRequest {
    origin: MenuOrigin,
    title: String,
    description: String,
    reactions: Vec<(String, ReactionCallback)>,
    color: u32,
    timeout: MenuTimeout,
    fields: Vec<EmbedField>,
    pages: Option<Vec<String>>,
    extra: Map<String, Value>,
}

impl MenuRequest {
    /// Starts a request with no reactions, the default color and a 60s timeout.
    pub fn new(origin: MenuOrigin, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            origin,
            title: title.into(),
            description: description.into(),
            reactions: Vec::new(),
            color: DEFAULT_COLOR,
            timeout: DEFAULT_TIMEOUT,
            fields: Vec::new(),
            pages: None,
            extra: Map::new(),
        }
    }

    /// Binds `emoji` to `handler`. Reactions are added in call order; binding
    /// the same emoji twice keeps its first position and the last handler.
    #[must_use]
    pub fn reaction(mut self, emoji: impl Into<String>, handler: ReactionCallback) -> Self {
        let emoji = emoji.into();
        if let Some(slot) = self.reactions.iter_mut().find(|(e, _)| *e == emoji) {
            slot.1 = handler;
        } else {
            self.reactions.push((emoji, handler));
        }
        self
    }

    /// Embed color.
    #[must_use]
    pub const fn color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    /// How long the menu accepts reactions.
    #[must_use]
    pub const fn timeout(mut self, timeout: MenuTimeout) -> Self {
        self.timeout = timeout;
        self
    }

    /// Adds an inline embed field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Page contents, stored so paging survives a restart.
    #[must_use]
    pub fn pages(mut self, pages: Vec<String>) -> Self {
        self.pages = Some(pages);
        self
    }

    /// Extra payload entry persisted with the menu.
    #[must_use]
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// The embed this request renders to.
    #[must_use]
    pub fn embed(&self) -> MenuEmbed {
        MenuEmbed {
            title: self.title.clone(),
            description: self.description.clone(),
            color: self.color,
            fields: self.fields.clone(),
        }
    }

    /// The menu's author.
    #[must_use]
    pub const fn origin(&self) -> &MenuOrigin {
        &self.origin
    }
}

/// A menu that was sent and registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMenu {
    /// Message carrying the menu
    pub message_id: u64,
    /// Channel of the message
    pub channel_id: u64,
    /// Kind derived from the reaction set
    pub menu_type: MenuType,
    /// When the menu stops accepting reactions
    pub expires_at: Option<DateTime<Utc>>,
}

/// Entry point to the menu subsystem: creation, dispatch, restoration and sweeping.
///
/// Cloning is cheap; clones share the registry.
#[derive(Clone)]
pub struct MenuService {
    deps: HandlerDeps,
    registry: MenuRegistry,
}

impl MenuService {
    /// Creates a service with an empty registry.
    #[must_use]
    pub fn new(db: DatabaseConnection, messenger: SharedMessenger) -> Self {
        Self {
            deps: HandlerDeps { db, messenger },
            registry: MenuRegistry::new(),
        }
    }

    /// The in-process registry.
    #[must_use]
    pub const fn registry(&self) -> &MenuRegistry {
        &self.registry
    }

    /// Database and messenger handles.
    #[must_use]
    pub const fn deps(&self) -> &HandlerDeps {
        &self.deps
    }

    /// Sends the menu, persists its record and registers it in memory.
    ///
    /// A failure after sending leaves the message behind but registers
    /// nothing, so its reactions are ignored.
    #[instrument(skip(self, request), fields(title = %request.title))]
    pub async fn create_menu(&self, request: MenuRequest) -> Result<SentMenu> {
        let embed = request.embed();
        let MenuRequest {
            origin,
            title,
            description,
            reactions,
            timeout,
            pages,
            extra,
            ..
        } = request;
        let messenger = &self.deps.messenger;

        let message_id = messenger.send_embed(origin.channel_id, &embed).await?;

        for (emoji, _) in &reactions {
            if let Err(e) = messenger
                .add_reaction(origin.channel_id, message_id, emoji)
                .await
            {
                warn!(message_id, emoji = %emoji, "Could not add menu reaction: {e}");
            }
        }

        let menu_type = classify(reactions.iter().map(|(emoji, _)| emoji.as_str()));
        let emojis: Vec<String> = reactions.iter().map(|(emoji, _)| emoji.clone()).collect();
        let created_at = Utc::now();
        let expires_at = timeout.expires_at(created_at);

        let user =
            core::user::get_or_create_user(&self.deps.db, origin.author.id, &origin.author.name)
                .await?;

        let payload = MenuPayload {
            title,
            description,
            reactions: emojis,
            author_id: origin.author.id,
            channel_id: origin.channel_id,
            guild_id: origin.guild_id.unwrap_or(0),
            pages,
            extra,
        };

        core::menu::insert_menu(
            &self.deps.db,
            NewMenuRecord {
                message_id,
                channel_id: origin.channel_id,
                guild_id: origin.guild_id,
                author_id: origin.author.id,
                user_id: user.id,
                menu_type,
                current_page: (menu_type == MenuType::Paginated).then_some(0),
                created_at,
                expires_at,
                data: payload.to_json()?,
            },
        )
        .await?;

        // Only a persisted menu is registered
        self.registry
            .insert(
                message_id,
                ActiveMenu {
                    handlers: reactions.into_iter().collect(),
                    timeout,
                    created_at,
                    author_id: origin.author.id,
                },
            )
            .await;

        info!(message_id, ?menu_type, %timeout, "Created reaction menu");

        Ok(SentMenu {
            message_id,
            channel_id: origin.channel_id,
            menu_type,
            expires_at,
        })
    }

    /// Routes a reaction-add event to the menu it targets.
    pub async fn dispatch(&self, event: &ReactionEvent) -> DispatchOutcome {
        dispatcher::dispatch(&self.registry, self.deps.messenger.as_ref(), event).await
    }

    /// Rebuilds the registry from stored records.
    pub async fn restore(&self) -> Result<RestoreSummary> {
        restore::restore_menus(&self.deps, &self.registry).await
    }

    /// Runs one expiry sweep.
    pub async fn sweep_expired(&self, batch_size: u64) -> Result<u64> {
        sweeper::sweep_expired(&self.deps.db, &self.registry, batch_size).await
    }
}
