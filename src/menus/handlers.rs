//! Handler factory - rebuilds emoji → callback bindings from a menu record.
//!
//! Restored menus never get their creation-time closures back; they get the
//! generic behaviour for their [`MenuType`]. Custom menus have no generic
//! behaviour and come back with no handlers at all.

use crate::{
    core::{self, ids},
    entities::{MenuType, menu},
    errors::{Error, Result},
    menus::{
        messenger::SharedMessenger,
        types::{
            CANCEL_EMOJI, CONFIRM_EMOJI, Handlers, MenuEmbed, MenuInteraction, MenuPayload,
            NEXT_EMOJI, PREVIOUS_EMOJI, ReactionCallback, Reactor, callback,
        },
    },
};
use sea_orm::DatabaseConnection;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// What generic handlers need to act: the database and the chat platform.
#[derive(Clone)]
pub struct HandlerDeps {
    /// Database handle for persisting page changes
    pub db: DatabaseConnection,
    /// Chat platform
    pub messenger: SharedMessenger,
}

/// Builds the generic handlers for a stored menu.
///
/// `embed` is the embed currently displayed on the menu's message; paginated
/// handlers edit it in place.
pub fn build_handlers(record: &menu::Model, embed: MenuEmbed, deps: &HandlerDeps) -> Result<Handlers> {
    let payload = MenuPayload::from_json(&record.data)?;
    let author_id = ids::from_db(record.discord_author_id)?;

    let handlers = match record.menu_type {
        MenuType::Paginated => {
            let pages = payload.page_list();
            let stored = record
                .current_page
                .and_then(|page| usize::try_from(page).ok())
                .unwrap_or(0);
            let start = stored.min(pages.len() - 1);
            Pager::new(pages, start, embed, author_id, deps.clone()).handlers()
        }
        MenuType::Confirm => confirm_handlers(author_id, &deps.messenger),
        MenuType::Options => option_handlers(author_id, &payload.reactions, &deps.messenger),
        MenuType::Custom => Handlers::new(),
    };

    debug!(
        message_id = record.message_id,
        menu_type = ?record.menu_type,
        handlers = handlers.len(),
        "Built generic menu handlers"
    );
    Ok(handlers)
}

/// Confirm/cancel pair that announces the author's choice in the channel.
pub fn confirm_handlers(author_id: u64, messenger: &SharedMessenger) -> Handlers {
    let mut handlers = Handlers::new();
    handlers.insert(
        CONFIRM_EMOJI.to_string(),
        announce_for_author(author_id, messenger, |user| {
            format!("{} confirmed the action!", user.mention())
        }),
    );
    handlers.insert(
        CANCEL_EMOJI.to_string(),
        announce_for_author(author_id, messenger, |user| {
            format!("{} cancelled the action.", user.mention())
        }),
    );
    handlers
}

/// One handler per emoji, each announcing its own emoji.
pub fn option_handlers(author_id: u64, emojis: &[String], messenger: &SharedMessenger) -> Handlers {
    emojis
        .iter()
        .map(|emoji| {
            let selected = emoji.clone();
            let handler = announce_for_author(author_id, messenger, move |user| {
                format!("{} selected option {selected}", user.mention())
            });
            (emoji.clone(), handler)
        })
        .collect()
}

/// Callback that sends `text(user)` to the menu's channel, for the author only.
pub fn announce_for_author<F>(author_id: u64, messenger: &SharedMessenger, text: F) -> ReactionCallback
where
    F: Fn(&Reactor) -> String + Send + Sync + 'static,
{
    let messenger = Arc::clone(messenger);
    let text = Arc::new(text);
    callback(move |interaction: MenuInteraction| {
        let messenger = Arc::clone(&messenger);
        let text = Arc::clone(&text);
        async move {
            if interaction.user.id != author_id {
                return Ok(());
            }
            messenger
                .say(interaction.channel_id, &text(&interaction.user))
                .await
        }
    })
}

struct PagerState {
    page: usize,
    embed: MenuEmbed,
}

/// Page cursor shared by the ⬅️ and ➡️ handlers of one menu.
#[derive(Clone)]
pub struct Pager {
    state: Arc<Mutex<PagerState>>,
    pages: Arc<Vec<String>>,
    author_id: u64,
    deps: HandlerDeps,
}

impl Pager {
    /// Creates a pager positioned on `start_page` of a non-empty page list.
    pub fn new(
        pages: Vec<String>,
        start_page: usize,
        embed: MenuEmbed,
        author_id: u64,
        deps: HandlerDeps,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(PagerState {
                page: start_page,
                embed,
            })),
            pages: Arc::new(pages),
            author_id,
            deps,
        }
    }

    /// Current zero-based page.
    #[must_use]
    pub fn current_page(&self) -> usize {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).page
    }

    /// Moves the cursor by `delta` pages on behalf of `interaction.user`.
    ///
    /// Returns false without side effects when the user is not the author or
    /// the target page does not exist. Otherwise edits the message and
    /// stores the new cursor.
    pub async fn turn(&self, interaction: &MenuInteraction, delta: isize) -> Result<bool> {
        if interaction.user.id != self.author_id {
            return Ok(false);
        }

        let (page, embed) = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            let Some(page) = state
                .page
                .checked_add_signed(delta)
                .filter(|page| *page < self.pages.len())
            else {
                return Ok(false);
            };
            state.page = page;
            state.embed.show_page(&self.pages, page);
            (page, state.embed.clone())
        };

        self.deps
            .messenger
            .edit_embed(interaction.channel_id, interaction.message_id, &embed)
            .await?;

        let stored_page = i32::try_from(page).map_err(|_| Error::InvalidMenu {
            message: format!("page {page} does not fit the page column"),
        })?;
        core::menu::set_current_page(&self.deps.db, interaction.message_id, stored_page).await?;

        debug!(message_id = interaction.message_id, page, "Turned menu page");
        Ok(true)
    }

    /// The ⬅️ / ➡️ bindings driving this pager.
    #[must_use]
    pub fn handlers(&self) -> Handlers {
        let mut handlers = Handlers::new();
        handlers.insert(PREVIOUS_EMOJI.to_string(), self.navigation(-1));
        handlers.insert(NEXT_EMOJI.to_string(), self.navigation(1));
        handlers
    }

    fn navigation(&self, delta: isize) -> ReactionCallback {
        let pager = self.clone();
        callback(move |interaction: MenuInteraction| {
            let pager = pager.clone();
            async move { pager.turn(&interaction, delta).await.map(|_| ()) }
        })
    }
}
