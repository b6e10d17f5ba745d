//! Value types shared across the menu subsystem.

use crate::{entities::MenuType, errors::Result};
use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{collections::HashMap, fmt, sync::Arc};

/// Confirm reaction
pub const CONFIRM_EMOJI: &str = "✅";
/// Cancel reaction
pub const CANCEL_EMOJI: &str = "🚫";
/// Previous page reaction
pub const PREVIOUS_EMOJI: &str = "⬅️";
/// Next page reaction
pub const NEXT_EMOJI: &str = "➡️";

/// Marker separating a paginated menu's base title from its page counter.
pub const PAGE_MARKER: &str = " - Page ";

/// Default embed color (Discord blurple-ish blue).
pub const DEFAULT_COLOR: u32 = 0x0034_98DB;

/// The user behind a reaction event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reactor {
    /// Discord user id
    pub id: u64,
    /// Display name, for logging
    pub name: String,
    /// Whether the user is a bot account
    pub is_bot: bool,
}

impl Reactor {
    /// A non-bot user.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_bot: false,
        }
    }

    /// Mention markup for chat messages.
    #[must_use]
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }
}

/// What a reaction callback is told about the reaction that triggered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuInteraction {
    /// The reacting user
    pub user: Reactor,
    /// Message carrying the menu
    pub message_id: u64,
    /// Channel of the message
    pub channel_id: u64,
    /// Guild of the channel, None in direct messages
    pub guild_id: Option<u64>,
}

/// Async callback bound to one emoji of a menu.
pub type ReactionCallback = Arc<dyn Fn(MenuInteraction) -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// Emoji → callback bindings of one menu.
pub type Handlers = HashMap<String, ReactionCallback>;

/// Wraps an async closure into a [`ReactionCallback`].
#[must_use]
pub fn callback<F, Fut>(f: F) -> ReactionCallback
where
    F: Fn(MenuInteraction) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    Arc::new(move |interaction| Box::pin(f(interaction)))
}

/// How long a menu accepts reactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuTimeout {
    /// Accept reactions for this many seconds after creation
    Seconds(u64),
    /// Never expire
    Indefinite,
}

impl MenuTimeout {
    /// Maps the conventional signed form: any value ≤ 0 means indefinite.
    #[must_use]
    pub fn from_secs(secs: i64) -> Self {
        u64::try_from(secs)
            .ok()
            .filter(|s| *s > 0)
            .map_or(Self::Indefinite, Self::Seconds)
    }

    /// Expiry time for a menu created at `created_at`.
    #[must_use]
    pub fn expires_at(self, created_at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::Seconds(secs) => i64::try_from(secs)
                .ok()
                .and_then(chrono::TimeDelta::try_seconds)
                .and_then(|delta| created_at.checked_add_signed(delta)),
            Self::Indefinite => None,
        }
    }

    /// Whether a menu created at `created_at` has outlived this timeout at `now`.
    #[must_use]
    pub fn is_elapsed(self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            Self::Seconds(secs) => {
                let elapsed = (now - created_at).num_milliseconds();
                u64::try_from(elapsed).is_ok_and(|ms| ms > secs.saturating_mul(1000))
            }
            Self::Indefinite => false,
        }
    }
}

impl fmt::Display for MenuTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seconds(secs) => write!(f, "{secs}s"),
            Self::Indefinite => f.write_str("indefinite"),
        }
    }
}

/// One inline embed field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    /// Field name
    pub name: String,
    /// Field value
    pub value: String,
}

/// Framework-agnostic view of a menu's embed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MenuEmbed {
    /// Embed title
    pub title: String,
    /// Embed body
    pub description: String,
    /// RGB color
    pub color: u32,
    /// Inline fields, in display order
    pub fields: Vec<EmbedField>,
}

impl MenuEmbed {
    /// Replaces the body with `pages[page]` and rewrites the page counter
    /// when the title carries one.
    pub fn show_page(&mut self, pages: &[String], page: usize) {
        if let Some(content) = pages.get(page) {
            self.description.clone_from(content);
        }
        if let Some((base, _)) = self.title.split_once(PAGE_MARKER) {
            self.title = page_title(base, page, pages.len());
        }
    }
}

/// `"{base} - Page {n}/{total}"` for a zero-based page index.
#[must_use]
pub fn page_title(base: &str, page: usize, total: usize) -> String {
    format!("{base}{PAGE_MARKER}{}/{total}", page + 1)
}

/// Derives the menu kind from the reaction keys.
pub fn classify<'a, I>(emojis: I) -> MenuType
where
    I: IntoIterator<Item = &'a str>,
{
    let emojis: Vec<&str> = emojis.into_iter().collect();
    let has = |emoji: &str| emojis.iter().any(|e| *e == emoji);

    if has(CONFIRM_EMOJI) && has(CANCEL_EMOJI) {
        MenuType::Confirm
    } else if has(PREVIOUS_EMOJI) && has(NEXT_EMOJI) {
        MenuType::Paginated
    } else if emojis.is_empty() {
        MenuType::Custom
    } else {
        MenuType::Options
    }
}

/// JSON payload stored with every menu record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuPayload {
    /// Title at creation time
    pub title: String,
    /// Description at creation time
    pub description: String,
    /// Reaction emojis in the order they were added
    pub reactions: Vec<String>,
    /// Creator's Discord id
    pub author_id: u64,
    /// Channel of the message
    pub channel_id: u64,
    /// Guild of the message, 0 for direct messages
    pub guild_id: u64,
    /// Page contents for paginated menus
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<Vec<String>>,
    /// Caller-supplied extras
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MenuPayload {
    /// Serializes the payload for the `data` column.
    pub fn to_json(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(Into::into)
    }

    /// Parses a stored payload.
    pub fn from_json(value: &Value) -> Result<Self> {
        Self::deserialize(value).map_err(Into::into)
    }

    /// Pages to paginate over: the stored list, or the description alone.
    #[must_use]
    pub fn page_list(&self) -> Vec<String> {
        match &self.pages {
            Some(pages) if !pages.is_empty() => pages.clone(),
            _ => vec![self.description.clone()],
        }
    }
}
