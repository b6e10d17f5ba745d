//! In-process registry of interactive menus, keyed by message id.
//!
//! The registry is authoritative for the lifetime of the process; the
//! `menus` table is authoritative across restarts.

use crate::menus::types::{Handlers, MenuTimeout};
use chrono::{DateTime, Utc};
use std::{collections::HashMap, fmt, sync::Arc};
use tokio::sync::RwLock;

/// Live state of one menu.
pub struct ActiveMenu {
    /// Emoji → callback bindings
    pub handlers: Handlers,
    /// How long the menu accepts reactions
    pub timeout: MenuTimeout,
    /// When the menu was created (or restored from its record)
    pub created_at: DateTime<Utc>,
    /// The only user allowed to drive the menu
    pub author_id: u64,
}

impl ActiveMenu {
    /// Emojis bound on this menu, sorted for stable output.
    #[must_use]
    pub fn emojis(&self) -> Vec<&str> {
        let mut emojis: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        emojis.sort_unstable();
        emojis
    }
}

impl fmt::Debug for ActiveMenu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveMenu")
            .field("handlers", &self.emojis())
            .field("timeout", &self.timeout)
            .field("created_at", &self.created_at)
            .field("author_id", &self.author_id)
            .finish()
    }
}

/// Shared message id → [`ActiveMenu`] map.
///
/// Cloning is cheap and every clone sees the same menus. Entries are handed
/// out as `Arc`s so no lock is held while a callback runs.
#[derive(Clone, Default)]
pub struct MenuRegistry {
    menus: Arc<RwLock<HashMap<u64, Arc<ActiveMenu>>>>,
}

impl MenuRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a menu, replacing any previous entry for the same message.
    pub async fn insert(&self, message_id: u64, menu: ActiveMenu) {
        self.menus.write().await.insert(message_id, Arc::new(menu));
    }

    /// Looks up the menu attached to a message.
    pub async fn get(&self, message_id: u64) -> Option<Arc<ActiveMenu>> {
        self.menus.read().await.get(&message_id).cloned()
    }

    /// Evicts a menu. Returns whether an entry was present.
    pub async fn remove(&self, message_id: u64) -> bool {
        self.menus.write().await.remove(&message_id).is_some()
    }

    /// Whether a message has a registered menu.
    pub async fn contains(&self, message_id: u64) -> bool {
        self.menus.read().await.contains_key(&message_id)
    }

    /// Number of registered menus.
    pub async fn len(&self) -> usize {
        self.menus.read().await.len()
    }

    /// Whether no menu is registered.
    pub async fn is_empty(&self) -> bool {
        self.menus.read().await.is_empty()
    }
}

impl fmt::Debug for MenuRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuRegistry").finish_non_exhaustive()
    }
}
