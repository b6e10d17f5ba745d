//! Reaction menus - embeds whose reactions drive callbacks.
//!
//! A menu is created through [`MenuService::create_menu`], which sends the
//! embed, adds its reactions, registers the callbacks in the in-process
//! [`MenuRegistry`] and persists a record. Reaction events are routed by
//! [`dispatcher::dispatch`]. On startup [`restore::restore_menus`] rebuilds
//! the registry from the stored records with generic handlers, and
//! [`sweeper::run`] removes expired menus in the background.
//!
//! Discord itself is only reached through the [`Messenger`] trait.

pub mod dispatcher;
pub mod factory;
pub mod handlers;
pub mod messenger;
pub mod registry;
pub mod restore;
pub mod service;
pub mod sweeper;
pub mod types;

pub use dispatcher::{DispatchOutcome, ReactionEvent};
pub use messenger::{Messenger, SharedMessenger};
pub use registry::{ActiveMenu, MenuRegistry};
pub use restore::RestoreSummary;
pub use service::{MenuOrigin, MenuRequest, MenuService, SentMenu};
pub use types::{MenuInteraction, MenuTimeout, ReactionCallback, Reactor, callback};
