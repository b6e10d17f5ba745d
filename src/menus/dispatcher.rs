//! Reaction dispatcher - routes reaction-add events to menu callbacks.

use crate::menus::{
    messenger::Messenger,
    registry::MenuRegistry,
    types::{MenuInteraction, Reactor},
};
use chrono::Utc;
use tracing::{debug, error, warn};

/// A reaction added to some message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionEvent {
    /// Who reacted
    pub user: Reactor,
    /// Message reacted to
    pub message_id: u64,
    /// Channel of the message
    pub channel_id: u64,
    /// Guild of the channel, None in direct messages
    pub guild_id: Option<u64>,
    /// Unicode emoji, or `<:name:id>` markup for custom emojis
    pub emoji: String,
}

/// What [`dispatch`] did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The reactor is a bot, including ourselves
    IgnoredBot,
    /// The message carries no registered menu
    NoMenu,
    /// The menu outlived its timeout and was evicted
    Expired,
    /// A callback ran (successfully or not) and the reaction was removed
    Handled,
    /// The emoji has no binding; the reaction was removed
    Unbound,
}

/// Handles one reaction-add event.
///
/// Never fails: callback errors and reaction removal errors are logged.
/// The stored record of an expired menu is left for the sweeper.
pub async fn dispatch(
    registry: &MenuRegistry,
    messenger: &dyn Messenger,
    event: &ReactionEvent,
) -> DispatchOutcome {
    if event.user.is_bot {
        return DispatchOutcome::IgnoredBot;
    }

    let Some(menu) = registry.get(event.message_id).await else {
        return DispatchOutcome::NoMenu;
    };

    if menu.timeout.is_elapsed(menu.created_at, Utc::now()) {
        registry.remove(event.message_id).await;
        debug!(message_id = event.message_id, "Evicted expired menu");
        return DispatchOutcome::Expired;
    }

    let outcome = match menu.handlers.get(&event.emoji) {
        Some(handler) => {
            let interaction = MenuInteraction {
                user: event.user.clone(),
                message_id: event.message_id,
                channel_id: event.channel_id,
                guild_id: event.guild_id,
            };
            if let Err(e) = handler(interaction).await {
                error!(
                    message_id = event.message_id,
                    guild_id = ?event.guild_id,
                    emoji = %event.emoji,
                    user = %event.user.name,
                    "Menu callback failed: {e}"
                );
            }
            DispatchOutcome::Handled
        }
        None => {
            debug!(
                message_id = event.message_id,
                guild_id = ?event.guild_id,
                emoji = %event.emoji,
                "Reaction has no binding on this menu"
            );
            DispatchOutcome::Unbound
        }
    };

    if let Err(e) = messenger
        .remove_reaction(
            event.channel_id,
            event.message_id,
            event.user.id,
            &event.emoji,
        )
        .await
    {
        warn!(
            message_id = event.message_id,
            guild_id = ?event.guild_id,
            emoji = %event.emoji,
            "Could not remove reaction: {e}"
        );
    }

    outcome
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        errors::Error,
        menus::{
            registry::ActiveMenu,
            types::{MenuTimeout, callback},
        },
        test_utils::*,
    };
    use chrono::Duration;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    fn counting_menu(emoji: &str, timeout: MenuTimeout, hits: &Arc<AtomicUsize>) -> ActiveMenu {
        let hits = Arc::clone(hits);
        let handler = callback(move |_| {
            let hits = Arc::clone(&hits);
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });
        ActiveMenu {
            handlers: [(emoji.to_string(), handler)].into_iter().collect(),
            timeout,
            created_at: Utc::now(),
            author_id: TEST_AUTHOR_ID,
        }
    }

    #[tokio::test]
    async fn test_bound_reaction_runs_callback_and_is_removed() {
        let registry = MenuRegistry::new();
        let messenger = RecordingMessenger::new();
        let hits = Arc::new(AtomicUsize::new(0));
        registry
            .insert(10, counting_menu("👍", MenuTimeout::Seconds(60), &hits))
            .await;

        let outcome = dispatch(&registry, &messenger, &test_reaction(10, 99, "👍")).await;

        assert_eq!(outcome, DispatchOutcome::Handled);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(
            messenger.reactions_removed(),
            vec![(10, 99, "👍".to_string())]
        );
    }

    #[tokio::test]
    async fn test_bot_reactions_are_ignored() {
        let registry = MenuRegistry::new();
        let messenger = RecordingMessenger::new();
        let hits = Arc::new(AtomicUsize::new(0));
        registry
            .insert(10, counting_menu("👍", MenuTimeout::Seconds(60), &hits))
            .await;

        let mut event = test_reaction(10, 99, "👍");
        event.user.is_bot = true;
        let outcome = dispatch(&registry, &messenger, &event).await;

        assert_eq!(outcome, DispatchOutcome::IgnoredBot);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert!(messenger.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_message_is_ignored() {
        let registry = MenuRegistry::new();
        let messenger = RecordingMessenger::new();

        let outcome = dispatch(&registry, &messenger, &test_reaction(10, 99, "👍")).await;

        assert_eq!(outcome, DispatchOutcome::NoMenu);
        assert!(messenger.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unbound_emoji_is_removed_without_callback() {
        let registry = MenuRegistry::new();
        let messenger = RecordingMessenger::new();
        let hits = Arc::new(AtomicUsize::new(0));
        registry
            .insert(10, counting_menu("👍", MenuTimeout::Seconds(60), &hits))
            .await;

        let outcome = dispatch(&registry, &messenger, &test_reaction(10, 99, "🎉")).await;

        assert_eq!(outcome, DispatchOutcome::Unbound);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(
            messenger.reactions_removed(),
            vec![(10, 99, "🎉".to_string())]
        );
    }

    #[tokio::test]
    async fn test_expired_menu_is_evicted_without_callback() {
        let registry = MenuRegistry::new();
        let messenger = RecordingMessenger::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let mut menu = counting_menu("👍", MenuTimeout::Seconds(60), &hits);
        menu.created_at = Utc::now() - Duration::seconds(120);
        registry.insert(10, menu).await;

        let outcome = dispatch(&registry, &messenger, &test_reaction(10, 99, "👍")).await;

        assert_eq!(outcome, DispatchOutcome::Expired);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert!(!registry.contains(10).await);
        assert!(messenger.calls().is_empty());
    }

    #[tokio::test]
    async fn test_indefinite_menu_never_expires() {
        let registry = MenuRegistry::new();
        let messenger = RecordingMessenger::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let mut menu = counting_menu("👍", MenuTimeout::Indefinite, &hits);
        menu.created_at = Utc::now() - Duration::days(30);
        registry.insert(10, menu).await;

        let outcome = dispatch(&registry, &messenger, &test_reaction(10, 99, "👍")).await;

        assert_eq!(outcome, DispatchOutcome::Handled);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failures_are_contained() {
        let registry = MenuRegistry::new();
        let messenger = RecordingMessenger::new();
        messenger.fail_remove_reaction(true);
        let failing = callback(|_| async {
            Err(Error::Messaging {
                message: "boom".to_string(),
            })
        });
        registry
            .insert(
                10,
                ActiveMenu {
                    handlers: [("👍".to_string(), failing)].into_iter().collect(),
                    timeout: MenuTimeout::Seconds(60),
                    created_at: Utc::now(),
                    author_id: TEST_AUTHOR_ID,
                },
            )
            .await;

        let outcome = dispatch(&registry, &messenger, &test_reaction(10, 99, "👍")).await;

        assert_eq!(outcome, DispatchOutcome::Handled);
        assert!(registry.contains(10).await);
    }

    #[tokio::test]
    async fn test_callback_sees_where_the_reaction_happened() {
        let registry = MenuRegistry::new();
        let messenger = RecordingMessenger::new();
        let seen = Arc::new(std::sync::Mutex::new(None));
        let record = Arc::clone(&seen);
        let handler = callback(move |interaction| {
            let record = Arc::clone(&record);
            async move {
                *record.lock().unwrap() = Some(interaction);
                Ok(())
            }
        });
        registry
            .insert(
                10,
                ActiveMenu {
                    handlers: [("👍".to_string(), handler)].into_iter().collect(),
                    timeout: MenuTimeout::Seconds(60),
                    created_at: Utc::now(),
                    author_id: TEST_AUTHOR_ID,
                },
            )
            .await;

        let mut event = test_reaction(10, 99, "👍");
        event.guild_id = None;
        dispatch(&registry, &messenger, &event).await;

        let interaction = seen.lock().unwrap().clone().unwrap();
        assert_eq!(interaction.user.id, 99);
        assert_eq!(interaction.message_id, 10);
        assert_eq!(interaction.channel_id, TEST_CHANNEL_ID);
        assert_eq!(interaction.guild_id, None);
    }
}
