//! Ready-made menu shapes built on [`MenuService::create_menu`].

use crate::{
    errors::{Error, Result},
    menus::{
        handlers::{Pager, announce_for_author},
        service::{MenuOrigin, MenuRequest, MenuService, SentMenu},
        types::{
            CANCEL_EMOJI, CONFIRM_EMOJI, MenuInteraction, MenuTimeout, NEXT_EMOJI, PREVIOUS_EMOJI,
            ReactionCallback, callback, page_title,
        },
    },
};
use std::sync::Arc;

const CONFIRM_TIMEOUT: MenuTimeout = MenuTimeout::Seconds(60);
const OPTIONS_TIMEOUT: MenuTimeout = MenuTimeout::Seconds(60);
const PAGINATED_TIMEOUT: MenuTimeout = MenuTimeout::Seconds(120);

/// One choice of an options menu.
pub struct MenuOption {
    /// Reaction selecting this option
    pub emoji: String,
    /// Shown as the field value next to the emoji
    pub label: String,
    /// Runs when someone picks this option
    pub on_select: ReactionCallback,
}

/// Restricts a callback to the menu's author.
fn author_only(author_id: u64, inner: ReactionCallback) -> ReactionCallback {
    callback(move |interaction: MenuInteraction| {
        let inner = Arc::clone(&inner);
        async move {
            if interaction.user.id == author_id {
                inner(interaction).await
            } else {
                Ok(())
            }
        }
    })
}

/// A ✅/🚫 menu only its author can answer.
///
/// Without `on_cancel`, cancelling posts "Operation cancelled by <@author>.".
pub async fn confirm_menu(
    service: &MenuService,
    origin: MenuOrigin,
    title: &str,
    description: &str,
    on_confirm: ReactionCallback,
    on_cancel: Option<ReactionCallback>,
    timeout: Option<MenuTimeout>,
) -> Result<SentMenu> {
    let author_id = origin.author.id;
    let on_cancel = on_cancel.unwrap_or_else(|| {
        announce_for_author(author_id, &service.deps().messenger, |user| {
            format!("Operation cancelled by {}.", user.mention())
        })
    });

    let request = MenuRequest::new(origin, title, description)
        .reaction(CONFIRM_EMOJI, author_only(author_id, on_confirm))
        .reaction(CANCEL_EMOJI, author_only(author_id, on_cancel))
        .field("confirm", format!("{CONFIRM_EMOJI} to confirm"))
        .field("cancel", format!("{CANCEL_EMOJI} to cancel"))
        .timeout(timeout.unwrap_or(CONFIRM_TIMEOUT));

    service.create_menu(request).await
}

/// One reaction per option; anyone may pick.
pub async fn options_menu(
    service: &MenuService,
    origin: MenuOrigin,
    title: &str,
    description: &str,
    options: Vec<MenuOption>,
    timeout: Option<MenuTimeout>,
) -> Result<SentMenu> {
    let mut request = MenuRequest::new(origin, title, description)
        .timeout(timeout.unwrap_or(OPTIONS_TIMEOUT));
    for option in options {
        request = request
            .field(option.emoji.clone(), option.label)
            .reaction(option.emoji, option.on_select);
    }

    service.create_menu(request).await
}

/// A ⬅️/➡️ menu over `pages`, starting on the first page, with a
/// `navigation` field explaining the arrows.
///
/// Fails with [`Error::InvalidMenu`] when `pages` is empty.
pub async fn paginated_menu(
    service: &MenuService,
    origin: MenuOrigin,
    title: &str,
    pages: Vec<String>,
    timeout: Option<MenuTimeout>,
) -> Result<SentMenu> {
    let Some(first) = pages.first().cloned() else {
        return Err(Error::InvalidMenu {
            message: "a paginated menu needs at least one page".to_string(),
        });
    };

    let author_id = origin.author.id;
    let request = MenuRequest::new(origin, page_title(title, 0, pages.len()), first)
        .pages(pages.clone())
        .field(
            "navigation",
            format!("Use {PREVIOUS_EMOJI} and {NEXT_EMOJI} to navigate pages."),
        )
        .timeout(timeout.unwrap_or(PAGINATED_TIMEOUT));

    let pager = Pager::new(pages, 0, request.embed(), author_id, service.deps().clone());
    let mut handlers = pager.handlers();
    let mut request = request;
    for emoji in [PREVIOUS_EMOJI, NEXT_EMOJI] {
        if let Some(handler) = handlers.remove(emoji) {
            request = request.reaction(emoji, handler);
        }
    }

    service.create_menu(request).await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        core,
        entities::MenuType,
        menus::{dispatcher::DispatchOutcome, types::EmbedField},
        test_utils::*,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, ReactionCallback) {
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&hits);
        let cb = callback(move |_| {
            let seen = Arc::clone(&seen);
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });
        (hits, cb)
    }

    #[tokio::test]
    async fn test_confirm_menu_layout_and_author_guard() -> Result<()> {
        let (service, messenger) = setup_menu_service().await?;
        let (hits, on_confirm) = counter();

        let sent = confirm_menu(&service, test_origin(), "Delete?", "Sure?", on_confirm, None, None)
            .await?;

        assert_eq!(sent.menu_type, MenuType::Confirm);
        let (_, embed) = &messenger.sent()[0];
        assert_eq!(
            embed.fields,
            vec![
                EmbedField {
                    name: "confirm".to_string(),
                    value: "✅ to confirm".to_string()
                },
                EmbedField {
                    name: "cancel".to_string(),
                    value: "🚫 to cancel".to_string()
                },
            ]
        );
        assert_eq!(
            service.registry().get(sent.message_id).await.unwrap().timeout,
            MenuTimeout::Seconds(60)
        );

        service
            .dispatch(&test_reaction(sent.message_id, TEST_AUTHOR_ID + 1, CONFIRM_EMOJI))
            .await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        service
            .dispatch(&test_reaction(sent.message_id, TEST_AUTHOR_ID, CONFIRM_EMOJI))
            .await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_confirm_menu_default_cancel_message() -> Result<()> {
        let (service, messenger) = setup_menu_service().await?;
        let (_, on_confirm) = counter();

        let sent = confirm_menu(&service, test_origin(), "Delete?", "", on_confirm, None, None)
            .await?;
        service
            .dispatch(&test_reaction(sent.message_id, TEST_AUTHOR_ID, CANCEL_EMOJI))
            .await;

        assert_eq!(
            messenger.said(),
            vec![(
                TEST_CHANNEL_ID,
                format!("Operation cancelled by <@{TEST_AUTHOR_ID}>.")
            )]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_options_menu_fields_and_callbacks() -> Result<()> {
        let (service, messenger) = setup_menu_service().await?;
        let (pizza_hits, pizza) = counter();
        let (sushi_hits, sushi) = counter();

        let sent = options_menu(
            &service,
            test_origin(),
            "Lunch",
            "Vote!",
            vec![
                MenuOption {
                    emoji: "🍕".to_string(),
                    label: "Pizza".to_string(),
                    on_select: pizza,
                },
                MenuOption {
                    emoji: "🍣".to_string(),
                    label: "Sushi".to_string(),
                    on_select: sushi,
                },
            ],
            None,
        )
        .await?;

        assert_eq!(sent.menu_type, MenuType::Options);
        assert_eq!(messenger.reactions_added(sent.message_id), vec!["🍕", "🍣"]);
        let names: Vec<String> = messenger.sent()[0]
            .1
            .fields
            .iter()
            .map(|f| format!("{}={}", f.name, f.value))
            .collect();
        assert_eq!(names, vec!["🍕=Pizza", "🍣=Sushi"]);

        // Any member may vote
        let outcome = service
            .dispatch(&test_reaction(sent.message_id, TEST_AUTHOR_ID + 5, "🍣"))
            .await;
        assert_eq!(outcome, DispatchOutcome::Handled);
        assert_eq!(pizza_hits.load(Ordering::SeqCst), 0);
        assert_eq!(sushi_hits.load(Ordering::SeqCst), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_paginated_menu_pages_through_content() -> Result<()> {
        let (service, messenger) = setup_menu_service().await?;
        let pages = vec!["one".to_string(), "two".to_string()];

        let sent = paginated_menu(&service, test_origin(), "Guide", pages, None).await?;

        assert_eq!(sent.menu_type, MenuType::Paginated);
        let (_, embed) = &messenger.sent()[0];
        assert_eq!(embed.title, "Guide - Page 1/2");
        assert_eq!(embed.description, "one");
        let navigation = EmbedField {
            name: "navigation".to_string(),
            value: "Use ⬅️ and ➡️ to navigate pages.".to_string(),
        };
        assert_eq!(embed.fields, vec![navigation.clone()]);
        assert_eq!(
            service.registry().get(sent.message_id).await.unwrap().timeout,
            MenuTimeout::Seconds(120)
        );

        service
            .dispatch(&test_reaction(sent.message_id, TEST_AUTHOR_ID, NEXT_EMOJI))
            .await;

        let edits = messenger.edits();
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].0, sent.message_id);
        assert_eq!(edits[0].1.title, "Guide - Page 2/2");
        assert_eq!(edits[0].1.description, "two");
        assert_eq!(edits[0].1.fields, vec![navigation]);

        let record = core::menu::get_menu_by_message_id(&service.deps().db, sent.message_id)
            .await?
            .unwrap();
        assert_eq!(record.current_page, Some(1));
        assert_eq!(record.data["pages"], serde_json::json!(["one", "two"]));
        Ok(())
    }

    #[tokio::test]
    async fn test_paginated_menu_rejects_empty_pages() -> Result<()> {
        let (service, messenger) = setup_menu_service().await?;

        let result = paginated_menu(&service, test_origin(), "Guide", Vec::new(), None).await;

        assert!(matches!(result, Err(Error::InvalidMenu { .. })));
        assert!(messenger.calls().is_empty());
        Ok(())
    }
}
