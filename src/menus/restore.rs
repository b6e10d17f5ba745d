//! Startup restoration of menus that outlived the previous process.

use crate::{
    core::{self, ids},
    entities::menu,
    errors::Result,
    menus::{
        handlers::{HandlerDeps, build_handlers},
        registry::{ActiveMenu, MenuRegistry},
        types::MenuTimeout,
    },
};
use chrono::Utc;
use sea_orm::TransactionTrait;
use tracing::{debug, error, info, warn};

/// Counts from one restoration pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RestoreSummary {
    /// Menus put back into the registry
    pub restored: usize,
    /// Records deleted because their message could not be used
    pub removed: usize,
}

/// Rebuilds the registry from every non-expired record.
///
/// A record whose message is gone, or whose lookup or payload fails, is
/// deleted. Deletions are committed together. Restored menus never expire
/// in memory; the sweeper removes them once their stored expiry passes.
pub async fn restore_menus(deps: &HandlerDeps, registry: &MenuRegistry) -> Result<RestoreSummary> {
    info!("Loading active menus from database...");
    let records = core::menu::find_active_menus_with_authors(&deps.db, Utc::now()).await?;

    let mut summary = RestoreSummary::default();
    let mut orphaned = Vec::new();

    for (record, author) in records {
        let author_name = author.map_or_else(|| "unknown".to_string(), |a| a.username);
        match restore_one(deps, registry, &record).await {
            Ok(true) => {
                summary.restored += 1;
                debug!(
                    message_id = record.message_id,
                    menu_type = ?record.menu_type,
                    author = %author_name,
                    "Restored menu"
                );
            }
            Ok(false) => {
                warn!(
                    message_id = record.message_id,
                    "Menu message no longer exists, removing record"
                );
                orphaned.push(record);
            }
            Err(e) => {
                error!(
                    message_id = record.message_id,
                    "Failed to restore menu, removing record: {e}"
                );
                orphaned.push(record);
            }
        }
    }

    if !orphaned.is_empty() {
        let txn = deps.db.begin().await?;
        for record in orphaned {
            core::menu::delete_menu(&txn, record).await?;
            summary.removed += 1;
        }
        txn.commit().await?;
    }

    info!(
        restored = summary.restored,
        removed = summary.removed,
        "Menu restoration complete"
    );
    Ok(summary)
}

async fn restore_one(deps: &HandlerDeps, registry: &MenuRegistry, record: &menu::Model) -> Result<bool> {
    let channel_id = ids::from_db(record.channel_id)?;
    let message_id = ids::from_db(record.message_id)?;

    let Some(embed) = deps.messenger.fetch_embed(channel_id, message_id).await? else {
        return Ok(false);
    };

    let handlers = build_handlers(record, embed, deps)?;
    registry
        .insert(
            message_id,
            ActiveMenu {
                handlers,
                timeout: MenuTimeout::Indefinite,
                created_at: record.created_at,
                author_id: ids::from_db(record.discord_author_id)?,
            },
        )
        .await;
    Ok(true)
}
