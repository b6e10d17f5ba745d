//! Periodic removal of expired menus from the store and the registry.

use crate::{
    config::SweepSettings,
    core::{self, ids},
    errors::Result,
    menus::registry::MenuRegistry,
};
use chrono::Utc;
use sea_orm::{DatabaseConnection, TransactionTrait};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Delay before the next tick after a failed sweep.
pub const ERROR_BACKOFF: Duration = Duration::from_secs(60);

/// Waits between sweeps. Abstracted so tests do not sleep.
pub trait Sleeper: Send + Sync {
    /// Completes after `duration`.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Real time via `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Deletes up to `batch_size` expired records, oldest expiry first, and
/// evicts their registry entries once the deletions have committed together.
///
/// Returns how many records were deleted.
pub async fn sweep_expired(
    db: &DatabaseConnection,
    registry: &MenuRegistry,
    batch_size: u64,
) -> Result<u64> {
    let now = Utc::now();
    let txn = db.begin().await?;

    let expired = core::menu::find_expired_menus(&txn, now, batch_size).await?;
    debug!("Found {} expired menus", expired.len());

    let mut evicted = Vec::with_capacity(expired.len());
    let mut deleted = 0;
    for record in expired {
        let message_id = ids::from_db(record.message_id)?;
        core::menu::delete_menu(&txn, record).await?;
        evicted.push(message_id);
        deleted += 1;
    }

    txn.commit().await?;

    for &message_id in &evicted {
        if registry.remove(message_id).await {
            debug!(message_id, "Evicted expired menu from registry");
        }
    }

    if deleted > 0 {
        info!("Deleted {deleted} expired menus from database");
    }
    Ok(deleted)
}

/// Sweeps on a fixed interval until `cancel` fires.
///
/// A failed sweep is logged and retried after [`ERROR_BACKOFF`].
pub async fn run<S: Sleeper>(
    db: DatabaseConnection,
    registry: MenuRegistry,
    settings: SweepSettings,
    sleeper: S,
    cancel: CancellationToken,
) {
    info!(
        interval_secs = settings.interval.as_secs(),
        batch_size = settings.batch_size,
        "Starting menu cleanup task"
    );

    while !cancel.is_cancelled() {
        info!("Running scheduled menu cleanup");
        let delay = match sweep_expired(&db, &registry, settings.batch_size).await {
            Ok(_) => settings.interval,
            Err(e) => {
                error!("Menu cleanup failed, retrying in {}s: {e}", ERROR_BACKOFF.as_secs());
                ERROR_BACKOFF
            }
        };

        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            () = sleeper.sleep(delay) => {}
        }
    }

    info!("Menu cleanup task stopped");
}
