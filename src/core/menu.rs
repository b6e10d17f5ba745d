//! Menu record store - persistence for reaction menus.
//!
//! Every function is generic over `ConnectionTrait` so callers can run it on
//! the shared connection or inside a transaction they commit themselves.

use crate::{
    core::ids,
    entities::{Menu, MenuType, User, menu, user},
    errors::Result,
};
use chrono::{DateTime, Utc};
use sea_orm::{Condition, QueryOrder, QuerySelect, Set, prelude::*};

/// Everything needed to persist a freshly created menu.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMenuRecord {
    /// Message carrying the menu
    pub message_id: u64,
    /// Channel of the message
    pub channel_id: u64,
    /// Guild of the message, None in direct messages
    pub guild_id: Option<u64>,
    /// Discord id of the creator
    pub author_id: u64,
    /// Row id of the creator in `users`
    pub user_id: i64,
    /// Menu kind
    pub menu_type: MenuType,
    /// Initial page for paginated menus
    pub current_page: Option<i32>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Expiry time, None for indefinite menus
    pub expires_at: Option<DateTime<Utc>>,
    /// Serialized `MenuPayload`
    pub data: Json,
}

/// Inserts a menu record.
pub async fn insert_menu<C>(db: &C, record: NewMenuRecord) -> Result<menu::Model>
where
    C: ConnectionTrait,
{
    let model = menu::ActiveModel {
        message_id: Set(ids::to_db(record.message_id)?),
        channel_id: Set(ids::to_db(record.channel_id)?),
        guild_id: Set(ids::to_db(record.guild_id.unwrap_or(0))?),
        discord_author_id: Set(ids::to_db(record.author_id)?),
        user_id: Set(record.user_id),
        menu_type: Set(record.menu_type),
        current_page: Set(record.current_page),
        created_at: Set(record.created_at),
        expires_at: Set(record.expires_at),
        data: Set(record.data),
        ..Default::default()
    };

    model.insert(db).await.map_err(Into::into)
}

/// Finds the menu attached to a message.
pub async fn get_menu_by_message_id<C>(db: &C, message_id: u64) -> Result<Option<menu::Model>>
where
    C: ConnectionTrait,
{
    Menu::find()
        .filter(menu::Column::MessageId.eq(ids::to_db(message_id)?))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Menus that are still interactive at `now`: no expiry, or expiry in the
/// future. Each record comes with its author row loaded eagerly.
pub async fn find_active_menus_with_authors<C>(
    db: &C,
    now: DateTime<Utc>,
) -> Result<Vec<(menu::Model, Option<user::Model>)>>
where
    C: ConnectionTrait,
{
    Menu::find()
        .find_also_related(User)
        .filter(
            Condition::any()
                .add(menu::Column::ExpiresAt.is_null())
                .add(menu::Column::ExpiresAt.gt(now)),
        )
        .order_by_asc(menu::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Up to `limit` menus whose expiry is set and already past at `now`,
/// oldest expiry first.
pub async fn find_expired_menus<C>(
    db: &C,
    now: DateTime<Utc>,
    limit: u64,
) -> Result<Vec<menu::Model>>
where
    C: ConnectionTrait,
{
    Menu::find()
        .filter(menu::Column::ExpiresAt.is_not_null())
        .filter(menu::Column::ExpiresAt.lt(now))
        .order_by_asc(menu::Column::ExpiresAt)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Stores a new page cursor. Returns false when the menu no longer exists.
pub async fn set_current_page<C>(db: &C, message_id: u64, page: i32) -> Result<bool>
where
    C: ConnectionTrait,
{
    let result = Menu::update_many()
        .col_expr(menu::Column::CurrentPage, Expr::value(page))
        .filter(menu::Column::MessageId.eq(ids::to_db(message_id)?))
        .exec(db)
        .await?;

    Ok(result.rows_affected > 0)
}

/// Deletes one menu record.
pub async fn delete_menu<C>(db: &C, record: menu::Model) -> Result<()>
where
    C: ConnectionTrait,
{
    record.delete(db).await?;
    Ok(())
}
