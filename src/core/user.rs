//! User business logic - looking up and registering Discord users.

use crate::{
    core::ids,
    entities::{User, user},
    errors::Result,
};
use chrono::Utc;
use sea_orm::{Set, prelude::*};

/// Finds a user by Discord id.
pub async fn get_user_by_discord_id<C>(db: &C, discord_id: u64) -> Result<Option<user::Model>>
where
    C: ConnectionTrait,
{
    User::find()
        .filter(user::Column::DiscordId.eq(ids::to_db(discord_id)?))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Returns the user row for `discord_id`, creating it when missing.
///
/// An existing row gets its username refreshed when it changed on Discord.
pub async fn get_or_create_user<C>(db: &C, discord_id: u64, username: &str) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    if let Some(existing) = get_user_by_discord_id(db, discord_id).await? {
        if existing.username == username {
            return Ok(existing);
        }
        let mut active: user::ActiveModel = existing.into();
        active.username = Set(username.to_string());
        return active.update(db).await.map_err(Into::into);
    }

    let user = user::ActiveModel {
        discord_id: Set(ids::to_db(discord_id)?),
        username: Set(username.to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    user.insert(db).await.map_err(Into::into)
}
