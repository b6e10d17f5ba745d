//! Menu entity - Persisted reaction menus.
//!
//! One row per menu message. The `data` column holds the JSON payload needed
//! to rebuild generic handlers after a restart (title, description, reaction
//! list, pages and caller extras).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of reaction menu, derived from its reaction set at creation time.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum MenuType {
    /// Caller-supplied callbacks only; nothing can be rebuilt after a restart
    #[sea_orm(string_value = "custom")]
    Custom,
    /// ✅ / 🚫 pair
    #[sea_orm(string_value = "confirm")]
    Confirm,
    /// ⬅️ / ➡️ navigation over a page list
    #[sea_orm(string_value = "paginated")]
    Paginated,
    /// Any other set of reactions, each announcing its own choice
    #[sea_orm(string_value = "options")]
    Options,
}

/// Menu database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "menus")]
pub struct Model {
    /// Surrogate primary key
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord message carrying the menu
    #[sea_orm(unique)]
    pub message_id: i64,
    /// Channel the message lives in
    pub channel_id: i64,
    /// Guild the message lives in, 0 for direct messages
    pub guild_id: i64,
    /// Discord id of the user allowed to drive the menu
    pub discord_author_id: i64,
    /// Owning row in `users`
    pub user_id: i64,
    /// Menu kind
    pub menu_type: MenuType,
    /// Page cursor, only set for paginated menus
    pub current_page: Option<i32>,
    /// When the menu was created
    pub created_at: DateTimeUtc,
    /// When the menu stops being interactive, None for indefinite menus
    pub expires_at: Option<DateTimeUtc>,
    /// JSON payload, see `menus::MenuPayload`
    pub data: Json,
}

/// Defines relationships between Menu and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each menu belongs to the user who created it
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    Author,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
