//! User entity - Discord users known to the bot.
//!
//! A row is created (or refreshed) the first time a user issues a command
//! that persists something on their behalf, such as a reaction menu.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Surrogate primary key
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord user snowflake
    #[sea_orm(unique)]
    pub discord_id: i64,
    /// Last known Discord username
    pub username: String,
    /// When the user was first seen
    pub created_at: DateTimeUtc,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One user authors many menus
    #[sea_orm(has_many = "super::menu::Entity")]
    Menus,
}

impl Related<super::menu::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Menus.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
