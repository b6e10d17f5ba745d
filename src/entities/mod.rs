//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod menu;
pub mod user;

// Re-export specific types to avoid conflicts
pub use menu::{Column as MenuColumn, Entity as Menu, MenuType, Model as MenuModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
