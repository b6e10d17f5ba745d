//! Core business logic - framework-agnostic persistence operations.
//!
//! Nothing in here knows about Discord; ids come in as plain snowflakes.

/// Snowflake ↔ database id conversions
pub mod ids;
/// Menu record store
pub mod menu;
/// User registration
pub mod user;
