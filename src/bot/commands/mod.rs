//! Discord command implementations organized by category.
//!
//! [`all`] is the single place commands are registered.

#![allow(clippy::too_long_first_doc_paragraph)]

/// General utility commands
pub mod general;

/// Server information commands
pub mod guild;

/// Reaction menu commands
pub mod menus;

/// Dice and random picks
pub mod random;

use crate::{
    bot::BotData,
    errors::{Error, Result},
};
use std::collections::HashSet;

// Export commands
pub use general::*;
pub use guild::*;
pub use menus::menu;
pub use random::{choose, random, roll};

/// A registered command.
pub type Command = poise::Command<BotData, Error>;

/// The full command table.
#[must_use]
pub fn all() -> Vec<Command> {
    vec![
        ping(),
        help(),
        owner(),
        ginfo(),
        random(),
        roll(),
        choose(),
        menu(),
    ]
}

/// Rejects tables where two top-level commands share a name or alias.
pub fn validate_command_table(commands: &[Command]) -> Result<()> {
    let mut seen = HashSet::new();
    for command in commands {
        for name in std::iter::once(&command.name).chain(&command.aliases) {
            if !seen.insert(name.as_str()) {
                return Err(Error::Config {
                    message: format!("command name `{name}` is registered twice"),
                });
            }
        }
    }
    Ok(())
}
