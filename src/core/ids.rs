//! Conversions between Discord snowflakes (`u64`) and `SQLite` integer columns (`i64`).
//!
//! Snowflakes use 63 bits in practice, so the conversion only fails for ids
//! that Discord never hands out.

use crate::errors::{Error, Result};

/// Converts a snowflake for storage.
pub fn to_db(id: u64) -> Result<i64> {
    i64::try_from(id).map_err(|_| Error::InvalidSnowflake { id: id.to_string() })
}

/// Converts a stored id back into a snowflake.
pub fn from_db(id: i64) -> Result<u64> {
    u64::try_from(id).map_err(|_| Error::InvalidSnowflake { id: id.to_string() })
}
