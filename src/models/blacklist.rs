//! Represents a blocked piece of content.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A SHA-256 content hash that may not be uploaded, with the moderator's reason.
///
/// Entries are written by the moderation tooling; this crate only reads them.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug, PartialEq, Eq)]
pub struct BlacklistEntry {
    /// Upper-case hex SHA-256.
    #[sqlx(rename = "hash")]
    pub sha256: String,

    pub reason: String,
}
