//! Represents an account allowed to upload.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Upload limit assigned to freshly provisioned users (50 MB).
pub const DEFAULT_UPLOAD_LIMIT: i64 = 50_000_000;

/// A user provisioned through the admin surface.
///
/// Users are looked up either by their external identity or by their API key;
/// both are unique.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug, PartialEq, Eq)]
pub struct User {
    /// Identity on the collaborating chat platform.
    #[sqlx(rename = "discordid")]
    pub external_id: String,

    /// Opaque bearer credential.
    #[sqlx(rename = "apikey")]
    #[serde(skip_serializing)]
    pub api_key: String,

    /// Maximum accepted upload size in bytes.
    #[sqlx(rename = "uploadlimit")]
    pub upload_limit: i64,

    pub admin: bool,
}

impl User {
    pub fn new(external_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
            api_key: api_key.into(),
            upload_limit: DEFAULT_UPLOAD_LIMIT,
            admin: false,
        }
    }
}
