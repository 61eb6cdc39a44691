//! Represents an uploaded file's metadata and its public address.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single uploaded file within a hosting domain.
///
/// Only metadata is stored here, never the content bytes. Rows are created on
/// upload and afterwards only ever gain a `deleted_at` timestamp.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug, PartialEq, Eq)]
pub struct Object {
    /// Hosting domain the object lives under (e.g. "example.com").
    #[sqlx(rename = "bucket")]
    pub domain: String,

    /// Optional subdomain label; empty when the object has no wildcard.
    pub wildcard: String,

    /// Generated file name, unique within the domain.
    #[sqlx(rename = "filename")]
    pub file_name: String,

    /// External identity of the uploading user.
    pub uploader: String,

    /// When the upload was accepted.
    pub created_at: DateTime<Utc>,

    /// Upper-case hex MD5 of the content.
    pub md5: String,

    /// Upper-case hex SHA-256 of the content.
    pub sha256: String,

    /// Set once the object has been removed.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Object {
    pub fn address(&self) -> ObjectAddress {
        ObjectAddress {
            wildcard: self.wildcard.clone(),
            domain: self.domain.clone(),
            file_name: self.file_name.clone(),
        }
    }

    /// Canonical public URL of this object.
    pub fn url(&self) -> String {
        public_url(&self.wildcard, &self.domain, &self.file_name)
    }
}

/// The (wildcard, domain, file name) triple a public URL resolves to.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ObjectAddress {
    pub wildcard: String,
    pub domain: String,
    pub file_name: String,
}

impl ObjectAddress {
    pub fn new(
        wildcard: impl Into<String>,
        domain: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            wildcard: wildcard.into(),
            domain: domain.into(),
            file_name: file_name.into(),
        }
    }

    pub fn url(&self) -> String {
        public_url(&self.wildcard, &self.domain, &self.file_name)
    }
}

/// `https://<domain>/<file>` or `https://<wildcard>.<domain>/<file>`.
pub fn public_url(wildcard: &str, domain: &str, file_name: &str) -> String {
    if wildcard.is_empty() {
        format!("https://{}/{}", domain, file_name)
    } else {
        format!("https://{}.{}/{}", wildcard, domain, file_name)
    }
}
