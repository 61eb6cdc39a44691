//! Storage-client abstraction shared by every service.
//!
//! Services receive an `Arc<dyn MetadataStore>` instead of reaching for a
//! global handle, so tests can swap in an in-memory SQLite pool or a fake.
//! Implementations do plain point queries; hash normalization and retry
//! policy live in the services.

use crate::models::{
    blacklist::BlacklistEntry,
    object::{Object, ObjectAddress},
    user::User,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique index rejected the write.
    #[error("unique constraint violated: {0}")]
    Conflict(String),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// First non-deleted object in `bucket` whose md5 OR sha256 matches.
    async fn find_object_by_hash(
        &self,
        md5: &str,
        sha256: &str,
        bucket: &str,
    ) -> StoreResult<Option<Object>>;

    /// Whether any row in `bucket` (any wildcard, deleted or not) uses `file_name`.
    async fn filename_exists(&self, file_name: &str, bucket: &str) -> StoreResult<bool>;

    /// Non-deleted object at exactly this address.
    async fn find_object(&self, address: &ObjectAddress) -> StoreResult<Option<Object>>;

    /// Returns `StoreError::Conflict` when the name is already taken in the bucket.
    async fn insert_object(&self, object: &Object) -> StoreResult<()>;

    /// Sets `deleted_at` on the live object at `address`. Returns rows affected.
    async fn mark_object_deleted(
        &self,
        address: &ObjectAddress,
        deleted_at: DateTime<Utc>,
    ) -> StoreResult<u64>;

    async fn find_user_by_external_id(&self, external_id: &str) -> StoreResult<Option<User>>;

    async fn find_user_by_api_key(&self, api_key: &str) -> StoreResult<Option<User>>;

    /// Returns `StoreError::Conflict` when the identity or key already exists.
    async fn insert_user(&self, user: &User) -> StoreResult<()>;

    /// Deletes users whose external identity OR api key equals `key`.
    async fn delete_users_matching(&self, key: &str) -> StoreResult<u64>;

    /// Updates only the row matching both fields. Returns rows affected.
    async fn update_upload_limit(
        &self,
        external_id: &str,
        api_key: &str,
        bytes: i64,
    ) -> StoreResult<u64>;

    async fn is_admin(&self, external_id: &str) -> StoreResult<bool>;

    async fn find_blacklist_entry(&self, sha256: &str) -> StoreResult<Option<BlacklistEntry>>;

    /// Cheap round trip used by readiness checks.
    async fn ping(&self) -> StoreResult<()>;
}
