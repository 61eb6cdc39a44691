//! src/services/sqlite_store.rs
//!
//! SQLite-backed `MetadataStore`. Every method is a single parameterized
//! statement against the `objects`, `users` or `blacklist` tables.

use crate::models::{
    blacklist::BlacklistEntry,
    object::{Object, ObjectAddress},
    user::User,
};
use crate::services::store::{MetadataStore, StoreError, StoreResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::debug;

const OBJECT_COLUMNS: &str =
    "bucket, wildcard, filename, uploader, created_at, md5, sha256, deleted_at";
const USER_COLUMNS: &str = "discordid, apikey, uploadlimit, admin";

#[derive(Clone)]
pub struct SqliteStore {
    /// Shared SQLite connection pool.
    pub db: Arc<SqlitePool>,
}

impl SqliteStore {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self { db }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db
    }
}

#[async_trait]
impl MetadataStore for SqliteStore {
    async fn find_object_by_hash(
        &self,
        md5: &str,
        sha256: &str,
        bucket: &str,
    ) -> StoreResult<Option<Object>> {
        let sql = format!(
            "SELECT {OBJECT_COLUMNS} FROM objects
             WHERE (md5 = ? OR sha256 = ?) AND bucket = ? AND deleted_at IS NULL
             ORDER BY created_at ASC LIMIT 1"
        );
        let object = sqlx::query_as::<_, Object>(&sql)
            .bind(md5)
            .bind(sha256)
            .bind(bucket)
            .fetch_optional(&*self.db)
            .await?;
        Ok(object)
    }

    async fn filename_exists(&self, file_name: &str, bucket: &str) -> StoreResult<bool> {
        let found = sqlx::query_scalar::<_, i64>(
            "SELECT 1 FROM objects WHERE filename = ? AND bucket = ? LIMIT 1",
        )
        .bind(file_name)
        .bind(bucket)
        .fetch_optional(&*self.db)
        .await?;
        Ok(found.is_some())
    }

    async fn find_object(&self, address: &ObjectAddress) -> StoreResult<Option<Object>> {
        let sql = format!(
            "SELECT {OBJECT_COLUMNS} FROM objects
             WHERE wildcard = ? AND bucket = ? AND filename = ? AND deleted_at IS NULL"
        );
        let object = sqlx::query_as::<_, Object>(&sql)
            .bind(&address.wildcard)
            .bind(&address.domain)
            .bind(&address.file_name)
            .fetch_optional(&*self.db)
            .await?;
        Ok(object)
    }

    async fn insert_object(&self, object: &Object) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO objects (bucket, wildcard, filename, uploader, created_at, md5, sha256, deleted_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&object.domain)
        .bind(&object.wildcard)
        .bind(&object.file_name)
        .bind(&object.uploader)
        .bind(object.created_at)
        .bind(&object.md5)
        .bind(&object.sha256)
        .bind(object.deleted_at)
        .execute(&*self.db)
        .await
        .map_err(map_conflict)?;
        debug!("inserted object {}/{}", object.domain, object.file_name);
        Ok(())
    }

    async fn mark_object_deleted(
        &self,
        address: &ObjectAddress,
        deleted_at: DateTime<Utc>,
    ) -> StoreResult<u64> {
        let result = sqlx::query(
            "UPDATE objects SET deleted_at = ?
             WHERE wildcard = ? AND bucket = ? AND filename = ? AND deleted_at IS NULL",
        )
        .bind(deleted_at)
        .bind(&address.wildcard)
        .bind(&address.domain)
        .bind(&address.file_name)
        .execute(&*self.db)
        .await?;
        Ok(result.rows_affected())
    }

    async fn find_user_by_external_id(&self, external_id: &str) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE discordid = ?");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(external_id)
            .fetch_optional(&*self.db)
            .await?;
        Ok(user)
    }

    async fn find_user_by_api_key(&self, api_key: &str) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE apikey = ?");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(api_key)
            .fetch_optional(&*self.db)
            .await?;
        Ok(user)
    }

    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        sqlx::query("INSERT INTO users (discordid, apikey, uploadlimit, admin) VALUES (?, ?, ?, ?)")
            .bind(&user.external_id)
            .bind(&user.api_key)
            .bind(user.upload_limit)
            .bind(user.admin)
            .execute(&*self.db)
            .await
            .map_err(map_conflict)?;
        Ok(())
    }

    async fn delete_users_matching(&self, key: &str) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM users WHERE discordid = ? OR apikey = ?")
            .bind(key)
            .bind(key)
            .execute(&*self.db)
            .await?;
        Ok(result.rows_affected())
    }

    async fn update_upload_limit(
        &self,
        external_id: &str,
        api_key: &str,
        bytes: i64,
    ) -> StoreResult<u64> {
        let result =
            sqlx::query("UPDATE users SET uploadlimit = ? WHERE discordid = ? AND apikey = ?")
                .bind(bytes)
                .bind(external_id)
                .bind(api_key)
                .execute(&*self.db)
                .await?;
        Ok(result.rows_affected())
    }

    async fn is_admin(&self, external_id: &str) -> StoreResult<bool> {
        let found = sqlx::query_scalar::<_, i64>(
            "SELECT 1 FROM users WHERE discordid = ? AND admin = 1 LIMIT 1",
        )
        .bind(external_id)
        .fetch_optional(&*self.db)
        .await?;
        Ok(found.is_some())
    }

    async fn find_blacklist_entry(&self, sha256: &str) -> StoreResult<Option<BlacklistEntry>> {
        let entry = sqlx::query_as::<_, BlacklistEntry>(
            "SELECT hash, reason FROM blacklist WHERE hash = ?",
        )
        .bind(sha256)
        .fetch_optional(&*self.db)
        .await?;
        Ok(entry)
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&*self.db)
            .await?;
        Ok(())
    }
}

/// Return true if SQLx error indicates a unique constraint violation.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.message().to_ascii_lowercase().contains("unique")
    )
}

fn map_conflict(err: sqlx::Error) -> StoreError {
    if is_unique_violation(&err) {
        let message = match &err {
            sqlx::Error::Database(db_err) => db_err.message().to_string(),
            other => other.to_string(),
        };
        StoreError::Conflict(message)
    } else {
        StoreError::Sqlx(err)
    }
}
