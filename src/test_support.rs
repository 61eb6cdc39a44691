//! Shared fixtures for unit tests.

use crate::db;
use crate::models::{
    blacklist::BlacklistEntry,
    object::{Object, ObjectAddress},
    user::User,
};
use crate::services::{
    sqlite_store::SqliteStore,
    store::{MetadataStore, StoreError, StoreResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Fresh in-memory database with the real schema applied.
pub async fn memory_store() -> Arc<SqliteStore> {
    let pool = db::connect_in_memory()
        .await
        .expect("in-memory sqlite pool");
    Arc::new(SqliteStore::new(Arc::new(pool)))
}

pub async fn seed_blacklist(store: &SqliteStore, sha256: &str, reason: &str) {
    sqlx::query("INSERT INTO blacklist (hash, reason) VALUES (?, ?)")
        .bind(sha256.to_ascii_uppercase())
        .bind(reason)
        .execute(store.pool())
        .await
        .expect("seed blacklist entry");
}

#[derive(Debug, Clone, Copy)]
enum Mode {
    /// Every call fails as if the driver lost its connection.
    Failing,
    /// Every generated name and key is already taken.
    Saturated,
}

pub struct FakeStore {
    mode: Mode,
}

impl FakeStore {
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            mode: Mode::Failing,
        })
    }

    pub fn saturated() -> Arc<Self> {
        Arc::new(Self {
            mode: Mode::Saturated,
        })
    }

    fn check(&self) -> StoreResult<()> {
        match self.mode {
            Mode::Failing => Err(StoreError::Sqlx(sqlx::Error::PoolTimedOut)),
            Mode::Saturated => Ok(()),
        }
    }
}

#[async_trait]
impl MetadataStore for FakeStore {
    async fn find_object_by_hash(&self, _: &str, _: &str, _: &str) -> StoreResult<Option<Object>> {
        self.check()?;
        Ok(None)
    }

    async fn filename_exists(&self, _: &str, _: &str) -> StoreResult<bool> {
        self.check()?;
        Ok(true)
    }

    async fn find_object(&self, _: &ObjectAddress) -> StoreResult<Option<Object>> {
        self.check()?;
        Ok(None)
    }

    async fn insert_object(&self, _: &Object) -> StoreResult<()> {
        self.check()?;
        Err(StoreError::Conflict("objects.filename".into()))
    }

    async fn mark_object_deleted(&self, _: &ObjectAddress, _: DateTime<Utc>) -> StoreResult<u64> {
        self.check()?;
        Ok(0)
    }

    async fn find_user_by_external_id(&self, _: &str) -> StoreResult<Option<User>> {
        self.check()?;
        Ok(None)
    }

    async fn find_user_by_api_key(&self, api_key: &str) -> StoreResult<Option<User>> {
        self.check()?;
        Ok(Some(User::new("taken", api_key)))
    }

    async fn insert_user(&self, _: &User) -> StoreResult<()> {
        self.check()?;
        Err(StoreError::Conflict("users.apikey".into()))
    }

    async fn delete_users_matching(&self, _: &str) -> StoreResult<u64> {
        self.check()?;
        Ok(0)
    }

    async fn update_upload_limit(&self, _: &str, _: &str, _: i64) -> StoreResult<u64> {
        self.check()?;
        Ok(0)
    }

    async fn is_admin(&self, _: &str) -> StoreResult<bool> {
        self.check()?;
        Ok(false)
    }

    async fn find_blacklist_entry(&self, _: &str) -> StoreResult<Option<BlacklistEntry>> {
        self.check()?;
        Ok(None)
    }

    async fn ping(&self) -> StoreResult<()> {
        self.check()
    }
}
