//! src/services/credential_service.rs
//!
//! User provisioning, lookup by either key, revocation and upload quotas.
//! API keys are random UUIDs, collision-checked before insert; the unique
//! index on `users.apikey` catches the race between check and insert.

use crate::errors::{IndexError, IndexResult};
use crate::models::user::User;
use crate::services::{
    MAX_GENERATION_ATTEMPTS,
    random::RandomSource,
    store::{MetadataStore, StoreError},
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Bytes per megabyte as used by quota commands (decimal).
pub const BYTES_PER_MEGABYTE: i64 = 1_000 * 1_000;

#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn MetadataStore>,
    rng: RandomSource,
}

impl CredentialStore {
    pub fn new(store: Arc<dyn MetadataStore>, rng: RandomSource) -> Self {
        Self { store, rng }
    }

    /// Provision a user with the default quota and return their new API key.
    pub async fn create_user(&self, external_id: &str) -> IndexResult<String> {
        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let api_key = self.rng.uuid().to_string();
            if self.store.find_user_by_api_key(&api_key).await?.is_some() {
                debug!(attempt, "api key already taken");
                continue;
            }

            match self.store.insert_user(&User::new(external_id, &api_key)).await {
                Ok(()) => {
                    info!("created user {}", external_id);
                    return Ok(api_key);
                }
                Err(StoreError::Conflict(_)) => {
                    if self
                        .store
                        .find_user_by_external_id(external_id)
                        .await?
                        .is_some()
                    {
                        return Err(IndexError::AccountExists(external_id.to_string()));
                    }
                    debug!(attempt, "api key claimed concurrently");
                }
                Err(err) => return Err(err.into()),
            }
        }

        warn!("gave up generating an api key for {}", external_id);
        Err(IndexError::GenerationExhausted {
            what: "api key",
            attempts: MAX_GENERATION_ATTEMPTS,
        })
    }

    /// Delete whichever user has `key` as identity or API key.
    ///
    /// Succeeds whether or not a row existed.
    pub async fn revoke_key(&self, key: &str) -> IndexResult<()> {
        let removed = self.store.delete_users_matching(key).await?;
        info!("revoked {} user(s)", removed);
        Ok(())
    }

    pub async fn get_by_external_identity(&self, external_id: &str) -> IndexResult<Option<User>> {
        Ok(self.store.find_user_by_external_id(external_id).await?)
    }

    pub async fn get_by_api_key(&self, api_key: &str) -> IndexResult<Option<User>> {
        Ok(self.store.find_user_by_api_key(api_key).await?)
    }

    pub async fn is_admin(&self, external_id: &str) -> IndexResult<bool> {
        Ok(self.store.is_admin(external_id).await?)
    }

    /// Set the quota on the row matching both identity and key.
    ///
    /// Returns false when no row matched; nothing is changed in that case.
    pub async fn update_upload_limit(
        &self,
        external_id: &str,
        api_key: &str,
        bytes: i64,
    ) -> IndexResult<bool> {
        let updated = self
            .store
            .update_upload_limit(external_id, api_key, bytes)
            .await?;
        Ok(updated > 0)
    }

    /// Look the account up by identity and set its quota in megabytes.
    ///
    /// Returns the new limit in bytes.
    pub async fn set_upload_limit_mb(&self, external_id: &str, megabytes: u32) -> IndexResult<i64> {
        let account = self
            .get_by_external_identity(external_id)
            .await?
            .ok_or_else(|| IndexError::AccountNotFound(external_id.to_string()))?;

        let bytes = BYTES_PER_MEGABYTE * i64::from(megabytes);
        if !self
            .update_upload_limit(&account.external_id, &account.api_key, bytes)
            .await?
        {
            // Revoked between lookup and update.
            return Err(IndexError::AccountNotFound(external_id.to_string()));
        }
        info!("set upload limit of {} to {} bytes", external_id, bytes);
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::DEFAULT_UPLOAD_LIMIT;
    use crate::test_support::{FakeStore, memory_store};

    async fn credentials() -> CredentialStore {
        CredentialStore::new(memory_store().await, RandomSource::seeded(21))
    }

    #[tokio::test]
    async fn created_user_is_found_by_both_keys_with_defaults() {
        let users = credentials().await;
        let key = users.create_user("1001").await.unwrap();
        assert!(uuid::Uuid::parse_str(&key).is_ok());

        let by_key = users.get_by_api_key(&key).await.unwrap().unwrap();
        let by_id = users.get_by_external_identity("1001").await.unwrap().unwrap();
        assert_eq!(by_key, by_id);
        assert_eq!(by_key.upload_limit, DEFAULT_UPLOAD_LIMIT);
        assert!(!by_key.admin);
        assert!(!users.is_admin("1001").await.unwrap());
    }

    #[tokio::test]
    async fn second_account_for_same_identity_is_rejected() {
        let users = credentials().await;
        users.create_user("1001").await.unwrap();
        let err = users.create_user("1001").await.unwrap_err();
        assert!(matches!(err, IndexError::AccountExists(_)), "{err:?}");
    }

    #[tokio::test]
    async fn unknown_users_are_none_not_errors() {
        let users = credentials().await;
        assert!(users.get_by_api_key("nope").await.unwrap().is_none());
        assert!(users.get_by_external_identity("nope").await.unwrap().is_none());
        assert!(!users.is_admin("nope").await.unwrap());
    }

    #[tokio::test]
    async fn revoke_by_key_is_idempotent() {
        let users = credentials().await;
        let key = users.create_user("1001").await.unwrap();

        users.revoke_key(&key).await.unwrap();
        assert!(users.get_by_api_key(&key).await.unwrap().is_none());
        users.revoke_key(&key).await.unwrap();
    }

    #[tokio::test]
    async fn revoke_accepts_the_external_identity_too() {
        let users = credentials().await;
        let key = users.create_user("1001").await.unwrap();
        let other = users.create_user("2002").await.unwrap();

        users.revoke_key("1001").await.unwrap();
        assert!(users.get_by_api_key(&key).await.unwrap().is_none());
        assert!(users.get_by_api_key(&other).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn upload_limit_needs_matching_identity_and_key() {
        let users = credentials().await;
        let key_a = users.create_user("1001").await.unwrap();
        let key_b = users.create_user("2002").await.unwrap();

        assert!(!users.update_upload_limit("1001", &key_b, 1).await.unwrap());
        assert!(!users.update_upload_limit("2002", &key_a, 1).await.unwrap());
        for key in [&key_a, &key_b] {
            let user = users.get_by_api_key(key).await.unwrap().unwrap();
            assert_eq!(user.upload_limit, DEFAULT_UPLOAD_LIMIT);
        }

        assert!(users.update_upload_limit("1001", &key_a, 1234).await.unwrap());
        let user = users.get_by_api_key(&key_a).await.unwrap().unwrap();
        assert_eq!(user.upload_limit, 1234);
    }

    #[tokio::test]
    async fn megabyte_quota_uses_decimal_megabytes() {
        let users = credentials().await;
        let key = users.create_user("1001").await.unwrap();

        let bytes = users.set_upload_limit_mb("1001", 250).await.unwrap();
        assert_eq!(bytes, 250_000_000);
        let user = users.get_by_api_key(&key).await.unwrap().unwrap();
        assert_eq!(user.upload_limit, 250_000_000);

        let err = users.set_upload_limit_mb("9999", 1).await.unwrap_err();
        assert!(matches!(err, IndexError::AccountNotFound(_)));
    }

    #[tokio::test]
    async fn key_generation_exhausts_when_every_key_is_taken() {
        let users = CredentialStore::new(FakeStore::saturated(), RandomSource::seeded(2));
        let err = users.create_user("1001").await.unwrap_err();
        assert!(matches!(
            err,
            IndexError::GenerationExhausted {
                what: "api key",
                attempts: 5
            }
        ));
    }

    #[tokio::test]
    async fn store_failures_surface_as_store_errors() {
        let users = CredentialStore::new(FakeStore::failing(), RandomSource::seeded(2));
        assert!(matches!(
            users.create_user("1001").await,
            Err(IndexError::Store(_))
        ));
        assert!(matches!(
            users.revoke_key("1001").await,
            Err(IndexError::Store(_))
        ));
        assert!(matches!(
            users.is_admin("1001").await,
            Err(IndexError::Store(_))
        ));
    }
}
