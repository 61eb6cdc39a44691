//! Content-hash blacklist lookups.

use crate::errors::IndexResult;
use crate::models::blacklist::BlacklistEntry;
use crate::services::store::MetadataStore;
use std::sync::Arc;
use tracing::warn;

/// Reason reported when the blacklist could not be consulted.
pub const UNAVAILABLE_REASON: &str = "blacklist unavailable";

#[derive(Clone)]
pub struct BlacklistIndex {
    store: Arc<dyn MetadataStore>,
}

impl BlacklistIndex {
    pub fn new(store: Arc<dyn MetadataStore>) -> Self {
        Self { store }
    }

    /// Whether `sha256` (any case) is blacklisted.
    pub async fn is_blacklisted(&self, sha256: &str) -> IndexResult<bool> {
        Ok(self.get_entry(sha256).await?.is_some())
    }

    /// Fail-closed variant for admission checks: a failed lookup counts as blocked.
    pub async fn is_blocked(&self, sha256: &str) -> bool {
        self.blocking_reason(sha256).await.is_some()
    }

    /// Why `sha256` may not be stored, or `None` if it may.
    ///
    /// Fail-closed with one lookup: a store failure blocks with
    /// [`UNAVAILABLE_REASON`].
    pub async fn blocking_reason(&self, sha256: &str) -> Option<String> {
        match self.get_entry(sha256).await {
            Ok(entry) => entry.map(|entry| entry.reason),
            Err(err) => {
                warn!("blacklist lookup failed, treating {} as blocked: {}", sha256, err);
                Some(UNAVAILABLE_REASON.to_string())
            }
        }
    }

    /// The stored entry, if any.
    pub async fn get_entry(&self, sha256: &str) -> IndexResult<Option<BlacklistEntry>> {
        let entry = self
            .store
            .find_blacklist_entry(&sha256.to_ascii_uppercase())
            .await?;
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeStore, memory_store, seed_blacklist};

    const HASH: &str = "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08";

    #[tokio::test]
    async fn lookup_is_case_insensitive() {
        let store = memory_store().await;
        seed_blacklist(&store, HASH, "malware").await;
        let index = BlacklistIndex::new(store);

        let lower = index.is_blacklisted(HASH).await.unwrap();
        let upper = index
            .is_blacklisted(&HASH.to_ascii_uppercase())
            .await
            .unwrap();
        assert!(lower);
        assert_eq!(lower, upper);
    }

    #[tokio::test]
    async fn entry_carries_reason_and_absence_is_not_an_error() {
        let store = memory_store().await;
        seed_blacklist(&store, HASH, "malware").await;
        let index = BlacklistIndex::new(store);

        let entry = index.get_entry(HASH).await.unwrap().unwrap();
        assert_eq!(entry.reason, "malware");
        assert_eq!(entry.sha256, HASH.to_ascii_uppercase());

        assert!(index.get_entry("00ff").await.unwrap().is_none());
        assert!(!index.is_blacklisted("00ff").await.unwrap());
        assert!(!index.is_blocked("00ff").await);
    }

    #[tokio::test]
    async fn failed_lookup_is_blocked() {
        let index = BlacklistIndex::new(FakeStore::failing());
        assert!(index.is_blacklisted(HASH).await.is_err());
        assert!(index.is_blocked(HASH).await);
        assert_eq!(
            index.blocking_reason(HASH).await.as_deref(),
            Some(UNAVAILABLE_REASON)
        );
    }

    #[tokio::test]
    async fn blocking_reason_is_the_stored_reason() {
        let store = memory_store().await;
        seed_blacklist(&store, HASH, "malware").await;
        let index = BlacklistIndex::new(store);

        assert_eq!(index.blocking_reason(HASH).await.as_deref(), Some("malware"));
        assert_eq!(index.blocking_reason("00ff").await, None);
    }
}
