//! src/services/object_service.rs
//!
//! ObjectIndex: maps (domain, wildcard, file name) to object metadata.
//! Answers "is this content already stored here" for the upload path and
//! "which object does this public URL name" for the resolver.

use crate::errors::IndexResult;
use crate::models::object::{Object, ObjectAddress};
use crate::services::{
    store::{MetadataStore, StoreResult},
    url_codec::UrlCodec,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Clone)]
pub struct ObjectIndex {
    store: Arc<dyn MetadataStore>,
    codec: Arc<dyn UrlCodec>,
}

impl ObjectIndex {
    pub fn new(store: Arc<dyn MetadataStore>, codec: Arc<dyn UrlCodec>) -> Self {
        Self { store, codec }
    }

    pub fn codec(&self) -> &dyn UrlCodec {
        self.codec.as_ref()
    }

    /// Canonical URL of a live object in `domain` whose MD5 *or* SHA-256
    /// matches (either hash alone is enough).
    ///
    /// Hashes are compared case-insensitively. Deleted objects never match,
    /// so re-uploading removed content records a new object under a new name.
    pub async fn exists(&self, md5: &str, sha256: &str, domain: &str) -> IndexResult<Option<String>> {
        let found = self
            .store
            .find_object_by_hash(
                &md5.to_ascii_uppercase(),
                &sha256.to_ascii_uppercase(),
                domain,
            )
            .await?;
        Ok(found.map(|object| self.codec.build(&object.address())))
    }

    /// Whether `file_name` is used anywhere in `domain`, under any wildcard.
    pub async fn name_taken(&self, file_name: &str, domain: &str) -> IndexResult<bool> {
        Ok(self.store.filename_exists(file_name, domain).await?)
    }

    /// The live object at exactly this (wildcard, domain, file name).
    pub async fn resolve(&self, address: &ObjectAddress) -> IndexResult<Option<Object>> {
        Ok(self.store.find_object(address).await?)
    }

    /// Parse a public URL with the configured codec and resolve it.
    pub async fn resolve_url(&self, url: &str) -> IndexResult<Option<Object>> {
        let address = self.codec.parse(url)?;
        debug!(
            "resolved url {} to wildcard={:?} domain={} file={}",
            url, address.wildcard, address.domain, address.file_name
        );
        self.resolve(&address).await
    }

    /// Insert a new object row.
    ///
    /// Left as a raw store result so callers can tell a name conflict
    /// (`StoreError::Conflict`) from any other failure.
    pub async fn insert(&self, object: &Object) -> StoreResult<()> {
        self.store.insert_object(object).await
    }

    /// Mark the live object at `address` deleted. Returns false if there was none.
    pub async fn mark_deleted(&self, address: &ObjectAddress) -> IndexResult<bool> {
        let affected = self
            .store
            .mark_object_deleted(address, Utc::now())
            .await?;
        if affected > 0 {
            info!("deleted {}", address.url());
        }
        Ok(affected > 0)
    }
}
