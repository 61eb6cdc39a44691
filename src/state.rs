//! Shared application state handed to every handler.

use crate::services::{
    blacklist_service::BlacklistIndex, credential_service::CredentialStore,
    name_service::NameGenerator, object_service::ObjectIndex, random::RandomSource,
    store::MetadataStore, upload_service::UploadService, url_codec::CodecMode,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MetadataStore>,
    pub objects: ObjectIndex,
    pub names: NameGenerator,
    pub users: CredentialStore,
    pub blacklist: BlacklistIndex,
    pub uploads: UploadService,
}

impl AppState {
    /// Wire every service onto one store and one random source.
    pub fn new(store: Arc<dyn MetadataStore>, rng: RandomSource, codec: CodecMode) -> Self {
        let objects = ObjectIndex::new(store.clone(), codec.codec());
        let names = NameGenerator::new(store.clone(), rng.clone());
        let users = CredentialStore::new(store.clone(), rng);
        let blacklist = BlacklistIndex::new(store.clone());
        let uploads = UploadService::new(
            users.clone(),
            blacklist.clone(),
            names.clone(),
            objects.clone(),
        );
        Self {
            store,
            objects,
            names,
            users,
            blacklist,
            uploads,
        }
    }
}
