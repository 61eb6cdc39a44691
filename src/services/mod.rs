//! Naming, addressing and identity services.
//!
//! Every service holds an `Arc<dyn MetadataStore>` and is cheap to clone.

pub mod blacklist_service;
pub mod credential_service;
pub mod name_service;
pub mod object_service;
pub mod random;
pub mod sqlite_store;
pub mod store;
pub mod upload_service;
pub mod url_codec;

/// Random draws (file names, API keys) and insert conflicts tolerated per
/// operation before giving up.
pub const MAX_GENERATION_ATTEMPTS: usize = 5;
