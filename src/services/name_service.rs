//! Short random file names, unique per hosting domain.

use crate::errors::{IndexError, IndexResult};
use crate::services::{MAX_GENERATION_ATTEMPTS, random::RandomSource, store::MetadataStore};
use std::sync::Arc;
use tracing::{debug, warn};

/// Characters drawn per name, before the extension.
pub const NAME_LEN: usize = 10;

/// An extension is one bare suffix of ASCII letters and digits, e.g. `png`.
pub fn check_extension(extension: &str) -> IndexResult<()> {
    if extension.is_empty() || !extension.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(IndexError::InvalidExtension(extension.to_string()));
    }
    Ok(())
}

#[derive(Clone)]
pub struct NameGenerator {
    store: Arc<dyn MetadataStore>,
    rng: RandomSource,
}

impl NameGenerator {
    pub fn new(store: Arc<dyn MetadataStore>, rng: RandomSource) -> Self {
        Self { store, rng }
    }

    /// Draw `<10 alphanumerics>.<extension>` until one is free in `domain`.
    ///
    /// The namespace is the whole domain: a name used under any wildcard, or
    /// by a deleted object, counts as taken. Draws are independent, so a
    /// candidate can repeat. Fails after [`MAX_GENERATION_ATTEMPTS`] taken
    /// draws, or on the first failed lookup.
    pub async fn generate_name(&self, extension: &str, domain: &str) -> IndexResult<String> {
        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let candidate = format!("{}.{}", self.rng.alphanumeric(NAME_LEN), extension);
            if !self.store.filename_exists(&candidate, domain).await? {
                return Ok(candidate);
            }
            debug!(attempt, domain, candidate = %candidate, "file name already taken");
        }

        warn!(
            domain,
            attempts = MAX_GENERATION_ATTEMPTS,
            "gave up generating a file name"
        );
        Err(IndexError::GenerationExhausted {
            what: "file name",
            attempts: MAX_GENERATION_ATTEMPTS,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::object::Object;
    use crate::services::random::ALPHANUMERIC;
    use crate::test_support::{FakeStore, memory_store};
    use chrono::Utc;

    fn stored(domain: &str, wildcard: &str, file_name: &str) -> Object {
        Object {
            domain: domain.into(),
            wildcard: wildcard.into(),
            file_name: file_name.into(),
            uploader: "7".into(),
            created_at: Utc::now(),
            md5: "M".into(),
            sha256: "S".into(),
            deleted_at: None,
        }
    }

    #[test]
    fn extensions_must_be_bare_suffixes() {
        for ok in ["png", "JPEG", "mp4"] {
            assert!(check_extension(ok).is_ok(), "{ok}");
        }
        for bad in ["", "tar.gz", "a/b", "../x", ".png", "p g"] {
            assert!(
                matches!(check_extension(bad), Err(IndexError::InvalidExtension(_))),
                "{bad}"
            );
        }
    }

    #[tokio::test]
    async fn generates_ten_alphanumerics_plus_extension() {
        let store = memory_store().await;
        let names = NameGenerator::new(store, RandomSource::seeded(5));

        let name = names.generate_name("png", "example.com").await.unwrap();
        let (stem, ext) = name.split_once('.').unwrap();
        assert_eq!(ext, "png");
        assert_eq!(stem.len(), NAME_LEN);
        assert!(stem.bytes().all(|b| ALPHANUMERIC.contains(&b)));
    }

    #[tokio::test]
    async fn skips_names_taken_in_the_same_domain() {
        let store = memory_store().await;

        // Replay the seeded stream to learn the first candidate, then occupy it.
        let first = format!("{}.png", RandomSource::seeded(9).alphanumeric(NAME_LEN));
        store
            .insert_object(&stored("example.com", "cozy", &first))
            .await
            .unwrap();

        let names = NameGenerator::new(store.clone(), RandomSource::seeded(9));
        let name = names.generate_name("png", "example.com").await.unwrap();
        assert_ne!(name, first);
        assert!(!store.filename_exists(&name, "example.com").await.unwrap());
    }

    #[tokio::test]
    async fn other_domains_do_not_block_a_name() {
        let store = memory_store().await;
        let first = format!("{}.png", RandomSource::seeded(9).alphanumeric(NAME_LEN));
        store
            .insert_object(&stored("other.org", "", &first))
            .await
            .unwrap();

        let names = NameGenerator::new(store, RandomSource::seeded(9));
        let name = names.generate_name("png", "example.com").await.unwrap();
        assert_eq!(name, first);
    }

    #[tokio::test]
    async fn exhausts_after_five_taken_draws() {
        let names = NameGenerator::new(FakeStore::saturated(), RandomSource::seeded(1));
        let err = names.generate_name("png", "example.com").await.unwrap_err();
        assert!(matches!(
            err,
            IndexError::GenerationExhausted { attempts: 5, .. }
        ));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn lookup_failure_fails_immediately() {
        let names = NameGenerator::new(FakeStore::failing(), RandomSource::seeded(1));
        let err = names.generate_name("png", "example.com").await.unwrap_err();
        assert!(matches!(err, IndexError::Store(_)));
        assert!(!err.is_retryable());
    }
}
