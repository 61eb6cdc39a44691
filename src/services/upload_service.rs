//! src/services/upload_service.rs
//!
//! UploadService: the admission path an uploader goes through before any
//! bytes are written:
//! - authenticate the API key
//! - reject extensions and sizes that cannot be stored
//! - enforce the user's upload limit
//! - refuse blacklisted content (fail-closed)
//! - short-circuit duplicates with the existing URL
//! - claim a fresh name and record the object
//!
//! Name claims rely on the unique index over (bucket, filename): a conflict
//! on insert means another upload won the name, so a fresh one is drawn.

use crate::errors::{IndexError, IndexResult};
use crate::models::object::Object;
use crate::services::{
    MAX_GENERATION_ATTEMPTS,
    blacklist_service::BlacklistIndex,
    credential_service::CredentialStore,
    name_service::{NameGenerator, check_extension},
    object_service::ObjectIndex,
    store::StoreError,
    url_codec::split_host,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// What the uploader knows about the file before sending it.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadRequest {
    /// Full public host, e.g. `cozy.example.com` or `example.com`.
    pub host: String,
    /// Extension without the leading dot.
    pub extension: String,
    pub md5: String,
    pub sha256: String,
    pub size_bytes: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UploadOutcome {
    pub url: String,
    pub file_name: String,
    /// True when identical content was already stored in the domain.
    pub duplicate: bool,
}

#[derive(Clone)]
pub struct UploadService {
    users: CredentialStore,
    blacklist: BlacklistIndex,
    names: NameGenerator,
    objects: ObjectIndex,
}

impl UploadService {
    pub fn new(
        users: CredentialStore,
        blacklist: BlacklistIndex,
        names: NameGenerator,
        objects: ObjectIndex,
    ) -> Self {
        Self {
            users,
            blacklist,
            names,
            objects,
        }
    }

    /// Admit an upload for the holder of `api_key` and record it.
    pub async fn admit(&self, api_key: &str, req: &UploadRequest) -> IndexResult<UploadOutcome> {
        let user = self
            .users
            .get_by_api_key(api_key)
            .await?
            .ok_or(IndexError::Unauthorized)?;

        check_extension(&req.extension)?;
        if req.size_bytes < 0 {
            return Err(IndexError::InvalidSize(req.size_bytes));
        }
        if req.size_bytes > user.upload_limit {
            return Err(IndexError::QuotaExceeded {
                size: req.size_bytes,
                limit: user.upload_limit,
            });
        }

        if let Some(reason) = self.blacklist.blocking_reason(&req.sha256).await {
            warn!("refused blacklisted upload from {}", user.external_id);
            return Err(IndexError::Blacklisted(reason));
        }

        let (wildcard, domain) = split_host(&req.host)?;

        if let Some(url) = self.objects.exists(&req.md5, &req.sha256, &domain).await? {
            let file_name = url.rsplit('/').next().unwrap_or_default().to_string();
            return Ok(UploadOutcome {
                url,
                file_name,
                duplicate: true,
            });
        }

        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let file_name = self.names.generate_name(&req.extension, &domain).await?;
            let object = Object {
                domain: domain.clone(),
                wildcard: wildcard.clone(),
                file_name,
                uploader: user.external_id.clone(),
                created_at: Utc::now(),
                md5: req.md5.to_ascii_uppercase(),
                sha256: req.sha256.to_ascii_uppercase(),
                deleted_at: None,
            };

            match self.objects.insert(&object).await {
                Ok(()) => {
                    let url = self.objects.codec().build(&object.address());
                    info!("{} uploaded {}", user.external_id, url);
                    return Ok(UploadOutcome {
                        url,
                        file_name: object.file_name,
                        duplicate: false,
                    });
                }
                Err(StoreError::Conflict(_)) => {
                    warn!(attempt, "file name {} claimed concurrently", object.file_name);
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(IndexError::GenerationExhausted {
            what: "file name",
            attempts: MAX_GENERATION_ATTEMPTS,
        })
    }

    /// Soft-delete the object behind `url`. Only its uploader or an admin may.
    ///
    /// Returns the deleted object, or `None` if nothing live was there.
    pub async fn delete(&self, api_key: &str, url: &str) -> IndexResult<Option<Object>> {
        let user = self
            .users
            .get_by_api_key(api_key)
            .await?
            .ok_or(IndexError::Unauthorized)?;

        let Some(object) = self.objects.resolve_url(url).await? else {
            return Ok(None);
        };
        if object.uploader != user.external_id && !user.admin {
            return Err(IndexError::Forbidden(format!(
                "{} was not uploaded by you",
                object.url()
            )));
        }

        if !self.objects.mark_deleted(&object.address()).await? {
            return Ok(None);
        }
        Ok(Some(object))
    }
}
