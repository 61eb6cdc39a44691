//! HTTP handlers for object addressing: resolve, dedup check, upload
//! admission, deletion, name generation and blacklist lookup.

use crate::{
    errors::AppError,
    handlers::api_key,
    models::{blacklist::BlacklistEntry, object::Object},
    services::{
        name_service::check_extension,
        upload_service::{UploadOutcome, UploadRequest},
    },
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct UrlQuery {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct ExistsQuery {
    pub md5: String,
    pub sha256: String,
    pub domain: String,
}

#[derive(Debug, Serialize)]
pub struct ExistsResponse {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateNameReq {
    pub extension: String,
    pub domain: String,
}

#[derive(Debug, Serialize)]
pub struct GeneratedName {
    pub file_name: String,
}

/// GET `/objects/resolve?url=`: metadata of the object a public URL names.
pub async fn resolve_object(
    State(state): State<AppState>,
    Query(q): Query<UrlQuery>,
) -> Result<Json<Object>, AppError> {
    let object = state
        .objects
        .resolve_url(&q.url)
        .await?
        .ok_or_else(|| AppError::not_found(format!("no object at {}", q.url)))?;
    Ok(Json(object))
}

/// GET `/objects/exists?md5=&sha256=&domain=`: URL of identical content, if stored.
pub async fn object_exists(
    State(state): State<AppState>,
    Query(q): Query<ExistsQuery>,
) -> Result<Json<ExistsResponse>, AppError> {
    let url = state.objects.exists(&q.md5, &q.sha256, &q.domain).await?;
    Ok(Json(ExistsResponse { url }))
}

/// POST `/objects`: admit an upload. 201 for a new object, 200 for a duplicate.
pub async fn admit_upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<UploadRequest>,
) -> Result<(StatusCode, Json<UploadOutcome>), AppError> {
    let key = api_key(&headers)?;
    let outcome = state.uploads.admit(key, &req).await?;
    let status = if outcome.duplicate {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(outcome)))
}

/// DELETE `/objects?url=`: soft-delete an object owned by the caller.
pub async fn delete_object(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(q): Query<UrlQuery>,
) -> Result<impl IntoResponse, AppError> {
    let key = api_key(&headers)?;
    match state.uploads.delete(key, &q.url).await? {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(AppError::not_found(format!("no object at {}", q.url))),
    }
}

/// POST `/names`: draw a file name that is free in the domain right now.
pub async fn generate_name(
    State(state): State<AppState>,
    Json(req): Json<GenerateNameReq>,
) -> Result<Json<GeneratedName>, AppError> {
    check_extension(&req.extension)?;
    let file_name = state
        .names
        .generate_name(&req.extension, &req.domain)
        .await?;
    Ok(Json(GeneratedName { file_name }))
}

/// GET `/blacklist/{hash}`: the blacklist entry for a SHA-256, any case.
pub async fn get_blacklist_entry(
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> Result<Json<BlacklistEntry>, AppError> {
    let entry = state
        .blacklist
        .get_entry(&hash)
        .await?
        .ok_or_else(|| AppError::not_found(format!("{} is not blacklisted", hash)))?;
    Ok(Json(entry))
}
