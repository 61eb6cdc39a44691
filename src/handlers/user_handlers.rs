//! Admin endpoints for user provisioning, revocation and quotas.
//!
//! Every route requires an `X-External-Identity` header naming an admin.

use crate::{
    errors::AppError, handlers::EXTERNAL_IDENTITY_HEADER, models::user::User, state::AppState,
};
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateUserReq {
    pub external_id: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedUser {
    pub external_id: String,
    pub api_key: String,
}

#[derive(Debug, Deserialize)]
pub struct UploadLimitReq {
    pub megabytes: u32,
}

#[derive(Debug, Serialize)]
pub struct UploadLimit {
    pub upload_limit: i64,
}

async fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<(), AppError> {
    let caller = headers
        .get(EXTERNAL_IDENTITY_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::unauthorized("missing X-External-Identity header"))?;
    if state.users.is_admin(caller).await? {
        Ok(())
    } else {
        Err(AppError::forbidden("admin only"))
    }
}

/// POST `/users`: provision a user and return their API key.
pub async fn create_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateUserReq>,
) -> Result<(StatusCode, Json<CreatedUser>), AppError> {
    require_admin(&state, &headers).await?;
    if req.external_id.trim().is_empty() {
        return Err(AppError::bad_request("external_id is required"));
    }
    let api_key = state.users.create_user(&req.external_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedUser {
            external_id: req.external_id,
            api_key,
        }),
    ))
}

/// GET `/users/{id}`: look a user up by external identity.
pub async fn get_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<User>, AppError> {
    require_admin(&state, &headers).await?;
    let user = state
        .users
        .get_by_external_identity(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("no account for {}", id)))?;
    Ok(Json(user))
}

/// DELETE `/users/{id}`: revoke by external identity or API key. Idempotent.
pub async fn revoke_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    require_admin(&state, &headers).await?;
    state.users.revoke_key(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT `/users/{id}/upload-limit`: set the quota in (decimal) megabytes.
pub async fn set_upload_limit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<UploadLimitReq>,
) -> Result<Json<UploadLimit>, AppError> {
    require_admin(&state, &headers).await?;
    let upload_limit = state.users.set_upload_limit_mb(&id, req.megabytes).await?;
    Ok(Json(UploadLimit { upload_limit }))
}
