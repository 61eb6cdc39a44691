//! HTTP handlers. Each one is a thin adapter from a request onto a service call.

pub mod health_handlers;
pub mod object_handlers;
pub mod user_handlers;

use crate::errors::AppError;
use axum::http::{HeaderMap, header};

/// Header naming the caller on the admin surface.
pub const EXTERNAL_IDENTITY_HEADER: &str = "x-external-identity";

/// API key from `Authorization`, with or without a `Bearer ` prefix.
pub(crate) fn api_key(headers: &HeaderMap) -> Result<&str, AppError> {
    let raw = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::unauthorized("missing Authorization header"))?;
    Ok(raw.strip_prefix("Bearer ").unwrap_or(raw))
}
