use crate::services::store::StoreError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use thiserror::Error;

/// Failure kinds surfaced by the naming, addressing and identity services.
///
/// "Not found" is never an error here; lookups return `Ok(None)` for it.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("storage failure: {0}")]
    Store(#[from] StoreError),
    #[error("could not generate a unique {what} after {attempts} attempts")]
    GenerationExhausted { what: &'static str, attempts: usize },
    #[error("malformed url `{0}`")]
    MalformedUrl(String),
    #[error("invalid domain `{0}`")]
    InvalidDomain(String),
    #[error("invalid extension `{0}`: expected letters and digits only, like `png`")]
    InvalidExtension(String),
    #[error("invalid file size {0}")]
    InvalidSize(i64),
    #[error("no account for `{0}`")]
    AccountNotFound(String),
    #[error("an account for `{0}` already exists")]
    AccountExists(String),
    #[error("unknown api key")]
    Unauthorized,
    #[error("{0}")]
    Forbidden(String),
    #[error("file is blacklisted: {0}")]
    Blacklisted(String),
    #[error("file of {size} bytes exceeds the upload limit of {limit} bytes")]
    QuotaExceeded { size: i64, limit: i64 },
}

impl IndexError {
    /// Whether the caller may simply retry the whole operation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, IndexError::GenerationExhausted { .. })
    }
}

pub type IndexResult<T> = Result<T, IndexError>;

/// A lightweight wrapper for general errors that keeps the message local.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    /// Create a new AppError with a specific status and message.
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            message: msg.into(),
        }
    }

    /// Shortcut for a 500 Internal Server Error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    /// Shortcut for 404 Not Found
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, msg)
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, msg)
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, msg)
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, msg)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message,
            "status": self.status.as_u16()
        }));

        (self.status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::internal(err.to_string())
    }
}

impl From<IndexError> for AppError {
    fn from(err: IndexError) -> Self {
        let status = match &err {
            IndexError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            IndexError::GenerationExhausted { .. } => StatusCode::SERVICE_UNAVAILABLE,
            IndexError::MalformedUrl(_)
            | IndexError::InvalidDomain(_)
            | IndexError::InvalidExtension(_)
            | IndexError::InvalidSize(_) => StatusCode::BAD_REQUEST,
            IndexError::AccountNotFound(_) => StatusCode::NOT_FOUND,
            IndexError::AccountExists(_) => StatusCode::CONFLICT,
            IndexError::Unauthorized => StatusCode::UNAUTHORIZED,
            IndexError::Forbidden(_) => StatusCode::FORBIDDEN,
            IndexError::Blacklisted(_) => StatusCode::UNAVAILABLE_FOR_LEGAL_REASONS,
            IndexError::QuotaExceeded { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        };
        if status.is_server_error() {
            tracing::error!("request failed: {}", err);
        }
        AppError::new(status, err.to_string())
    }
}
