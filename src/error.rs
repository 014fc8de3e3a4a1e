//! Error taxonomy
//! Mission: Map every store, token and request failure onto one JSON error shape

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Failures raised by the persistence layer (users, ordered resources, contacts)
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Validation(String),
    #[error("Email already exists")]
    DuplicateEmail,
    #[error("Email and password don't match")]
    AuthenticationFailed,
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    InvalidPayload(String),
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

impl StoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        StoreError::Validation(message.into())
    }

    pub fn not_found(label: &str) -> Self {
        StoreError::NotFound(format!("{} not found", label))
    }
}

/// HTTP-facing errors. Every variant renders as `{"error": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    DuplicateEmail,
    AuthenticationFailed,
    Unauthorized(&'static str),
    Forbidden(&'static str),
    NotFound(String),
    InvalidPayload(String),
    Upstream(String),
    Internal,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::DuplicateEmail | ApiError::InvalidPayload(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::AuthenticationFailed | ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::Validation(msg)
            | ApiError::NotFound(msg)
            | ApiError::InvalidPayload(msg)
            | ApiError::Upstream(msg) => msg.clone(),
            ApiError::DuplicateEmail => "Email already exists".to_string(),
            ApiError::AuthenticationFailed => "Email and password don't match".to_string(),
            ApiError::Unauthorized(msg) | ApiError::Forbidden(msg) => (*msg).to_string(),
            ApiError::Internal => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.message() }));
        (self.status_code(), body).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(msg) => ApiError::Validation(msg),
            StoreError::DuplicateEmail => ApiError::DuplicateEmail,
            StoreError::AuthenticationFailed => ApiError::AuthenticationFailed,
            StoreError::NotFound(msg) => ApiError::NotFound(msg),
            StoreError::InvalidPayload(msg) => ApiError::InvalidPayload(msg),
            other => {
                error!("Store failure: {}", other);
                ApiError::Internal
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}
