//! RPC error types and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use continua_downloads::DownloadError;
use continua_verification::{FieldErrors, VerificationError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid input")]
    Validation(FieldErrors),

    #[error("invalid or already used verification link")]
    TokenInvalid,

    #[error("verification link expired")]
    TokenExpired,

    #[error("email not verified")]
    Forbidden,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("server error: {0}")]
    Server(String),

    /// Anything the caller has no business knowing about.
    #[error("internal error")]
    Internal,
}

impl From<VerificationError> for RpcError {
    fn from(e: VerificationError) -> Self {
        match e {
            VerificationError::Validation(errors) => RpcError::Validation(errors),
            VerificationError::Transient => RpcError::Internal,
        }
    }
}

impl From<DownloadError> for RpcError {
    fn from(e: DownloadError) -> Self {
        match e {
            DownloadError::Unauthorized => RpcError::Forbidden,
            DownloadError::AssetMissing(category) => {
                RpcError::NotFound(format!("no book for category {}", category.as_str()))
            }
            DownloadError::Storage(_) => RpcError::Internal,
        }
    }
}

/// Wire shape of every error response. `field_errors` appears only on
/// validation failures.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field_errors: Option<FieldErrors>,
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let (status, error, field_errors) = match self {
            RpcError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            RpcError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "Invalid input".to_string(),
                Some(errors),
            ),
            RpcError::TokenInvalid => (
                StatusCode::BAD_REQUEST,
                "Invalid or already used verification link".to_string(),
                None,
            ),
            RpcError::TokenExpired => (
                StatusCode::BAD_REQUEST,
                "This verification link has expired. Please request a new one.".to_string(),
                None,
            ),
            RpcError::Forbidden => (
                StatusCode::FORBIDDEN,
                "Email not verified".to_string(),
                None,
            ),
            RpcError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            RpcError::Config(_) | RpcError::Server(_) | RpcError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong, please try again".to_string(),
                None,
            ),
        };
        (status, Json(ErrorBody {
            error,
            field_errors,
        }))
            .into_response()
    }
}
