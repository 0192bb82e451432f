use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::auth::AuthError;
use crate::store::StoreError;

/// HTTP-facing error type for all routes.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Caller could not be authenticated (missing, malformed or invalid token).
    #[error("{0}")]
    Unauthorized(String),

    /// Caller is authenticated but the token does not grant the required scope.
    #[error("insufficient scope")]
    Forbidden,

    /// A server-side invariant was broken (e.g. middleware out of order).
    #[error("{0}")]
    Internal(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Unauthorized(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized(message) => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
            }
            // Scope rejections carry no body.
            ApiError::Forbidden => StatusCode::FORBIDDEN.into_response(),
            ApiError::Internal(message) => {
                tracing::error!("internal error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "internal server error" })),
                )
                    .into_response()
            }
            ApiError::Store(err) => {
                // Log the real error but never expose storage details to clients.
                tracing::error!("store error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "internal server error" })),
                )
                    .into_response()
            }
        }
    }
}
