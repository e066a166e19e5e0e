// HTTP error mapping - every failure leaves as `{ "message": ... }`.

use crate::core::stories::StoryError;
use crate::core::users::{TokenError, UserError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    /// Logged server-side; the client only sees a generic message
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "Request failed");
                "Server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NicknameRejected(_) => ApiError::BadRequest(err.to_string()),
            UserError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            UserError::NotFound => ApiError::NotFound(err.to_string()),
            UserError::Token(TokenError::Invalid) => ApiError::Unauthorized(err.to_string()),
            UserError::Token(TokenError::Signing(_)) | UserError::StorageError(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl From<StoryError> for ApiError {
    fn from(err: StoryError) -> Self {
        match err {
            StoryError::ContentRejected(_)
            | StoryError::SegmentTooShort { .. }
            | StoryError::MissingTheme
            | StoryError::UnknownTheme(_)
            | StoryError::AlreadyCompleted
            | StoryError::AlreadyContributed => ApiError::BadRequest(err.to_string()),
            StoryError::NotFound => ApiError::NotFound(err.to_string()),
            StoryError::User(inner) => inner.into(),
            StoryError::StorageError(_) => ApiError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let rejected: ApiError = StoryError::ContentRejected("Başlık çok kısa".into()).into();
        assert_eq!(rejected.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(rejected.to_string(), "Başlık çok kısa");

        let missing: ApiError = StoryError::NotFound.into();
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);

        let nested: ApiError = StoryError::User(UserError::NotFound).into();
        assert_eq!(nested.status_code(), StatusCode::NOT_FOUND);

        let creds: ApiError = UserError::InvalidCredentials.into();
        assert_eq!(creds.status_code(), StatusCode::UNAUTHORIZED);

        let storage: ApiError = StoryError::StorageError("disk full".into()).into();
        assert_eq!(storage.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
