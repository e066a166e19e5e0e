// Bearer-token extractors for handlers that need a logged-in user.

use super::api_error::ApiError;
use super::app_state::AppState;
use crate::core::stories::Author;
use crate::core::users::Role;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

/// The caller, as described by a valid `Authorization: Bearer <jwt>` header.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: u64,
    pub nickname: String,
    pub role: Role,
}

impl AuthUser {
    pub fn author(&self) -> Author {
        Author {
            id: self.id,
            nickname: self.nickname.clone(),
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                tracing::debug!("Missing bearer token");
                ApiError::Unauthorized("Token gerekli".to_string())
            })?;

        let claims = state
            .tokens
            .verify(token)
            .map_err(|e| ApiError::Unauthorized(e.to_string()))?;
        let id = claims.user_id().ok_or_else(|| {
            tracing::warn!(sub = %claims.sub, "Token subject is not a user id");
            ApiError::Unauthorized("Geçersiz token".to_string())
        })?;

        Ok(AuthUser {
            id,
            nickname: claims.nickname,
            role: claims.role,
        })
    }
}

/// An authenticated caller whose token carries the admin role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != Role::Admin {
            tracing::warn!(user_id = user.id, "Non-admin tried an admin route");
            return Err(ApiError::Forbidden("Yönetici yetkisi gerekli".to_string()));
        }
        Ok(AdminUser(user))
    }
}
