// Login and current-user endpoints.

use crate::http::api_error::ApiError;
use crate::http::app_state::AppState;
use crate::http::auth_extractor::AuthUser;
use crate::http::text_field;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    nickname: Option<Value>,
    #[serde(default)]
    password: Option<Value>,
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let outcome = state
        .users
        .login(text_field(&request.nickname), text_field(&request.password))
        .await?;

    Ok(Json(json!({
        "token": outcome.token,
        "user": outcome.user,
    })))
}

pub async fn me(State(state): State<AppState>, user: AuthUser) -> Result<Json<Value>, ApiError> {
    let mut me = state.users.me(user.id).await?;
    // The token decides the effective role
    me.role = user.role;
    Ok(Json(json!({ "user": me })))
}
