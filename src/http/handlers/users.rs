// Writer leaderboard and personal stats.

use crate::http::api_error::ApiError;
use crate::http::app_state::AppState;
use crate::http::auth_extractor::AuthUser;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

pub async fn top_writers(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let users = state.users.top_writers().await?;
    Ok(Json(json!({ "users": users })))
}

pub async fn stats(State(state): State<AppState>, user: AuthUser) -> Result<Json<Value>, ApiError> {
    let stats = state.stories.user_stats(user.id).await?;
    Ok(Json(json!({ "stats": stats })))
}
