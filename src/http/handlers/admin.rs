// Admin endpoints. Every handler takes AdminUser, so a non-admin token is
// turned away with 403 before any work happens.

use crate::http::api_error::ApiError;
use crate::http::app_state::AppState;
use crate::http::auth_extractor::AdminUser;
use crate::http::parse_story_id;
use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};

pub async fn stories(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Value>, ApiError> {
    let stories = state.stories.admin_stories().await?;
    Ok(Json(json!({ "stories": stories })))
}

pub async fn users(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Value>, ApiError> {
    let users = state.stories.admin_users().await?;
    Ok(Json(json!({ "users": users })))
}

pub async fn stats(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Value>, ApiError> {
    let stats = state.stories.stats().await?;
    Ok(Json(json!({ "stats": stats })))
}

pub async fn approve(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let story = state.stories.approve(parse_story_id(&id)?).await?;
    tracing::info!(story_id = story.id, admin_id = admin.id, "Admin approved story");
    Ok(Json(json!({ "message": "Hikaye onaylandı", "story": story })))
}

pub async fn delete(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_story_id(&id)?;
    state.stories.delete(id).await?;
    tracing::info!(story_id = id, admin_id = admin.id, "Admin deleted story");
    Ok(Json(json!({ "message": "Hikaye başarıyla silindi" })))
}
