// Story endpoints: browsing is public, writing and liking need a token.

use crate::core::stories::CreateStory;
use crate::http::api_error::ApiError;
use crate::http::app_state::AppState;
use crate::http::auth_extractor::AuthUser;
use crate::http::{parse_story_id, text_field};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

pub async fn list(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let stories = state.stories.list_all().await?;
    Ok(Json(json!({ "stories": stories })))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let story = state.stories.get(parse_story_id(&id)?).await?;
    Ok(Json(json!({ "story": story })))
}

pub async fn completed(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let stories = state.stories.list_completed().await?;
    Ok(Json(json!({ "stories": stories })))
}

pub async fn popular(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let stories = state.stories.popular().await?;
    Ok(Json(json!({ "stories": stories })))
}

pub async fn by_theme(
    State(state): State<AppState>,
    Path(theme): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let stories = state.stories.list_by_theme(&theme).await?;
    Ok(Json(json!({ "stories": stories })))
}

pub async fn available(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Value>, ApiError> {
    let stories = state.stories.available_for(user.id).await?;
    Ok(Json(json!({ "stories": stories })))
}

pub async fn random(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Value>, ApiError> {
    let pick = state
        .stories
        .random_available_for(user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Devam edilecek hikaye bulunamadı".to_string()))?;
    Ok(Json(json!(pick)))
}

/// Text fields arrive as raw JSON so a number or object reaches the gate as
/// "not text" instead of failing deserialization.
#[derive(Debug, Deserialize)]
pub struct CreateStoryRequest {
    #[serde(default)]
    title: Option<Value>,
    #[serde(default)]
    theme: Option<Value>,
    #[serde(default)]
    content: Option<Value>,
    #[serde(default)]
    characters: Option<Value>,
    #[serde(default, alias = "plotHints")]
    plot_hints: Option<Value>,
}

pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<CreateStoryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let owned = |value: &Option<Value>| text_field(value).map(str::to_string);

    let story = state
        .stories
        .create_story(
            &user.author(),
            CreateStory {
                title: owned(&request.title),
                theme: owned(&request.theme),
                content: owned(&request.content),
                characters: owned(&request.characters),
                plot_hints: owned(&request.plot_hints),
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Hikaye başarıyla oluşturuldu! Diğer yazarların katkılarını bekleyin.",
            "story": story,
        })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct ContinueRequest {
    #[serde(default)]
    content: Option<Value>,
}

pub async fn continue_story(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<ContinueRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let story = state
        .stories
        .continue_story(parse_story_id(&id)?, &user.author(), text_field(&request.content))
        .await?;

    let message = if story.is_completed {
        "Hikaye başarıyla tamamlandı! Tebrikler!"
    } else {
        "Hikaye başarıyla devam ettirildi!"
    };
    Ok(Json(json!({
        "message": message,
        "is_completed": story.is_completed,
        "story": story,
    })))
}

pub async fn like(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let outcome = state.stories.toggle_like(parse_story_id(&id)?, user.id).await?;
    Ok(Json(json!(outcome)))
}
