// Unauthenticated endpoints: health, themes and the moderation preview.

use crate::core::moderation::ContentClass;
use crate::core::themes;
use crate::http::api_error::ApiError;
use crate::http::app_state::AppState;
use crate::http::text_field;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "message": "StoryChain API is running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn list_themes() -> Json<Value> {
    Json(json!({ "themes": themes::all() }))
}

pub async fn get_theme(Path(id): Path<String>) -> Result<Json<Value>, ApiError> {
    let theme =
        themes::find(&id).ok_or_else(|| ApiError::NotFound("Tema bulunamadı".to_string()))?;
    Ok(Json(json!({ "theme": theme })))
}

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    #[serde(default = "default_class")]
    class: ContentClass,
    #[serde(default)]
    text: Option<Value>,
    /// Also list every rule the text breaks
    #[serde(default)]
    diagnostics: bool,
}

fn default_class() -> ContentClass {
    ContentClass::Body
}

/// Run text through the gate without persisting anything, so clients can
/// warn before submitting.
pub async fn check_content(
    State(state): State<AppState>,
    payload: Result<Json<CheckRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let text = text_field(&request.text);

    let verdict = state.moderation.moderate(request.class, text);
    let mut body = json!(verdict);

    if request.diagnostics {
        let locale = state.moderation.locale();
        let violations: Vec<Value> = state
            .moderation
            .diagnose(request.class, text)
            .into_iter()
            .map(|v| {
                json!({
                    "rule": v.rule_name(),
                    "reason": v.describe(request.class, locale),
                })
            })
            .collect();
        body["violations"] = json!(violations);
    }

    Ok(Json(body))
}
