// The http module is the axum adapter: routes, shared state, auth extractors
// and error mapping. Handlers stay thin and call straight into core services.

#[path = "api_error.rs"]
pub mod api_error;

#[path = "app_state.rs"]
pub mod app_state;

#[path = "auth_extractor.rs"]
pub mod auth_extractor;

#[path = "handlers/admin.rs"]
mod admin;
#[path = "handlers/auth.rs"]
mod auth;
#[path = "handlers/public.rs"]
mod public;
#[path = "handlers/stories.rs"]
mod stories;
#[path = "handlers/users.rs"]
mod users;

pub use api_error::ApiError;
pub use app_state::AppState;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the full API router.
pub fn router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/api/health", get(public::health))
        .route("/api/themes", get(public::list_themes))
        .route("/api/themes/{id}", get(public::get_theme))
        .route("/api/moderation/check", post(public::check_content))
        // Auth
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        // Stories
        .route("/api/stories", get(stories::list).post(stories::create))
        .route("/api/stories/completed", get(stories::completed))
        .route("/api/stories/popular", get(stories::popular))
        .route("/api/stories/available", get(stories::available))
        .route("/api/stories/random", get(stories::random))
        .route("/api/stories/theme/{theme}", get(stories::by_theme))
        .route("/api/stories/{id}", get(stories::get))
        .route("/api/stories/{id}/continue", post(stories::continue_story))
        .route("/api/stories/{id}/like", post(stories::like))
        // Users
        .route("/api/users/top-writers", get(users::top_writers))
        .route("/api/users/stats", get(users::stats))
        // Admin
        .route("/api/admin/stories", get(admin::stories))
        .route("/api/admin/stories/{id}", delete(admin::delete))
        .route("/api/admin/stories/{id}/approve", put(admin::approve))
        .route("/api/admin/users", get(admin::users))
        .route("/api/admin/stats", get(admin::stats))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// CORS for the single frontend origin. An unparsable origin disables
/// cross-origin access rather than opening it up.
pub fn cors_layer(frontend_url: &str) -> CorsLayer {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];

    match frontend_url.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(methods)
            .allow_headers([AUTHORIZATION, CONTENT_TYPE]),
        Err(e) => {
            tracing::warn!(frontend_url, "Invalid FRONTEND_URL, CORS disabled: {}", e);
            CorsLayer::new()
        }
    }
}

async fn not_found() -> (axum::http::StatusCode, Json<Value>) {
    (
        axum::http::StatusCode::NOT_FOUND,
        Json(json!({ "message": "Endpoint bulunamadı" })),
    )
}

/// A JSON field as text; numbers, objects and null count as missing.
pub(crate) fn text_field(value: &Option<Value>) -> Option<&str> {
    value.as_ref().and_then(Value::as_str)
}

pub(crate) fn parse_story_id(raw: &str) -> Result<u64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::NotFound("Hikaye bulunamadı".to_string()))
}

// ============================================================================
// TESTS
// ============================================================================
