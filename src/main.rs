// This is the entry point of the StoryChain API.
//
// **Architecture Overview:**
// - `core/` = Business logic (moderation gate, stories, users, themes)
// - `infra/` = Implementations of core traits (SQLite, in-memory, file loaders)
// - `http/` = axum adapter (routes, extractors, error mapping)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Serve the HTTP API until Ctrl+C

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "http/http_layer.rs"]
mod http;
#[path = "infra/infra_layer.rs"]
mod infra;

mod config;

use crate::config::{AppConfig, StorageBackend};
use crate::core::moderation::{Lexicon, ModerationConfig, ModerationService};
use crate::core::users::TokenService;
use crate::http::app_state::{DynStoryStore, DynUserStore};
use crate::http::AppState;
use crate::infra::stories::{InMemoryStoryStore, SqliteStoryStore};
use crate::infra::users::{InMemoryUserStore, SqliteUserStore};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Assemble the moderation gate from the configured lexicon, extra terms and
/// thresholds.
fn build_moderation(config: &AppConfig) -> anyhow::Result<ModerationService> {
    let mut lexicon = Lexicon::for_variant(config.lexicon);
    if let Some(path) = &config.extra_terms_file {
        infra::moderation::extend_from_file(&mut lexicon, path)?;
    }

    let thresholds = match &config.moderation_config_file {
        Some(path) => infra::moderation::load_config(path)?,
        None => ModerationConfig::default(),
    };

    tracing::info!(
        lexicon = ?config.lexicon,
        terms = lexicon.len(),
        locale = ?config.moderation_locale,
        "Moderation gate ready"
    );
    Ok(ModerationService::new(
        lexicon,
        thresholds,
        config.moderation_locale,
    ))
}

async fn build_stores(config: &AppConfig) -> anyhow::Result<(DynStoryStore, DynUserStore)> {
    match config.storage {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            let stories: DynStoryStore = Arc::new(InMemoryStoryStore::new());
            let users: DynUserStore = Arc::new(InMemoryUserStore::new());
            Ok((stories, users))
        }
        StorageBackend::Sqlite => {
            let pool = infra::database::connect(&config.database_url).await?;

            let users = SqliteUserStore::new(pool.clone());
            users.migrate().await?;
            let stories = SqliteStoryStore::new(pool);
            stories.migrate().await?;

            let stories: DynStoryStore = Arc::new(stories);
            let users: DynUserStore = Arc::new(users);
            Ok((stories, users))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        return;
    }
    tracing::info!("Shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;

    let moderation = Arc::new(build_moderation(&config)?);
    let tokens = Arc::new(TokenService::new(&config.jwt_secret, config.token_ttl));
    let (story_store, user_store) = build_stores(&config).await?;

    if config.admin.is_none() {
        tracing::info!("ADMIN_PASSWORD not set; admin login is disabled");
    }
    let state = AppState::new(
        moderation,
        tokens,
        story_store,
        user_store,
        config.admin.clone(),
    );
    let app = http::router(state, http::cors_layer(&config.frontend_url));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, storage = ?config.storage, "StoryChain API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
