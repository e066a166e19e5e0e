// SQLite pool setup shared by the sqlx-backed stores.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use std::path::Path;

/// Open a pool for `database_url`, which may be a bare file path, a
/// `sqlite://` URL or `sqlite::memory:`.
pub async fn connect(database_url: &str) -> anyhow::Result<Pool<Sqlite>> {
    let in_memory = database_url.contains(":memory:");

    // Ensure the file exists if it's a file path
    let path_str = database_url.trim_start_matches("sqlite://");
    if !in_memory && !Path::new(path_str).exists() {
        if let Some(parent) = Path::new(path_str).parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::File::create(path_str)?;
    }

    let conn_str = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite://{}", database_url)
    };

    // Each connection to :memory: is its own database
    let max_connections = if in_memory { 1 } else { 5 };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(&conn_str)
        .await?;

    tracing::info!(database_url, "Connected to SQLite");
    Ok(pool)
}
