// SQLite-backed UserStore.
//
// Tables:
// - users: one row per nickname, counters kept inline

use crate::core::users::{Role, User, UserError, UserStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite};

pub struct SqliteUserStore {
    pool: Pool<Sqlite>,
}

impl SqliteUserStore {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Run database migrations to create required tables.
    pub async fn migrate(&self) -> Result<(), UserError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                nickname TEXT NOT NULL UNIQUE,
                role TEXT NOT NULL DEFAULT 'user',
                stories_written INTEGER NOT NULL DEFAULT 0,
                total_likes INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                last_active TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| UserError::StorageError(e.to_string()))?;

        Ok(())
    }
}

fn parse_time(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn user_from_row(row: &SqliteRow) -> Result<User, UserError> {
    let role: String = row.get("role");
    let created_at: String = row.get("created_at");
    let last_active: String = row.get("last_active");

    Ok(User {
        id: row.get::<i64, _>("id") as u64,
        nickname: row.get("nickname"),
        role: role.parse().map_err(UserError::StorageError)?,
        stories_written: row.get::<i64, _>("stories_written").max(0) as u32,
        total_likes: row.get("total_likes"),
        created_at: parse_time(&created_at),
        last_active: parse_time(&last_active),
    })
}

const USER_COLUMNS: &str =
    "id, nickname, role, stories_written, total_likes, created_at, last_active";

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn get(&self, user_id: u64) -> Result<Option<User>, UserError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(user_id as i64)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::StorageError(e.to_string()))?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_by_nickname(&self, nickname: &str) -> Result<Option<User>, UserError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE nickname = ?"))
            .bind(nickname)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::StorageError(e.to_string()))?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_or_create(
        &self,
        nickname: &str,
        role: Role,
        at: DateTime<Utc>,
    ) -> Result<User, UserError> {
        sqlx::query(
            r#"
            INSERT INTO users (nickname, role, created_at, last_active)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(nickname) DO NOTHING
            "#,
        )
        .bind(nickname)
        .bind(role.as_str())
        .bind(at.to_rfc3339())
        .bind(at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| UserError::StorageError(e.to_string()))?;

        self.find_by_nickname(nickname)
            .await?
            .ok_or_else(|| UserError::StorageError(format!("user {nickname} vanished")))
    }

    async fn touch(&self, user_id: u64, at: DateTime<Utc>) -> Result<(), UserError> {
        sqlx::query("UPDATE users SET last_active = ? WHERE id = ?")
            .bind(at.to_rfc3339())
            .bind(user_id as i64)
            .execute(&self.pool)
            .await
            .map_err(|e| UserError::StorageError(e.to_string()))?;
        Ok(())
    }

    async fn record_contribution(&self, user_id: u64) -> Result<(), UserError> {
        sqlx::query("UPDATE users SET stories_written = stories_written + 1 WHERE id = ?")
            .bind(user_id as i64)
            .execute(&self.pool)
            .await
            .map_err(|e| UserError::StorageError(e.to_string()))?;
        Ok(())
    }

    async fn adjust_likes(&self, user_id: u64, delta: i64) -> Result<(), UserError> {
        sqlx::query("UPDATE users SET total_likes = total_likes + ? WHERE id = ?")
            .bind(delta)
            .bind(user_id as i64)
            .execute(&self.pool)
            .await
            .map_err(|e| UserError::StorageError(e.to_string()))?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<User>, UserError> {
        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| UserError::StorageError(e.to_string()))?;

        rows.iter().map(user_from_row).collect()
    }

    async fn top_writers(&self, limit: usize) -> Result<Vec<User>, UserError> {
        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users \
             ORDER BY stories_written DESC, total_likes DESC, id ASC LIMIT ?"
        ))
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| UserError::StorageError(e.to_string()))?;

        rows.iter().map(user_from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::database;

    async fn store(dir: &tempfile::TempDir) -> SqliteUserStore {
        let path = dir.path().join("users.db");
        let pool = database::connect(path.to_str().unwrap()).await.unwrap();
        let store = SqliteUserStore::new(pool);
        store.migrate().await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_find_or_create_and_counters() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir).await;
        let now = Utc::now();

        let ela = store.find_or_create("Ela", Role::User, now).await.unwrap();
        let again = store.find_or_create("Ela", Role::User, now).await.unwrap();
        assert_eq!(ela.id, again.id);

        store.record_contribution(ela.id).await.unwrap();
        store.adjust_likes(ela.id, 2).await.unwrap();
        store.adjust_likes(ela.id, -1).await.unwrap();

        let loaded = store.get(ela.id).await.unwrap().unwrap();
        assert_eq!(loaded.nickname, "Ela");
        assert_eq!(loaded.stories_written, 1);
        assert_eq!(loaded.total_likes, 1);
        assert!(store.get(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_roles_and_leaderboard_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let now = Utc::now();
        let (admin_id, can_id) = {
            let store = store(&dir).await;
            let admin = store.find_or_create("admin", Role::Admin, now).await.unwrap();
            let can = store.find_or_create("Can", Role::User, now).await.unwrap();
            store.record_contribution(can.id).await.unwrap();
            (admin.id, can.id)
        };

        let store = store(&dir).await;
        assert_eq!(store.get(admin_id).await.unwrap().unwrap().role, Role::Admin);

        let top = store.top_writers(10).await.unwrap();
        assert_eq!(top[0].id, can_id);
        assert_eq!(store.list().await.unwrap().len(), 2);
    }
}
