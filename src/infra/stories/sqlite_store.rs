// SQLite-backed StoryStore.
//
// Tables:
// - stories: one row per story
// - story_segments: ordered contributions, keyed by (story_id, seq)
// - story_likes: one row per (story, user) like

use crate::core::stories::{
    AppendOutcome, NewSegment, NewStory, Segment, Story, StoryError, StoryStore,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite};
use std::collections::HashMap;

pub struct SqliteStoryStore {
    pool: Pool<Sqlite>,
}

fn storage(e: sqlx::Error) -> StoryError {
    StoryError::StorageError(e.to_string())
}

fn parse_time(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

impl SqliteStoryStore {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Run database migrations to create required tables.
    pub async fn migrate(&self) -> Result<(), StoryError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS stories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                theme TEXT NOT NULL,
                characters TEXT,
                plot_hints TEXT,
                is_completed BOOLEAN NOT NULL DEFAULT 0,
                is_approved BOOLEAN NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                last_updated TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(storage)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS story_segments (
                story_id INTEGER NOT NULL,
                seq INTEGER NOT NULL,
                author_id INTEGER NOT NULL,
                author_nickname TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at TEXT NOT NULL,
                PRIMARY KEY (story_id, seq)
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(storage)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS story_likes (
                story_id INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                PRIMARY KEY (story_id, user_id)
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(storage)?;

        Ok(())
    }

    /// Load one story (or all of them, newest first) with segments and likes.
    async fn load(&self, story_id: Option<u64>) -> Result<Vec<Story>, StoryError> {
        let (story_sql, segment_sql, like_sql) = match story_id {
            Some(_) => (
                "SELECT * FROM stories WHERE id = ?",
                "SELECT * FROM story_segments WHERE story_id = ? ORDER BY seq",
                "SELECT story_id, user_id FROM story_likes WHERE story_id = ? ORDER BY rowid",
            ),
            None => (
                "SELECT * FROM stories ORDER BY created_at DESC, id DESC",
                "SELECT * FROM story_segments ORDER BY story_id, seq",
                "SELECT story_id, user_id FROM story_likes ORDER BY rowid",
            ),
        };

        let mut story_query = sqlx::query(story_sql);
        let mut segment_query = sqlx::query(segment_sql);
        let mut like_query = sqlx::query(like_sql);
        if let Some(id) = story_id {
            story_query = story_query.bind(id as i64);
            segment_query = segment_query.bind(id as i64);
            like_query = like_query.bind(id as i64);
        }

        let story_rows = story_query.fetch_all(&self.pool).await.map_err(storage)?;
        if story_rows.is_empty() {
            return Ok(Vec::new());
        }
        let segment_rows = segment_query.fetch_all(&self.pool).await.map_err(storage)?;
        let like_rows = like_query.fetch_all(&self.pool).await.map_err(storage)?;

        let mut segments: HashMap<i64, Vec<Segment>> = HashMap::new();
        for row in &segment_rows {
            let created_at: String = row.get("created_at");
            segments
                .entry(row.get("story_id"))
                .or_default()
                .push(Segment {
                    author_id: row.get::<i64, _>("author_id") as u64,
                    author_nickname: row.get("author_nickname"),
                    content: row.get("content"),
                    order: row.get::<i64, _>("seq") as u32,
                    created_at: parse_time(&created_at),
                });
        }

        let mut likes: HashMap<i64, Vec<u64>> = HashMap::new();
        for row in &like_rows {
            likes
                .entry(row.get("story_id"))
                .or_default()
                .push(row.get::<i64, _>("user_id") as u64);
        }

        Ok(story_rows
            .iter()
            .map(|row| story_from_row(row, &mut segments, &mut likes))
            .collect())
    }
}

fn story_from_row(
    row: &SqliteRow,
    segments: &mut HashMap<i64, Vec<Segment>>,
    likes: &mut HashMap<i64, Vec<u64>>,
) -> Story {
    let id: i64 = row.get("id");
    let created_at: String = row.get("created_at");
    let last_updated: String = row.get("last_updated");
    let likes = likes.remove(&id).unwrap_or_default();

    Story {
        id: id as u64,
        title: row.get("title"),
        theme: row.get("theme"),
        characters: row.get("characters"),
        plot_hints: row.get("plot_hints"),
        segments: segments.remove(&id).unwrap_or_default(),
        is_completed: row.get("is_completed"),
        is_approved: row.get("is_approved"),
        like_count: likes.len(),
        likes,
        created_at: parse_time(&created_at),
        last_updated: parse_time(&last_updated),
    }
}

#[async_trait]
impl StoryStore for SqliteStoryStore {
    async fn insert(&self, story: NewStory) -> Result<Story, StoryError> {
        let segment: NewSegment = story.first_segment;
        let created_at = segment.created_at.to_rfc3339();

        let mut tx = self.pool.begin().await.map_err(storage)?;

        let id = sqlx::query(
            r#"
            INSERT INTO stories (title, theme, characters, plot_hints, created_at, last_updated)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&story.title)
        .bind(&story.theme)
        .bind(&story.characters)
        .bind(&story.plot_hints)
        .bind(&created_at)
        .bind(&created_at)
        .execute(&mut *tx)
        .await
        .map_err(storage)?
        .last_insert_rowid();

        sqlx::query(
            r#"
            INSERT INTO story_segments (story_id, seq, author_id, author_nickname, content, created_at)
            VALUES (?, 1, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(segment.author_id as i64)
        .bind(&segment.author_nickname)
        .bind(&segment.content)
        .bind(&created_at)
        .execute(&mut *tx)
        .await
        .map_err(storage)?;

        tx.commit().await.map_err(storage)?;

        self.get(id as u64)
            .await?
            .ok_or_else(|| StoryError::StorageError(format!("story {id} missing after insert")))
    }

    async fn get(&self, story_id: u64) -> Result<Option<Story>, StoryError> {
        Ok(self.load(Some(story_id)).await?.into_iter().next())
    }

    async fn list(&self) -> Result<Vec<Story>, StoryError> {
        self.load(None).await
    }

    async fn append_segment(
        &self,
        story_id: u64,
        segment: NewSegment,
        complete_at: usize,
    ) -> Result<AppendOutcome, StoryError> {
        let mut tx = self.pool.begin().await.map_err(storage)?;
        let created_at = segment.created_at.to_rfc3339();

        // Write first so this transaction holds SQLite's write lock before it
        // reads. A concurrent append waits on the busy timeout until commit.
        let touched = sqlx::query("UPDATE stories SET last_updated = ? WHERE id = ?")
            .bind(&created_at)
            .bind(story_id as i64)
            .execute(&mut *tx)
            .await
            .map_err(storage)?
            .rows_affected();
        if touched == 0 {
            return Ok(AppendOutcome::NotFound);
        }

        let row = sqlx::query(
            r#"
            SELECT is_completed,
                   (SELECT COUNT(*) FROM story_segments WHERE story_id = stories.id) AS seg_count,
                   EXISTS(SELECT 1 FROM story_segments
                          WHERE story_id = stories.id AND author_id = ?) AS contributed
            FROM stories WHERE id = ?
            "#,
        )
        .bind(segment.author_id as i64)
        .bind(story_id as i64)
        .fetch_one(&mut *tx)
        .await
        .map_err(storage)?;

        if row.get::<bool, _>("is_completed") {
            return Ok(AppendOutcome::AlreadyCompleted);
        }
        if row.get::<bool, _>("contributed") {
            return Ok(AppendOutcome::AlreadyContributed);
        }

        let seq = row.get::<i64, _>("seg_count") + 1;
        sqlx::query(
            r#"
            INSERT INTO story_segments (story_id, seq, author_id, author_nickname, content, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(story_id as i64)
        .bind(seq)
        .bind(segment.author_id as i64)
        .bind(&segment.author_nickname)
        .bind(&segment.content)
        .bind(&created_at)
        .execute(&mut *tx)
        .await
        .map_err(storage)?;

        if (seq as usize) >= complete_at {
            sqlx::query("UPDATE stories SET is_completed = 1 WHERE id = ?")
                .bind(story_id as i64)
                .execute(&mut *tx)
                .await
                .map_err(storage)?;
        }

        tx.commit().await.map_err(storage)?;
        match self.get(story_id).await? {
            Some(story) => Ok(AppendOutcome::Appended(story)),
            None => Ok(AppendOutcome::NotFound),
        }
    }

    async fn toggle_like(
        &self,
        story_id: u64,
        user_id: u64,
    ) -> Result<Option<(Story, bool)>, StoryError> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM stories WHERE id = ?")
            .bind(story_id as i64)
            .fetch_optional(&mut *tx)
            .await
            .map_err(storage)?;
        if exists.is_none() {
            return Ok(None);
        }

        let removed = sqlx::query("DELETE FROM story_likes WHERE story_id = ? AND user_id = ?")
            .bind(story_id as i64)
            .bind(user_id as i64)
            .execute(&mut *tx)
            .await
            .map_err(storage)?
            .rows_affected();

        let liked = removed == 0;
        if liked {
            sqlx::query("INSERT INTO story_likes (story_id, user_id) VALUES (?, ?)")
                .bind(story_id as i64)
                .bind(user_id as i64)
                .execute(&mut *tx)
                .await
                .map_err(storage)?;
        }

        tx.commit().await.map_err(storage)?;
        Ok(self.get(story_id).await?.map(|story| (story, liked)))
    }

    async fn set_approved(
        &self,
        story_id: u64,
        approved: bool,
    ) -> Result<Option<Story>, StoryError> {
        sqlx::query("UPDATE stories SET is_approved = ? WHERE id = ?")
            .bind(approved)
            .bind(story_id as i64)
            .execute(&self.pool)
            .await
            .map_err(storage)?;
        self.get(story_id).await
    }

    async fn delete(&self, story_id: u64) -> Result<bool, StoryError> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        for sql in [
            "DELETE FROM story_segments WHERE story_id = ?",
            "DELETE FROM story_likes WHERE story_id = ?",
        ] {
            sqlx::query(sql)
                .bind(story_id as i64)
                .execute(&mut *tx)
                .await
                .map_err(storage)?;
        }
        let removed = sqlx::query("DELETE FROM stories WHERE id = ?")
            .bind(story_id as i64)
            .execute(&mut *tx)
            .await
            .map_err(storage)?
            .rows_affected();

        tx.commit().await.map_err(storage)?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::database;

    async fn store(dir: &tempfile::TempDir) -> SqliteStoryStore {
        let path = dir.path().join("stories.db");
        let pool = database::connect(path.to_str().unwrap()).await.unwrap();
        let store = SqliteStoryStore::new(pool);
        store.migrate().await.unwrap();
        store
    }

    fn segment(author_id: u64) -> NewSegment {
        NewSegment {
            author_id,
            author_nickname: format!("yazar{author_id}"),
            content: "Ejderha gökyüzünde süzülürken aşağıdaki köyü izledi.".to_string(),
            created_at: Utc::now(),
        }
    }

    fn appended(outcome: AppendOutcome) -> Story {
        match outcome {
            AppendOutcome::Appended(story) => story,
            other => panic!("segment not appended: {other:?}"),
        }
    }

    fn new_story() -> NewStory {
        NewStory {
            title: "Ejderha".to_string(),
            theme: "fantastik".to_string(),
            characters: Some("Ejderha, Peri".to_string()),
            plot_hints: None,
            first_segment: segment(1),
        }
    }

    #[tokio::test]
    async fn test_insert_and_append() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir).await;

        let story = store.insert(new_story()).await.unwrap();
        assert_eq!(story.title, "Ejderha");
        assert_eq!(story.characters.as_deref(), Some("Ejderha, Peri"));
        assert_eq!(story.segments.len(), 1);

        let story = appended(store.append_segment(story.id, segment(2), 2).await.unwrap());
        assert_eq!(story.segments.len(), 2);
        assert_eq!(story.segments[1].order, 2);
        assert_eq!(story.segments[1].author_id, 2);
        assert!(story.is_completed);

        assert!(matches!(
            store.append_segment(story.id, segment(3), 2).await.unwrap(),
            AppendOutcome::AlreadyCompleted
        ));
        assert!(matches!(
            store.append_segment(999, segment(3), 2).await.unwrap(),
            AppendOutcome::NotFound
        ));
    }

    #[tokio::test]
    async fn test_append_refuses_repeat_author() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir).await;
        let story = store.insert(new_story()).await.unwrap();

        assert!(matches!(
            store.append_segment(story.id, segment(1), 5).await.unwrap(),
            AppendOutcome::AlreadyContributed
        ));
        assert_eq!(store.get(story.id).await.unwrap().unwrap().segments.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_appends_respect_completion() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir).await;
        let story = store.insert(new_story()).await.unwrap();

        let (a, b) = tokio::join!(
            store.append_segment(story.id, segment(2), 2),
            store.append_segment(story.id, segment(3), 2),
        );
        let outcomes = [a.unwrap(), b.unwrap()];
        let appended_count = outcomes
            .iter()
            .filter(|o| matches!(o, AppendOutcome::Appended(_)))
            .count();
        assert_eq!(appended_count, 1);
        assert!(outcomes
            .iter()
            .any(|o| matches!(o, AppendOutcome::AlreadyCompleted)));

        let story = store.get(story.id).await.unwrap().unwrap();
        assert_eq!(story.segments.len(), 2);
        assert!(story.is_completed);
    }

    #[tokio::test]
    async fn test_likes_approval_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir).await;
        let story = store.insert(new_story()).await.unwrap();

        let (liked, now_liked) = store.toggle_like(story.id, 5).await.unwrap().unwrap();
        assert!(now_liked);
        assert_eq!(liked.likes, vec![5]);
        assert_eq!(liked.like_count, 1);

        let (unliked, now_liked) = store.toggle_like(story.id, 5).await.unwrap().unwrap();
        assert!(!now_liked);
        assert_eq!(unliked.like_count, 0);

        let approved = store.set_approved(story.id, true).await.unwrap().unwrap();
        assert!(approved.is_approved);

        assert!(store.delete(story.id).await.unwrap());
        assert!(!store.delete(story.id).await.unwrap());
        assert!(store.get(story.id).await.unwrap().is_none());
        assert!(store.list().await.unwrap().is_empty());
    }
}
