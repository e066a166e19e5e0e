// Story service - starting, continuing, liking and browsing stories.
//
// Every title and segment goes through the moderation gate before a store
// sees it. Stores only persist; the rules about who may write what live here.

use super::story_models::*;
use crate::core::moderation::{ContentClass, ModerationService};
use crate::core::themes;
use crate::core::users::{UserError, UserStore};
use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use std::sync::Arc;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum StoryError {
    /// The moderation gate's reason, passed through unchanged
    #[error("{0}")]
    ContentRejected(String),

    #[error("Hikaye içeriği en az {min} karakter olmalıdır")]
    SegmentTooShort { min: usize },

    #[error("Tema gereklidir")]
    MissingTheme,

    #[error("Tema bulunamadı: {0}")]
    UnknownTheme(String),

    #[error("Hikaye bulunamadı")]
    NotFound,

    #[error("Bu hikaye zaten tamamlanmış")]
    AlreadyCompleted,

    #[error("Bu hikayeye zaten katkıda bulundunuz")]
    AlreadyContributed,

    #[error(transparent)]
    User(#[from] UserError),

    #[error("Storage error: {0}")]
    StorageError(String),
}

// ============================================================================
// STORAGE TRAIT (PORT)
// ============================================================================

#[async_trait]
pub trait StoryStore: Send + Sync {
    async fn insert(&self, story: NewStory) -> Result<Story, StoryError>;

    async fn get(&self, story_id: u64) -> Result<Option<Story>, StoryError>;

    /// All stories, newest first.
    async fn list(&self) -> Result<Vec<Story>, StoryError>;

    /// Append a segment and mark the story completed once it holds
    /// `complete_at` segments. Refuses completed stories and authors who
    /// already wrote a segment; the check and the write are one atomic step.
    async fn append_segment(
        &self,
        story_id: u64,
        segment: NewSegment,
        complete_at: usize,
    ) -> Result<AppendOutcome, StoryError>;

    /// Add or remove `user_id`'s like. Returns the story and whether the
    /// user now likes it.
    async fn toggle_like(
        &self,
        story_id: u64,
        user_id: u64,
    ) -> Result<Option<(Story, bool)>, StoryError>;

    async fn set_approved(&self, story_id: u64, approved: bool)
        -> Result<Option<Story>, StoryError>;

    /// Remove a story; `false` when there was nothing to remove.
    async fn delete(&self, story_id: u64) -> Result<bool, StoryError>;
}

#[async_trait]
impl<T: StoryStore + ?Sized> StoryStore for Arc<T> {
    async fn insert(&self, story: NewStory) -> Result<Story, StoryError> {
        (**self).insert(story).await
    }

    async fn get(&self, story_id: u64) -> Result<Option<Story>, StoryError> {
        (**self).get(story_id).await
    }

    async fn list(&self) -> Result<Vec<Story>, StoryError> {
        (**self).list().await
    }

    async fn append_segment(
        &self,
        story_id: u64,
        segment: NewSegment,
        complete_at: usize,
    ) -> Result<AppendOutcome, StoryError> {
        (**self).append_segment(story_id, segment, complete_at).await
    }

    async fn toggle_like(
        &self,
        story_id: u64,
        user_id: u64,
    ) -> Result<Option<(Story, bool)>, StoryError> {
        (**self).toggle_like(story_id, user_id).await
    }

    async fn set_approved(
        &self,
        story_id: u64,
        approved: bool,
    ) -> Result<Option<Story>, StoryError> {
        (**self).set_approved(story_id, approved).await
    }

    async fn delete(&self, story_id: u64) -> Result<bool, StoryError> {
        (**self).delete(story_id).await
    }
}

// ============================================================================
// CORE SERVICE
// ============================================================================

pub struct StoryService<S: StoryStore, U: UserStore> {
    stories: S,
    users: U,
    moderation: Arc<ModerationService>,
    rules: StoryRules,
}

impl<S: StoryStore, U: UserStore> StoryService<S, U> {
    pub fn new(stories: S, users: U, moderation: Arc<ModerationService>) -> Self {
        Self {
            stories,
            users,
            moderation,
            rules: StoryRules::default(),
        }
    }

    pub fn with_rules(mut self, rules: StoryRules) -> Self {
        self.rules = rules;
        self
    }

    fn gate(&self, class: ContentClass, text: Option<&str>) -> Result<(), StoryError> {
        let verdict = self.moderation.moderate(class, text);
        if verdict.accepted {
            Ok(())
        } else {
            Err(StoryError::ContentRejected(verdict.reason))
        }
    }

    /// Gate a segment and apply the minimum length; returns the trimmed text.
    fn checked_segment(&self, content: Option<&str>) -> Result<String, StoryError> {
        self.gate(ContentClass::Body, content)?;

        let trimmed = content.unwrap_or_default().trim();
        if trimmed.chars().count() < self.rules.min_segment_chars {
            return Err(StoryError::SegmentTooShort {
                min: self.rules.min_segment_chars,
            });
        }
        Ok(trimmed.to_string())
    }

    pub async fn create_story(
        &self,
        author: &Author,
        request: CreateStory,
    ) -> Result<Story, StoryError> {
        let theme = request
            .theme
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(StoryError::MissingTheme)?;
        if themes::find(theme).is_none() {
            return Err(StoryError::UnknownTheme(theme.to_string()));
        }

        self.gate(ContentClass::Title, request.title.as_deref())?;
        let content = self.checked_segment(request.content.as_deref())?;
        let title = request.title.as_deref().unwrap_or_default().trim();

        let now = Utc::now();
        let story = self
            .stories
            .insert(NewStory {
                title: title.to_string(),
                theme: theme.to_string(),
                characters: non_blank(request.characters),
                plot_hints: non_blank(request.plot_hints),
                first_segment: NewSegment {
                    author_id: author.id,
                    author_nickname: author.nickname.clone(),
                    content,
                    created_at: now,
                },
            })
            .await?;

        self.users.record_contribution(author.id).await?;
        tracing::info!(story_id = story.id, author_id = author.id, theme = %story.theme, "Story created");

        Ok(story)
    }

    pub async fn continue_story(
        &self,
        story_id: u64,
        author: &Author,
        content: Option<&str>,
    ) -> Result<Story, StoryError> {
        let content = self.checked_segment(content)?;

        let segment = NewSegment {
            author_id: author.id,
            author_nickname: author.nickname.clone(),
            content,
            created_at: Utc::now(),
        };
        let story = match self
            .stories
            .append_segment(story_id, segment, self.rules.segments_to_complete)
            .await?
        {
            AppendOutcome::Appended(story) => story,
            AppendOutcome::NotFound => return Err(StoryError::NotFound),
            AppendOutcome::AlreadyCompleted => return Err(StoryError::AlreadyCompleted),
            AppendOutcome::AlreadyContributed => return Err(StoryError::AlreadyContributed),
        };

        self.users.record_contribution(author.id).await?;
        tracing::info!(
            story_id,
            author_id = author.id,
            segments = story.segments.len(),
            completed = story.is_completed,
            "Story continued"
        );

        Ok(story)
    }

    pub async fn get(&self, story_id: u64) -> Result<Story, StoryError> {
        self.stories.get(story_id).await?.ok_or(StoryError::NotFound)
    }

    pub async fn list_all(&self) -> Result<Vec<Story>, StoryError> {
        self.stories.list().await
    }

    pub async fn list_completed(&self) -> Result<Vec<Story>, StoryError> {
        Ok(self
            .stories
            .list()
            .await?
            .into_iter()
            .filter(|s| s.is_completed)
            .collect())
    }

    /// Completed stories in one theme.
    pub async fn list_by_theme(&self, theme: &str) -> Result<Vec<Story>, StoryError> {
        Ok(self
            .list_completed()
            .await?
            .into_iter()
            .filter(|s| s.theme == theme)
            .collect())
    }

    /// Ongoing stories `user_id` hasn't written in yet.
    pub async fn available_for(&self, user_id: u64) -> Result<Vec<Story>, StoryError> {
        Ok(self
            .stories
            .list()
            .await?
            .into_iter()
            .filter(|s| !s.is_completed && !s.has_contributor(user_id))
            .collect())
    }

    pub async fn random_available_for(
        &self,
        user_id: u64,
    ) -> Result<Option<RandomPick>, StoryError> {
        let mut available = self.available_for(user_id).await?;
        if available.is_empty() {
            return Ok(None);
        }

        let index = rand::thread_rng().gen_range(0..available.len());
        let story = available.swap_remove(index);

        Ok(Some(RandomPick {
            last_segment: story.last_segment().cloned(),
            current_author_number: story.segments.len() + 1,
            total_authors: self.rules.segments_to_complete,
            story,
        }))
    }

    /// Like or unlike. The story's first author gains or loses a like.
    pub async fn toggle_like(
        &self,
        story_id: u64,
        user_id: u64,
    ) -> Result<LikeOutcome, StoryError> {
        let (story, liked) = self
            .stories
            .toggle_like(story_id, user_id)
            .await?
            .ok_or(StoryError::NotFound)?;

        if let Some(first_author) = story.first_author_id() {
            let delta = if liked { 1 } else { -1 };
            self.users.adjust_likes(first_author, delta).await?;
        }
        tracing::debug!(story_id, user_id, liked, "Like toggled");

        Ok(LikeOutcome {
            liked,
            like_count: story.like_count,
        })
    }

    /// Most liked completed stories, newer first on ties.
    pub async fn popular(&self) -> Result<Vec<Story>, StoryError> {
        let mut stories = self.list_completed().await?;
        stories.sort_by(|a, b| {
            b.like_count
                .cmp(&a.like_count)
                .then(b.created_at.cmp(&a.created_at))
        });
        stories.truncate(self.rules.popular_limit);
        Ok(stories)
    }

    pub async fn user_stats(&self, user_id: u64) -> Result<UserStats, StoryError> {
        let user = self.users.get(user_id).await?.ok_or(UserError::NotFound)?;

        let contributed: Vec<Story> = self
            .stories
            .list()
            .await?
            .into_iter()
            .filter(|s| s.has_contributor(user_id))
            .collect();
        let completed = contributed.iter().filter(|s| s.is_completed).count();

        Ok(UserStats {
            stories_written: user.stories_written,
            total_likes: user.total_likes,
            completed_stories: completed,
            ongoing_stories: contributed.len() - completed,
        })
    }

    // ------------------------------------------------------------------------
    // Admin
    // ------------------------------------------------------------------------

    pub async fn admin_stories(&self) -> Result<Vec<AdminStoryView>, StoryError> {
        Ok(self
            .stories
            .list()
            .await?
            .into_iter()
            .map(|story| AdminStoryView {
                segment_count: story.segments.len(),
                last_activity: story.last_activity(),
                story,
            })
            .collect())
    }

    pub async fn admin_users(&self) -> Result<Vec<AdminUserView>, StoryError> {
        let stories = self.stories.list().await?;
        let users = self.users.list().await?;

        Ok(users
            .into_iter()
            .map(|user| AdminUserView {
                story_count: stories.iter().filter(|s| s.has_contributor(user.id)).count(),
                user,
            })
            .collect())
    }

    pub async fn approve(&self, story_id: u64) -> Result<Story, StoryError> {
        let story = self
            .stories
            .set_approved(story_id, true)
            .await?
            .ok_or(StoryError::NotFound)?;
        tracing::info!(story_id, "Story approved");
        Ok(story)
    }

    pub async fn delete(&self, story_id: u64) -> Result<(), StoryError> {
        if !self.stories.delete(story_id).await? {
            return Err(StoryError::NotFound);
        }
        tracing::info!(story_id, "Story deleted");
        Ok(())
    }

    pub async fn stats(&self) -> Result<AdminStats, StoryError> {
        let stories = self.stories.list().await?;
        let total_users = self.users.list().await?.len();

        let total_stories = stories.len();
        let completed_stories = stories.iter().filter(|s| s.is_completed).count();
        let total_segments: usize = stories.iter().map(|s| s.segments.len()).sum();
        let average = if total_stories == 0 {
            0.0
        } else {
            (total_segments as f64 / total_stories as f64 * 10.0).round() / 10.0
        };

        Ok(AdminStats {
            total_stories,
            completed_stories,
            ongoing_stories: total_stories - completed_stories,
            total_users,
            total_segments,
            average_segments_per_story: average,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::users::Role;
    use crate::infra::stories::InMemoryStoryStore;
    use crate::infra::users::InMemoryUserStore;

    const SEGMENTS: [&str; 5] = [
        "Bir zamanlar uzak bir ormanda küçük bir ejderha yaşardı ve her sabah şarkı söylerdi.",
        "Ejderha bir gün yeni bir arkadaş buldu ve birlikte dağların ardına yolculuğa çıktılar.",
        "Yolda parlak taşlarla dolu bir mağara gördüler ve içeri girmeye karar verdiler hemen.",
        "Mağaranın derinliklerinde uyuyan yaşlı bir baykuş onlara eski bir harita uzattı sessizce.",
        "Harita onları sakin bir gölün kıyısına ulaştırdı ve macera mutlu bir sonla bitti.",
    ];

    type TestService = StoryService<Arc<InMemoryStoryStore>, Arc<InMemoryUserStore>>;

    struct Fixture {
        service: TestService,
        users: Arc<InMemoryUserStore>,
    }

    fn fixture() -> Fixture {
        let users = Arc::new(InMemoryUserStore::new());
        let service = StoryService::new(
            Arc::new(InMemoryStoryStore::new()),
            users.clone(),
            Arc::new(ModerationService::default()),
        );
        Fixture { service, users }
    }

    async fn author(users: &InMemoryUserStore, nickname: &str) -> Author {
        let user = users
            .find_or_create(nickname, Role::User, Utc::now())
            .await
            .unwrap();
        Author {
            id: user.id,
            nickname: user.nickname,
        }
    }

    fn request(title: &str, content: &str) -> CreateStory {
        CreateStory {
            title: Some(title.to_string()),
            theme: Some("fantastik".to_string()),
            content: Some(content.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_story() {
        let f = fixture();
        let ali = author(&f.users, "Ali").await;

        let story = f
            .service
            .create_story(&ali, request("  Ejderhanın Yolculuğu ", SEGMENTS[0]))
            .await
            .unwrap();

        assert_eq!(story.title, "Ejderhanın Yolculuğu");
        assert_eq!(story.segments.len(), 1);
        assert_eq!(story.segments[0].order, 1);
        assert_eq!(story.segments[0].author_nickname, "Ali");
        assert!(!story.is_completed);
        assert_eq!(f.users.get(ali.id).await.unwrap().unwrap().stories_written, 1);
    }

    #[tokio::test]
    async fn test_create_story_gates_title_before_body() {
        let f = fixture();
        let ali = author(&f.users, "Ali").await;

        let err = f
            .service
            .create_story(&ali, request("Ab", "kısa"))
            .await
            .unwrap_err();
        match err {
            StoryError::ContentRejected(reason) => assert!(reason.contains("Başlık")),
            other => panic!("unexpected error: {other:?}"),
        }

        let err = f
            .service
            .create_story(&ali, request("Güzel Başlık", "kısa"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoryError::ContentRejected(_)));

        let err = f
            .service
            .create_story(&ali, request("Güzel Başlık", "Ejderha uçtu ve güldü."))
            .await
            .unwrap_err();
        assert!(matches!(err, StoryError::SegmentTooShort { min: 50 }));

        assert!(f.service.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_story_requires_known_theme() {
        let f = fixture();
        let ali = author(&f.users, "Ali").await;

        let mut missing = request("Güzel Başlık", SEGMENTS[0]);
        missing.theme = None;
        assert!(matches!(
            f.service.create_story(&ali, missing).await,
            Err(StoryError::MissingTheme)
        ));

        let mut unknown = request("Güzel Başlık", SEGMENTS[0]);
        unknown.theme = Some("korku".to_string());
        assert!(matches!(
            f.service.create_story(&ali, unknown).await,
            Err(StoryError::UnknownTheme(_))
        ));
    }

    #[tokio::test]
    async fn test_fifth_segment_completes_story() {
        let f = fixture();
        let first = author(&f.users, "Yazar1").await;
        let story = f
            .service
            .create_story(&first, request("Ejderhanın Yolculuğu", SEGMENTS[0]))
            .await
            .unwrap();

        for (i, text) in SEGMENTS.iter().enumerate().skip(1) {
            let writer = author(&f.users, &format!("Yazar{}", i + 1)).await;
            let updated = f
                .service
                .continue_story(story.id, &writer, Some(text))
                .await
                .unwrap();
            assert_eq!(updated.segments.len(), i + 1);
            assert_eq!(updated.is_completed, i == 4);
        }

        let late = author(&f.users, "Geciken").await;
        assert!(matches!(
            f.service.continue_story(story.id, &late, Some(SEGMENTS[1])).await,
            Err(StoryError::AlreadyCompleted)
        ));
        assert_eq!(f.service.list_completed().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_author_cannot_continue_twice() {
        let f = fixture();
        let ali = author(&f.users, "Ali").await;
        let story = f
            .service
            .create_story(&ali, request("Ejderhanın Yolculuğu", SEGMENTS[0]))
            .await
            .unwrap();

        assert!(matches!(
            f.service.continue_story(story.id, &ali, Some(SEGMENTS[1])).await,
            Err(StoryError::AlreadyContributed)
        ));
        assert!(matches!(
            f.service.continue_story(999, &ali, Some(SEGMENTS[1])).await,
            Err(StoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_available_and_random() {
        let f = fixture();
        let ali = author(&f.users, "Ali").await;
        let ayse = author(&f.users, "Ayse").await;

        f.service
            .create_story(&ali, request("Ejderhanın Yolculuğu", SEGMENTS[0]))
            .await
            .unwrap();

        assert!(f.service.available_for(ali.id).await.unwrap().is_empty());
        assert!(f.service.random_available_for(ali.id).await.unwrap().is_none());

        let pick = f
            .service
            .random_available_for(ayse.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(pick.current_author_number, 2);
        assert_eq!(pick.total_authors, 5);
        assert_eq!(pick.last_segment.unwrap().content, SEGMENTS[0]);
    }

    #[tokio::test]
    async fn test_like_toggle_credits_first_author() {
        let f = fixture();
        let ali = author(&f.users, "Ali").await;
        let ayse = author(&f.users, "Ayse").await;
        let story = f
            .service
            .create_story(&ali, request("Ejderhanın Yolculuğu", SEGMENTS[0]))
            .await
            .unwrap();

        let liked = f.service.toggle_like(story.id, ayse.id).await.unwrap();
        assert!(liked.liked);
        assert_eq!(liked.like_count, 1);
        assert_eq!(f.users.get(ali.id).await.unwrap().unwrap().total_likes, 1);

        let unliked = f.service.toggle_like(story.id, ayse.id).await.unwrap();
        assert!(!unliked.liked);
        assert_eq!(unliked.like_count, 0);
        assert_eq!(f.users.get(ali.id).await.unwrap().unwrap().total_likes, 0);
    }

    #[tokio::test]
    async fn test_stats() {
        let f = fixture();
        let ali = author(&f.users, "Ali").await;
        let ayse = author(&f.users, "Ayse").await;

        let story = f
            .service
            .create_story(&ali, request("Ejderhanın Yolculuğu", SEGMENTS[0]))
            .await
            .unwrap();
        f.service
            .continue_story(story.id, &ayse, Some(SEGMENTS[1]))
            .await
            .unwrap();
        f.service
            .create_story(&ayse, request("Gölün Sırrı", SEGMENTS[2]))
            .await
            .unwrap();

        let stats = f.service.stats().await.unwrap();
        assert_eq!(stats.total_stories, 2);
        assert_eq!(stats.ongoing_stories, 2);
        assert_eq!(stats.total_users, 2);
        assert_eq!(stats.total_segments, 3);
        assert_eq!(stats.average_segments_per_story, 1.5);

        let mine = f.service.user_stats(ayse.id).await.unwrap();
        assert_eq!(mine.stories_written, 2);
        assert_eq!(mine.ongoing_stories, 2);
        assert_eq!(mine.completed_stories, 0);
    }

    #[tokio::test]
    async fn test_admin_approve_and_delete() {
        let f = fixture();
        let ali = author(&f.users, "Ali").await;
        let story = f
            .service
            .create_story(&ali, request("Ejderhanın Yolculuğu", SEGMENTS[0]))
            .await
            .unwrap();

        assert!(f.service.approve(story.id).await.unwrap().is_approved);
        f.service.delete(story.id).await.unwrap();
        assert!(matches!(f.service.get(story.id).await, Err(StoryError::NotFound)));
        assert!(matches!(f.service.delete(story.id).await, Err(StoryError::NotFound)));
    }

    /// Yields to the scheduler before every write so joined futures interleave.
    struct YieldingStore(InMemoryStoryStore);

    #[async_trait]
    impl StoryStore for YieldingStore {
        async fn insert(&self, story: NewStory) -> Result<Story, StoryError> {
            self.0.insert(story).await
        }

        async fn get(&self, story_id: u64) -> Result<Option<Story>, StoryError> {
            tokio::task::yield_now().await;
            self.0.get(story_id).await
        }

        async fn list(&self) -> Result<Vec<Story>, StoryError> {
            self.0.list().await
        }

        async fn append_segment(
            &self,
            story_id: u64,
            segment: NewSegment,
            complete_at: usize,
        ) -> Result<AppendOutcome, StoryError> {
            tokio::task::yield_now().await;
            self.0.append_segment(story_id, segment, complete_at).await
        }

        async fn toggle_like(
            &self,
            story_id: u64,
            user_id: u64,
        ) -> Result<Option<(Story, bool)>, StoryError> {
            self.0.toggle_like(story_id, user_id).await
        }

        async fn set_approved(
            &self,
            story_id: u64,
            approved: bool,
        ) -> Result<Option<Story>, StoryError> {
            self.0.set_approved(story_id, approved).await
        }

        async fn delete(&self, story_id: u64) -> Result<bool, StoryError> {
            self.0.delete(story_id).await
        }
    }

    fn yielding_service(
        users: Arc<InMemoryUserStore>,
    ) -> StoryService<YieldingStore, Arc<InMemoryUserStore>> {
        StoryService::new(
            YieldingStore(InMemoryStoryStore::new()),
            users,
            Arc::new(ModerationService::default()),
        )
    }

    #[tokio::test]
    async fn test_racing_writers_cannot_overfill_story() {
        let users = Arc::new(InMemoryUserStore::new());
        let service = yielding_service(users.clone());

        let first = author(&users, "Yazar1").await;
        let story = service
            .create_story(&first, request("Ejderhanın Yolculuğu", SEGMENTS[0]))
            .await
            .unwrap();
        for (i, text) in SEGMENTS.iter().enumerate().take(4).skip(1) {
            let writer = author(&users, &format!("Yazar{}", i + 1)).await;
            service.continue_story(story.id, &writer, Some(text)).await.unwrap();
        }

        let ece = author(&users, "Ece").await;
        let su = author(&users, "Su").await;
        let (a, b) = tokio::join!(
            service.continue_story(story.id, &ece, Some(SEGMENTS[4])),
            service.continue_story(story.id, &su, Some(SEGMENTS[4])),
        );

        assert!(a.is_ok() != b.is_ok());
        let loser = if a.is_ok() { b } else { a };
        assert!(matches!(loser, Err(StoryError::AlreadyCompleted)));

        let story = service.get(story.id).await.unwrap();
        assert_eq!(story.segments.len(), 5);
        assert!(story.is_completed);
    }

    #[tokio::test]
    async fn test_racing_same_author_writes_once() {
        let users = Arc::new(InMemoryUserStore::new());
        let service = yielding_service(users.clone());

        let first = author(&users, "Yazar1").await;
        let story = service
            .create_story(&first, request("Ejderhanın Yolculuğu", SEGMENTS[0]))
            .await
            .unwrap();

        let ela = author(&users, "Ela").await;
        let (a, b) = tokio::join!(
            service.continue_story(story.id, &ela, Some(SEGMENTS[1])),
            service.continue_story(story.id, &ela, Some(SEGMENTS[2])),
        );

        assert!(a.is_ok() != b.is_ok());
        let loser = if a.is_ok() { b } else { a };
        assert!(matches!(loser, Err(StoryError::AlreadyContributed)));

        let story = service.get(story.id).await.unwrap();
        assert_eq!(story.segments.iter().filter(|s| s.author_id == ela.id).count(), 1);
        assert_eq!(users.get(ela.id).await.unwrap().unwrap().stories_written, 1);
    }
}
