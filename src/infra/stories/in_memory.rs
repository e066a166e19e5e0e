// In-memory StoryStore, used for tests and `STORAGE_BACKEND=memory`.

use crate::core::stories::{
    AppendOutcome, NewSegment, NewStory, Segment, Story, StoryError, StoryStore,
};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

pub struct InMemoryStoryStore {
    stories: DashMap<u64, Story>,
    next_id: AtomicU64,
}

impl InMemoryStoryStore {
    pub fn new() -> Self {
        Self {
            stories: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }
}

impl Default for InMemoryStoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn to_segment(segment: NewSegment, order: u32) -> Segment {
    Segment {
        author_id: segment.author_id,
        author_nickname: segment.author_nickname,
        content: segment.content,
        order,
        created_at: segment.created_at,
    }
}

#[async_trait]
impl StoryStore for InMemoryStoryStore {
    async fn insert(&self, story: NewStory) -> Result<Story, StoryError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let created_at = story.first_segment.created_at;

        let story = Story {
            id,
            title: story.title,
            theme: story.theme,
            characters: story.characters,
            plot_hints: story.plot_hints,
            segments: vec![to_segment(story.first_segment, 1)],
            is_completed: false,
            is_approved: false,
            likes: Vec::new(),
            like_count: 0,
            created_at,
            last_updated: created_at,
        };
        self.stories.insert(id, story.clone());
        Ok(story)
    }

    async fn get(&self, story_id: u64) -> Result<Option<Story>, StoryError> {
        Ok(self.stories.get(&story_id).map(|s| s.value().clone()))
    }

    async fn list(&self) -> Result<Vec<Story>, StoryError> {
        let mut stories: Vec<Story> = self.stories.iter().map(|s| s.value().clone()).collect();
        stories.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(stories)
    }

    async fn append_segment(
        &self,
        story_id: u64,
        segment: NewSegment,
        complete_at: usize,
    ) -> Result<AppendOutcome, StoryError> {
        // The shard lock is held until the guard drops, so the checks below
        // can't go stale before the push.
        let Some(mut story) = self.stories.get_mut(&story_id) else {
            return Ok(AppendOutcome::NotFound);
        };
        if story.is_completed {
            return Ok(AppendOutcome::AlreadyCompleted);
        }
        if story.has_contributor(segment.author_id) {
            return Ok(AppendOutcome::AlreadyContributed);
        }

        let order = story.segments.len() as u32 + 1;
        story.last_updated = segment.created_at;
        story.segments.push(to_segment(segment, order));
        if story.segments.len() >= complete_at {
            story.is_completed = true;
        }
        Ok(AppendOutcome::Appended(story.value().clone()))
    }

    async fn toggle_like(
        &self,
        story_id: u64,
        user_id: u64,
    ) -> Result<Option<(Story, bool)>, StoryError> {
        let Some(mut story) = self.stories.get_mut(&story_id) else {
            return Ok(None);
        };

        let liked = match story.likes.iter().position(|&id| id == user_id) {
            Some(index) => {
                story.likes.remove(index);
                false
            }
            None => {
                story.likes.push(user_id);
                true
            }
        };
        story.like_count = story.likes.len();
        Ok(Some((story.value().clone(), liked)))
    }

    async fn set_approved(
        &self,
        story_id: u64,
        approved: bool,
    ) -> Result<Option<Story>, StoryError> {
        Ok(self.stories.get_mut(&story_id).map(|mut story| {
            story.is_approved = approved;
            story.value().clone()
        }))
    }

    async fn delete(&self, story_id: u64) -> Result<bool, StoryError> {
        Ok(self.stories.remove(&story_id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn segment(author_id: u64, offset_secs: i64) -> NewSegment {
        NewSegment {
            author_id,
            author_nickname: format!("yazar{author_id}"),
            content: "Ejderha gökyüzünde süzülürken aşağıdaki köyü izledi.".to_string(),
            created_at: Utc::now() + Duration::seconds(offset_secs),
        }
    }

    fn new_story(author_id: u64, offset_secs: i64) -> NewStory {
        NewStory {
            title: "Ejderha".to_string(),
            theme: "fantastik".to_string(),
            characters: None,
            plot_hints: None,
            first_segment: segment(author_id, offset_secs),
        }
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let store = InMemoryStoryStore::new();
        let older = store.insert(new_story(1, 0)).await.unwrap();
        let newer = store.insert(new_story(2, 10)).await.unwrap();

        let ids: Vec<u64> = store.list().await.unwrap().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);
    }

    fn appended(outcome: AppendOutcome) -> Story {
        match outcome {
            AppendOutcome::Appended(story) => story,
            other => panic!("segment not appended: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_append_marks_completion() {
        let store = InMemoryStoryStore::new();
        let story = store.insert(new_story(1, 0)).await.unwrap();

        let story = appended(store.append_segment(story.id, segment(2, 1), 3).await.unwrap());
        assert_eq!(story.segments[1].order, 2);
        assert!(!story.is_completed);

        let story = appended(store.append_segment(story.id, segment(3, 2), 3).await.unwrap());
        assert!(story.is_completed);

        assert!(matches!(
            store.append_segment(42, segment(4, 3), 3).await.unwrap(),
            AppendOutcome::NotFound
        ));
    }

    #[tokio::test]
    async fn test_append_refuses_completed_and_repeat_authors() {
        let store = InMemoryStoryStore::new();
        let story = store.insert(new_story(1, 0)).await.unwrap();

        assert!(matches!(
            store.append_segment(story.id, segment(1, 1), 2).await.unwrap(),
            AppendOutcome::AlreadyContributed
        ));

        appended(store.append_segment(story.id, segment(2, 2), 2).await.unwrap());
        assert!(matches!(
            store.append_segment(story.id, segment(3, 3), 2).await.unwrap(),
            AppendOutcome::AlreadyCompleted
        ));
        assert_eq!(store.get(story.id).await.unwrap().unwrap().segments.len(), 2);
    }

    #[tokio::test]
    async fn test_toggle_like() {
        let store = InMemoryStoryStore::new();
        let story = store.insert(new_story(1, 0)).await.unwrap();

        let (story, liked) = store.toggle_like(story.id, 7).await.unwrap().unwrap();
        assert!(liked);
        assert_eq!(story.likes, vec![7]);
        assert_eq!(story.like_count, 1);

        let (story, liked) = store.toggle_like(story.id, 7).await.unwrap().unwrap();
        assert!(!liked);
        assert_eq!(story.like_count, 0);
    }
}
