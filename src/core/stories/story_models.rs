// Story domain models - stories, their segments and the views built from them.

use crate::core::users::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One contribution to a story, written by one child.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub author_id: u64,
    pub author_nickname: String,
    pub content: String,
    /// 1-based position in the story
    pub order: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub id: u64,
    pub title: String,
    pub theme: String,
    pub characters: Option<String>,
    pub plot_hints: Option<String>,
    pub segments: Vec<Segment>,
    pub is_completed: bool,
    pub is_approved: bool,
    /// Ids of users who liked the story
    pub likes: Vec<u64>,
    pub like_count: usize,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl Story {
    pub fn has_contributor(&self, user_id: u64) -> bool {
        self.segments.iter().any(|s| s.author_id == user_id)
    }

    pub fn last_segment(&self) -> Option<&Segment> {
        self.segments.last()
    }

    pub fn first_author_id(&self) -> Option<u64> {
        self.segments.first().map(|s| s.author_id)
    }

    /// Timestamp of the newest segment, or creation time for an empty story.
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_segment()
            .map(|s| s.created_at)
            .unwrap_or(self.created_at)
    }
}

/// Who is writing, taken from the bearer token.
#[derive(Debug, Clone)]
pub struct Author {
    pub id: u64,
    pub nickname: String,
}

/// Segment data handed to a store; the store assigns `order`.
#[derive(Debug, Clone)]
pub struct NewSegment {
    pub author_id: u64,
    pub author_nickname: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// What a store did with a segment. The completion and one-segment-per-author
/// rules are checked in the same atomic section as the write.
#[derive(Debug, Clone)]
pub enum AppendOutcome {
    Appended(Story),
    NotFound,
    AlreadyCompleted,
    AlreadyContributed,
}

/// Story data handed to a store; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewStory {
    pub title: String,
    pub theme: String,
    pub characters: Option<String>,
    pub plot_hints: Option<String>,
    pub first_segment: NewSegment,
}

/// Input for starting a story. Fields are optional because a client may omit
/// them or send non-text values; the service decides what that means.
#[derive(Debug, Clone, Default)]
pub struct CreateStory {
    pub title: Option<String>,
    pub theme: Option<String>,
    pub content: Option<String>,
    pub characters: Option<String>,
    pub plot_hints: Option<String>,
}

/// Limits that shape a story beyond what the moderation gate checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoryRules {
    /// A story is completed once it has this many segments
    pub segments_to_complete: usize,
    /// Minimum trimmed length of any segment
    pub min_segment_chars: usize,
    pub popular_limit: usize,
}

impl Default for StoryRules {
    fn default() -> Self {
        Self {
            segments_to_complete: 5,
            min_segment_chars: 50,
            popular_limit: 10,
        }
    }
}

/// A story a writer can continue, plus where they'd pick up.
#[derive(Debug, Clone, Serialize)]
pub struct RandomPick {
    pub story: Story,
    pub last_segment: Option<Segment>,
    /// Position the caller's segment would take
    pub current_author_number: usize,
    pub total_authors: usize,
}

/// Result of a like toggle.
#[derive(Debug, Clone, Serialize)]
pub struct LikeOutcome {
    pub liked: bool,
    pub like_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserStats {
    pub stories_written: u32,
    pub total_likes: i64,
    pub completed_stories: usize,
    pub ongoing_stories: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminStats {
    pub total_stories: usize,
    pub completed_stories: usize,
    pub ongoing_stories: usize,
    pub total_users: usize,
    pub total_segments: usize,
    /// Rounded to one decimal place
    pub average_segments_per_story: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminStoryView {
    #[serde(flatten)]
    pub story: Story,
    pub segment_count: usize,
    pub last_activity: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminUserView {
    #[serde(flatten)]
    pub user: User,
    /// Stories this user has written at least one segment in
    pub story_count: usize,
}
