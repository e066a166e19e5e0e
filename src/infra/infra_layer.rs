// The infra module contains implementations of core traits.
// Each feature implementation goes in its own submodule.

#[path = "database.rs"]
pub mod database;

#[path = "moderation/lexicon_file.rs"]
pub mod moderation;

#[path = "stories/story_store.rs"]
pub mod stories;

#[path = "users/user_store.rs"]
pub mod users;
