// The core module contains all business logic.
// Each feature gets its own submodule; none of them know about HTTP.

#[path = "moderation/mod.rs"]
pub mod moderation;

#[path = "stories/mod.rs"]
pub mod stories;

#[path = "themes/theme_catalog.rs"]
pub mod themes;

#[path = "users/mod.rs"]
pub mod users;
