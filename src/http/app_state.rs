// Shared handler state - the services, built once in main.

use crate::core::moderation::ModerationService;
use crate::core::stories::{StoryService, StoryStore};
use crate::core::users::{AdminCredentials, TokenService, UserService, UserStore};
use std::sync::Arc;

pub type DynStoryStore = Arc<dyn StoryStore>;
pub type DynUserStore = Arc<dyn UserStore>;

#[derive(Clone)]
pub struct AppState {
    pub moderation: Arc<ModerationService>,
    pub tokens: Arc<TokenService>,
    pub users: Arc<UserService<DynUserStore>>,
    pub stories: Arc<StoryService<DynStoryStore, DynUserStore>>,
}

impl AppState {
    pub fn new(
        moderation: Arc<ModerationService>,
        tokens: Arc<TokenService>,
        story_store: DynStoryStore,
        user_store: DynUserStore,
        admin: Option<AdminCredentials>,
    ) -> Self {
        let mut users = UserService::new(user_store.clone(), tokens.clone(), moderation.clone());
        if let Some(admin) = admin {
            users = users.with_admin(admin);
        }
        let stories = StoryService::new(story_store, user_store, moderation.clone());

        Self {
            moderation,
            tokens,
            users: Arc::new(users),
            stories: Arc::new(stories),
        }
    }
}
