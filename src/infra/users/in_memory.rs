// In-memory UserStore, used for tests and `STORAGE_BACKEND=memory`.

use crate::core::users::{Role, User, UserError, UserStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

pub struct InMemoryUserStore {
    users: DashMap<u64, User>,
    /// Nickname -> user id
    by_nickname: DashMap<String, u64>,
    next_id: AtomicU64,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            by_nickname: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn get(&self, user_id: u64) -> Result<Option<User>, UserError> {
        Ok(self.users.get(&user_id).map(|u| u.value().clone()))
    }

    async fn find_by_nickname(&self, nickname: &str) -> Result<Option<User>, UserError> {
        let Some(id) = self.by_nickname.get(nickname).map(|id| *id) else {
            return Ok(None);
        };
        self.get(id).await
    }

    async fn find_or_create(
        &self,
        nickname: &str,
        role: Role,
        at: DateTime<Utc>,
    ) -> Result<User, UserError> {
        // Holding the nickname entry makes lookup-then-insert atomic
        match self.by_nickname.entry(nickname.to_string()) {
            Entry::Occupied(entry) => self
                .users
                .get(entry.get())
                .map(|u| u.value().clone())
                .ok_or_else(|| UserError::StorageError(format!("dangling nickname {nickname}"))),
            Entry::Vacant(entry) => {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                let user = User {
                    id,
                    nickname: nickname.to_string(),
                    role,
                    stories_written: 0,
                    total_likes: 0,
                    created_at: at,
                    last_active: at,
                };
                self.users.insert(id, user.clone());
                entry.insert(id);
                Ok(user)
            }
        }
    }

    async fn touch(&self, user_id: u64, at: DateTime<Utc>) -> Result<(), UserError> {
        if let Some(mut user) = self.users.get_mut(&user_id) {
            user.last_active = at;
        }
        Ok(())
    }

    async fn record_contribution(&self, user_id: u64) -> Result<(), UserError> {
        if let Some(mut user) = self.users.get_mut(&user_id) {
            user.stories_written += 1;
        }
        Ok(())
    }

    async fn adjust_likes(&self, user_id: u64, delta: i64) -> Result<(), UserError> {
        if let Some(mut user) = self.users.get_mut(&user_id) {
            user.total_likes += delta;
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<User>, UserError> {
        let mut users: Vec<User> = self.users.iter().map(|u| u.value().clone()).collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(users)
    }

    async fn top_writers(&self, limit: usize) -> Result<Vec<User>, UserError> {
        let mut users: Vec<User> = self.users.iter().map(|u| u.value().clone()).collect();
        users.sort_by(|a, b| {
            b.stories_written
                .cmp(&a.stories_written)
                .then(b.total_likes.cmp(&a.total_likes))
                .then(a.id.cmp(&b.id))
        });
        users.truncate(limit);
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_find_or_create_is_idempotent() {
        let store = InMemoryUserStore::new();
        let now = Utc::now();

        let first = store.find_or_create("Ela", Role::User, now).await.unwrap();
        let again = store.find_or_create("Ela", Role::Admin, now).await.unwrap();
        assert_eq!(first.id, again.id);
        assert_eq!(again.role, Role::User);

        let other = store.find_or_create("Can", Role::User, now).await.unwrap();
        assert_ne!(first.id, other.id);
        assert_eq!(
            store.find_by_nickname("Can").await.unwrap().map(|u| u.id),
            Some(other.id)
        );
        assert!(store.find_by_nickname("can").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_top_writers() {
        let store = InMemoryUserStore::new();
        let now = Utc::now();

        let a = store.find_or_create("Ela", Role::User, now).await.unwrap();
        let b = store.find_or_create("Can", Role::User, now).await.unwrap();
        let c = store.find_or_create("Ece", Role::User, now).await.unwrap();

        store.record_contribution(b.id).await.unwrap();
        store.record_contribution(b.id).await.unwrap();
        store.record_contribution(c.id).await.unwrap();
        store.record_contribution(a.id).await.unwrap();
        store.adjust_likes(c.id, 3).await.unwrap();

        let top = store.top_writers(2).await.unwrap();
        let ids: Vec<u64> = top.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![b.id, c.id]);
    }
}
