// User service - nickname login, admin login and writer leaderboards.
// No HTTP types in here; handlers call these methods with plain values.

use super::token_service::{TokenError, TokenService};
use super::user_models::{AdminCredentials, LoginOutcome, Role, User};
use crate::core::moderation::ModerationService;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum UserError {
    #[error("{0}")]
    NicknameRejected(String),

    #[error("Geçersiz yönetici bilgileri")]
    InvalidCredentials,

    #[error("Kullanıcı bulunamadı")]
    NotFound,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("Storage error: {0}")]
    StorageError(String),
}

// ============================================================================
// STORAGE TRAIT (PORT)
// ============================================================================

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get(&self, user_id: u64) -> Result<Option<User>, UserError>;

    async fn find_by_nickname(&self, nickname: &str) -> Result<Option<User>, UserError>;

    /// Return the user with this nickname, creating it with `role` if absent.
    async fn find_or_create(&self, nickname: &str, role: Role, at: DateTime<Utc>)
        -> Result<User, UserError>;

    async fn touch(&self, user_id: u64, at: DateTime<Utc>) -> Result<(), UserError>;

    /// Bump the written-segments counter.
    async fn record_contribution(&self, user_id: u64) -> Result<(), UserError>;

    async fn adjust_likes(&self, user_id: u64, delta: i64) -> Result<(), UserError>;

    async fn list(&self) -> Result<Vec<User>, UserError>;

    /// Users ordered by segments written, then likes received.
    async fn top_writers(&self, limit: usize) -> Result<Vec<User>, UserError>;
}

#[async_trait]
impl<T: UserStore + ?Sized> UserStore for Arc<T> {
    async fn get(&self, user_id: u64) -> Result<Option<User>, UserError> {
        (**self).get(user_id).await
    }

    async fn find_by_nickname(&self, nickname: &str) -> Result<Option<User>, UserError> {
        (**self).find_by_nickname(nickname).await
    }

    async fn find_or_create(
        &self,
        nickname: &str,
        role: Role,
        at: DateTime<Utc>,
    ) -> Result<User, UserError> {
        (**self).find_or_create(nickname, role, at).await
    }

    async fn touch(&self, user_id: u64, at: DateTime<Utc>) -> Result<(), UserError> {
        (**self).touch(user_id, at).await
    }

    async fn record_contribution(&self, user_id: u64) -> Result<(), UserError> {
        (**self).record_contribution(user_id).await
    }

    async fn adjust_likes(&self, user_id: u64, delta: i64) -> Result<(), UserError> {
        (**self).adjust_likes(user_id, delta).await
    }

    async fn list(&self) -> Result<Vec<User>, UserError> {
        (**self).list().await
    }

    async fn top_writers(&self, limit: usize) -> Result<Vec<User>, UserError> {
        (**self).top_writers(limit).await
    }
}

// ============================================================================
// CORE SERVICE
// ============================================================================

pub const TOP_WRITERS_LIMIT: usize = 10;

pub struct UserService<U: UserStore> {
    store: U,
    tokens: Arc<TokenService>,
    moderation: Arc<ModerationService>,
    admin: Option<AdminCredentials>,
}

impl<U: UserStore> UserService<U> {
    pub fn new(store: U, tokens: Arc<TokenService>, moderation: Arc<ModerationService>) -> Self {
        Self {
            store,
            tokens,
            moderation,
            admin: None,
        }
    }

    pub fn with_admin(mut self, admin: AdminCredentials) -> Self {
        self.admin = Some(admin);
        self
    }

    /// Log a writer in by nickname. When the nickname is the configured admin
    /// account, the matching password is required and the token carries the
    /// admin role.
    pub async fn login(
        &self,
        nickname: Option<&str>,
        password: Option<&str>,
    ) -> Result<LoginOutcome, UserError> {
        let trimmed = nickname.map(str::trim);

        if let (Some(admin), Some(name)) = (&self.admin, trimmed) {
            if name.eq_ignore_ascii_case(&admin.nickname) {
                if name != admin.nickname || password != Some(admin.password.as_str()) {
                    tracing::warn!(nickname = %name, "Rejected admin login");
                    return Err(UserError::InvalidCredentials);
                }
                return self.issue(&admin.nickname, Role::Admin).await;
            }
        }

        let verdict = self.moderation.moderate_nickname(trimmed);
        if !verdict.accepted {
            return Err(UserError::NicknameRejected(verdict.reason));
        }

        // The gate accepted, so there is a non-empty nickname here
        let name = trimmed.unwrap_or_default();
        self.issue(name, Role::User).await
    }

    async fn issue(&self, nickname: &str, role: Role) -> Result<LoginOutcome, UserError> {
        let now = Utc::now();
        let mut user = self.store.find_or_create(nickname, role, now).await?;
        self.store.touch(user.id, now).await?;
        user.last_active = now;

        let token = self.tokens.issue(&user, role)?;
        tracing::info!(user_id = user.id, role = role.as_str(), "User logged in");

        Ok(LoginOutcome { token, user })
    }

    pub async fn me(&self, user_id: u64) -> Result<User, UserError> {
        self.store.get(user_id).await?.ok_or(UserError::NotFound)
    }

    pub async fn top_writers(&self) -> Result<Vec<User>, UserError> {
        self.store.top_writers(TOP_WRITERS_LIMIT).await
    }

    pub async fn list(&self) -> Result<Vec<User>, UserError> {
        self.store.list().await
    }
}

// ============================================================================
// TESTS
// ============================================================================
