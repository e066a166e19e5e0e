// User domain models - writers and the admin account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// A writer, identified by nickname. There are no passwords for children;
/// only the configured admin account needs one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub nickname: String,
    pub role: Role,
    /// Segments written, counting the opening segment of a new story
    pub stories_written: u32,
    /// Likes received on stories this user started
    pub total_likes: i64,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

/// Username/password pair for the single admin account.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub nickname: String,
    pub password: String,
}

/// What a successful login hands back to the client.
#[derive(Debug, Clone, Serialize)]
pub struct LoginOutcome {
    pub token: String,
    pub user: User,
}
