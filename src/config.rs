// Application configuration, read from the environment (and `.env`).

use crate::core::moderation::{LexiconVariant, ReasonLocale};
use crate::core::users::AdminCredentials;
use anyhow::{anyhow, bail};
use std::path::PathBuf;

const DEV_JWT_SECRET: &str = "storychain-dev-secret";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Sqlite,
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" => Ok(StorageBackend::Sqlite),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!("unknown storage backend: {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub storage: StorageBackend,
    pub database_url: String,
    pub jwt_secret: String,
    pub token_ttl: chrono::Duration,
    /// `None` disables admin login
    pub admin: Option<AdminCredentials>,
    pub frontend_url: String,
    pub moderation_locale: ReasonLocale,
    pub lexicon: LexiconVariant,
    pub extra_terms_file: Option<PathBuf>,
    pub moderation_config_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let storage = match get("STORAGE_BACKEND") {
            Some(value) => value.parse().map_err(|e: String| anyhow!(e))?,
            None => StorageBackend::Sqlite,
        };

        let jwt_secret = match get("JWT_SECRET") {
            Some(secret) => secret,
            None if storage == StorageBackend::Memory => {
                tracing::warn!("JWT_SECRET not set, using the development secret");
                DEV_JWT_SECRET.to_string()
            }
            None => bail!("JWT_SECRET must be set when STORAGE_BACKEND is sqlite"),
        };

        let token_ttl_hours = match get("TOKEN_TTL_HOURS") {
            Some(value) => value
                .parse::<i64>()
                .map_err(|e| anyhow!("invalid TOKEN_TTL_HOURS {value:?}: {e}"))?,
            None => 24,
        };
        if token_ttl_hours <= 0 {
            bail!("TOKEN_TTL_HOURS must be positive");
        }
        let token_ttl = chrono::Duration::try_hours(token_ttl_hours)
            .filter(|ttl| chrono::Utc::now().checked_add_signed(*ttl).is_some())
            .ok_or_else(|| anyhow!("TOKEN_TTL_HOURS {token_ttl_hours} is out of range"))?;

        let admin = get("ADMIN_PASSWORD").map(|password| AdminCredentials {
            nickname: get("ADMIN_NICKNAME").unwrap_or_else(|| "admin".to_string()),
            password,
        });

        let moderation_locale = match get("MODERATION_LOCALE") {
            Some(value) => value.parse().map_err(|e: String| anyhow!(e))?,
            None => ReasonLocale::default(),
        };
        let lexicon = match get("MODERATION_LEXICON") {
            Some(value) => value.parse().map_err(|e: String| anyhow!(e))?,
            None => LexiconVariant::default(),
        };

        Ok(Self {
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:5000".to_string()),
            storage,
            database_url: get("DATABASE_URL").unwrap_or_else(|| "data/storychain.db".to_string()),
            jwt_secret,
            token_ttl,
            admin,
            frontend_url: get("FRONTEND_URL")
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
            moderation_locale,
            lexicon,
            extra_terms_file: get("MODERATION_EXTRA_TERMS_FILE").map(PathBuf::from),
            moderation_config_file: get("MODERATION_CONFIG_FILE").map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[("JWT_SECRET", "abc")]).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:5000");
        assert_eq!(config.storage, StorageBackend::Sqlite);
        assert_eq!(config.database_url, "data/storychain.db");
        assert_eq!(config.token_ttl, chrono::Duration::hours(24));
        assert_eq!(config.moderation_locale, ReasonLocale::Turkish);
        assert_eq!(config.lexicon, LexiconVariant::Standard);
        assert!(config.admin.is_none());
        assert!(config.extra_terms_file.is_none());
    }

    #[test]
    fn test_sqlite_requires_secret() {
        assert!(config(&[]).is_err());
        assert!(config(&[("JWT_SECRET", "   ")]).is_err());

        let memory = config(&[("STORAGE_BACKEND", "memory")]).unwrap();
        assert_eq!(memory.jwt_secret, DEV_JWT_SECRET);
    }

    #[test]
    fn test_admin_and_moderation_settings() {
        let config = config(&[
            ("JWT_SECRET", "abc"),
            ("ADMIN_PASSWORD", "s3cret"),
            ("MODERATION_LOCALE", "en"),
            ("MODERATION_LEXICON", "strict"),
            ("TOKEN_TTL_HOURS", "2"),
        ])
        .unwrap();

        let admin = config.admin.unwrap();
        assert_eq!(admin.nickname, "admin");
        assert_eq!(admin.password, "s3cret");
        assert_eq!(config.moderation_locale, ReasonLocale::English);
        assert_eq!(config.lexicon, LexiconVariant::Strict);
        assert_eq!(config.token_ttl, chrono::Duration::hours(2));
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(config(&[("JWT_SECRET", "abc"), ("STORAGE_BACKEND", "redis")]).is_err());
        assert!(config(&[("JWT_SECRET", "abc"), ("TOKEN_TTL_HOURS", "soon")]).is_err());
        assert!(config(&[("JWT_SECRET", "abc"), ("TOKEN_TTL_HOURS", "0")]).is_err());
        // Parses as i64 but no longer fits a duration
        assert!(config(&[
            ("JWT_SECRET", "abc"),
            ("TOKEN_TTL_HOURS", "9223372036854775807")
        ])
        .is_err());
        // Fits a duration but lands past the last representable date
        assert!(config(&[("JWT_SECRET", "abc"), ("TOKEN_TTL_HOURS", "1000000000000")]).is_err());
    }
}
