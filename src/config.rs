use std::path::PathBuf;

use anyhow::Context;

const DEFAULT_DATABASE_PATH: &str = "instance/movie_contribution.sqlite";
const DEFAULT_SECRET_KEY: &str = "dev";
const DEFAULT_SESSION_TTL_MINUTES: i64 = 60 * 24 * 31;

/// Upper bound for session lifetime (one year).
pub const MAX_SESSION_TTL_MINUTES: i64 = 60 * 24 * 365;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub secret: String,
    pub ttl_minutes: i64,
    pub cookie_secure: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub session: SessionConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_path = std::env::var("DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATABASE_PATH));

        let secret = std::env::var("SECRET_KEY").unwrap_or_else(|_| {
            tracing::warn!("SECRET_KEY not set; using the development key");
            DEFAULT_SECRET_KEY.into()
        });
        anyhow::ensure!(!secret.is_empty(), "SECRET_KEY must not be empty");

        let session = SessionConfig {
            secret,
            ttl_minutes: parse_ttl_minutes(std::env::var("SESSION_TTL_MINUTES").ok().as_deref())?,
            cookie_secure: std::env::var("SESSION_COOKIE_SECURE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        };
        Ok(Self {
            database_path,
            session,
        })
    }

    /// Config pointing at an isolated database.
    #[cfg(test)]
    pub fn with_database(database_path: impl Into<PathBuf>, secret: &str) -> Self {
        Self {
            database_path: database_path.into(),
            session: SessionConfig {
                secret: secret.into(),
                ttl_minutes: 60,
                cookie_secure: false,
            },
        }
    }
}

fn parse_ttl_minutes(raw: Option<&str>) -> anyhow::Result<i64> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_SESSION_TTL_MINUTES);
    };
    let minutes = raw
        .trim()
        .parse::<i64>()
        .with_context(|| format!("SESSION_TTL_MINUTES is not a number: {raw:?}"))?;
    anyhow::ensure!(
        (1..=MAX_SESSION_TTL_MINUTES).contains(&minutes),
        "SESSION_TTL_MINUTES must be between 1 and {MAX_SESSION_TTL_MINUTES}"
    );
    Ok(minutes)
}
