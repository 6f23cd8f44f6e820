use std::path::Path;

use anyhow::Context;
use sqlx::{
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Open (creating if needed) the SQLite file at `path`.
///
/// Connections are handed out per statement and returned to the pool on drop,
/// so nothing outlives the request that checked it out.
pub async fn connect(path: &Path) -> anyhow::Result<SqlitePool> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create database directory {}", parent.display()))?;
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .with_context(|| format!("open database {}", path.display()))
}

/// Create the `user` and `movie` tables. Safe to run repeatedly.
pub async fn init_schema(db: &SqlitePool) -> anyhow::Result<()> {
    MIGRATOR.run(db).await.context("apply schema migrations")?;
    tracing::info!("database schema is up to date");
    Ok(())
}
