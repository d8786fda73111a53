//! PostgreSQL persistence for games and characters.
//!
//! Models live in [`models`]; [`repositories`] implements the
//! [`gamevault_core::store::EntityStore`] contract over `sqlx`.

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Connection and collection settings.
///
/// | Env Var                 | Default      |
/// |-------------------------|--------------|
/// | `DATABASE_URL`          | required     |
/// | `DATABASE_NAME`         | from the URL |
/// | `GAMES_COLLECTION`      | `games`      |
/// | `CHARACTERS_COLLECTION` | `characters` |
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub connection_string: String,
    /// Overrides the database named in `connection_string` when set.
    pub database_name: Option<String>,
    pub games_collection: String,
    pub characters_collection: String,
}

impl DatabaseSettings {
    /// Settings for `connection_string` with the default table names.
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
            database_name: None,
            games_collection: "games".to_string(),
            characters_collection: "characters".to_string(),
        }
    }

    /// Load settings from environment variables.
    pub fn from_env() -> Self {
        let connection_string =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let database_name = std::env::var("DATABASE_NAME")
            .ok()
            .filter(|s| !s.trim().is_empty());
        let games_collection =
            std::env::var("GAMES_COLLECTION").unwrap_or_else(|_| "games".into());
        let characters_collection =
            std::env::var("CHARACTERS_COLLECTION").unwrap_or_else(|_| "characters".into());

        Self {
            connection_string,
            database_name,
            games_collection,
            characters_collection,
        }
    }
}

/// Create a connection pool from the configured settings.
pub async fn create_pool(settings: &DatabaseSettings) -> Result<DbPool, sqlx::Error> {
    let mut options: PgConnectOptions = settings.connection_string.parse()?;
    if let Some(name) = &settings.database_name {
        options = options.database(name);
    }
    PgPoolOptions::new()
        .max_connections(20)
        .connect_with(options)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    let migrator = sqlx::migrate!("../../db/migrations");
    migrator.run(pool).await?;
    tracing::debug!(count = migrator.iter().count(), "Migrations up to date");
    Ok(())
}
