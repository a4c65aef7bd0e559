use crate::auth::repo::{PgUserRepo, UserRepo};
use crate::config::AppConfig;
use crate::walks::repo::{PgWalkRepo, WalkRepo};
use anyhow::Context;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub walks: Arc<dyn WalkRepo>,
    pub users: Arc<dyn UserRepo>,
}

impl AppState {
    /// Connect to Postgres and wire the repositories. Returns the pool too
    /// so the caller can run migrations on it.
    pub async fn init(config: AppConfig) -> anyhow::Result<(Self, PgPool)> {
        let db = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        let state = Self::from_parts(
            Arc::new(config),
            Arc::new(PgWalkRepo::new(db.clone())),
            Arc::new(PgUserRepo::new(db.clone())),
        );
        Ok((state, db))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        walks: Arc<dyn WalkRepo>,
        users: Arc<dyn UserRepo>,
    ) -> Self {
        Self {
            config,
            walks,
            users,
        }
    }
}
