//! Application state shared across handlers

use anyhow::{Context, Result};
use common::database::{init_pool, init_schema};
use sqlx::SqlitePool;

use crate::{
    auth::Credentials, config::AppConfig, jwt::JwtService, repositories::CourseRepository,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub course_repository: CourseRepository,
    pub jwt_service: JwtService,
    pub credentials: Credentials,
}

impl AppState {
    /// Open the database, make sure the schema exists and wire the services
    ///
    /// Must complete before the router is built.
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let db_pool = init_pool(&config.database())
            .await
            .context("Failed to open database")?;
        init_schema(&db_pool)
            .await
            .context("Failed to create courses table")?;

        Ok(Self {
            course_repository: CourseRepository::new(db_pool.clone()),
            jwt_service: JwtService::new(&config.jwt()),
            credentials: config.credentials(),
            db_pool,
        })
    }
}
