//! Service configuration loaded from the environment
//!
//! # Environment Variables
//! - `JWT_SECRET`: secret used to sign session tokens (required)
//! - `AUTH_USERNAME`: login username (required)
//! - `AUTH_PASSWORD`: login password (required)
//! - `PORT`: listen port (default: 3000)
//! - `DATABASE_URL`: SQLite URL (default: `sqlite:data/database.sqlite`)
//! - `DATABASE_MAX_CONNECTIONS`: pool size (default: 5)
//! - `JWT_EXPIRY_SECONDS`: token lifetime in seconds (default: 3600)

use common::database::{DEFAULT_DATABASE_URL, DatabaseConfig};
use config::{Config, Environment};
use serde::Deserialize;
use thiserror::Error;

use crate::{auth::Credentials, jwt::JwtConfig};

/// Errors raised while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A variable is missing or has the wrong type
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A required variable is set but blank
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Service configuration
#[derive(Clone, Deserialize)]
pub struct AppConfig {
    pub jwt_secret: String,
    pub auth_username: String,
    pub auth_password: String,
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_expiry_seconds: u64,
}

impl AppConfig {
    /// Load the configuration from environment variables
    ///
    /// There are no fallback credentials: a missing or blank secret,
    /// username or password is an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("port", 3000_i64)?
            .set_default("database_url", DEFAULT_DATABASE_URL)?
            .set_default("database_max_connections", 5_i64)?
            .set_default("jwt_expiry_seconds", 3600_i64)?
            .add_source(Environment::default())
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Empty("JWT_SECRET"));
        }
        if self.auth_username.trim().is_empty() {
            return Err(ConfigError::Empty("AUTH_USERNAME"));
        }
        if self.auth_password.is_empty() {
            return Err(ConfigError::Empty("AUTH_PASSWORD"));
        }
        Ok(())
    }

    pub fn database(&self) -> DatabaseConfig {
        DatabaseConfig {
            database_url: self.database_url.clone(),
            max_connections: self.database_max_connections,
        }
    }

    pub fn jwt(&self) -> JwtConfig {
        JwtConfig {
            secret: self.jwt_secret.clone(),
            expiry_seconds: self.jwt_expiry_seconds,
        }
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.auth_username.clone(), self.auth_password.clone())
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("jwt_secret", &"<redacted>")
            .field("auth_username", &self.auth_username)
            .field("auth_password", &"<redacted>")
            .field("port", &self.port)
            .field("database_url", &self.database_url)
            .field("database_max_connections", &self.database_max_connections)
            .field("jwt_expiry_seconds", &self.jwt_expiry_seconds)
            .finish()
    }
}
