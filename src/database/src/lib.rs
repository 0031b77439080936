//! Database Layer for the MediaMind gateway
//!
//! A single append-only activity log backed by SQLite. Every feature call made
//! through the gateway lands here as one row, and the dashboard reads it back
//! through the repository queries.

pub mod connections;
pub mod health;
pub mod migrations;
pub mod models;
pub mod repositories;

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::sync::Arc;

pub use connections::SqliteConnection;
pub use health::{DatabaseHealth, HealthChecker};
pub use migrations::MigrationManager;
pub use models::{ActivityLog, Feature, NewActivityLog, MAX_SNIPPET_CHARS};
pub use repositories::ActivityLogRepository;

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Private in-memory database, mostly useful for tests.
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            acquire_timeout_seconds: 5,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://.mediamind.db".to_string(),
            max_connections: 5,
            acquire_timeout_seconds: 10,
        }
    }
}

/// Owns the pool and hands out repositories over it
#[derive(Clone)]
pub struct DatabaseManager {
    pool: Arc<SqlitePool>,
}

impl DatabaseManager {
    /// Open the pool and bring the schema up to date
    pub async fn new(config: DatabaseConfig) -> Result<Self, DatabaseError> {
        tracing::info!("Initializing activity log database at {}", config.url);

        let connection = SqliteConnection::new(config).await?;
        let pool = connection.pool();

        let applied = MigrationManager::new(pool.clone()).run_migrations().await?;
        tracing::info!("Database ready ({} migrations applied)", applied);

        Ok(Self { pool })
    }

    pub async fn in_memory() -> Result<Self, DatabaseError> {
        Self::new(DatabaseConfig::in_memory()).await
    }

    pub fn pool(&self) -> Arc<SqlitePool> {
        self.pool.clone()
    }

    pub fn activity_logs(&self) -> ActivityLogRepository {
        ActivityLogRepository::new(self.pool.clone())
    }

    pub fn health_checker(&self) -> HealthChecker {
        HealthChecker::new(self.pool.clone())
    }

    pub async fn close(&self) {
        tracing::info!("Closing activity log database");
        self.pool.close().await;
    }
}

/// Common database error types
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] sqlx::Error),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Validation error: {0}")]
    Validation(String),
}
