//! SQLite connection management
//!
//! This module handles the initialization, pooling, and lifecycle management
//! of the embedded SQLite database that holds the activity log.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::{DatabaseConfig, DatabaseError};

/// SQLite connection manager
pub struct SqliteConnection {
    pool: Arc<SqlitePool>,
}

impl SqliteConnection {
    /// Create new SQLite connection manager
    pub async fn new(config: DatabaseConfig) -> Result<Self, DatabaseError> {
        if config.max_connections == 0 {
            return Err(DatabaseError::Connection(
                "max_connections must be at least 1".to_string(),
            ));
        }

        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| DatabaseError::Connection(format!("Invalid database url: {}", e)))?
            .create_if_missing(true);

        let mut pool_options = SqlitePoolOptions::new()
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds));

        // Each in-memory connection is its own database, so pin a single
        // connection that is never recycled.
        pool_options = if config.is_in_memory() {
            pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            pool_options.max_connections(config.max_connections)
        };

        let options = if config.is_in_memory() {
            options
        } else {
            options.journal_mode(SqliteJournalMode::Wal)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(DatabaseError::Sqlite)?;

        // Test the connection
        sqlx::query("SELECT 1")
            .execute(&pool)
            .await
            .map_err(DatabaseError::Sqlite)?;

        info!("SQLite connection pool created successfully");

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Get connection pool
    pub fn pool(&self) -> Arc<SqlitePool> {
        self.pool.clone()
    }

    /// Close connection pool
    pub async fn close(&self) {
        info!("Closing SQLite connection pool");
        self.pool.close().await;
    }
}
