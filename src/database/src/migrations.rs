//! Database Migration Management
//!
//! Versioned schema steps for the activity log. Applied versions are tracked
//! in `schema_migrations`, so running the manager twice is a no-op.

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::DatabaseError;

/// A single forward-only schema step
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub version: i64,
    pub name: &'static str,
    pub sql: &'static str,
}

pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "create_logs",
        sql: r#"
            CREATE TABLE IF NOT EXISTS logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                feature TEXT NOT NULL,
                input_text TEXT NOT NULL,
                output_result TEXT NOT NULL,
                timestamp INTEGER NOT NULL
            )
        "#,
    },
    Migration {
        version: 2,
        name: "index_logs_timestamp",
        sql: "CREATE INDEX IF NOT EXISTS idx_logs_timestamp ON logs (timestamp)",
    },
];

/// Migration manager for the activity log database
#[derive(Clone)]
pub struct MigrationManager {
    pool: Arc<SqlitePool>,
}

impl MigrationManager {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }

    /// Initialize migration tracking table
    pub async fn initialize(&self) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&*self.pool)
        .await
        .map_err(|e| DatabaseError::Migration(format!("Failed to create tracking table: {}", e)))?;

        Ok(())
    }

    /// Run all pending migrations, returning how many were applied
    pub async fn run_migrations(&self) -> Result<usize, DatabaseError> {
        self.initialize().await?;

        let current = self.current_version().await?;
        let mut applied = 0;

        for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
            tracing::info!(
                "Applying migration {} ({})",
                migration.version,
                migration.name
            );

            let mut tx = self.pool.begin().await?;

            sqlx::query(migration.sql)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    DatabaseError::Migration(format!(
                        "Migration {} ({}) failed: {}",
                        migration.version, migration.name, e
                    ))
                })?;

            sqlx::query("INSERT INTO schema_migrations (version, name, applied_at) VALUES (?, ?, ?)")
                .bind(migration.version)
                .bind(migration.name)
                .bind(chrono::Utc::now().timestamp_millis())
                .execute(&mut *tx)
                .await?;

            tx.commit().await?;
            applied += 1;
        }

        Ok(applied)
    }

    /// Highest applied version, 0 on a fresh database
    pub async fn current_version(&self) -> Result<i64, DatabaseError> {
        let version: Option<i64> = sqlx::query_scalar("SELECT MAX(version) FROM schema_migrations")
            .fetch_one(&*self.pool)
            .await?;

        Ok(version.unwrap_or(0))
    }
}
