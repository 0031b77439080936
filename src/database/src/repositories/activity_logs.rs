//! Activity log repository
//!
//! Inserts one row per feature call and answers the dashboard's read queries:
//! all-time counts, windowed counts and the recent-activity feed.

use chrono::{DateTime, TimeZone, Utc};
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::sync::Arc;

use crate::models::{ActivityLog, Feature, NewActivityLog};
use crate::DatabaseError;

#[derive(Debug, sqlx::FromRow)]
struct LogRow {
    id: i64,
    feature: String,
    input_text: String,
    output_result: String,
    timestamp: i64,
}

impl LogRow {
    fn into_model(self) -> Result<ActivityLog, DatabaseError> {
        let feature = self.feature.parse::<Feature>()?;
        let timestamp = Utc
            .timestamp_millis_opt(self.timestamp)
            .single()
            .ok_or_else(|| {
                DatabaseError::Validation(format!("Invalid timestamp on log {}", self.id))
            })?;

        Ok(ActivityLog {
            id: self.id,
            feature,
            input_text: self.input_text,
            output_result: self.output_result,
            timestamp,
        })
    }
}

/// Append-only access to the `logs` table
#[derive(Clone)]
pub struct ActivityLogRepository {
    pool: Arc<SqlitePool>,
}

impl ActivityLogRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }

    /// Insert with the store's clock as the timestamp
    pub async fn insert(&self, entry: &NewActivityLog) -> Result<ActivityLog, DatabaseError> {
        self.insert_at(entry, Utc::now()).await
    }

    /// Insert with an explicit timestamp (backfills and imports)
    pub async fn insert_at(
        &self,
        entry: &NewActivityLog,
        timestamp: DateTime<Utc>,
    ) -> Result<ActivityLog, DatabaseError> {
        let result = sqlx::query(
            "INSERT INTO logs (feature, input_text, output_result, timestamp) VALUES (?, ?, ?, ?)",
        )
        .bind(entry.feature.as_str())
        .bind(&entry.input_text)
        .bind(&entry.output_result)
        .bind(timestamp.timestamp_millis())
        .execute(&*self.pool)
        .await?;

        let id = result.last_insert_rowid();
        tracing::debug!("Recorded {} activity as log {}", entry.feature, id);

        Ok(ActivityLog {
            id,
            feature: entry.feature,
            input_text: entry.input_text.clone(),
            output_result: entry.output_result.clone(),
            timestamp: Utc
                .timestamp_millis_opt(timestamp.timestamp_millis())
                .single()
                .unwrap_or(timestamp),
        })
    }

    /// Total number of rows, all time
    pub async fn count_all(&self) -> Result<i64, DatabaseError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM logs")
            .fetch_one(&*self.pool)
            .await?;
        Ok(count)
    }

    /// Per-feature counts, all time. Features with no rows are absent.
    pub async fn count_by_feature(&self) -> Result<HashMap<Feature, i64>, DatabaseError> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT feature, COUNT(*) FROM logs GROUP BY feature")
                .fetch_all(&*self.pool)
                .await?;

        Ok(collect_counts(rows))
    }

    /// Per-feature counts for rows at or after `since`
    pub async fn count_by_feature_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<HashMap<Feature, i64>, DatabaseError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT feature, COUNT(*) FROM logs WHERE timestamp >= ? GROUP BY feature",
        )
        .bind(since.timestamp_millis())
        .fetch_all(&*self.pool)
        .await?;

        Ok(collect_counts(rows))
    }

    /// Newest rows at or after `since`, newest first
    pub async fn recent_since(
        &self,
        since: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<ActivityLog>, DatabaseError> {
        let rows: Vec<LogRow> = sqlx::query_as(
            r#"
            SELECT id, feature, input_text, output_result, timestamp
            FROM logs
            WHERE timestamp >= ?
            ORDER BY timestamp DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(since.timestamp_millis())
        .bind(i64::from(limit))
        .fetch_all(&*self.pool)
        .await?;

        let mut logs = Vec::with_capacity(rows.len());
        for row in rows {
            match row.into_model() {
                Ok(log) => logs.push(log),
                Err(e) => tracing::warn!("Skipping unreadable log row: {}", e),
            }
        }
        Ok(logs)
    }
}

fn collect_counts(rows: Vec<(String, i64)>) -> HashMap<Feature, i64> {
    rows.into_iter()
        .filter_map(|(name, count)| match name.parse::<Feature>() {
            Ok(feature) => Some((feature, count)),
            Err(_) => {
                tracing::warn!("Ignoring counts for unknown feature '{}'", name);
                None
            }
        })
        .collect()
}
