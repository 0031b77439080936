//! Database health monitoring
//!
//! Round-trip probe against the SQLite pool, reported on the gateway's
//! `/health` endpoint.

use serde::Serialize;
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Health checker for the activity log database
#[derive(Clone)]
pub struct HealthChecker {
    pool: Arc<SqlitePool>,
    timeout: Duration,
}

/// Result of one probe
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseHealth {
    pub healthy: bool,
    pub response_time_ms: u64,
    pub pool_size: u32,
    pub idle_connections: usize,
    pub error_message: Option<String>,
    pub checked_at: chrono::DateTime<chrono::Utc>,
}

impl HealthChecker {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self {
            pool,
            timeout: Duration::from_secs(5),
        }
    }

    /// Run `SELECT 1` and report latency. Never fails; problems go into the report.
    pub async fn check(&self) -> DatabaseHealth {
        let start = Instant::now();
        let probe = sqlx::query("SELECT 1").execute(&*self.pool);

        let error_message = match tokio::time::timeout(self.timeout, probe).await {
            Ok(Ok(_)) => None,
            Ok(Err(e)) => Some(e.to_string()),
            Err(_) => Some(format!("Health probe timed out after {:?}", self.timeout)),
        };

        let response_time_ms = start.elapsed().as_millis() as u64;
        match &error_message {
            None => debug!("Database health check passed in {}ms", response_time_ms),
            Some(e) => warn!("Database health check failed: {}", e),
        }

        DatabaseHealth {
            healthy: error_message.is_none(),
            response_time_ms,
            pool_size: self.pool.size(),
            idle_connections: self.pool.num_idle(),
            error_message,
            checked_at: chrono::Utc::now(),
        }
    }
}
