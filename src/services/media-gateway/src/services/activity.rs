//! Best-effort activity recording
//!
//! Every feature call writes one log row. A failed write is reported to the
//! operator log and otherwise ignored; it never changes the caller's response.

use mediamind_database::{ActivityLogRepository, Feature, NewActivityLog};
use serde::Serialize;
use tracing::warn;

#[derive(Clone)]
pub struct ActivityRecorder {
    repo: ActivityLogRepository,
}

impl ActivityRecorder {
    pub fn new(repo: ActivityLogRepository) -> Self {
        Self { repo }
    }

    /// Record a call that produced a payload (including fallback payloads)
    pub async fn record<T: Serialize + ?Sized>(&self, feature: Feature, input: &str, output: &T) {
        let serialized = serde_json::to_string(output).unwrap_or_else(|e| {
            warn!("Failed to serialize {} result for the activity log: {}", feature, e);
            String::new()
        });
        self.write(NewActivityLog::new(feature, input, &serialized))
            .await;
    }

    /// Record a call whose upstream request failed outright
    pub async fn record_failure(&self, feature: Feature, input: &str) {
        self.write(NewActivityLog::failed(feature, input)).await;
    }

    async fn write(&self, entry: NewActivityLog) {
        if let Err(e) = self.repo.insert(&entry).await {
            warn!("Failed to record {} activity: {}", entry.feature, e);
        }
    }
}
