//! Shared application state
//!
//! Built once at startup and cloned into every handler. The model client is
//! held behind the `LanguageModel` trait so tests can swap in a fake.

use std::sync::Arc;

use mediamind_database::DatabaseManager;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::llm::{GeminiClient, LanguageModel};
use crate::retry::RetryPolicy;
use crate::services::{ActivityRecorder, DashboardService};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub llm: Arc<dyn LanguageModel>,
    pub database: DatabaseManager,
    pub activity: ActivityRecorder,
    pub dashboard: DashboardService,
    pub translation_retry: Arc<RetryPolicy>,
}

impl AppState {
    /// Connect the log store and build the Gemini client from `config`
    pub async fn new(config: Config) -> Result<Self> {
        info!("Initializing application state...");

        if !config.has_credential() {
            warn!("GEMINI_API_KEY is not set; features will answer with fallback payloads");
        }

        let database = DatabaseManager::new(config.database()).await?;
        let llm: Arc<dyn LanguageModel> = Arc::new(GeminiClient::new(&config)?);

        Ok(Self::from_parts(config, llm, database))
    }

    pub fn from_parts(config: Config, llm: Arc<dyn LanguageModel>, database: DatabaseManager) -> Self {
        let translation_retry = Arc::new(RetryPolicy::new(config.model_candidates()));

        Self {
            activity: ActivityRecorder::new(database.activity_logs()),
            dashboard: DashboardService::new(database.activity_logs()),
            config: Arc::new(config),
            llm,
            database,
            translation_retry,
        }
    }

    /// Model used by every single-attempt feature
    pub fn primary_model(&self) -> &str {
        &self.config.primary_model
    }
}
