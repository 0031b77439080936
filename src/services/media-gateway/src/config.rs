//! Gateway configuration
//!
//! Loaded from command-line flags with environment fallbacks; a `.env` file in
//! the working directory is read first. The only value without a usable
//! default is the Gemini credential.

use clap::{Parser, ValueEnum};
use mediamind_database::DatabaseConfig;
use std::time::Duration;

use crate::error::{AppError, Result};

pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// How the recommendation feature picks articles
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RecommendMode {
    /// Ask the model for fresh headlines
    Generate,
    /// Ask the model to choose from the built-in catalog
    Catalog,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "media-gateway", version, about = "MediaMind backend gateway")]
pub struct Config {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Gemini API key. When empty every upstream call fails fast and the
    /// features answer with their fallback payloads.
    #[arg(long, env = "GEMINI_API_KEY", default_value = "", hide_env_values = true)]
    pub gemini_api_key: String,

    #[arg(long, env = "GEMINI_API_URL", default_value = DEFAULT_GEMINI_API_URL)]
    pub gemini_api_url: String,

    #[arg(long, env = "GEMINI_MODEL", default_value = "gemini-2.5-flash")]
    pub primary_model: String,

    /// Second candidate for the translation retry policy
    #[arg(long, env = "GEMINI_FALLBACK_MODEL", default_value = "gemini-1.5-flash")]
    pub fallback_model: String,

    #[arg(long, env = "UPSTREAM_TIMEOUT_SECONDS", default_value_t = 30)]
    pub upstream_timeout_seconds: u64,

    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://.mediamind.db")]
    pub database_url: String,

    #[arg(long, env = "RECOMMEND_MODE", value_enum, default_value_t = RecommendMode::Generate)]
    pub recommend_mode: RecommendMode,

    /// Emit logs as JSON lines
    #[arg(long, env = "LOG_JSON", default_value_t = false)]
    pub log_json: bool,
}

impl Config {
    /// Read `.env`, then flags and environment, then validate
    pub fn load() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(AppError::ConfigurationError(format!(
                    "Failed to read .env file: {}",
                    e
                )));
            }
        }

        let config = Config::parse();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(AppError::ConfigurationError(
                "Host cannot be empty".to_string(),
            ));
        }

        if self.port == 0 {
            return Err(AppError::ConfigurationError(format!(
                "Invalid port: {}",
                self.port
            )));
        }

        if self.upstream_timeout_seconds == 0 {
            return Err(AppError::ConfigurationError(
                "upstream_timeout_seconds must be greater than 0".to_string(),
            ));
        }

        if self.primary_model.is_empty() {
            return Err(AppError::ConfigurationError(
                "Primary model name cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn has_credential(&self) -> bool {
        !self.gemini_api_key.trim().is_empty()
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_seconds)
    }

    /// Ordered candidates for the translation retry policy
    pub fn model_candidates(&self) -> Vec<String> {
        let mut candidates = vec![self.primary_model.clone()];
        if !self.fallback_model.is_empty() && self.fallback_model != self.primary_model {
            candidates.push(self.fallback_model.clone());
        }
        candidates
    }

    pub fn database(&self) -> DatabaseConfig {
        DatabaseConfig::new(self.database_url.clone())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            gemini_api_key: String::new(),
            gemini_api_url: DEFAULT_GEMINI_API_URL.to_string(),
            primary_model: "gemini-2.5-flash".to_string(),
            fallback_model: "gemini-1.5-flash".to_string(),
            upstream_timeout_seconds: 30,
            database_url: "sqlite://.mediamind.db".to_string(),
            recommend_mode: RecommendMode::Generate,
            log_json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_cli_defaults() {
        let parsed = Config::try_parse_from(["media-gateway", "--gemini-api-key", "k"]).unwrap();
        let defaults = Config::default();

        assert_eq!(parsed.port, defaults.port);
        assert_eq!(parsed.primary_model, defaults.primary_model);
        assert_eq!(parsed.recommend_mode, RecommendMode::Generate);
        assert!(parsed.has_credential());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = Config {
            port: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            upstream_timeout_seconds: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_model_candidates_deduplicated() {
        let config = Config {
            fallback_model: "gemini-2.5-flash".to_string(),
            ..Config::default()
        };
        assert_eq!(config.model_candidates(), vec!["gemini-2.5-flash"]);

        assert_eq!(
            Config::default().model_candidates(),
            vec!["gemini-2.5-flash", "gemini-1.5-flash"]
        );
    }

    #[test]
    fn test_recommend_mode_from_flag() {
        let parsed =
            Config::try_parse_from(["media-gateway", "--recommend-mode", "catalog"]).unwrap();
        assert_eq!(parsed.recommend_mode, RecommendMode::Catalog);
    }
}
