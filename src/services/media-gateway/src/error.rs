use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, AppError>;

/// Service-level errors.
///
/// Feature routes never return these to callers: they degrade to fallback
/// payloads instead. `AppError` covers startup and unmatched routes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub code: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::ConfigurationError(_) => "CONFIGURATION_ERROR",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConfigurationError(_)
            | AppError::DatabaseError(_)
            | AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        let error_response = ErrorResponse {
            error: self.error_code().to_string(),
            message: self.to_string(),
            code: format!("{}", status_code.as_u16()),
            timestamp: chrono::Utc::now(),
        };

        match &self {
            AppError::NotFound(_) => tracing::debug!("Error: {:?}", self),
            _ => tracing::error!("Server error: {:?}", self),
        }

        (status_code, Json(error_response)).into_response()
    }
}

impl From<mediamind_database::DatabaseError> for AppError {
    fn from(err: mediamind_database::DatabaseError) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::InternalServerError(format!("Failed to create HTTP client: {}", err))
    }
}
