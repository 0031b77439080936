//! Request handlers
//!
//! Feature handlers answer 200 no matter what happens upstream. Bodies are read
//! as raw bytes and decoded leniently so a malformed request gets the same
//! default treatment as a missing field instead of a 4xx rejection.

pub mod dashboard;
pub mod health;
pub mod insights;
pub mod recommend;
pub mod safety;
pub mod sentiment;
pub mod summary;
pub mod translate;

use axum::body::Bytes;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::warn;

/// Body shared by the single-text features
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TextRequest {
    pub text: Option<String>,
}

impl TextRequest {
    pub fn text(self) -> String {
        self.text.unwrap_or_default()
    }
}

/// Decode a JSON body, falling back to `T::default()` when it is empty or
/// malformed
pub fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> T {
    if body.iter().all(u8::is_ascii_whitespace) {
        return T::default();
    }

    serde_json::from_slice(body).unwrap_or_else(|e| {
        warn!("Malformed request body, using defaults: {}", e);
        T::default()
    })
}
