//! Activity log data model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::DatabaseError;

/// Stored snippets are cut to this many characters
pub const MAX_SNIPPET_CHARS: usize = 256;

/// Marker stored as the output of a call that failed outright
pub const ERROR_MARKER: &str = "Error";

/// The six gateway features that write to the log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    Sentiment,
    Recommend,
    Translate,
    Safety,
    Insights,
    Summary,
}

impl Feature {
    /// Dashboard order
    pub const ALL: [Feature; 6] = [
        Feature::Sentiment,
        Feature::Recommend,
        Feature::Translate,
        Feature::Safety,
        Feature::Insights,
        Feature::Summary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::Sentiment => "sentiment",
            Feature::Recommend => "recommend",
            Feature::Translate => "translate",
            Feature::Safety => "safety",
            Feature::Insights => "insights",
            Feature::Summary => "summary",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feature {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .into_iter()
            .find(|feature| feature.as_str() == s)
            .ok_or_else(|| DatabaseError::Validation(format!("Unknown feature: {}", s)))
    }
}

/// A stored log row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityLog {
    pub id: i64,
    pub feature: Feature,
    pub input_text: String,
    pub output_result: String,
    pub timestamp: DateTime<Utc>,
}

/// A row waiting to be inserted. Both snippets are already truncated.
#[derive(Debug, Clone, PartialEq)]
pub struct NewActivityLog {
    pub feature: Feature,
    pub input_text: String,
    pub output_result: String,
}

impl NewActivityLog {
    pub fn new(feature: Feature, input: &str, output: &str) -> Self {
        Self {
            feature,
            input_text: truncate_chars(input, MAX_SNIPPET_CHARS),
            output_result: truncate_chars(output, MAX_SNIPPET_CHARS),
        }
    }

    /// Entry for a call whose upstream request failed outright
    pub fn failed(feature: Feature, input: &str) -> Self {
        Self::new(feature, input, ERROR_MARKER)
    }

    pub fn is_error(&self) -> bool {
        self.output_result == ERROR_MARKER
    }
}

/// Cut to at most `max` characters, never splitting a code point
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}
