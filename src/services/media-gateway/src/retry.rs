//! Quota-aware retry policy used by the translation feature
//!
//! Walks an ordered list of model names. Each candidate gets a fixed number of
//! attempts; quota exhaustion sleeps for the server-suggested delay (clamped)
//! and tries again, any other error moves straight on to the next candidate.
//! A reply the caller cannot decode counts as one of those other errors.
//! The sleep only suspends the calling request's task.

use std::time::Duration;
use tracing::{info, warn};

use crate::llm::{LanguageModel, UpstreamError};

pub const DEFAULT_ATTEMPTS_PER_CANDIDATE: u32 = 2;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(15);
pub const MIN_RETRY_DELAY: Duration = Duration::from_secs(1);
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Terminal state of one policy run
#[derive(Debug, Clone, PartialEq)]
pub enum RetryOutcome<T> {
    Success { model: String, value: T },
    Exhausted { last_error: Option<UpstreamError> },
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    candidates: Vec<String>,
    attempts_per_candidate: u32,
    default_delay: Duration,
    min_delay: Duration,
    max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(candidates: Vec<String>) -> Self {
        Self {
            candidates,
            attempts_per_candidate: DEFAULT_ATTEMPTS_PER_CANDIDATE,
            default_delay: DEFAULT_RETRY_DELAY,
            min_delay: MIN_RETRY_DELAY,
            max_delay: MAX_RETRY_DELAY,
        }
    }

    /// Clamp the suggested delay into range, or use the default when absent
    pub fn delay_for(&self, suggested: Option<Duration>) -> Duration {
        suggested
            .map(|delay| delay.clamp(self.min_delay, self.max_delay))
            .unwrap_or(self.default_delay)
    }

    /// A reply only counts as success once `decode` accepts it
    pub async fn run<T, F>(
        &self,
        llm: &dyn LanguageModel,
        prompt: &str,
        decode: F,
    ) -> RetryOutcome<T>
    where
        F: Fn(String) -> Result<T, UpstreamError>,
    {
        let mut last_error = None;
        let total_attempts = self.candidates.len() as u32 * self.attempts_per_candidate;
        let mut attempts_made = 0;

        for model in &self.candidates {
            for attempt in 1..=self.attempts_per_candidate {
                attempts_made += 1;

                match llm.generate(model, prompt).await.and_then(&decode) {
                    Ok(value) => {
                        if attempts_made > 1 {
                            info!("Model {} succeeded on attempt {}", model, attempt);
                        }
                        return RetryOutcome::Success {
                            model: model.clone(),
                            value,
                        };
                    }
                    Err(error) if error.is_quota_exhausted() => {
                        let delay = self.delay_for(error.retry_after());
                        last_error = Some(error);

                        // Nothing left to wait for after the final attempt
                        if attempts_made < total_attempts {
                            warn!(
                                "Quota exhausted on {} (attempt {}/{}), retrying in {:?}",
                                model, attempt, self.attempts_per_candidate, delay
                            );
                            tokio::time::sleep(delay).await;
                        }
                    }
                    Err(error) => {
                        warn!("Model {} failed, moving to next candidate: {}", model, error);
                        last_error = Some(error);
                        // The skipped attempts no longer count toward the total
                        attempts_made += self.attempts_per_candidate - attempt;
                        break;
                    }
                }
            }
        }

        RetryOutcome::Exhausted { last_error }
    }
}
