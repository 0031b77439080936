//! Dashboard read model over the activity log
//!
//! `stats` counts the whole log. `performance` and `activity` only look at the
//! last 24 hours.

use chrono::{DateTime, Duration, Utc};
use mediamind_database::{ActivityLog, ActivityLogRepository, DatabaseError, Feature};
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

const WINDOW_HOURS: i64 = 24;
const RECENT_SCAN_LIMIT: u32 = 30;
const MAX_PER_FEATURE: usize = 2;
const MAX_FEED_ITEMS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub system_status: String,
    pub analyzed_posts: i64,
    pub posts_trend: String,
    pub content_curated: i64,
    pub feeds_generated: i64,
    pub threats_blocked: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureUsage {
    pub name: String,
    pub usage: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityItem {
    pub icon: String,
    pub text: String,
    pub time: String,
    pub color: String,
}

/// Fixed display template for a feature in the activity feed
struct ActivityTemplate {
    icon: &'static str,
    text: &'static str,
    color: &'static str,
}

fn display_name(feature: Feature) -> &'static str {
    match feature {
        Feature::Sentiment => "Sentiment Analysis",
        Feature::Recommend => "Recommendations",
        Feature::Translate => "Translation",
        Feature::Safety => "Safety Shield",
        Feature::Insights => "Trend Insights",
        Feature::Summary => "Summarization",
    }
}

fn template(feature: Feature) -> ActivityTemplate {
    match feature {
        Feature::Sentiment => ActivityTemplate {
            icon: "😊",
            text: "Sentiment analyzed for a new post",
            color: "blue",
        },
        Feature::Recommend => ActivityTemplate {
            icon: "📰",
            text: "Personalized feed generated",
            color: "purple",
        },
        Feature::Translate => ActivityTemplate {
            icon: "🌐",
            text: "Content translated",
            color: "green",
        },
        Feature::Safety => ActivityTemplate {
            icon: "🛡️",
            text: "Content safety check completed",
            color: "red",
        },
        Feature::Insights => ActivityTemplate {
            icon: "📈",
            text: "Trend insights generated",
            color: "orange",
        },
        Feature::Summary => ActivityTemplate {
            icon: "📝",
            text: "Article summarized",
            color: "teal",
        },
    }
}

fn waiting_item() -> ActivityItem {
    ActivityItem {
        icon: "⏳".to_string(),
        text: "System ready, waiting for activity...".to_string(),
        time: "Just now".to_string(),
        color: "gray".to_string(),
    }
}

#[derive(Clone)]
pub struct DashboardService {
    repo: ActivityLogRepository,
}

impl DashboardService {
    pub fn new(repo: ActivityLogRepository) -> Self {
        Self { repo }
    }

    /// All-time counters. Read failures degrade to zeros.
    pub async fn stats(&self) -> DashboardStats {
        match self.load_stats().await {
            Ok(stats) => stats,
            Err(e) => {
                warn!("Failed to load dashboard stats: {}", e);
                DashboardStats {
                    system_status: "Degraded".to_string(),
                    analyzed_posts: 0,
                    posts_trend: "+0 sentiment checks".to_string(),
                    content_curated: 0,
                    feeds_generated: 0,
                    threats_blocked: 0,
                }
            }
        }
    }

    async fn load_stats(&self) -> Result<DashboardStats, DatabaseError> {
        let total = self.repo.count_all().await?;
        let counts = self.repo.count_by_feature().await?;
        let count = |feature: Feature| counts.get(&feature).copied().unwrap_or(0);

        Ok(DashboardStats {
            system_status: "Operational".to_string(),
            analyzed_posts: total,
            posts_trend: format!("+{} sentiment checks", count(Feature::Sentiment)),
            content_curated: count(Feature::Summary) + count(Feature::Translate),
            feeds_generated: count(Feature::Insights),
            threats_blocked: count(Feature::Safety),
        })
    }

    pub async fn performance(&self) -> Vec<FeatureUsage> {
        self.performance_at(Utc::now()).await
    }

    /// Share of the last 24 hours' calls per feature, as whole percentages
    pub async fn performance_at(&self, now: DateTime<Utc>) -> Vec<FeatureUsage> {
        let counts = self
            .repo
            .count_by_feature_since(now - Duration::hours(WINDOW_HOURS))
            .await
            .unwrap_or_else(|e| {
                warn!("Failed to load feature usage: {}", e);
                HashMap::new()
            });

        usage_breakdown(&counts)
    }

    pub async fn activity(&self) -> Vec<ActivityItem> {
        self.activity_at(Utc::now()).await
    }

    /// Up to five recent items, at most two per feature
    pub async fn activity_at(&self, now: DateTime<Utc>) -> Vec<ActivityItem> {
        let recent = self
            .repo
            .recent_since(now - Duration::hours(WINDOW_HOURS), RECENT_SCAN_LIMIT)
            .await
            .unwrap_or_else(|e| {
                warn!("Failed to load recent activity: {}", e);
                Vec::new()
            });

        activity_feed(&recent, now)
    }
}

/// Each share is rounded to the nearest whole percent, so the total can land
/// a point above or below 100
pub fn usage_breakdown(counts: &HashMap<Feature, i64>) -> Vec<FeatureUsage> {
    let total: i64 = Feature::ALL
        .iter()
        .map(|f| counts.get(f).copied().unwrap_or(0))
        .sum();

    Feature::ALL
        .iter()
        .map(|feature| {
            let count = counts.get(feature).copied().unwrap_or(0);
            let usage = if total == 0 {
                0
            } else {
                (count as f64 * 100.0 / total as f64).round() as u32
            };
            FeatureUsage {
                name: display_name(*feature).to_string(),
                usage,
            }
        })
        .collect()
}

/// `logs` must be newest first
pub fn activity_feed(logs: &[ActivityLog], now: DateTime<Utc>) -> Vec<ActivityItem> {
    let mut per_feature: HashMap<Feature, usize> = HashMap::new();
    let mut feed = Vec::with_capacity(MAX_FEED_ITEMS);

    for log in logs {
        if feed.len() >= MAX_FEED_ITEMS {
            break;
        }

        let seen = per_feature.entry(log.feature).or_insert(0);
        if *seen >= MAX_PER_FEATURE {
            continue;
        }
        *seen += 1;

        let template = template(log.feature);
        feed.push(ActivityItem {
            icon: template.icon.to_string(),
            text: template.text.to_string(),
            time: relative_time(log.timestamp, now),
            color: template.color.to_string(),
        });
    }

    if feed.is_empty() {
        feed.push(waiting_item());
    }
    feed
}

pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    if elapsed < Duration::minutes(1) {
        "Just now".to_string()
    } else if elapsed < Duration::hours(1) {
        format!("{}m ago", elapsed.num_minutes())
    } else {
        format!("{}h ago", elapsed.num_hours())
    }
}
