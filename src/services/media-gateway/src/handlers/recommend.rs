use axum::{body::Bytes, extract::State, Json};
use mediamind_database::Feature;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::parse_body;
use crate::config::RecommendMode;
use crate::extract::{extract, Extraction, Shape};
use crate::prompts;
use crate::services::catalog::{self, Article};
use crate::state::AppState;

pub const DEFAULT_INTEREST: &str = "General News";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RecommendRequest {
    pub user_interests: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub recommended_articles: Vec<Article>,
}

/// One article as the model writes it in generate mode
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GeneratedArticle {
    title: String,
    category: String,
    source: String,
    time: String,
    snippet: String,
    image_prompt: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GeneratedArticles {
    articles: Vec<GeneratedArticle>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CatalogSelection {
    selected_ids: Vec<u64>,
}

/// Blank interests are dropped; nothing left means general news
pub fn normalize_interests(interests: Vec<String>) -> Vec<String> {
    let interests: Vec<String> = interests
        .into_iter()
        .map(|interest| interest.trim().to_string())
        .filter(|interest| !interest.is_empty())
        .collect();

    if interests.is_empty() {
        vec![DEFAULT_INTEREST.to_string()]
    } else {
        interests
    }
}

/// POST /feature-2/recommend
pub async fn recommend(State(state): State<AppState>, body: Bytes) -> Json<RecommendResponse> {
    let request: RecommendRequest = parse_body(&body);
    let interests = normalize_interests(request.user_interests);
    let input = interests.join(", ");

    let mode = state.config.recommend_mode;
    let prompt = match mode {
        RecommendMode::Generate => prompts::recommend_generate(&interests),
        RecommendMode::Catalog => prompts::recommend_catalog(&interests),
    };

    let raw = match state.llm.generate(state.primary_model(), &prompt).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Recommendation failed upstream, serving catalog picks: {}", e);
            state.activity.record_failure(Feature::Recommend, &input).await;
            return Json(RecommendResponse {
                recommended_articles: catalog::default_recommendations(),
            });
        }
    };

    let articles = match extract(&raw, Shape::Recommend) {
        Extraction::Parsed(value) => match mode {
            RecommendMode::Generate => generated_articles(value),
            RecommendMode::Catalog => selected_articles(value),
        },
        Extraction::Fallback(_) => Vec::new(),
    };

    let response = RecommendResponse {
        recommended_articles: if articles.is_empty() {
            debug!("No usable recommendations in model reply, serving catalog picks");
            catalog::default_recommendations()
        } else {
            articles
        },
    };

    state.activity.record(Feature::Recommend, &input, &response).await;
    Json(response)
}

/// Number generated articles from 1 and attach their image URLs
fn generated_articles(value: Value) -> Vec<Article> {
    let generated: GeneratedArticles = serde_json::from_value(value).unwrap_or_default();

    generated
        .articles
        .into_iter()
        .filter(|article| !article.title.trim().is_empty())
        .enumerate()
        .map(|(index, article)| Article {
            id: index as u64 + 1,
            image: catalog::image_url(&article.image_prompt),
            title: article.title,
            category: article.category,
            source: article.source,
            time: article.time,
            snippet: article.snippet,
            image_prompt: article.image_prompt,
        })
        .collect()
}

fn selected_articles(value: Value) -> Vec<Article> {
    let selection: CatalogSelection = serde_json::from_value(value).unwrap_or_default();
    catalog::select(&selection.selected_ids)
}
