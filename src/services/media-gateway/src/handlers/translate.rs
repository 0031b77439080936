use axum::{body::Bytes, extract::State, Json};
use mediamind_database::Feature;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::parse_body;
use crate::extract::{find_json_object, strip_code_fences};
use crate::prompts;
use crate::llm::UpstreamError;
use crate::retry::RetryOutcome;
use crate::state::AppState;

pub const DEFAULT_TARGET_LANGUAGE: &str = "English";

pub const QUOTA_EXHAUSTED_MESSAGE: &str =
    "Error: Quota exceeded or service unavailable. Please retry in a bit or upgrade your Gemini plan.";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TranslateRequest {
    pub text: Option<String>,
    pub target_language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub translated_text: String,
}

impl TranslateResponse {
    fn new(translated_text: impl Into<String>) -> Self {
        Self {
            translated_text: translated_text.into(),
        }
    }
}

/// POST /feature-3/translate
///
/// The only feature that retries: quota exhaustion is retried against each
/// configured model in turn before the fixed error message is returned. A reply
/// without a readable `translated_text` moves on to the next model.
pub async fn translate(State(state): State<AppState>, body: Bytes) -> Json<TranslateResponse> {
    let request: TranslateRequest = parse_body(&body);
    let text = request.text.unwrap_or_default();
    let target_language = request
        .target_language
        .map(|language| language.trim().to_string())
        .filter(|language| !language.is_empty())
        .unwrap_or_else(|| DEFAULT_TARGET_LANGUAGE.to_string());

    if text.trim().is_empty() {
        let response = TranslateResponse::new("");
        state.activity.record(Feature::Translate, &text, &response).await;
        return Json(response);
    }

    let prompt = prompts::translate(&text, &target_language);
    match state
        .translation_retry
        .run(state.llm.as_ref(), &prompt, decode_translation)
        .await
    {
        RetryOutcome::Success {
            model,
            value: translated,
        } => {
            info!("Translated to {} with {}", target_language, model);
            let response = TranslateResponse::new(translated);
            state.activity.record(Feature::Translate, &text, &response).await;
            Json(response)
        }
        RetryOutcome::Exhausted { last_error } => {
            match &last_error {
                Some(e) => error!("Translation failed on every model: {}", e),
                None => error!("Translation failed: no models configured"),
            }
            state.activity.record_failure(Feature::Translate, &text).await;
            Json(TranslateResponse::new(QUOTA_EXHAUSTED_MESSAGE))
        }
    }
}

/// Pull `translated_text` out of a model reply
pub fn decode_translation(raw: String) -> Result<String, UpstreamError> {
    find_json_object(strip_code_fences(&raw))
        .and_then(|value| value["translated_text"].as_str().map(str::to_string))
        .ok_or_else(|| {
            UpstreamError::MalformedResponse("reply has no readable translated_text".to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_translation() {
        assert_eq!(
            decode_translation("```json\n{\"translated_text\": \"Hola\"}\n```".to_string()),
            Ok("Hola".to_string())
        );
        assert!(decode_translation("Hola mundo".to_string()).is_err());
        assert!(decode_translation(r#"{"text": "Hola"}"#.to_string()).is_err());
        assert!(decode_translation(r#"{"translated_text": 7}"#.to_string()).is_err());
    }
}
