//! Prompt templates sent to the model, one per feature

use crate::services::catalog;

pub fn sentiment(text: &str) -> String {
    format!(
        "Analyze the sentiment of this text and respond in JSON format with exactly these fields:
        {{\"sentiment\": \"Positive/Negative/Neutral\", \"confidence\": \"XX%\", \"tone\": \"specific tone description\"}}

        Text: {}",
        text
    )
}

pub fn recommend_generate(interests: &[String]) -> String {
    format!(
        "Act as a news editor. The reader is interested in: {}.

        Write 3 short, current-sounding news headlines tailored to these interests.
        For each one give a category, a plausible source, a relative publish time,
        a one-sentence snippet and a short visual description for an illustration.

        Return JSON with this EXACT format:
        {{
            \"articles\": [
                {{\"title\": \"...\", \"category\": \"...\", \"source\": \"...\", \"time\": \"2h ago\", \"snippet\": \"...\", \"image_prompt\": \"...\"}}
            ]
        }}
        Output ONLY Valid JSON.",
        interests.join(", ")
    )
}

pub fn recommend_catalog(interests: &[String]) -> String {
    format!(
        "Act as a Recommendation System.

        USER PROFILE (Interests): {}

        DATABASE OF ARTICLES:
        {}

        TASK:
        Select the top 3 articles from the database that match the user's interests best.
        If no direct match is found, pick the most popular/general ones.

        Return JSON with this EXACT format:
        {{
            \"selected_ids\": [101, 104, 110]
        }}
        Output ONLY Valid JSON.",
        interests.join(", "),
        catalog::listing()
    )
}

pub fn translate(text: &str, target_language: &str) -> String {
    format!(
        "Act as a professional translator.

        Input Text: \"{}\"
        Target Language: \"{}\"

        Task: Translate the input text accurately into the target language.
        Maintain the original tone and meaning.

        Return JSON with this EXACT format:
        {{
            \"translated_text\": \"Your translated text here\"
        }}
        Output ONLY Valid JSON.",
        text, target_language
    )
}

pub fn safety(text: &str) -> String {
    format!(
        "Analyze the following content for safety issues and credibility.

Respond ONLY in this exact JSON format (no markdown, no extra text):
{{\"status\": \"Safe|Unsafe\", \"type\": \"content_type\", \"confidence\": \"XX%\", \"issues\": [\"issue1\", \"issue2\"]}}

Where:
- status: Safe if content is appropriate, Unsafe if it contains hate speech, misinformation, or harmful content
- type: Brief description (e.g., \"Credible News\", \"Potential Misinformation\", \"Hate Speech\", \"Cyberbullying\", \"Spam\")
- confidence: Confidence level (e.g., \"95%\", \"85%\", \"70%\")
- issues: Array of detected issues (empty if safe)

Content to analyze:
\"{}\"

Respond with JSON only.",
        text
    )
}

/// One-word verdict prompt used per item by batch safety
pub fn safety_quick(text: &str) -> String {
    format!(
        "Quick safety check - is this safe? Reply only: Safe/Unsafe

Content: \"{}\"

Reply: ",
        text
    )
}

pub fn insights(topic: &str) -> String {
    format!(
        "Analyze trending insights for: {}

        Return JSON with this EXACT format:
        {{
            \"trend_prediction\": \"Rising/Stable/Falling\",
            \"volume\": \"estimated mention volume, e.g. 1.2M\",
            \"sentiment_forecast\": \"one short sentence\",
            \"demographics\": [\"audience segment\"],
            \"chart_data\": [7 integers between 0 and 100, oldest first]
        }}
        Output ONLY Valid JSON.",
        topic
    )
}

pub fn summary(text: &str) -> String {
    format!(
        "Summarize this text in 2-3 sentences. Keep it concise and clear:

        {}",
        text
    )
}
