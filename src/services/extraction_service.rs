use std::collections::HashSet;
use std::time::Duration;

use reqwest::Client;
use serde_json::Value as JsonValue;

use crate::dto::question_dto::QuestionParams;
use crate::error::{Error, Result};
use crate::utils::text_splitter::{split_text, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};

const SYSTEM_PROMPT: &str = r#"You read excerpts of psychology papers that define self-report questionnaires.
Extract every Likert-scale item you can find in the excerpt, verbatim, in its original language.
Mark an item as reversed when it is negatively keyed (the paper says "reverse", "(R)" or similar).
Return a JSON object: {"questions": [{"question_text": "...", "isReversedScore": false}]}.
Return {"questions": []} when the excerpt contains no items. Do not invent items."#;

/// Suggests questionnaire items from the text of a paper via the OpenAI chat API.
#[derive(Clone)]
pub struct ExtractionService {
    client: Client,
    api_key: Option<String>,
    model: String,
    max_chunks: usize,
}

impl ExtractionService {
    pub fn new(api_key: Option<String>, model: String, max_chunks: usize, client: Client) -> Self {
        Self {
            client,
            api_key,
            model,
            max_chunks: max_chunks.max(1),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// Splits the text, queries the model chunk by chunk and merges the drafts.
    pub async fn extract_questions(&self, text: &str) -> Result<Vec<QuestionParams>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Unavailable("Question extraction is not configured".to_string()))?;

        let chunks = split_text(text, " ", DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP);
        if chunks.is_empty() {
            return Err(Error::Unprocessable("No text to extract questions from".to_string()));
        }
        let total = chunks.len();
        tracing::info!(chunks = total, used = total.min(self.max_chunks), "extracting questions");

        let mut drafts = Vec::new();
        for chunk in chunks.into_iter().take(self.max_chunks) {
            let payload = serde_json::json!({
                "model": self.model,
                "messages": [
                    {"role": "system", "content": SYSTEM_PROMPT},
                    {"role": "user", "content": chunk}
                ],
                "response_format": { "type": "json_object" },
                "temperature": 0.2
            });
            let response = self.chat_openai(api_key, payload).await?;
            drafts.extend(parse_drafts(&response));
        }

        Ok(dedupe_drafts(drafts))
    }

    async fn chat_openai(&self, api_key: &str, payload: JsonValue) -> Result<JsonValue> {
        let res = self
            .client
            .post("https://api.openai.com/v1/chat/completions")
            .bearer_auth(api_key)
            .json(&payload)
            .timeout(Duration::from_secs(120))
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            tracing::error!(%status, "OpenAI request failed");
            return Err(anyhow::anyhow!("OpenAI API Error {}: {}", status, text).into());
        }

        let body: JsonValue = res.json().await?;

        body.get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .and_then(|s| serde_json::from_str(s).ok())
            .ok_or_else(|| anyhow::anyhow!("Invalid OpenAI response format").into())
    }
}

/// Reads `{"questions": [...]}` (or a bare array) leniently, skipping malformed items.
pub fn parse_drafts(raw: &JsonValue) -> Vec<QuestionParams> {
    let items = raw
        .get("questions")
        .and_then(|q| q.as_array())
        .or_else(|| raw.as_array())
        .cloned()
        .unwrap_or_default();

    items
        .iter()
        .filter_map(|item| {
            let text = item
                .get("question_text")
                .or_else(|| item.get("question"))
                .and_then(|t| t.as_str())?
                .trim();
            if text.is_empty() {
                return None;
            }
            let reversed = item
                .get("isReversedScore")
                .or_else(|| item.get("is_reversed_score"))
                .and_then(|r| r.as_bool())
                .unwrap_or(false);
            Some(QuestionParams {
                question_text: text.to_string(),
                is_reversed_score: reversed,
            })
        })
        .collect()
}

/// Drops repeats produced by overlapping chunks, keeping first occurrences.
pub fn dedupe_drafts(drafts: Vec<QuestionParams>) -> Vec<QuestionParams> {
    let mut seen = HashSet::new();
    drafts
        .into_iter()
        .filter(|d| seen.insert(d.question_text.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_model_output_leniently() {
        let raw = json!({
            "questions": [
                {"question_text": "I am the life of the party.", "isReversedScore": false},
                {"question": "I don't talk a lot.", "is_reversed_score": true},
                {"question_text": "   "},
                {"isReversedScore": true},
                "not an object"
            ]
        });
        let drafts = parse_drafts(&raw);
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].question_text, "I am the life of the party.");
        assert!(!drafts[0].is_reversed_score);
        assert!(drafts[1].is_reversed_score);
    }

    #[test]
    fn accepts_bare_arrays() {
        let drafts = parse_drafts(&json!([{"question_text": "I worry."}]));
        assert_eq!(drafts.len(), 1);
        assert!(parse_drafts(&json!({"unexpected": true})).is_empty());
    }

    #[test]
    fn overlapping_chunks_do_not_duplicate_items() {
        let drafts = vec![
            QuestionParams { question_text: "I worry a lot.".into(), is_reversed_score: false },
            QuestionParams { question_text: "I  worry a LOT.".into(), is_reversed_score: false },
            QuestionParams { question_text: "I relax.".into(), is_reversed_score: true },
        ];
        let unique = dedupe_drafts(drafts);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[1].question_text, "I relax.");
    }

    #[tokio::test]
    async fn missing_api_key_is_unavailable() {
        let service = ExtractionService::new(None, "gpt-4o-mini".into(), 4, Client::new());
        assert!(!service.is_enabled());
        let err = service.extract_questions("some text").await.unwrap_err();
        assert!(matches!(err, Error::Unavailable(_)));
    }
}
