use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QuestionParams {
    #[validate(length(min = 1, message = "Question text cannot be empty"))]
    pub question_text: String,
    #[serde(rename = "isReversedScore", default)]
    pub is_reversed_score: bool,
}

/// `{ "question": { ... } }` as sent by the editor.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct QuestionPayload {
    #[validate(nested)]
    pub question: QuestionParams,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateQuestionParams {
    #[validate(length(min = 1, message = "Question text cannot be empty"))]
    pub question_text: Option<String>,
    #[serde(rename = "isReversedScore")]
    pub is_reversed_score: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateQuestionPayload {
    #[validate(nested)]
    pub question: UpdateQuestionParams,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BulkQuestionPayload {
    #[validate(length(min = 1, message = "At least one question is required"), nested)]
    pub questions: Vec<QuestionParams>,
}

/// Extracted, not yet persisted question suggestions.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionDraftsResponse {
    pub questions: Vec<QuestionParams>,
}
