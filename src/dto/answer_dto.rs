use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

use crate::models::test_answer::{TestAnswer, TestAnswerDetail};

/// Submission body: raw Likert answers keyed by question id.
/// Extra fields (`user_id`, `test_id`) sent by clients are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitAnswersRequest {
    #[serde(default)]
    pub scores: HashMap<String, JsonValue>,
}

impl SubmitAnswersRequest {
    /// Raw answer for a question; accepts JSON numbers and numeric strings.
    pub fn raw_score(&self, question_id: i64) -> Option<i32> {
        match self.scores.get(&question_id.to_string())? {
            JsonValue::Number(n) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
            JsonValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TestAnswerResponse {
    pub id: i64,
    pub user_id: i64,
    pub test_id: i64,
    pub count: i32,
    pub timestamp: DateTime<Utc>,
    #[serde(with = "rust_decimal::serde::float")]
    pub average: Decimal,
    pub test_answer_details: Vec<TestAnswerDetail>,
}

impl TestAnswerResponse {
    pub fn new(answer: TestAnswer, details: Vec<TestAnswerDetail>) -> Self {
        let scores: Vec<i32> = details.iter().map(|d| d.score).collect();
        Self {
            id: answer.id,
            user_id: answer.user_id,
            test_id: answer.test_id,
            count: answer.count,
            timestamp: answer.timestamp,
            average: crate::services::scoring_service::ScoringService::average(&scores),
            test_answer_details: details,
        }
    }
}
