use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: i64,
    pub test_id: i64,
    pub question_text: String,
    /// Negatively worded item; raw answers are flipped within the test's range.
    #[serde(rename = "isReversedScore")]
    pub is_reversed_score: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
