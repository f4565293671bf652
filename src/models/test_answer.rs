use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One attempt by a user at a test.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TestAnswer {
    pub id: i64,
    pub user_id: i64,
    pub test_id: i64,
    pub count: i32,
    pub timestamp: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Stored (already reversed where needed) score for one question of an attempt.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TestAnswerDetail {
    pub id: i64,
    pub test_answer_id: i64,
    pub question_id: i64,
    pub score: i32,
}
