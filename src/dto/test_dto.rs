use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::models::test::{Test, TestStatus};
use crate::services::scoring_service::ScoreBucket;
use crate::utils::time::from_today;

/// Test as rendered to clients, with its relative age.
#[derive(Debug, Clone, Serialize)]
pub struct TestResponse {
    #[serde(flatten)]
    pub test: Test,
    pub from_today: String,
}

impl TestResponse {
    pub fn new(test: Test, now: DateTime<Utc>) -> Self {
        let from_today = from_today(test.created_at, now);
        Self { test, from_today }
    }

    pub fn many(tests: Vec<Test>, now: DateTime<Utc>) -> Vec<Self> {
        tests.into_iter().map(|t| Self::new(t, now)).collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaginationMeta {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaginatedTests {
    pub tests: Vec<TestResponse>,
    pub meta: PaginationMeta,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListTestsQuery {
    pub page: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTestParams {
    #[validate(length(max = 255, message = "Title is too long"))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(custom(function = "crate::utils::validation::http_url"))]
    pub site_url: Option<String>,
    pub improvement_suggestion: Option<String>,
    /// Outer `None` keeps the stored value; `Some(None)` clears it.
    #[serde(default, deserialize_with = "nullable")]
    pub min_score: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    pub max_score: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable_float")]
    pub avg_score: Option<Option<Decimal>>,
    pub status: Option<TestStatus>,
}

fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn nullable_float<'de, D>(deserializer: D) -> Result<Option<Option<Decimal>>, D::Error>
where
    D: Deserializer<'de>,
{
    rust_decimal::serde::float_option::deserialize(deserializer).map(Some)
}

/// `{ "test": { ... } }` as sent by the editor.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTestPayload {
    #[validate(nested)]
    pub test: UpdateTestParams,
}

#[derive(Debug, Clone, Serialize)]
pub struct TestStats {
    pub test_id: i64,
    pub submissions: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub overall_average: Decimal,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub reference_average: Option<Decimal>,
    pub distribution: Vec<ScoreBucket>,
}
