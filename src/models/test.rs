use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Lifecycle of a test. Stored as the integer codes 10/20/30.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[repr(i16)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    Unsaved = 10,
    Draft = 20,
    Published = 30,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Test {
    pub id: i64,
    pub admin_id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub site_url: Option<String>,
    pub improvement_suggestion: Option<String>,
    pub min_score: Option<i32>,
    pub max_score: Option<i32>,
    #[serde(with = "rust_decimal::serde::float_option", default)]
    pub avg_score: Option<Decimal>,
    pub status: TestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Test {
    pub fn is_published(&self) -> bool {
        self.status == TestStatus::Published
    }

    /// Both score bounds, when the admin has filled them in.
    pub fn score_bounds(&self) -> Option<(i32, i32)> {
        match (self.min_score, self.max_score) {
            (Some(min), Some(max)) if min < max => Some((min, max)),
            _ => None,
        }
    }
}
