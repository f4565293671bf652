use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::dto::test_dto::{PaginationMeta, TestStats, UpdateTestParams};
use crate::error::{Error, Result};
use crate::models::test::{Test, TestStatus};
use crate::services::scoring_service::ScoringService;

pub const PER_PAGE: i64 = 10;

/// Column values of a test after an update has been merged and checked.
#[derive(Debug, Clone, PartialEq)]
pub struct TestFields {
    pub title: Option<String>,
    pub description: Option<String>,
    pub site_url: Option<String>,
    pub improvement_suggestion: Option<String>,
    pub min_score: Option<i32>,
    pub max_score: Option<i32>,
    pub avg_score: Option<Decimal>,
    pub status: TestStatus,
}

#[derive(Clone)]
pub struct TestService {
    pool: PgPool,
}

impl TestService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Published tests, newest first.
    pub async fn list_published(&self, page: i64) -> Result<(Vec<Test>, PaginationMeta)> {
        let (page, offset) = page_window(page);

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tests WHERE status = $1")
            .bind(TestStatus::Published)
            .fetch_one(&self.pool)
            .await?;

        let tests = sqlx::query_as::<_, Test>(
            r#"
            SELECT * FROM tests
            WHERE status = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(TestStatus::Published)
        .bind(PER_PAGE)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((
            tests,
            PaginationMeta {
                current_page: page,
                total_pages: total_pages(total, PER_PAGE),
                total_count: total,
            },
        ))
    }

    pub async fn get_test(&self, test_id: i64) -> Result<Test> {
        let test = sqlx::query_as::<_, Test>("SELECT * FROM tests WHERE id = $1")
            .bind(test_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(test)
    }

    pub async fn get_published(&self, test_id: i64) -> Result<Test> {
        let test = self.get_test(test_id).await?;
        if !test.is_published() {
            return Err(Error::NotFound("Test not found".to_string()));
        }
        Ok(test)
    }

    /// Loads a test and checks that `admin_id` owns it.
    pub async fn get_owned(&self, test_id: i64, admin_id: i64, action: &str) -> Result<Test> {
        let test = self.get_test(test_id).await?;
        if test.admin_id != admin_id {
            return Err(Error::Forbidden(format!(
                "You do not have permission to {}",
                action
            )));
        }
        Ok(test)
    }

    /// Returns the admin's unsaved placeholder, creating it when absent.
    /// The partial unique index on `(admin_id) WHERE status = 10` makes a
    /// concurrent second insert a no-op, after which the existing row is read.
    pub async fn find_or_create_unsaved(&self, admin_id: i64) -> Result<Test> {
        let created = sqlx::query_as::<_, Test>(
            r#"
            INSERT INTO tests (admin_id, status)
            VALUES ($1, $2)
            ON CONFLICT (admin_id) WHERE status = 10 DO NOTHING
            RETURNING *
            "#,
        )
        .bind(admin_id)
        .bind(TestStatus::Unsaved)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(test) = created {
            tracing::info!(test_id = test.id, admin_id, "unsaved test created");
            return Ok(test);
        }

        let existing = sqlx::query_as::<_, Test>(
            "SELECT * FROM tests WHERE admin_id = $1 AND status = $2",
        )
        .bind(admin_id)
        .bind(TestStatus::Unsaved)
        .fetch_one(&self.pool)
        .await?;
        tracing::debug!(test_id = existing.id, admin_id, "reusing unsaved test");
        Ok(existing)
    }

    /// The admin's saved (draft or published) tests, newest first.
    pub async fn list_for_admin(&self, admin_id: i64) -> Result<Vec<Test>> {
        let tests = sqlx::query_as::<_, Test>(
            r#"
            SELECT * FROM tests
            WHERE admin_id = $1 AND status <> $2
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(admin_id)
        .bind(TestStatus::Unsaved)
        .fetch_all(&self.pool)
        .await?;
        Ok(tests)
    }

    /// Tests the user has submitted at least one answer for.
    pub async fn list_taken_by_user(&self, user_id: i64) -> Result<Vec<Test>> {
        let tests = sqlx::query_as::<_, Test>(
            r#"
            SELECT t.* FROM tests t
            WHERE EXISTS (
                SELECT 1 FROM test_answers ta
                WHERE ta.test_id = t.id AND ta.user_id = $1
            )
            ORDER BY t.created_at DESC, t.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tests)
    }

    pub async fn update_test(&self, current: &Test, params: UpdateTestParams) -> Result<Test> {
        let fields = resolve_update(current, params)?;

        let test = sqlx::query_as::<_, Test>(
            r#"
            UPDATE tests
            SET
                title = $1,
                description = $2,
                site_url = $3,
                improvement_suggestion = $4,
                min_score = $5,
                max_score = $6,
                avg_score = $7,
                status = $8,
                updated_at = NOW()
            WHERE id = $9
            RETURNING *
            "#,
        )
        .bind(fields.title)
        .bind(fields.description)
        .bind(fields.site_url)
        .bind(fields.improvement_suggestion)
        .bind(fields.min_score)
        .bind(fields.max_score)
        .bind(fields.avg_score)
        .bind(fields.status)
        .bind(current.id)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(test_id = test.id, status = ?test.status, "test updated");
        Ok(test)
    }

    pub async fn delete_test(&self, test_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tests WHERE id = $1")
            .bind(test_id)
            .execute(&self.pool)
            .await?;
        tracing::info!(test_id, "test deleted");
        Ok(result.rows_affected() > 0)
    }

    /// Submission count, overall average and histogram for a test.
    pub async fn stats(&self, test: &Test) -> Result<TestStats> {
        let rows: Vec<(i64, Option<i32>)> = sqlx::query_as(
            r#"
            SELECT ta.id, d.score
            FROM test_answers ta
            LEFT JOIN test_answer_details d ON d.test_answer_id = ta.id
            WHERE ta.test_id = $1
            ORDER BY ta.id
            "#,
        )
        .bind(test.id)
        .fetch_all(&self.pool)
        .await?;

        let averages = submission_averages(&rows);
        let distribution = match test.score_bounds() {
            Some((min, max)) => ScoringService::score_distribution(&averages, min, max),
            None => Vec::new(),
        };

        Ok(TestStats {
            test_id: test.id,
            submissions: averages.len() as i64,
            overall_average: ScoringService::overall_average(&averages),
            reference_average: test.avg_score,
            distribution,
        })
    }
}

/// Clamps a requested page into `1..=i64::MAX / PER_PAGE` and returns it
/// with its row offset.
pub fn page_window(page: i64) -> (i64, i64) {
    let page = page.clamp(1, i64::MAX / PER_PAGE);
    (page, (page - 1) * PER_PAGE)
}

pub fn total_pages(total: i64, per_page: i64) -> i64 {
    if per_page <= 0 {
        return 1;
    }
    (total + per_page - 1) / per_page
}

/// Averages per submission from `(answer_id, score)` rows ordered by answer id.
/// An answer with no details appears once with a `None` score.
fn submission_averages(rows: &[(i64, Option<i32>)]) -> Vec<Decimal> {
    let mut averages = Vec::new();
    let mut current: Option<i64> = None;
    let mut scores: Vec<i32> = Vec::new();

    for (answer_id, score) in rows {
        if current != Some(*answer_id) {
            if current.is_some() {
                averages.push(ScoringService::average(&scores));
                scores.clear();
            }
            current = Some(*answer_id);
        }
        if let Some(score) = score {
            scores.push(*score);
        }
    }
    if current.is_some() {
        averages.push(ScoringService::average(&scores));
    }
    averages
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Merges `params` over `current` and checks the status rules:
/// a saved test needs a title, a published one also needs a description and
/// valid score bounds. A test can never go back to unsaved.
pub fn resolve_update(current: &Test, params: UpdateTestParams) -> Result<TestFields> {
    let status = match params.status {
        Some(TestStatus::Unsaved) => {
            return Err(Error::Unprocessable(
                "Status can only be set to draft or published".to_string(),
            ))
        }
        Some(status) => status,
        None if current.status == TestStatus::Unsaved => TestStatus::Draft,
        None => current.status,
    };

    let merge = |new: Option<String>, old: &Option<String>| match new {
        Some(v) => blank_to_none(Some(v)),
        None => old.clone(),
    };

    let fields = TestFields {
        title: merge(params.title, &current.title),
        description: merge(params.description, &current.description),
        site_url: merge(params.site_url, &current.site_url),
        improvement_suggestion: merge(params.improvement_suggestion, &current.improvement_suggestion),
        min_score: params.min_score.unwrap_or(current.min_score),
        max_score: params.max_score.unwrap_or(current.max_score),
        avg_score: params.avg_score.unwrap_or(current.avg_score),
        status,
    };

    let mut errors = Vec::new();
    if fields.title.is_none() {
        errors.push("Title can't be blank");
    }
    if let (Some(min), Some(max)) = (fields.min_score, fields.max_score) {
        if let Err(message) = ScoringService::validate_bounds(min, max) {
            errors.push(message);
        }
    }
    if status == TestStatus::Published {
        if fields.description.is_none() {
            errors.push("A test without a description cannot be published");
        }
        if fields.min_score.is_none() || fields.max_score.is_none() {
            errors.push("Score range is required to publish");
        }
    }
    if let (Some(avg), Some(min), Some(max)) = (fields.avg_score, fields.min_score, fields.max_score) {
        if avg < Decimal::from(min) || avg > Decimal::from(max) {
            errors.push("Average score must lie within the score range");
        }
    }

    if !errors.is_empty() {
        return Err(Error::Unprocessable(errors.join(", ")));
    }
    Ok(fields)
}
