use std::collections::HashMap;

use sqlx::PgPool;

use crate::dto::answer_dto::{SubmitAnswersRequest, TestAnswerResponse};
use crate::error::{Error, Result};
use crate::models::question::Question;
use crate::models::test::Test;
use crate::models::test_answer::{TestAnswer, TestAnswerDetail};
use crate::services::scoring_service::ScoringService;

#[derive(Clone)]
pub struct AnswerService {
    pool: PgPool,
}

impl AnswerService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Records one attempt with a detail row per question, all in one transaction.
    ///
    /// The attempt number is read then written without locking. Two racing
    /// submissions for the same (user, test) collide on the unique constraint
    /// and the loser fails with a conflict; nothing is retried.
    pub async fn submit(
        &self,
        user_id: i64,
        test: &Test,
        questions: &[Question],
        request: &SubmitAnswersRequest,
    ) -> Result<TestAnswerResponse> {
        if !test.is_published() {
            return Err(Error::Unprocessable("This test is not open for answers".to_string()));
        }
        let (min, max) = test
            .score_bounds()
            .ok_or_else(|| Error::Unprocessable("This test has no score range".to_string()))?;
        let scored = score_answers(questions, request, min, max)?;

        let mut tx = self.pool.begin().await?;

        let current_max: Option<i32> = sqlx::query_scalar(
            "SELECT MAX(count) FROM test_answers WHERE user_id = $1 AND test_id = $2",
        )
        .bind(user_id)
        .bind(test.id)
        .fetch_one(&mut *tx)
        .await?;
        let count = ScoringService::next_attempt_count(current_max);

        let answer = sqlx::query_as::<_, TestAnswer>(
            r#"
            INSERT INTO test_answers (user_id, test_id, count, "timestamp")
            VALUES ($1, $2, $3, NOW())
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(test.id)
        .bind(count)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match Error::from(e) {
            Error::Conflict(_) => Error::Conflict(
                "Another submission for this test is in progress. Please try again.".to_string(),
            ),
            other => other,
        })?;

        let mut details = Vec::with_capacity(scored.len());
        for (question_id, score) in scored {
            let detail = sqlx::query_as::<_, TestAnswerDetail>(
                r#"
                INSERT INTO test_answer_details (test_answer_id, question_id, score)
                VALUES ($1, $2, $3)
                RETURNING id, test_answer_id, question_id, score
                "#,
            )
            .bind(answer.id)
            .bind(question_id)
            .bind(score)
            .fetch_one(&mut *tx)
            .await?;
            details.push(detail);
        }

        tx.commit().await?;
        tracing::info!(
            test_id = test.id,
            user_id,
            count,
            answers = details.len(),
            "test answer submitted"
        );

        Ok(TestAnswerResponse::new(answer, details))
    }

    /// The user's attempts at a test in attempt order, with details and averages.
    pub async fn list_for_user(&self, user_id: i64, test_id: i64) -> Result<Vec<TestAnswerResponse>> {
        let answers = sqlx::query_as::<_, TestAnswer>(
            r#"
            SELECT * FROM test_answers
            WHERE user_id = $1 AND test_id = $2
            ORDER BY count
            "#,
        )
        .bind(user_id)
        .bind(test_id)
        .fetch_all(&self.pool)
        .await?;

        if answers.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = answers.iter().map(|a| a.id).collect();
        let details = sqlx::query_as::<_, TestAnswerDetail>(
            r#"
            SELECT id, test_answer_id, question_id, score
            FROM test_answer_details
            WHERE test_answer_id = ANY($1)
            ORDER BY test_answer_id, question_id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_answer: HashMap<i64, Vec<TestAnswerDetail>> = HashMap::new();
        for detail in details {
            by_answer.entry(detail.test_answer_id).or_default().push(detail);
        }

        Ok(answers
            .into_iter()
            .map(|answer| {
                let details = by_answer.remove(&answer.id).unwrap_or_default();
                TestAnswerResponse::new(answer, details)
            })
            .collect())
    }
}

/// Validates every raw answer and converts it to the stored score.
/// Returns `(question_id, stored_score)` in question order.
pub fn score_answers(
    questions: &[Question],
    request: &SubmitAnswersRequest,
    min: i32,
    max: i32,
) -> Result<Vec<(i64, i32)>> {
    let mut missing = Vec::new();
    let mut scored = Vec::with_capacity(questions.len());

    for question in questions {
        let Some(raw) = request.raw_score(question.id) else {
            missing.push(question.id.to_string());
            continue;
        };
        ScoringService::validate_raw_score(question.id, raw, min, max)?;
        scored.push((
            question.id,
            ScoringService::stored_score(raw, question.is_reversed_score, min, max),
        ));
    }

    if !missing.is_empty() {
        return Err(Error::Unprocessable(format!(
            "Please answer every question (missing: {})",
            missing.join(", ")
        )));
    }
    Ok(scored)
}
