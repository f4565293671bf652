use sqlx::PgPool;

use crate::dto::question_dto::{QuestionParams, UpdateQuestionParams};
use crate::error::Result;
use crate::models::question::Question;

#[derive(Clone)]
pub struct QuestionService {
    pool: PgPool,
}

impl QuestionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_test(&self, test_id: i64) -> Result<Vec<Question>> {
        let questions = sqlx::query_as::<_, Question>(
            "SELECT * FROM questions WHERE test_id = $1 ORDER BY id",
        )
        .bind(test_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(questions)
    }

    /// Looks a question up within its test, so ids from another test are not found.
    pub async fn get_in_test(&self, test_id: i64, question_id: i64) -> Result<Question> {
        let question = sqlx::query_as::<_, Question>(
            "SELECT * FROM questions WHERE id = $1 AND test_id = $2",
        )
        .bind(question_id)
        .bind(test_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(question)
    }

    pub async fn create(&self, test_id: i64, params: QuestionParams) -> Result<Question> {
        let question = sqlx::query_as::<_, Question>(
            r#"
            INSERT INTO questions (test_id, question_text, is_reversed_score)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(test_id)
        .bind(params.question_text.trim())
        .bind(params.is_reversed_score)
        .fetch_one(&self.pool)
        .await?;
        tracing::debug!(test_id, question_id = question.id, "question created");
        Ok(question)
    }

    /// Inserts all questions or none.
    pub async fn bulk_create(&self, test_id: i64, params: Vec<QuestionParams>) -> Result<Vec<Question>> {
        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(params.len());
        for q in params {
            let question = sqlx::query_as::<_, Question>(
                r#"
                INSERT INTO questions (test_id, question_text, is_reversed_score)
                VALUES ($1, $2, $3)
                RETURNING *
                "#,
            )
            .bind(test_id)
            .bind(q.question_text.trim())
            .bind(q.is_reversed_score)
            .fetch_one(&mut *tx)
            .await?;
            created.push(question);
        }
        tx.commit().await?;
        tracing::info!(test_id, count = created.len(), "questions bulk created");
        Ok(created)
    }

    pub async fn update(&self, question: &Question, params: UpdateQuestionParams) -> Result<Question> {
        let text = params
            .question_text
            .map(|t| t.trim().to_string())
            .unwrap_or_else(|| question.question_text.clone());
        let reversed = params.is_reversed_score.unwrap_or(question.is_reversed_score);

        let updated = sqlx::query_as::<_, Question>(
            r#"
            UPDATE questions
            SET question_text = $1, is_reversed_score = $2, updated_at = NOW()
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(text)
        .bind(reversed)
        .bind(question.id)
        .fetch_one(&self.pool)
        .await?;
        Ok(updated)
    }

    pub async fn delete(&self, question: &Question) -> Result<()> {
        sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(question.id)
            .execute(&self.pool)
            .await?;
        tracing::debug!(test_id = question.test_id, question_id = question.id, "question deleted");
        Ok(())
    }
}
