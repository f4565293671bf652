use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::dto::question_dto::{BulkQuestionPayload, QuestionPayload, UpdateQuestionPayload};
use crate::middleware::auth::CurrentAdmin;
use crate::AppState;

const EDIT_ACTION: &str = "edit questions of this test";

#[axum::debug_handler]
pub async fn create_question(
    State(state): State<AppState>,
    current: CurrentAdmin,
    Path(test_id): Path<i64>,
    Json(payload): Json<QuestionPayload>,
) -> crate::error::Result<impl IntoResponse> {
    payload.validate()?;
    let test = state
        .test_service
        .get_owned(test_id, current.admin.id, EDIT_ACTION)
        .await?;
    let question = state
        .question_service
        .create(test.id, payload.question)
        .await?;
    Ok((StatusCode::CREATED, Json(question)))
}

#[axum::debug_handler]
pub async fn bulk_create_questions(
    State(state): State<AppState>,
    current: CurrentAdmin,
    Path(test_id): Path<i64>,
    Json(payload): Json<BulkQuestionPayload>,
) -> crate::error::Result<impl IntoResponse> {
    payload.validate()?;
    let test = state
        .test_service
        .get_owned(test_id, current.admin.id, EDIT_ACTION)
        .await?;
    let questions = state
        .question_service
        .bulk_create(test.id, payload.questions)
        .await?;
    Ok((StatusCode::CREATED, Json(questions)))
}

#[axum::debug_handler]
pub async fn update_question(
    State(state): State<AppState>,
    current: CurrentAdmin,
    Path((test_id, id)): Path<(i64, i64)>,
    Json(payload): Json<UpdateQuestionPayload>,
) -> crate::error::Result<impl IntoResponse> {
    payload.validate()?;
    let test = state
        .test_service
        .get_owned(test_id, current.admin.id, EDIT_ACTION)
        .await?;
    let question = state.question_service.get_in_test(test.id, id).await?;
    let updated = state
        .question_service
        .update(&question, payload.question)
        .await?;
    Ok(Json(updated))
}

#[axum::debug_handler]
pub async fn delete_question(
    State(state): State<AppState>,
    current: CurrentAdmin,
    Path((test_id, id)): Path<(i64, i64)>,
) -> crate::error::Result<impl IntoResponse> {
    let test = state
        .test_service
        .get_owned(test_id, current.admin.id, EDIT_ACTION)
        .await?;
    let question = state.question_service.get_in_test(test.id, id).await?;
    state.question_service.delete(&question).await?;
    Ok(Json(question))
}
