use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::dto::answer_dto::SubmitAnswersRequest;
use crate::middleware::auth::CurrentUser;
use crate::AppState;

#[axum::debug_handler]
pub async fn list_test_answers(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(test_id): Path<i64>,
) -> crate::error::Result<impl IntoResponse> {
    let test = state.test_service.get_test(test_id).await?;
    let answers = state
        .answer_service
        .list_for_user(current.user.id, test.id)
        .await?;
    Ok(Json(answers))
}

#[axum::debug_handler]
pub async fn submit_test_answer(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(test_id): Path<i64>,
    Json(payload): Json<SubmitAnswersRequest>,
) -> crate::error::Result<impl IntoResponse> {
    let test = state.test_service.get_test(test_id).await?;
    let questions = state.question_service.list_for_test(test.id).await?;
    let answer = state
        .answer_service
        .submit(current.user.id, &test, &questions, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(answer)))
}
