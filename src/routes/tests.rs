use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};

use crate::dto::test_dto::{ListTestsQuery, PaginatedTests, TestResponse};
use crate::utils::time::now;
use crate::AppState;

#[axum::debug_handler]
pub async fn list_tests(
    State(state): State<AppState>,
    Query(query): Query<ListTestsQuery>,
) -> crate::error::Result<impl IntoResponse> {
    let page = query.page.unwrap_or(1).max(1);
    let (tests, meta) = state.test_service.list_published(page).await?;
    Ok(Json(PaginatedTests {
        tests: TestResponse::many(tests, now()),
        meta,
    }))
}

#[axum::debug_handler]
pub async fn get_test(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> crate::error::Result<impl IntoResponse> {
    let test = state.test_service.get_published(id).await?;
    Ok(Json(TestResponse::new(test, now())))
}

#[axum::debug_handler]
pub async fn list_questions(
    State(state): State<AppState>,
    Path(test_id): Path<i64>,
) -> crate::error::Result<impl IntoResponse> {
    let test = state.test_service.get_published(test_id).await?;
    let questions = state.question_service.list_for_test(test.id).await?;
    Ok(Json(questions))
}
