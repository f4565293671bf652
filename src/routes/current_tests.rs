use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::dto::test_dto::{TestResponse, UpdateTestPayload};
use crate::middleware::auth::{CurrentAdmin, CurrentUser};
use crate::utils::time::now;
use crate::AppState;

/// Opens the editor on the admin's unsaved test, creating it on first use.
#[axum::debug_handler]
pub async fn create_test(
    State(state): State<AppState>,
    current: CurrentAdmin,
) -> crate::error::Result<impl IntoResponse> {
    let test = state
        .test_service
        .find_or_create_unsaved(current.admin.id)
        .await?;
    Ok(Json(TestResponse::new(test, now())))
}

#[axum::debug_handler]
pub async fn admin_index(
    State(state): State<AppState>,
    current: CurrentAdmin,
) -> crate::error::Result<impl IntoResponse> {
    let tests = state.test_service.list_for_admin(current.admin.id).await?;
    Ok(Json(TestResponse::many(tests, now())))
}

#[axum::debug_handler]
pub async fn get_test(
    State(state): State<AppState>,
    current: CurrentAdmin,
    Path(id): Path<i64>,
) -> crate::error::Result<impl IntoResponse> {
    let test = state
        .test_service
        .get_owned(id, current.admin.id, "view this test")
        .await?;
    Ok(Json(TestResponse::new(test, now())))
}

#[axum::debug_handler]
pub async fn update_test(
    State(state): State<AppState>,
    current: CurrentAdmin,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateTestPayload>,
) -> crate::error::Result<impl IntoResponse> {
    payload.validate()?;
    let test = state
        .test_service
        .get_owned(id, current.admin.id, "edit this test")
        .await?;
    let updated = state.test_service.update_test(&test, payload.test).await?;
    Ok(Json(TestResponse::new(updated, now())))
}

#[axum::debug_handler]
pub async fn delete_test(
    State(state): State<AppState>,
    current: CurrentAdmin,
    Path(id): Path<i64>,
) -> crate::error::Result<impl IntoResponse> {
    let test = state
        .test_service
        .get_owned(id, current.admin.id, "delete this test")
        .await?;
    state.test_service.delete_test(test.id).await?;
    Ok(Json(TestResponse::new(test, now())))
}

/// Tests the signed-in user has answered at least once.
#[axum::debug_handler]
pub async fn taken_tests(
    State(state): State<AppState>,
    current: CurrentUser,
) -> crate::error::Result<impl IntoResponse> {
    let tests = state.test_service.list_taken_by_user(current.user.id).await?;
    Ok(Json(TestResponse::many(tests, now())))
}

#[axum::debug_handler]
pub async fn test_stats(
    State(state): State<AppState>,
    current: CurrentAdmin,
    Path(id): Path<i64>,
) -> crate::error::Result<impl IntoResponse> {
    let test = state
        .test_service
        .get_owned(id, current.admin.id, "view statistics for this test")
        .await?;
    let stats = state.test_service.stats(&test).await?;
    Ok(Json(stats))
}
