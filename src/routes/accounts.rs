use axum::{response::IntoResponse, Json};

use crate::middleware::auth::{CurrentAdmin, CurrentUser};
use crate::AppState;

#[axum::debug_handler(state = AppState)]
pub async fn current_admin(current: CurrentAdmin) -> crate::error::Result<impl IntoResponse> {
    Ok(Json(current.admin))
}

#[axum::debug_handler(state = AppState)]
pub async fn current_user(current: CurrentUser) -> crate::error::Result<impl IntoResponse> {
    Ok(Json(current.user))
}
