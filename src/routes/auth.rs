use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;
use validator::Validate;

use crate::dto::auth_dto::{AuthEnvelope, SignInRequest, SignUpRequest};
use crate::middleware::auth::{token_headers, CurrentAdmin, CurrentUser};
use crate::models::account::Resource;
use crate::routes::confirmations::confirmation_link;
use crate::AppState;

#[axum::debug_handler]
pub async fn user_sign_up(
    State(state): State<AppState>,
    Json(payload): Json<SignUpRequest>,
) -> crate::error::Result<impl IntoResponse> {
    payload.validate()?;
    let (user, token) = state.auth_service.register_user(payload).await?;

    // No mailer: the link is written to the log for the operator to forward.
    let link = confirmation_link(&token);
    tracing::info!(user_id = user.id, email = %user.email, %link, "confirmation link issued");

    Ok(Json(AuthEnvelope::success(user)))
}

#[axum::debug_handler]
pub async fn admin_sign_up(
    State(state): State<AppState>,
    Json(payload): Json<SignUpRequest>,
) -> crate::error::Result<impl IntoResponse> {
    payload.validate()?;
    let admin = state.auth_service.register_admin(payload).await?;
    Ok(Json(AuthEnvelope::success(admin)))
}

#[axum::debug_handler]
pub async fn user_sign_in(
    State(state): State<AppState>,
    Json(payload): Json<SignInRequest>,
) -> crate::error::Result<impl IntoResponse> {
    payload.validate()?;
    let (id, issued) = state
        .auth_service
        .sign_in(Resource::User, &payload.email, &payload.password)
        .await?;
    let user = state.auth_service.get_user(id).await?;
    tracing::info!(user_id = id, client = %issued.client, "user signed in");
    Ok((token_headers(&issued)?, Json(json!({ "data": user }))))
}

#[axum::debug_handler]
pub async fn admin_sign_in(
    State(state): State<AppState>,
    Json(payload): Json<SignInRequest>,
) -> crate::error::Result<impl IntoResponse> {
    payload.validate()?;
    let (id, issued) = state
        .auth_service
        .sign_in(Resource::Admin, &payload.email, &payload.password)
        .await?;
    let admin = state.auth_service.get_admin(id).await?;
    tracing::info!(admin_id = id, client = %issued.client, "admin signed in");
    Ok((token_headers(&issued)?, Json(json!({ "data": admin }))))
}

#[axum::debug_handler]
pub async fn user_sign_out(
    State(state): State<AppState>,
    current: CurrentUser,
) -> crate::error::Result<impl IntoResponse> {
    state
        .auth_service
        .sign_out(Resource::User, current.user.id, &current.client)
        .await?;
    Ok(Json(json!({ "success": true })))
}

#[axum::debug_handler]
pub async fn admin_sign_out(
    State(state): State<AppState>,
    current: CurrentAdmin,
) -> crate::error::Result<impl IntoResponse> {
    state
        .auth_service
        .sign_out(Resource::Admin, current.admin.id, &current.client)
        .await?;
    Ok(Json(json!({ "success": true })))
}

#[axum::debug_handler(state = AppState)]
pub async fn user_validate_token(current: CurrentUser) -> crate::error::Result<impl IntoResponse> {
    Ok(Json(AuthEnvelope::success(current.user)))
}

#[axum::debug_handler(state = AppState)]
pub async fn admin_validate_token(current: CurrentAdmin) -> crate::error::Result<impl IntoResponse> {
    Ok(Json(AuthEnvelope::success(current.admin)))
}
