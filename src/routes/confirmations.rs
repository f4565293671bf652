use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect},
    Json,
};
use validator::Validate;

use crate::config::get_config;
use crate::dto::auth_dto::{AuthEnvelope, ConfirmationRequest};
use crate::AppState;

pub const CONFIRMATIONS_PATH: &str = "/api/v1/user/confirmations";

/// Link a new user follows to confirm the account.
pub fn confirmation_link(token: &str) -> String {
    format!("{}?confirmation_token={}", CONFIRMATIONS_PATH, token)
}

#[axum::debug_handler]
pub async fn confirm_user(
    State(state): State<AppState>,
    Json(payload): Json<ConfirmationRequest>,
) -> crate::error::Result<impl IntoResponse> {
    payload.validate()?;
    let user = state
        .auth_service
        .confirm_user(payload.confirmation_token.trim())
        .await?;
    Ok(Json(AuthEnvelope::success(user)))
}

/// Confirms from the emailed link and sends the browser to the sign-in page.
#[axum::debug_handler]
pub async fn confirm_user_link(
    State(state): State<AppState>,
    Query(query): Query<ConfirmationRequest>,
) -> crate::error::Result<impl IntoResponse> {
    query.validate()?;
    let user = state
        .auth_service
        .confirm_user(query.confirmation_token.trim())
        .await?;
    tracing::info!(user_id = user.id, "user confirmed via link");
    let target = format!(
        "{}?account_confirmation_success=true",
        get_config().confirm_success_url
    );
    Ok(Redirect::to(&target))
}
