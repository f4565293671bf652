pub mod accounts;
pub mod auth;
pub mod confirmations;
pub mod current_tests;
pub mod health;
pub mod question_drafts;
pub mod questions;
pub mod test_answers;
pub mod tests;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::get_config;
use crate::middleware::cors::api_cors;
use crate::middleware::rate_limit::{new_rps_state, rps_middleware};
use crate::AppState;

const UPLOAD_BODY_LIMIT: usize = 20 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let config = get_config();

    let auth_api = Router::new()
        .route("/api/v1/auth", post(auth::user_sign_up))
        .route("/api/v1/auth/sign_in", post(auth::user_sign_in))
        .route("/api/v1/auth/sign_out", axum::routing::delete(auth::user_sign_out))
        .route("/api/v1/auth/validate_token", get(auth::user_validate_token))
        .route("/api/v1/admin/auth", post(auth::admin_sign_up))
        .route("/api/v1/admin/auth/sign_in", post(auth::admin_sign_in))
        .route(
            "/api/v1/admin/auth/sign_out",
            axum::routing::delete(auth::admin_sign_out),
        )
        .route(
            "/api/v1/admin/auth/validate_token",
            get(auth::admin_validate_token),
        )
        .route(
            confirmations::CONFIRMATIONS_PATH,
            get(confirmations::confirm_user_link).patch(confirmations::confirm_user),
        )
        .layer(axum::middleware::from_fn_with_state(
            new_rps_state(config.auth_rps),
            rps_middleware,
        ));

    let public_api = Router::new()
        .route("/api/v1/tests", get(tests::list_tests))
        .route("/api/v1/tests/:id", get(tests::get_test))
        .route("/api/v1/tests/:id/questions", get(tests::list_questions));

    let current_api = Router::new()
        .route("/api/v1/current/admin", get(accounts::current_admin))
        .route("/api/v1/current/user", get(accounts::current_user))
        .route(
            "/api/v1/current/tests",
            get(current_tests::taken_tests).post(current_tests::create_test),
        )
        .route(
            "/api/v1/current/tests/admin_index",
            get(current_tests::admin_index),
        )
        .route(
            "/api/v1/current/tests/:id",
            get(current_tests::get_test)
                .patch(current_tests::update_test)
                .delete(current_tests::delete_test),
        )
        .route("/api/v1/current/tests/:id/stats", get(current_tests::test_stats))
        .route(
            "/api/v1/current/tests/:id/questions",
            post(questions::create_question),
        )
        .route(
            "/api/v1/current/tests/:id/questions/:question_id",
            patch(questions::update_question).delete(questions::delete_question),
        )
        .route(
            "/api/v1/current/tests/:id/bulk_question_create",
            post(questions::bulk_create_questions),
        )
        .route(
            "/api/v1/current/tests/:id/test_answers",
            get(test_answers::list_test_answers).post(test_answers::submit_test_answer),
        )
        .route(
            "/api/v1/current/tests/:id/question_drafts",
            post(question_drafts::create_question_drafts)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        );

    Router::new()
        .route("/api/v1/health_check", get(health::health_check))
        .merge(auth_api)
        .merge(public_api)
        .merge(current_api)
        .with_state(state)
        .layer(api_cors())
        .layer(TraceLayer::new_for_http())
}
