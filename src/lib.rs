pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::services::{
    answer_service::AnswerService, auth_service::AuthService,
    extraction_service::ExtractionService, question_service::QuestionService,
    test_service::TestService,
};
use reqwest::Client;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub auth_service: AuthService,
    pub test_service: TestService,
    pub question_service: QuestionService,
    pub answer_service: AnswerService,
    pub extraction_service: ExtractionService,
}

impl AppState {
    pub fn new(pool: PgPool) -> crate::error::Result<Self> {
        let config = crate::config::get_config();
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()?;

        let auth_service = AuthService::new(pool.clone());
        let test_service = TestService::new(pool.clone());
        let question_service = QuestionService::new(pool.clone());
        let answer_service = AnswerService::new(pool.clone());
        let extraction_service = ExtractionService::new(
            config.openai_api_key.clone(),
            config.openai_model.clone(),
            config.max_extraction_chunks,
            http_client,
        );

        Ok(Self {
            pool,
            auth_service,
            test_service,
            question_service,
            answer_service,
            extraction_service,
        })
    }
}
