pub mod answer_service;
pub mod auth_service;
pub mod extraction_service;
pub mod question_service;
pub mod scoring_service;
pub mod test_service;
pub mod token_cleanup;
