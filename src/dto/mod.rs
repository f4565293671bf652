pub mod answer_dto;
pub mod auth_dto;
pub mod question_dto;
pub mod test_dto;
