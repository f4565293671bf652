pub mod account;
pub mod auth_token;
pub mod question;
pub mod test;
pub mod test_answer;
