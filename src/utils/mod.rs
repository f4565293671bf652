pub mod crypto;
pub mod pdf;
pub mod text_splitter;
pub mod time;
pub mod token;
pub mod validation;
