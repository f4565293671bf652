use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, max = 128, message = "Password must be 6 to 128 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Password confirmation does not match"))]
    pub password_confirmation: String,
    #[validate(length(min = 1, max = 100, message = "Name cannot be empty"))]
    pub name: Option<String>,
    pub nickname: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ConfirmationRequest {
    #[validate(length(min = 1, message = "Confirmation token cannot be empty"))]
    pub confirmation_token: String,
}

/// Body wrapper used by every auth endpoint: `{ "status": "success", "data": ... }`.
#[derive(Debug, Clone, Serialize)]
pub struct AuthEnvelope<T: Serialize> {
    pub status: &'static str,
    pub data: T,
}

impl<T: Serialize> AuthEnvelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: "success",
            data,
        }
    }
}

/// A freshly issued client token, echoed back in response headers.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub client: String,
    pub uid: String,
    pub expiry: i64,
}
