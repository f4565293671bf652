use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, HeaderName, HeaderValue},
};

use crate::dto::auth_dto::IssuedToken;
use crate::error::{Error, Result};
use crate::models::account::{Admin, User};
use crate::services::auth_service::TokenCredentials;
use crate::AppState;

pub const ACCESS_TOKEN_HEADER: &str = "access-token";
pub const CLIENT_HEADER: &str = "client";
pub const UID_HEADER: &str = "uid";
pub const EXPIRY_HEADER: &str = "expiry";
pub const TOKEN_TYPE_HEADER: &str = "token-type";

/// Headers exposed to browsers so clients can store their credentials.
pub const EXPOSED_AUTH_HEADERS: [&str; 5] = [
    ACCESS_TOKEN_HEADER,
    CLIENT_HEADER,
    UID_HEADER,
    EXPIRY_HEADER,
    TOKEN_TYPE_HEADER,
];

impl TokenCredentials {
    pub fn from_headers(headers: &HeaderMap) -> Result<Self> {
        let read = |name: &str| -> Result<String> {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .ok_or_else(|| {
                    Error::Unauthorized("You need to sign in or sign up before continuing.".to_string())
                })
        };
        Ok(Self {
            access_token: read(ACCESS_TOKEN_HEADER)?,
            client: read(CLIENT_HEADER)?,
            uid: read(UID_HEADER)?,
        })
    }
}

/// Response headers carrying a freshly issued client token.
pub fn token_headers(token: &IssuedToken) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    let pairs = [
        (ACCESS_TOKEN_HEADER, token.access_token.clone()),
        (CLIENT_HEADER, token.client.clone()),
        (UID_HEADER, token.uid.clone()),
        (EXPIRY_HEADER, token.expiry.to_string()),
        (TOKEN_TYPE_HEADER, "Bearer".to_string()),
    ];
    for (name, value) in pairs {
        let value = HeaderValue::from_str(&value)
            .map_err(|e| Error::Internal(format!("Invalid {} header: {}", name, e)))?;
        headers.insert(HeaderName::from_static(name), value);
    }
    Ok(headers)
}

/// A request authenticated as an end user.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub client: String,
}

/// A request authenticated as a researcher.
#[derive(Debug, Clone)]
pub struct CurrentAdmin {
    pub admin: Admin,
    pub client: String,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let creds = TokenCredentials::from_headers(&parts.headers)?;
        let user = state.auth_service.authenticate_user(&creds).await?;
        Ok(Self {
            user,
            client: creds.client,
        })
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentAdmin {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let creds = TokenCredentials::from_headers(&parts.headers)?;
        let admin = state.auth_service.authenticate_admin(&creds).await?;
        Ok(Self {
            admin,
            client: creds.client,
        })
    }
}
