use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Researcher account that owns tests.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Admin {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub encrypted_password: String,
    pub name: Option<String>,
    pub nickname: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// End-user account that takes tests.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub encrypted_password: String,
    pub name: Option<String>,
    pub nickname: Option<String>,
    pub image: Option<String>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The two kinds of accounts that can hold auth tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    User,
    Admin,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::User => "user",
            Resource::Admin => "admin",
        }
    }

    pub fn table(&self) -> &'static str {
        match self {
            Resource::User => "users",
            Resource::Admin => "admins",
        }
    }
}
