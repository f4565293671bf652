use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::auth_dto::{IssuedToken, SignUpRequest};
use crate::error::{Error, Result};
use crate::models::account::{Admin, Resource, User};
use crate::models::auth_token::AuthToken;
use crate::utils::crypto::{hash_password, verify_password};
use crate::utils::token::{digest_token, digests_match, generate_access_token};

const ACCESS_TOKEN_LENGTH: usize = 32;
const CONFIRMATION_PURPOSE: &str = "confirmation";
const CONFIRMATION_TTL_HOURS: i64 = 24;

/// The three headers a signed-in client presents on every request.
#[derive(Debug, Clone)]
pub struct TokenCredentials {
    pub access_token: String,
    pub client: String,
    pub uid: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ConfirmationClaims {
    sub: i64,
    purpose: String,
    exp: usize,
}

#[derive(sqlx::FromRow)]
struct StoredCredentials {
    id: i64,
    encrypted_password: String,
    confirmed: bool,
}

#[derive(Clone)]
pub struct AuthService {
    pool: PgPool,
    token_secret: String,
    jwt_secret: String,
    token_lifespan: Duration,
    max_clients: i64,
    require_confirmation: bool,
}

impl AuthService {
    pub fn new(pool: PgPool) -> Self {
        let config = crate::config::get_config();
        Self {
            pool,
            token_secret: config.token_secret.clone(),
            jwt_secret: config.jwt_secret.clone(),
            token_lifespan: Duration::hours(config.token_lifespan_hours),
            max_clients: config.max_clients.max(1),
            require_confirmation: config.require_confirmation,
        }
    }

    /// Overrides `REQUIRE_CONFIRMATION` for this service.
    pub fn with_required_confirmation(mut self, required: bool) -> Self {
        self.require_confirmation = required;
        self
    }

    /// Creates an unconfirmed user and returns it with its confirmation token.
    pub async fn register_user(&self, payload: SignUpRequest) -> Result<(User, String)> {
        let email = normalize_email(&payload.email);
        let encrypted = hash_password(&payload.password)?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, encrypted_password, name, nickname, image)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&email)
        .bind(encrypted)
        .bind(payload.name)
        .bind(payload.nickname)
        .bind(payload.image)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| duplicate_email(e.into()))?;

        let token = self.confirmation_token(user.id)?;
        tracing::info!(user_id = user.id, "user registered");
        Ok((user, token))
    }

    pub async fn register_admin(&self, payload: SignUpRequest) -> Result<Admin> {
        let email = normalize_email(&payload.email);
        let encrypted = hash_password(&payload.password)?;

        let admin = sqlx::query_as::<_, Admin>(
            r#"
            INSERT INTO admins (email, encrypted_password, name, nickname, image)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&email)
        .bind(encrypted)
        .bind(payload.name)
        .bind(payload.nickname)
        .bind(payload.image)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| duplicate_email(e.into()))?;

        tracing::info!(admin_id = admin.id, "admin registered");
        Ok(admin)
    }

    /// Checks the password and issues a new client token. Returns the account id.
    pub async fn sign_in(
        &self,
        resource: Resource,
        email: &str,
        password: &str,
    ) -> Result<(i64, IssuedToken)> {
        let email = normalize_email(email);
        let confirmed_expr = match resource {
            Resource::User => "confirmed_at IS NOT NULL",
            Resource::Admin => "TRUE",
        };
        let sql = format!(
            "SELECT id, encrypted_password, {} AS confirmed FROM {} WHERE email = $1",
            confirmed_expr,
            resource.table()
        );
        let stored = sqlx::query_as::<_, StoredCredentials>(&sql)
            .bind(&email)
            .fetch_optional(&self.pool)
            .await?;

        let invalid = || Error::Unauthorized("Invalid login credentials. Please try again.".to_string());
        let Some(stored) = stored else {
            return Err(invalid());
        };
        if !verify_password(password, &stored.encrypted_password)? {
            tracing::warn!(resource = resource.as_str(), "sign in rejected");
            return Err(invalid());
        }
        if self.require_confirmation && !stored.confirmed {
            return Err(Error::Unauthorized(format!(
                "A confirmation email was sent to your account at '{}'.",
                email
            )));
        }

        let issued = self.issue_token(resource, stored.id, &email).await?;
        Ok((stored.id, issued))
    }

    /// Stores the digest of a new access token under a fresh client id and
    /// evicts the oldest clients beyond the per-account limit.
    pub async fn issue_token(&self, resource: Resource, resource_id: i64, uid: &str) -> Result<IssuedToken> {
        let access_token = generate_access_token(ACCESS_TOKEN_LENGTH);
        let client = Uuid::new_v4().simple().to_string();
        let expires_at = Utc::now() + self.token_lifespan;

        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r#"
            INSERT INTO auth_tokens (resource, resource_id, client, token_digest, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(resource.as_str())
        .bind(resource_id)
        .bind(&client)
        .bind(digest_token(&self.token_secret, &access_token))
        .bind(expires_at)
        .execute(&mut *tx)
        .await?;

        let evicted = sqlx::query(
            r#"
            DELETE FROM auth_tokens
            WHERE resource = $1 AND resource_id = $2
              AND id NOT IN (
                SELECT id FROM auth_tokens
                WHERE resource = $1 AND resource_id = $2
                ORDER BY created_at DESC, id DESC
                LIMIT $3
              )
            "#,
        )
        .bind(resource.as_str())
        .bind(resource_id)
        .bind(self.max_clients)
        .execute(&mut *tx)
        .await?
        .rows_affected();
        tx.commit().await?;

        if evicted > 0 {
            tracing::debug!(resource = resource.as_str(), resource_id, evicted, "evicted old clients");
        }

        Ok(IssuedToken {
            access_token,
            client,
            uid: uid.to_string(),
            expiry: expires_at.timestamp(),
        })
    }

    pub async fn authenticate_user(&self, creds: &TokenCredentials) -> Result<User> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(normalize_email(&creds.uid))
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(unauthenticated)?;
        self.verify_token(Resource::User, user.id, creds).await?;
        Ok(user)
    }

    pub async fn authenticate_admin(&self, creds: &TokenCredentials) -> Result<Admin> {
        let admin = sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE email = $1")
            .bind(normalize_email(&creds.uid))
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(unauthenticated)?;
        self.verify_token(Resource::Admin, admin.id, creds).await?;
        Ok(admin)
    }

    async fn verify_token(&self, resource: Resource, resource_id: i64, creds: &TokenCredentials) -> Result<()> {
        let stored = sqlx::query_as::<_, AuthToken>(
            r#"
            SELECT * FROM auth_tokens
            WHERE resource = $1 AND resource_id = $2 AND client = $3
            "#,
        )
        .bind(resource.as_str())
        .bind(resource_id)
        .bind(&creds.client)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(unauthenticated)?;

        let presented = digest_token(&self.token_secret, &creds.access_token);
        if !digests_match(&stored.token_digest, &presented) || stored.expires_at <= Utc::now() {
            return Err(unauthenticated());
        }
        Ok(())
    }

    /// Revokes the presented client. The caller has already been authenticated.
    pub async fn sign_out(&self, resource: Resource, resource_id: i64, client: &str) -> Result<()> {
        let result = sqlx::query(
            "DELETE FROM auth_tokens WHERE resource = $1 AND resource_id = $2 AND client = $3",
        )
        .bind(resource.as_str())
        .bind(resource_id)
        .bind(client)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("User was not found or was not logged in.".to_string()));
        }
        Ok(())
    }

    pub async fn get_user(&self, id: i64) -> Result<User> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn get_admin(&self, id: i64) -> Result<Admin> {
        let admin = sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(admin)
    }

    pub fn confirmation_token(&self, user_id: i64) -> Result<String> {
        let exp = (Utc::now() + Duration::hours(CONFIRMATION_TTL_HOURS)).timestamp();
        let claims = ConfirmationClaims {
            sub: user_id,
            purpose: CONFIRMATION_PURPOSE.to_string(),
            exp: exp as usize,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| Error::Internal(format!("Failed to sign confirmation token: {}", e)))
    }

    /// Marks the user behind a confirmation token as confirmed. Confirming twice is harmless.
    pub async fn confirm_user(&self, token: &str) -> Result<User> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        let data = decode::<ConfirmationClaims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|_| Error::Unprocessable("Confirmation token is invalid".to_string()))?;

        if data.claims.purpose != CONFIRMATION_PURPOSE {
            return Err(Error::Unprocessable("Confirmation token is invalid".to_string()));
        }

        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET confirmed_at = COALESCE(confirmed_at, NOW()), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(data.claims.sub)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(user_id = user.id, "user confirmed");
        Ok(user)
    }

    pub async fn prune_expired_tokens(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM auth_tokens WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn unauthenticated() -> Error {
    Error::Unauthorized("You need to sign in or sign up before continuing.".to_string())
}

fn duplicate_email(err: Error) -> Error {
    match err {
        Error::Conflict(_) => Error::Unprocessable("Email has already been taken".to_string()),
        other => other,
    }
}
