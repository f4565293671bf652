use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub db_max_connections: u32,
    /// Key for the HMAC digests of issued access tokens.
    pub token_secret: String,
    /// Signing key for confirmation tokens.
    pub jwt_secret: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub token_lifespan_hours: i64,
    pub max_clients: i64,
    pub auth_rps: u32,
    pub max_extraction_chunks: usize,
    pub require_confirmation: bool,
    pub confirm_success_url: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env_or("SERVER_ADDRESS", "0.0.0.0:3000"),
            database_url: get_env("DATABASE_URL")?,
            db_max_connections: get_env_parse_or("DB_MAX_CONNECTIONS", 20)?,
            token_secret: get_env("TOKEN_SECRET")?,
            jwt_secret: get_env("JWT_SECRET")?,
            openai_api_key: env::var("OPENAI_API_KEY").ok().filter(|k| !k.trim().is_empty()),
            openai_model: get_env_or("OPENAI_MODEL", "gpt-4o-mini"),
            token_lifespan_hours: get_env_parse_or("TOKEN_LIFESPAN_HOURS", 24 * 14)?,
            max_clients: get_env_parse_or("MAX_CLIENTS", 10)?,
            auth_rps: get_env_parse_or("AUTH_RPS", 20)?,
            max_extraction_chunks: get_env_parse_or("MAX_EXTRACTION_CHUNKS", 8)?,
            require_confirmation: get_env_parse_or("REQUIRE_CONFIRMATION", false)?,
            confirm_success_url: get_env_or(
                "CONFIRM_SUCCESS_URL",
                "http://localhost:8000/sign_in",
            ),
            log_format: match get_env_or("LOG_FORMAT", "pretty").to_ascii_lowercase().as_str() {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
