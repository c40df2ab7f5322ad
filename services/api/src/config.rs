//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use chrono::Duration;
use secrecy::SecretString;
use std::net::SocketAddr;
use tracing::Level;

/// Signing secrets shorter than this are rejected at startup.
const MIN_SECRET_LEN: usize = 32;

/// Ten years. Keeps every `exp` claim well inside chrono's date range.
const MAX_TOKEN_TTL_HOURS: i64 = 10 * 365 * 24;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    /// A Postgres URL, or `memory://` for the in-process store.
    pub database_url: String,
    pub db_max_connections: u32,
    pub log_level: Level,
    pub jwt_secret: SecretString,
    pub token_ttl: Duration,
    pub cors_origin: String,
    pub chat_api_key: Option<String>,
    pub chat_api_base: String,
    pub chat_model: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server and Database Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:5000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingVar("DATABASE_URL".to_string()))?;

        let db_max_connections = parse_or("DB_MAX_CONNECTIONS", 10u32)?;
        if db_max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "DB_MAX_CONNECTIONS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Load Token Settings ---
        let jwt_secret = std::env::var("JWT_SECRET")
            .map_err(|_| ConfigError::MissingVar("JWT_SECRET".to_string()))?;
        if jwt_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::InvalidValue(
                "JWT_SECRET".to_string(),
                format!("must be at least {} bytes long", MIN_SECRET_LEN),
            ));
        }

        let token_ttl = token_ttl_from_hours(parse_or("TOKEN_TTL_HOURS", 720i64)?)?;

        let cors_origin = std::env::var("CORS_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        // --- Load Chat Companion Settings (the key is optional) ---
        let chat_api_key = std::env::var("CHAT_API_KEY").ok().filter(|k| !k.is_empty());
        let chat_api_base = std::env::var("CHAT_API_BASE")
            .unwrap_or_else(|_| "https://router.huggingface.co/v1".to_string());
        let chat_model = std::env::var("CHAT_MODEL")
            .unwrap_or_else(|_| "microsoft/DialoGPT-medium".to_string());

        Ok(Self {
            bind_address,
            database_url,
            db_max_connections,
            log_level,
            jwt_secret: SecretString::from(jwt_secret),
            token_ttl,
            cors_origin,
            chat_api_key,
            chat_api_base,
            chat_model,
        })
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database_url.starts_with("memory://")
    }
}

fn parse_or<T>(var: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(var) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(var.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

fn token_ttl_from_hours(hours: i64) -> Result<Duration, ConfigError> {
    if !(1..=MAX_TOKEN_TTL_HOURS).contains(&hours) {
        return Err(ConfigError::InvalidValue(
            "TOKEN_TTL_HOURS".to_string(),
            format!("must be between 1 and {}", MAX_TOKEN_TTL_HOURS),
        ));
    }
    Duration::try_hours(hours).ok_or_else(|| {
        ConfigError::InvalidValue("TOKEN_TTL_HOURS".to_string(), "out of range".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_ttl_accepts_sane_values() {
        assert_eq!(token_ttl_from_hours(720).unwrap(), Duration::days(30));
        assert_eq!(
            token_ttl_from_hours(MAX_TOKEN_TTL_HOURS).unwrap(),
            Duration::hours(MAX_TOKEN_TTL_HOURS)
        );
    }

    #[test]
    fn token_ttl_rejects_out_of_range_values() {
        for hours in [0, -5, MAX_TOKEN_TTL_HOURS + 1, 3_000_000_000, i64::MAX] {
            assert!(
                matches!(token_ttl_from_hours(hours), Err(ConfigError::InvalidValue(ref var, _)) if var == "TOKEN_TTL_HOURS"),
                "{} hours was accepted",
                hours
            );
        }
    }
}
