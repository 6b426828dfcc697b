//! Settings resolved once at startup from the environment (and `.env`).

use std::env;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} must be a valid number, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_pool_size: u32,
    pub host: String,
    pub port: u16,
    pub auth: AuthConfig,
}

/// Settings of the fixed-credential token issuer.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub username: String,
    pub password: String,
    pub token_ttl_secs: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "development-secret".to_string(),
            username: "admin".to_string(),
            password: "123456".to_string(),
            token_ttl_secs: 3600,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable source; `from_env` passes the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AuthConfig::default();
        Ok(Self {
            database_url: lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            database_pool_size: parse_or(&lookup, "DATABASE_POOL_SIZE", 10)?,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 3000)?,
            auth: AuthConfig {
                jwt_secret: lookup("JWT_SECRET").unwrap_or(defaults.jwt_secret),
                username: lookup("AUTH_USERNAME").unwrap_or(defaults.username),
                password: lookup("AUTH_PASSWORD").unwrap_or(defaults.password),
                token_ttl_secs: parse_or(&lookup, "TOKEN_TTL_SECS", defaults.token_ttl_secs)?,
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
        None => Ok(default),
    }
}
