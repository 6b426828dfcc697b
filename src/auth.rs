//! Fixed-credential login issuing HS256 JSON Web Tokens.
//!
//! Order routes do not check these tokens; the issuer only hands them out.

use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AuthConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Failed to sign token: {0}")]
    Signing(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct TokenIssuer {
    config: AuthConfig,
}

impl TokenIssuer {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Returns a signed token if the credentials match the configured pair.
    pub fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        if username != self.config.username || password != self.config.password {
            return Err(AuthError::InvalidCredentials);
        }
        let iat = Utc::now().timestamp();
        let claims = Claims {
            user: username.to_string(),
            iat,
            exp: iat + self.config.token_ttl_secs,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::Signing(e.to_string()))
    }
}
