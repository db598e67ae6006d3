pub mod blocklist;
pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;

pub use blocklist::TokenBlocklist;
pub use password::{decoy_hash, hash_password, verify_password};

/// Seconds of clock skew tolerated when checking `exp` and `nbf`
pub const CLOCK_LEEWAY_SECS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub jti: String,
    #[serde(rename = "type")]
    pub token_type: TokenType,
    pub fresh: bool,
    pub is_admin: bool,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

impl Claims {
    pub fn user_id(&self) -> Result<i64, AuthError> {
        self.sub
            .parse()
            .map_err(|_| AuthError::InvalidToken("Token subject is not a user id".to_string()))
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Request does not contain an access token.")]
    MissingToken,

    #[error("{0}")]
    InvalidToken(String),

    #[error("The token has expired.")]
    TokenExpired,

    #[error("The token has been revoked.")]
    TokenRevoked,

    #[error("The token is not fresh.")]
    FreshTokenRequired,

    #[error("Admin privilege required.")]
    AdminRequired,

    #[error("Invalid credentials.")]
    InvalidCredentials,

    #[error("JWT secret not configured")]
    MissingSecret,

    #[error("Token lifetime out of range: {0}")]
    InvalidLifetime(&'static str),

    #[error("JWT generation error: {0}")]
    TokenGeneration(#[from] jsonwebtoken::errors::Error),

    #[error("Password hashing error: {0}")]
    Hashing(String),
}

/// Issues and validates HS256 access/refresh tokens
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
    admin_user_ids: Vec<i64>,
}

impl TokenService {
    pub fn new(security: &SecurityConfig) -> Result<Self, AuthError> {
        if security.jwt_secret.is_empty() {
            return Err(AuthError::MissingSecret);
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(security.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(security.jwt_secret.as_bytes()),
            access_ttl: Duration::try_minutes(security.access_token_expiry_minutes)
                .ok_or(AuthError::InvalidLifetime("JWT_ACCESS_EXPIRY_MINUTES"))?,
            refresh_ttl: Duration::try_days(security.refresh_token_expiry_days)
                .ok_or(AuthError::InvalidLifetime("JWT_REFRESH_EXPIRY_DAYS"))?,
            admin_user_ids: security.admin_user_ids.clone(),
        })
    }

    pub fn issue_access_token(&self, user_id: i64, fresh: bool) -> Result<String, AuthError> {
        self.issue(user_id, TokenType::Access, fresh, self.access_ttl)
    }

    pub fn issue_refresh_token(&self, user_id: i64) -> Result<String, AuthError> {
        self.issue(user_id, TokenType::Refresh, false, self.refresh_ttl)
    }

    fn issue(
        &self,
        user_id: i64,
        token_type: TokenType,
        fresh: bool,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        let now = Utc::now();
        let expires_at = now.checked_add_signed(ttl).ok_or(AuthError::InvalidLifetime(
            match token_type {
                TokenType::Access => "JWT_ACCESS_EXPIRY_MINUTES",
                TokenType::Refresh => "JWT_REFRESH_EXPIRY_DAYS",
            },
        ))?;
        let claims = Claims {
            sub: user_id.to_string(),
            jti: Uuid::new_v4().to_string(),
            token_type,
            fresh,
            is_admin: self.admin_user_ids.contains(&user_id),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?)
    }

    /// Verify signature and expiry, then check the token is of the expected type
    pub fn decode(&self, token: &str, expected: TokenType) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = CLOCK_LEEWAY_SECS;
        validation.validate_nbf = true;

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken("Signature verification failed.".to_string()),
            })?
            .claims;

        if claims.token_type != expected {
            let message = match expected {
                TokenType::Access => "Only access tokens are allowed.",
                TokenType::Refresh => "Only refresh tokens are allowed.",
            };
            return Err(AuthError::InvalidToken(message.to_string()));
        }

        Ok(claims)
    }
}
