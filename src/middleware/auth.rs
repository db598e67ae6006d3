use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use crate::auth::{AuthError, TokenType};
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller, extracted from a valid, unrevoked access token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: i64,
    pub jti: String,
    pub fresh: bool,
    pub is_admin: bool,
    pub exp: i64,
}

impl AuthUser {
    pub fn require_fresh(&self) -> Result<(), AuthError> {
        if self.fresh {
            Ok(())
        } else {
            Err(AuthError::FreshTokenRequired)
        }
    }

    pub fn require_admin(&self) -> Result<(), AuthError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AuthError::AdminRequired)
        }
    }
}

/// Caller holding a valid, unrevoked refresh token
#[derive(Clone, Debug)]
pub struct RefreshUser(pub AuthUser);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        authenticate(&parts.headers, state, TokenType::Access).await
    }
}

#[async_trait]
impl FromRequestParts<AppState> for RefreshUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        authenticate(&parts.headers, state, TokenType::Refresh)
            .await
            .map(RefreshUser)
    }
}

async fn authenticate(
    headers: &HeaderMap,
    state: &AppState,
    expected: TokenType,
) -> Result<AuthUser, ApiError> {
    let token = extract_jwt_from_headers(headers)?;
    let claims = state.tokens.decode(&token, expected)?;

    if state.blocklist.is_revoked(&claims.jti).await {
        tracing::warn!("Rejected revoked token {} for user {}", claims.jti, claims.sub);
        return Err(AuthError::TokenRevoked.into());
    }

    let user_id = claims.user_id()?;
    tracing::debug!("Authenticated user {} with {:?} token", user_id, expected);

    Ok(AuthUser {
        user_id,
        jti: claims.jti,
        fresh: claims.fresh,
        is_admin: claims.is_admin,
        exp: claims.exp,
    })
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, AuthError> {
    let auth_header = headers.get(AUTHORIZATION).ok_or(AuthError::MissingToken)?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Invalid Authorization header format".to_string()))?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if token.trim().is_empty() => Err(AuthError::MissingToken),
        Some(token) => Ok(token.trim().to_string()),
        None => Err(AuthError::InvalidToken(
            "Authorization header must use Bearer token format".to_string(),
        )),
    }
}
