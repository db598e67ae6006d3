// POST /login

use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::{verify_password, AuthError};
use crate::error::ApiError;
use crate::handlers::utils::FieldErrors;
use crate::middleware::{ApiJson, ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
}

/// Exchange credentials for a fresh access token and a refresh token
#[utoipa::path(
    post, path = "/login", tag = "Users", operation_id = "login",
    request_body = LoginRequest,
    responses((status = 200, description = "Fresh access token and refresh token", body = LoginResponse),
        (status = 401, description = "Invalid credentials"))
)]
pub async fn login_post(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let mut errors = FieldErrors::new();
    let username = errors.require("username", payload.username);
    let password = errors.require("password", payload.password);
    errors.into_result()?;

    let (Some(username), Some(password)) = (username, password) else {
        return Err(ApiError::bad_request("username and password are required"));
    };

    let user = state.users().find_by_username(username.trim()).await?;
    let hash = match &user {
        Some(user) => user.password.clone(),
        None => state.decoy_hash.to_string(),
    };
    let verified = verify_password(password, hash).await?;

    let user = match user {
        Some(user) if verified => user,
        Some(user) => {
            warn!("Login failed: wrong password for user {}", user.id);
            return Err(AuthError::InvalidCredentials.into());
        }
        None => {
            warn!("Login failed: unknown username '{}'", username.trim());
            return Err(AuthError::InvalidCredentials.into());
        }
    };

    let access_token = state.tokens.issue_access_token(user.id, true)?;
    let refresh_token = state.tokens.issue_refresh_token(user.id)?;
    info!("User {} logged in", user.id);

    Ok(ApiResponse::success(LoginResponse {
        access_token,
        refresh_token,
    }))
}
