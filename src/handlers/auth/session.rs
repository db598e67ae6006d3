use axum::extract::State;
use serde::Serialize;
use tracing::info;

use crate::middleware::{ApiResponse, ApiResult, AuthUser, Message, RefreshUser};
use crate::state::AppState;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct RefreshResponse {
    pub access_token: String,
}

/// POST /refresh - issue a non-fresh access token from a refresh token
#[utoipa::path(
    post, path = "/refresh", tag = "Users", operation_id = "refresh",
    security(("bearer" = [])),
    responses((status = 200, description = "Non-fresh access token", body = RefreshResponse),
        (status = 401, description = "Missing, invalid or revoked refresh token"))
)]
pub async fn refresh(
    State(state): State<AppState>,
    RefreshUser(user): RefreshUser,
) -> ApiResult<RefreshResponse> {
    let access_token = state.tokens.issue_access_token(user.user_id, false)?;
    Ok(ApiResponse::success(RefreshResponse { access_token }))
}

/// POST /logout - revoke the access token used for this request
#[utoipa::path(
    post, path = "/logout", tag = "Users", operation_id = "logout",
    security(("bearer" = [])),
    responses((status = 200, description = "Token revoked", body = Message),
        (status = 401, description = "Missing, invalid or revoked access token"))
)]
pub async fn logout(State(state): State<AppState>, user: AuthUser) -> ApiResult<Message> {
    state.blocklist.revoke(&user.jti, user.exp).await;
    info!("User {} logged out, token {} revoked", user.user_id, user.jti);
    Ok(ApiResponse::success(Message::new("Successfully logged out")))
}
