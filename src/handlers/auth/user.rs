use axum::extract::State;
use tracing::info;

use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::{ApiPath, ApiResponse, ApiResult, AuthUser, Message};
use crate::state::AppState;

/// GET /user/:id
#[utoipa::path(
    get, path = "/user/{id}", tag = "Users", operation_id = "get_user",
    params(("id" = i64, Path, description = "User id")),
    responses((status = 200, description = "User", body = User),
        (status = 404, description = "User not found"))
)]
pub async fn get(State(state): State<AppState>, ApiPath(user_id): ApiPath<i64>) -> ApiResult<User> {
    let user = state.users().select_404(user_id).await?;
    Ok(ApiResponse::success(user))
}

/// DELETE /user/:id - admins may delete anyone, other users only themselves
#[utoipa::path(
    delete, path = "/user/{id}", tag = "Users", operation_id = "delete_user",
    params(("id" = i64, Path, description = "User id")),
    security(("bearer" = [])),
    responses((status = 200, description = "User deleted", body = Message),
        (status = 403, description = "Not the account owner or an admin"),
        (status = 404, description = "User not found"))
)]
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(user_id): ApiPath<i64>,
) -> ApiResult<Message> {
    if !auth.is_admin && auth.user_id != user_id {
        return Err(ApiError::forbidden("You can only delete your own account."));
    }

    state.users().delete(user_id).await?;
    info!("User {} deleted by user {}", user_id, auth.user_id);
    Ok(ApiResponse::success(Message::new("User deleted.")))
}
