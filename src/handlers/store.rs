use axum::extract::State;
use serde::Deserialize;
use tracing::info;

use crate::database::models::Store;
use crate::error::ApiError;
use crate::handlers::utils::FieldErrors;
use crate::middleware::{ApiJson, ApiPath, ApiResponse, ApiResult, AuthUser, Message};
use crate::state::AppState;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(deny_unknown_fields)]
pub struct StoreRequest {
    pub name: Option<String>,
}

/// GET /store
#[utoipa::path(
    get, path = "/store", tag = "Stores", operation_id = "list_stores",
    responses((status = 200, description = "All stores", body = [Store]))
)]
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Store>> {
    Ok(ApiResponse::success(state.stores().list().await?))
}

/// POST /store
#[utoipa::path(
    post, path = "/store", tag = "Stores", operation_id = "create_store",
    security(("bearer" = [])),
    request_body = StoreRequest,
    responses((status = 201, description = "Store created", body = Store),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Store name taken"))
)]
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<StoreRequest>,
) -> ApiResult<Store> {
    let mut errors = FieldErrors::new();
    let name = errors
        .require("name", payload.name)
        .map(|n| errors.name("name", &n));
    errors.into_result()?;
    let name = name.ok_or_else(|| ApiError::bad_request("name is required"))?;

    let store = state.stores().insert(&name).await?;
    info!("Store {} '{}' created by user {}", store.id, store.name, auth.user_id);
    Ok(ApiResponse::created(store))
}

/// GET /store/:id
#[utoipa::path(
    get, path = "/store/{id}", tag = "Stores", operation_id = "get_store",
    params(("id" = i64, Path, description = "Store id")),
    responses((status = 200, description = "Store with items and tags", body = Store),
        (status = 404, description = "Store not found"))
)]
pub async fn get(State(state): State<AppState>, ApiPath(store_id): ApiPath<i64>) -> ApiResult<Store> {
    Ok(ApiResponse::success(state.stores().get(store_id).await?))
}

/// DELETE /store/:id - fresh admin token; removes the store's items and tags too
#[utoipa::path(
    delete, path = "/store/{id}", tag = "Stores", operation_id = "delete_store",
    params(("id" = i64, Path, description = "Store id")),
    security(("bearer" = [])),
    responses((status = 200, description = "Store and its items and tags deleted", body = Message),
        (status = 401, description = "Fresh token required"),
        (status = 403, description = "Admin privilege required"),
        (status = 404, description = "Store not found"))
)]
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(store_id): ApiPath<i64>,
) -> ApiResult<Message> {
    auth.require_fresh()?;
    auth.require_admin()?;

    state.stores().delete(store_id).await?;
    info!("Store {} deleted by user {}", store_id, auth.user_id);
    Ok(ApiResponse::success(Message::new("Store deleted.")))
}
