use axum::{extract::State, http::StatusCode};
use serde::Deserialize;
use tracing::info;

use crate::database::models::{Item, ItemChanges, NewItem};
use crate::error::ApiError;
use crate::handlers::utils::FieldErrors;
use crate::middleware::{ApiJson, ApiPath, ApiResponse, ApiResult, AuthUser, Message};
use crate::state::AppState;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ItemRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub store_id: Option<i64>,
}

impl ItemRequest {
    /// Validate whatever fields are present. With `require_all` the fields
    /// needed to create an item must be present as well.
    fn validate(self, require_all: bool) -> Result<ItemChanges, ApiError> {
        let mut errors = FieldErrors::new();

        if require_all {
            errors.require("name", self.name.as_ref());
            errors.require("price", self.price);
            errors.require("store_id", self.store_id);
        }

        let name = self.name.map(|n| errors.name("name", &n));
        if let Some(price) = self.price {
            errors.price("price", price);
        }
        let description = self.description.map(|d| d.trim().to_string());
        errors.into_result()?;

        Ok(ItemChanges {
            name,
            description,
            price: self.price,
            store_id: self.store_id,
        })
    }
}

fn new_item(changes: ItemChanges) -> Result<NewItem, ApiError> {
    match changes {
        ItemChanges {
            name: Some(name),
            description,
            price: Some(price),
            store_id: Some(store_id),
        } => Ok(NewItem {
            name,
            description,
            price,
            store_id,
        }),
        _ => Err(ApiError::bad_request("name, price and store_id are required")),
    }
}

/// GET /item
#[utoipa::path(
    get, path = "/item", tag = "Items", operation_id = "list_items",
    security(("bearer" = [])),
    responses((status = 200, description = "All items", body = [Item]))
)]
pub async fn list(State(state): State<AppState>, _auth: AuthUser) -> ApiResult<Vec<Item>> {
    Ok(ApiResponse::success(state.items().list().await?))
}

/// POST /item
#[utoipa::path(
    post, path = "/item", tag = "Items", operation_id = "create_item",
    security(("bearer" = [])),
    request_body = ItemRequest,
    responses((status = 201, description = "Item created", body = Item),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Store not found"),
        (status = 409, description = "Item name taken"))
)]
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<ItemRequest>,
) -> ApiResult<Item> {
    let item = new_item(payload.validate(true)?)?;
    let item = state.items().insert(item).await?;

    info!("Item {} '{}' created by user {}", item.id, item.name, auth.user_id);
    Ok(ApiResponse::created(item))
}

/// GET /item/:id
#[utoipa::path(
    get, path = "/item/{id}", tag = "Items", operation_id = "get_item",
    params(("id" = i64, Path, description = "Item id")),
    responses((status = 200, description = "Item with store and tags", body = Item),
        (status = 404, description = "Item not found"))
)]
pub async fn get(State(state): State<AppState>, ApiPath(item_id): ApiPath<i64>) -> ApiResult<Item> {
    Ok(ApiResponse::success(state.items().get(item_id).await?))
}

/// PUT /item/:id - update the given fields, or create the item under this id
/// when it does not exist yet
#[utoipa::path(
    put, path = "/item/{id}", tag = "Items", operation_id = "put_item",
    params(("id" = i64, Path, description = "Item id")),
    security(("bearer" = [])),
    request_body = ItemRequest,
    responses((status = 200, description = "Item updated", body = Item),
        (status = 201, description = "Item created under this id", body = Item),
        (status = 400, description = "Invalid input"))
)]
pub async fn put(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(item_id): ApiPath<i64>,
    ApiJson(payload): ApiJson<ItemRequest>,
) -> ApiResult<Item> {
    let items = state.items();

    if items.select_one(item_id).await?.is_some() {
        let changes = payload.validate(false)?;
        let item = items.update(item_id, changes).await?;
        info!("Item {} updated by user {}", item_id, auth.user_id);
        return Ok(ApiResponse::success(item));
    }

    let item = new_item(payload.validate(true)?)?;
    let item = items.insert_with_id(item_id, item).await?;
    info!("Item {} created through PUT by user {}", item_id, auth.user_id);
    Ok(ApiResponse::with_status(item, StatusCode::CREATED))
}

/// DELETE /item/:id - fresh admin token required
#[utoipa::path(
    delete, path = "/item/{id}", tag = "Items", operation_id = "delete_item",
    params(("id" = i64, Path, description = "Item id")),
    security(("bearer" = [])),
    responses((status = 200, description = "Item deleted", body = Message),
        (status = 401, description = "Fresh token required"),
        (status = 403, description = "Admin privilege required"),
        (status = 404, description = "Item not found"))
)]
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(item_id): ApiPath<i64>,
) -> ApiResult<Message> {
    auth.require_fresh()?;
    auth.require_admin()?;

    state.items().delete(item_id).await?;
    info!("Item {} deleted by user {}", item_id, auth.user_id);
    Ok(ApiResponse::success(Message::new("Item deleted.")))
}
