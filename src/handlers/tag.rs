use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::database::models::{Item, Tag};
use crate::error::ApiError;
use crate::handlers::utils::FieldErrors;
use crate::middleware::{ApiJson, ApiPath, ApiResponse, ApiResult, AuthUser, Message};
use crate::state::AppState;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(deny_unknown_fields)]
pub struct TagRequest {
    pub name: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ItemTagResponse {
    pub message: String,
    pub item: Item,
    pub tag: Tag,
}

/// GET /store/:id/tag
#[utoipa::path(
    get, path = "/store/{id}/tag", tag = "Tags", operation_id = "list_store_tags",
    params(("id" = i64, Path, description = "Store id")),
    responses((status = 200, description = "Tags of the store", body = [Tag]),
        (status = 404, description = "Store not found"))
)]
pub async fn list_in_store(
    State(state): State<AppState>,
    ApiPath(store_id): ApiPath<i64>,
) -> ApiResult<Vec<Tag>> {
    Ok(ApiResponse::success(state.tags().list_for_store(store_id).await?))
}

/// POST /store/:id/tag
#[utoipa::path(
    post, path = "/store/{id}/tag", tag = "Tags", operation_id = "create_store_tag",
    params(("id" = i64, Path, description = "Store id")),
    security(("bearer" = [])),
    request_body = TagRequest,
    responses((status = 201, description = "Tag created", body = Tag),
        (status = 404, description = "Store not found"),
        (status = 409, description = "Tag name taken in this store"))
)]
pub async fn create_in_store(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(store_id): ApiPath<i64>,
    ApiJson(payload): ApiJson<TagRequest>,
) -> ApiResult<Tag> {
    let mut errors = FieldErrors::new();
    let name = errors
        .require("name", payload.name)
        .map(|n| errors.name("name", &n));
    errors.into_result()?;
    let name = name.ok_or_else(|| ApiError::bad_request("name is required"))?;

    let tag = state.tags().insert(store_id, &name).await?;
    info!("Tag {} '{}' created in store {} by user {}", tag.id, tag.name, store_id, auth.user_id);
    Ok(ApiResponse::created(tag))
}

/// POST /item/:id/tag/:tag_id
#[utoipa::path(
    post, path = "/item/{id}/tag/{tag_id}", tag = "Tags", operation_id = "link_tag",
    params(
        ("id" = i64, Path, description = "Item id"),
        ("tag_id" = i64, Path, description = "Tag id")
    ),
    security(("bearer" = [])),
    responses((status = 201, description = "Tag linked to item", body = Tag),
        (status = 400, description = "Item and tag belong to different stores"),
        (status = 404, description = "Item or tag not found"))
)]
pub async fn link(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath((item_id, tag_id)): ApiPath<(i64, i64)>,
) -> ApiResult<Tag> {
    let item = state.items().select_404(item_id).await?;
    let tags = state.tags();
    let tag = tags.select_404(tag_id).await?;

    tags.link(&item, &tag).await?;
    info!("Tag {} linked to item {} by user {}", tag_id, item_id, auth.user_id);
    Ok(ApiResponse::created(tags.get(tag_id).await?))
}

/// DELETE /item/:id/tag/:tag_id
#[utoipa::path(
    delete, path = "/item/{id}/tag/{tag_id}", tag = "Tags", operation_id = "unlink_tag",
    params(
        ("id" = i64, Path, description = "Item id"),
        ("tag_id" = i64, Path, description = "Tag id")
    ),
    security(("bearer" = [])),
    responses((status = 200, description = "Tag removed from item", body = ItemTagResponse),
        (status = 404, description = "Item, tag or link not found"))
)]
pub async fn unlink(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath((item_id, tag_id)): ApiPath<(i64, i64)>,
) -> ApiResult<ItemTagResponse> {
    let items = state.items();
    let tags = state.tags();
    items.select_404(item_id).await?;
    tags.select_404(tag_id).await?;

    tags.unlink(item_id, tag_id).await?;
    info!("Tag {} unlinked from item {} by user {}", tag_id, item_id, auth.user_id);

    Ok(ApiResponse::success(ItemTagResponse {
        message: "Item removed from tag.".to_string(),
        item: items.get(item_id).await?,
        tag: tags.get(tag_id).await?,
    }))
}

/// GET /tag/:id
#[utoipa::path(
    get, path = "/tag/{id}", tag = "Tags", operation_id = "get_tag",
    params(("id" = i64, Path, description = "Tag id")),
    responses((status = 200, description = "Tag with its items", body = Tag),
        (status = 404, description = "Tag not found"))
)]
pub async fn get(State(state): State<AppState>, ApiPath(tag_id): ApiPath<i64>) -> ApiResult<Tag> {
    Ok(ApiResponse::success(state.tags().get(tag_id).await?))
}

/// DELETE /tag/:id - only tags no item uses
#[utoipa::path(
    delete, path = "/tag/{id}", tag = "Tags", operation_id = "delete_tag",
    params(("id" = i64, Path, description = "Tag id")),
    security(("bearer" = [])),
    responses((status = 200, description = "Tag deleted", body = Message),
        (status = 400, description = "Tag still linked to items"),
        (status = 404, description = "Tag not found"))
)]
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(tag_id): ApiPath<i64>,
) -> ApiResult<Message> {
    state.tags().delete(tag_id).await?;
    info!("Tag {} deleted by user {}", tag_id, auth.user_id);
    Ok(ApiResponse::success(Message::new("Tag deleted.")))
}
