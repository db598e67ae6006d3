use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::item::PlainItem;
use super::tag::PlainTag;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct PlainStore {
    pub id: i64,
    pub name: String,
}

/// Store with its items and tags, as returned by the store endpoints
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Store {
    pub id: i64,
    pub name: String,
    pub items: Vec<PlainItem>,
    pub tags: Vec<PlainTag>,
}

impl Store {
    pub fn assemble(store: PlainStore, items: Vec<PlainItem>, tags: Vec<PlainTag>) -> Self {
        Self {
            id: store.id,
            name: store.name,
            items,
            tags,
        }
    }
}
