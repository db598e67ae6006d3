use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::item::PlainItem;
use super::store::PlainStore;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct TagRow {
    pub id: i64,
    pub name: String,
    pub store_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PlainTag {
    pub id: i64,
    pub name: String,
}

impl From<TagRow> for PlainTag {
    fn from(row: TagRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}

/// Tag with its store and the items it is linked to
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub store_id: i64,
    pub store: PlainStore,
    pub items: Vec<PlainItem>,
}

impl Tag {
    pub fn assemble(row: TagRow, store: PlainStore, items: Vec<PlainItem>) -> Self {
        Self {
            id: row.id,
            name: row.name,
            store_id: row.store_id,
            store,
            items,
        }
    }
}
