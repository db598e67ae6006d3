use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::store::PlainStore;
use super::tag::PlainTag;

/// Raw row from the items table
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ItemRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub store_id: i64,
}

/// Item without relations, nested inside stores and tags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PlainItem {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
}

impl From<ItemRow> for PlainItem {
    fn from(row: ItemRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
        }
    }
}

/// Item with its owning store and tags
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub store_id: i64,
    pub store: PlainStore,
    pub tags: Vec<PlainTag>,
}

impl Item {
    pub fn assemble(row: ItemRow, store: PlainStore, tags: Vec<PlainTag>) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            store_id: row.store_id,
            store,
            tags,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewItem {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub store_id: i64,
}

/// Partial update; `None` leaves the column untouched
#[derive(Debug, Clone, Default)]
pub struct ItemChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub store_id: Option<i64>,
}
