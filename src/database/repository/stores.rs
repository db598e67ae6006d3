use std::collections::HashMap;

use sqlx::SqlitePool;

use crate::database::manager::DatabaseError;
use crate::database::models::{ItemRow, PlainItem, PlainStore, PlainTag, Store, TagRow};

pub struct StoreRepository {
    pool: SqlitePool,
}

impl StoreRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn select_one(&self, id: i64) -> Result<Option<PlainStore>, DatabaseError> {
        let store = sqlx::query_as::<_, PlainStore>("SELECT id, name FROM stores WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(store)
    }

    pub async fn select_404(&self, id: i64) -> Result<PlainStore, DatabaseError> {
        self.select_one(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Store not found".to_string()))
    }

    /// All stores with their items and tags, ordered by id
    pub async fn list(&self) -> Result<Vec<Store>, DatabaseError> {
        let stores = sqlx::query_as::<_, PlainStore>("SELECT id, name FROM stores ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        let items = sqlx::query_as::<_, ItemRow>(
            "SELECT id, name, description, price, store_id FROM items ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        let tags = sqlx::query_as::<_, TagRow>("SELECT id, name, store_id FROM tags ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        let mut items_by_store: HashMap<i64, Vec<PlainItem>> = HashMap::new();
        for row in items {
            items_by_store.entry(row.store_id).or_default().push(row.into());
        }
        let mut tags_by_store: HashMap<i64, Vec<PlainTag>> = HashMap::new();
        for row in tags {
            tags_by_store.entry(row.store_id).or_default().push(row.into());
        }

        Ok(stores
            .into_iter()
            .map(|store| {
                let items = items_by_store.remove(&store.id).unwrap_or_default();
                let tags = tags_by_store.remove(&store.id).unwrap_or_default();
                Store::assemble(store, items, tags)
            })
            .collect())
    }

    pub async fn get(&self, id: i64) -> Result<Store, DatabaseError> {
        let store = self.select_404(id).await?;

        let items = sqlx::query_as::<_, ItemRow>(
            "SELECT id, name, description, price, store_id FROM items WHERE store_id = ?1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let tags = sqlx::query_as::<_, TagRow>(
            "SELECT id, name, store_id FROM tags WHERE store_id = ?1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Store::assemble(
            store,
            items.into_iter().map(Into::into).collect(),
            tags.into_iter().map(Into::into).collect(),
        ))
    }

    pub async fn insert(&self, name: &str) -> Result<Store, DatabaseError> {
        let store = sqlx::query_as::<_, PlainStore>(
            "INSERT INTO stores (name) VALUES (?1) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_write(e, format!("Store name '{}' already exists.", name)))?;

        Ok(Store::assemble(store, Vec::new(), Vec::new()))
    }

    /// Delete a store. Items, tags and their links go with it through the
    /// ON DELETE CASCADE foreign keys.
    pub async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM stores WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Store not found".to_string()));
        }
        Ok(())
    }
}
