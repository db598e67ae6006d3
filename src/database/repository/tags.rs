use std::collections::HashMap;

use sqlx::{FromRow, SqlitePool};

use crate::database::manager::DatabaseError;
use crate::database::models::{ItemRow, PlainItem, PlainStore, Tag, TagRow};

#[derive(Debug, FromRow)]
struct TagItemLink {
    tag_id: i64,
    id: i64,
    name: String,
    description: Option<String>,
    price: f64,
}

impl From<TagItemLink> for PlainItem {
    fn from(link: TagItemLink) -> Self {
        Self {
            id: link.id,
            name: link.name,
            description: link.description,
            price: link.price,
        }
    }
}

pub struct TagRepository {
    pool: SqlitePool,
}

impl TagRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn select_one(&self, id: i64) -> Result<Option<TagRow>, DatabaseError> {
        let row = sqlx::query_as::<_, TagRow>("SELECT id, name, store_id FROM tags WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn select_404(&self, id: i64) -> Result<TagRow, DatabaseError> {
        self.select_one(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Tag not found".to_string()))
    }

    /// Tags of one store, each with the items linked to it
    pub async fn list_for_store(&self, store_id: i64) -> Result<Vec<Tag>, DatabaseError> {
        let store = sqlx::query_as::<_, PlainStore>("SELECT id, name FROM stores WHERE id = ?1")
            .bind(store_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Store not found".to_string()))?;

        let rows = sqlx::query_as::<_, TagRow>(
            "SELECT id, name, store_id FROM tags WHERE store_id = ?1 ORDER BY id",
        )
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;

        let links = sqlx::query_as::<_, TagItemLink>(
            "SELECT it.tag_id, i.id, i.name, i.description, i.price
             FROM items_tags it
             JOIN items i ON i.id = it.item_id
             JOIN tags t ON t.id = it.tag_id
             WHERE t.store_id = ?1
             ORDER BY i.id",
        )
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;

        let mut items_by_tag: HashMap<i64, Vec<PlainItem>> = HashMap::new();
        for link in links {
            items_by_tag.entry(link.tag_id).or_default().push(link.into());
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let items = items_by_tag.remove(&row.id).unwrap_or_default();
                Tag::assemble(row, store.clone(), items)
            })
            .collect())
    }

    pub async fn get(&self, id: i64) -> Result<Tag, DatabaseError> {
        let row = self.select_404(id).await?;

        let store = sqlx::query_as::<_, PlainStore>("SELECT id, name FROM stores WHERE id = ?1")
            .bind(row.store_id)
            .fetch_one(&self.pool)
            .await?;

        let items = sqlx::query_as::<_, TagItemLink>(
            "SELECT it.tag_id, i.id, i.name, i.description, i.price
             FROM items_tags it JOIN items i ON i.id = it.item_id
             WHERE it.tag_id = ?1
             ORDER BY i.id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

        Ok(Tag::assemble(row, store, items))
    }

    pub async fn insert(&self, store_id: i64, name: &str) -> Result<Tag, DatabaseError> {
        let store = sqlx::query_as::<_, PlainStore>("SELECT id, name FROM stores WHERE id = ?1")
            .bind(store_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Store not found".to_string()))?;

        let row = sqlx::query_as::<_, TagRow>(
            "INSERT INTO tags (name, store_id) VALUES (?1, ?2) RETURNING id, name, store_id",
        )
        .bind(name)
        .bind(store_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_write(e, format!("Tag '{}' already exists in that store.", name)))?;

        Ok(Tag::assemble(row, store, Vec::new()))
    }

    /// Link a tag to an item of the same store. Linking twice is a no-op.
    pub async fn link(&self, item: &ItemRow, tag: &TagRow) -> Result<(), DatabaseError> {
        if item.store_id != tag.store_id {
            return Err(DatabaseError::Constraint(
                "Item and tag belong to different stores.".to_string(),
            ));
        }

        sqlx::query("INSERT OR IGNORE INTO items_tags (item_id, tag_id) VALUES (?1, ?2)")
            .bind(item.id)
            .bind(tag.id)
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, "Tag is already linked to item."))?;
        Ok(())
    }

    pub async fn unlink(&self, item_id: i64, tag_id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM items_tags WHERE item_id = ?1 AND tag_id = ?2")
            .bind(item_id)
            .bind(tag_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Tag is not linked to item".to_string()));
        }
        Ok(())
    }

    /// Delete a tag that no item uses
    pub async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let (links,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM items_tags WHERE tag_id = ?1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        if links > 0 {
            return Err(DatabaseError::Constraint(
                "Could not delete tag. Remove tag from items first.".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM tags WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Tag not found".to_string()));
        }

        tx.commit().await?;
        Ok(())
    }
}
