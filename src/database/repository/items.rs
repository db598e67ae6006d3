use std::collections::HashMap;

use sqlx::{FromRow, SqliteConnection, SqlitePool};

use crate::database::manager::DatabaseError;
use crate::database::models::{Item, ItemChanges, ItemRow, NewItem, PlainStore, PlainTag};

const ITEM_WITH_STORE: &str = "SELECT i.id, i.name, i.description, i.price, i.store_id, s.name AS store_name
     FROM items i JOIN stores s ON s.id = i.store_id";

#[derive(Debug, FromRow)]
struct ItemWithStore {
    id: i64,
    name: String,
    description: Option<String>,
    price: f64,
    store_id: i64,
    store_name: String,
}

impl ItemWithStore {
    fn into_item(self, tags: Vec<PlainTag>) -> Item {
        let store = PlainStore {
            id: self.store_id,
            name: self.store_name,
        };
        let row = ItemRow {
            id: self.id,
            name: self.name,
            description: self.description,
            price: self.price,
            store_id: self.store_id,
        };
        Item::assemble(row, store, tags)
    }
}

#[derive(Debug, FromRow)]
struct ItemTagLink {
    item_id: i64,
    tag_id: i64,
    tag_name: String,
}

pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn select_one(&self, id: i64) -> Result<Option<ItemRow>, DatabaseError> {
        let row = sqlx::query_as::<_, ItemRow>(
            "SELECT id, name, description, price, store_id FROM items WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn select_404(&self, id: i64) -> Result<ItemRow, DatabaseError> {
        self.select_one(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Item not found".to_string()))
    }

    /// All items with their store and tags, ordered by id
    pub async fn list(&self) -> Result<Vec<Item>, DatabaseError> {
        let rows = sqlx::query_as::<_, ItemWithStore>(&format!("{} ORDER BY i.id", ITEM_WITH_STORE))
            .fetch_all(&self.pool)
            .await?;

        let links = sqlx::query_as::<_, ItemTagLink>(
            "SELECT it.item_id, t.id AS tag_id, t.name AS tag_name
             FROM items_tags it JOIN tags t ON t.id = it.tag_id
             ORDER BY t.id",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut tags_by_item: HashMap<i64, Vec<PlainTag>> = HashMap::new();
        for link in links {
            tags_by_item.entry(link.item_id).or_default().push(PlainTag {
                id: link.tag_id,
                name: link.tag_name,
            });
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let tags = tags_by_item.remove(&row.id).unwrap_or_default();
                row.into_item(tags)
            })
            .collect())
    }

    pub async fn get(&self, id: i64) -> Result<Item, DatabaseError> {
        let row = sqlx::query_as::<_, ItemWithStore>(&format!("{} WHERE i.id = ?1", ITEM_WITH_STORE))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Item not found".to_string()))?;

        let tags = sqlx::query_as::<_, ItemTagLink>(
            "SELECT it.item_id, t.id AS tag_id, t.name AS tag_name
             FROM items_tags it JOIN tags t ON t.id = it.tag_id
             WHERE it.item_id = ?1
             ORDER BY t.id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|link| PlainTag {
            id: link.tag_id,
            name: link.tag_name,
        })
        .collect();

        Ok(row.into_item(tags))
    }

    pub async fn insert(&self, item: NewItem) -> Result<Item, DatabaseError> {
        self.insert_row(None, item).await
    }

    /// Insert under a caller-chosen id, used when PUT targets a missing item
    pub async fn insert_with_id(&self, id: i64, item: NewItem) -> Result<Item, DatabaseError> {
        self.insert_row(Some(id), item).await
    }

    async fn insert_row(&self, id: Option<i64>, item: NewItem) -> Result<Item, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        ensure_store_exists(&mut tx, item.store_id).await?;

        let (new_id,): (i64,) = sqlx::query_as(
            "INSERT INTO items (id, name, description, price, store_id)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id",
        )
        .bind(id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.price)
        .bind(item.store_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| DatabaseError::from_write(e, format!("Item name '{}' already exists.", item.name)))?;

        tx.commit().await?;
        self.get(new_id).await
    }

    /// Apply a partial update. Moving an item to another store drops its tag
    /// links, since tags are scoped to the store that owns them.
    pub async fn update(&self, id: i64, changes: ItemChanges) -> Result<Item, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, ItemRow>(
            "SELECT id, name, description, price, store_id FROM items WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DatabaseError::NotFound("Item not found".to_string()))?;

        let store_id = changes.store_id.unwrap_or(current.store_id);
        if store_id != current.store_id {
            ensure_store_exists(&mut tx, store_id).await?;
            sqlx::query("DELETE FROM items_tags WHERE item_id = ?1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        let name = changes.name.unwrap_or(current.name);
        let description = changes.description.or(current.description);
        let price = changes.price.unwrap_or(current.price);

        sqlx::query("UPDATE items SET name = ?1, description = ?2, price = ?3, store_id = ?4 WHERE id = ?5")
            .bind(&name)
            .bind(&description)
            .bind(price)
            .bind(store_id)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| DatabaseError::from_write(e, format!("Item name '{}' already exists.", name)))?;

        tx.commit().await?;
        self.get(id).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM items WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Item not found".to_string()));
        }
        Ok(())
    }
}

async fn ensure_store_exists(conn: &mut SqliteConnection, store_id: i64) -> Result<(), DatabaseError> {
    let found: Option<(i64,)> = sqlx::query_as("SELECT id FROM stores WHERE id = ?1")
        .bind(store_id)
        .fetch_optional(&mut *conn)
        .await?;

    match found {
        Some(_) => Ok(()),
        None => Err(DatabaseError::NotFound("Store not found".to_string())),
    }
}
