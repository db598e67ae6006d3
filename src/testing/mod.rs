use sqlx::SqlitePool;

use crate::database::DatabaseManager;

/// Fresh in-memory database with the schema applied
pub async fn migrated_pool() -> SqlitePool {
    let pool = DatabaseManager::connect_in_memory()
        .await
        .expect("in-memory database");
    DatabaseManager::migrate(&pool).await.expect("migrations");
    pool
}
