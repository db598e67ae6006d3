use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::{decoy_hash, AuthError, TokenBlocklist, TokenService};
use crate::config::AppConfig;
use crate::database::repository::{ItemRepository, StoreRepository, TagRepository, UserRepository};
use crate::services::EmailQueue;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<AppConfig>,
    pub tokens: Arc<TokenService>,
    pub blocklist: TokenBlocklist,
    pub email: EmailQueue,
    /// Verified against when a login names an unknown user
    pub decoy_hash: Arc<str>,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: AppConfig, email: EmailQueue) -> Result<Self, AuthError> {
        let tokens = TokenService::new(&config.security)?;
        let decoy_hash = decoy_hash(config.security.bcrypt_cost)?;
        Ok(Self {
            pool,
            config: Arc::new(config),
            tokens: Arc::new(tokens),
            blocklist: TokenBlocklist::new(),
            email,
            decoy_hash: decoy_hash.into(),
        })
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    pub fn stores(&self) -> StoreRepository {
        StoreRepository::new(self.pool.clone())
    }

    pub fn items(&self) -> ItemRepository {
        ItemRepository::new(self.pool.clone())
    }

    pub fn tags(&self) -> TagRepository {
        TagRepository::new(self.pool.clone())
    }
}
