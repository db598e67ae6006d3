// handlers/mod.rs - HTTP handlers grouped by resource
//
// Public reads need no token; writes take an `AuthUser` extractor and the
// destructive store/item deletes additionally demand a fresh admin token.

pub mod auth;
pub mod health;
pub mod item;
pub mod store;
pub mod tag;
pub mod utils;
