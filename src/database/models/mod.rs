pub mod item;
pub mod store;
pub mod tag;
pub mod user;

pub use item::{Item, ItemChanges, ItemRow, NewItem, PlainItem};
pub use store::{PlainStore, Store};
pub use tag::{PlainTag, Tag, TagRow};
pub use user::{NewUser, User};
