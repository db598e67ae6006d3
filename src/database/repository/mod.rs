pub mod items;
pub mod stores;
pub mod tags;
pub mod users;

pub use items::ItemRepository;
pub use stores::StoreRepository;
pub use tags::TagRepository;
pub use users::UserRepository;
