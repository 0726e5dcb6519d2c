//! Store repository: the trait boundary plus the JSON-file document store
//! backing it. Handlers only ever see `dyn StoreRepository`.

pub mod json_store;
pub mod repository;

pub use json_store::JsonStoreRepository;
pub use repository::StoreRepository;
