//! Core logic for Todoey: categories that own to-do items.
//! This crate is the single source of truth for list invariants; host UIs
//! only render rows and forward user events.

pub mod db;
pub mod listing;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;
pub mod store;

pub use listing::category_list::CategoryList;
pub use listing::item_list::ItemList;
pub use listing::{DeletableRows, ListingError, ListingResult};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel};
pub use model::category::{Category, CategoryId};
pub use model::item::{Item, ItemId};
pub use model::validation::ValidationError;
pub use query::item_query::{ItemOrder, ItemQuery};
pub use repo::json_file_repo::JsonFileRepository;
pub use repo::memory_repo::MemoryRepository;
pub use repo::sqlite_repo::SqliteTodoRepository;
pub use repo::{CategoryRepository, ItemRepository, RepoError, RepoResult, TodoRepository};
pub use service::category_service::CategoryService;
pub use service::item_service::ItemService;
pub use service::{StoreError, StoreResult};
pub use store::{open_store, StoreConfig, StoreHandle, StoreOpenError};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
