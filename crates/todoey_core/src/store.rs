//! Backend selection and store bootstrap.
//!
//! # Responsibility
//! - Describe which persistence backend to use (`StoreConfig`).
//! - Open that backend once and hand it to services as one handle.
//!
//! # Invariants
//! - The handle owns the backend; services borrow it (`&StoreHandle`).
//! - SQLite handles are always migrated before first use.

use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::category::{Category, CategoryId};
use crate::model::item::{Item, ItemId};
use crate::query::item_query::ItemQuery;
use crate::repo::json_file_repo::JsonFileRepository;
use crate::repo::memory_repo::MemoryRepository;
use crate::repo::sqlite_repo::SqliteTodoRepository;
use crate::repo::{CategoryRepository, ItemRepository, RepoError, RepoResult, TodoRepository};
use log::info;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Persistence backend choice.
///
/// JSON form: `{"backend": "sqlite", "path": "/data/todoey.sqlite3"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StoreConfig {
    Sqlite { path: PathBuf },
    SqliteInMemory,
    JsonFile { path: PathBuf },
    #[default]
    Memory,
}

impl StoreConfig {
    /// Parses a config document.
    pub fn from_json_str(value: &str) -> Result<Self, StoreOpenError> {
        serde_json::from_str(value).map_err(StoreOpenError::Config)
    }

    fn backend_name(&self) -> &'static str {
        match self {
            Self::Sqlite { .. } => "sqlite",
            Self::SqliteInMemory => "sqlite_in_memory",
            Self::JsonFile { .. } => "json_file",
            Self::Memory => "memory",
        }
    }
}

/// Failure while parsing config or opening a backend.
#[derive(Debug)]
pub enum StoreOpenError {
    Config(serde_json::Error),
    Db(DbError),
    Repo(RepoError),
}

impl Display for StoreOpenError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid store config: {err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreOpenError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<DbError> for StoreOpenError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for StoreOpenError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// An opened backend usable as a full repository.
pub enum StoreHandle {
    Sqlite(Connection),
    JsonFile(JsonFileRepository),
    Memory(MemoryRepository),
}

/// Opens the backend described by `config`.
pub fn open_store(config: &StoreConfig) -> Result<StoreHandle, StoreOpenError> {
    let handle = match config {
        StoreConfig::Sqlite { path } => StoreHandle::Sqlite(open_db(path)?),
        StoreConfig::SqliteInMemory => StoreHandle::Sqlite(open_db_in_memory()?),
        StoreConfig::JsonFile { path } => StoreHandle::JsonFile(JsonFileRepository::open(path)?),
        StoreConfig::Memory => StoreHandle::Memory(MemoryRepository::new()),
    };
    info!(
        "event=store_open module=store status=ok backend={}",
        config.backend_name()
    );
    Ok(handle)
}

impl StoreHandle {
    fn with_repo<T>(&self, f: impl FnOnce(&dyn TodoRepository) -> T) -> T {
        match self {
            Self::Sqlite(conn) => f(&SqliteTodoRepository::from_ready(conn)),
            Self::JsonFile(repo) => f(repo),
            Self::Memory(repo) => f(repo),
        }
    }
}

impl CategoryRepository for StoreHandle {
    fn create_category(&self, category: &Category) -> RepoResult<CategoryId> {
        self.with_repo(|repo| repo.create_category(category))
    }

    fn update_category(&self, category: &Category) -> RepoResult<()> {
        self.with_repo(|repo| repo.update_category(category))
    }

    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        self.with_repo(|repo| repo.get_category(id))
    }

    fn list_categories(&self) -> RepoResult<Vec<Category>> {
        self.with_repo(|repo| repo.list_categories())
    }

    fn delete_category(&self, id: CategoryId) -> RepoResult<()> {
        self.with_repo(|repo| repo.delete_category(id))
    }
}

impl ItemRepository for StoreHandle {
    fn create_item(&self, item: &Item) -> RepoResult<ItemId> {
        self.with_repo(|repo| repo.create_item(item))
    }

    fn update_item(&self, item: &Item) -> RepoResult<()> {
        self.with_repo(|repo| repo.update_item(item))
    }

    fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>> {
        self.with_repo(|repo| repo.get_item(id))
    }

    fn list_items(&self, query: &ItemQuery) -> RepoResult<Vec<Item>> {
        self.with_repo(|repo| repo.list_items(query))
    }

    fn delete_item(&self, id: ItemId) -> RepoResult<()> {
        self.with_repo(|repo| repo.delete_item(id))
    }

    fn category_exists(&self, id: CategoryId) -> RepoResult<bool> {
        self.with_repo(|repo| repo.category_exists(id))
    }
}

#[cfg(test)]
mod tests {
    use super::StoreConfig;
    use std::path::PathBuf;

    #[test]
    fn config_parses_tagged_backends() {
        assert_eq!(
            StoreConfig::from_json_str(r#"{"backend": "sqlite", "path": "/tmp/todoey.db"}"#)
                .unwrap(),
            StoreConfig::Sqlite {
                path: PathBuf::from("/tmp/todoey.db")
            }
        );
        assert_eq!(
            StoreConfig::from_json_str(r#"{"backend": "memory"}"#).unwrap(),
            StoreConfig::Memory
        );
        assert_eq!(
            StoreConfig::from_json_str(r#"{"backend": "sqlite_in_memory"}"#).unwrap(),
            StoreConfig::SqliteInMemory
        );
    }

    #[test]
    fn unknown_backend_is_rejected() {
        assert!(StoreConfig::from_json_str(r#"{"backend": "realm"}"#).is_err());
    }
}
