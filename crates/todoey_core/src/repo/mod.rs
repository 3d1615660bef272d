//! Repository layer: persistence contracts and backend implementations.
//!
//! # Responsibility
//! - Define the fetch/save/delete contracts the services depend on.
//! - Isolate storage details (SQL, JSON blobs, in-process records) from
//!   service orchestration.
//!
//! # Invariants
//! - Writes validate records before touching storage.
//! - Every mutating call is all-or-nothing: on error nothing is persisted
//!   and in-process state is unchanged.
//! - Missing targets surface as `CategoryNotFound` / `ItemNotFound`, never as
//!   silent no-ops.

pub mod json_file_repo;
pub mod memory_repo;
mod snapshot;
pub mod sqlite_repo;

use crate::db::DbError;
use crate::model::category::{Category, CategoryId};
use crate::model::item::{Item, ItemId};
use crate::model::validation::ValidationError;
use crate::query::item_query::ItemQuery;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence error shared by every backend.
#[derive(Debug)]
pub enum RepoError {
    /// Record failed invariant checks before write or after read.
    Validation(ValidationError),
    /// SQLite/bootstrap failure.
    Db(DbError),
    /// File-system failure in the JSON backend.
    Io(std::io::Error),
    /// JSON encode/decode failure.
    Serialization(serde_json::Error),
    CategoryNotFound(CategoryId),
    ItemNotFound(ItemId),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted data cannot be converted into a valid record.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "storage i/o failed: {err}"),
            Self::Serialization(err) => write!(f, "storage encoding failed: {err}"),
            Self::CategoryNotFound(id) => write!(f, "category not found: {id}"),
            Self::ItemNotFound(id) => write!(f, "item not found: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<std::io::Error> for RepoError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Persistence contract for categories.
pub trait CategoryRepository {
    /// Inserts one category at the end of the listing.
    fn create_category(&self, category: &Category) -> RepoResult<CategoryId>;
    /// Replaces name/colour of an existing category.
    fn update_category(&self, category: &Category) -> RepoResult<()>;
    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>>;
    /// Lists categories in insertion order.
    fn list_categories(&self) -> RepoResult<Vec<Category>>;
    /// Deletes one category and every item it owns.
    fn delete_category(&self, id: CategoryId) -> RepoResult<()>;
}

/// Persistence contract for items.
pub trait ItemRepository {
    /// Appends one item to its category. Fails with `CategoryNotFound` when
    /// the owning category is missing.
    fn create_item(&self, item: &Item) -> RepoResult<ItemId>;
    fn update_item(&self, item: &Item) -> RepoResult<()>;
    fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>>;
    /// Lists items matching `query`, filtered natively where supported.
    fn list_items(&self, query: &ItemQuery) -> RepoResult<Vec<Item>>;
    fn delete_item(&self, id: ItemId) -> RepoResult<()>;
    fn category_exists(&self, id: CategoryId) -> RepoResult<bool>;
}

/// Full persistence adapter: both category and item contracts.
pub trait TodoRepository: CategoryRepository + ItemRepository {}

impl<T: CategoryRepository + ItemRepository + ?Sized> TodoRepository for T {}

impl<T: CategoryRepository + ?Sized> CategoryRepository for &T {
    fn create_category(&self, category: &Category) -> RepoResult<CategoryId> {
        (**self).create_category(category)
    }

    fn update_category(&self, category: &Category) -> RepoResult<()> {
        (**self).update_category(category)
    }

    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        (**self).get_category(id)
    }

    fn list_categories(&self) -> RepoResult<Vec<Category>> {
        (**self).list_categories()
    }

    fn delete_category(&self, id: CategoryId) -> RepoResult<()> {
        (**self).delete_category(id)
    }
}

impl<T: ItemRepository + ?Sized> ItemRepository for &T {
    fn create_item(&self, item: &Item) -> RepoResult<ItemId> {
        (**self).create_item(item)
    }

    fn update_item(&self, item: &Item) -> RepoResult<()> {
        (**self).update_item(item)
    }

    fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>> {
        (**self).get_item(id)
    }

    fn list_items(&self, query: &ItemQuery) -> RepoResult<Vec<Item>> {
        (**self).list_items(query)
    }

    fn delete_item(&self, id: ItemId) -> RepoResult<()> {
        (**self).delete_item(id)
    }

    fn category_exists(&self, id: CategoryId) -> RepoResult<bool> {
        (**self).category_exists(id)
    }
}
