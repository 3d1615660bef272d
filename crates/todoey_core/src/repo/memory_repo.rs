//! In-process object store backend.
//!
//! # Responsibility
//! - Keep live category/item records in process memory.
//! - Serve as the embedded object-store backend and as a test double.
//!
//! # Invariants
//! - Single-threaded: state sits behind a `RefCell` and the type is `!Sync`.
//! - Each mutation either applies completely or not at all.

use super::snapshot::Snapshot;
use super::{CategoryRepository, ItemRepository, RepoResult};
use crate::model::category::{Category, CategoryId};
use crate::model::item::{Item, ItemId};
use crate::query::item_query::ItemQuery;
use std::cell::RefCell;

/// Volatile repository holding every record in memory.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    state: RefCell<Snapshot>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, f: impl FnOnce(&Snapshot) -> T) -> T {
        f(&*self.state.borrow())
    }

    fn write<T>(&self, f: impl FnOnce(&mut Snapshot) -> RepoResult<T>) -> RepoResult<T> {
        f(&mut *self.state.borrow_mut())
    }
}

impl CategoryRepository for MemoryRepository {
    fn create_category(&self, category: &Category) -> RepoResult<CategoryId> {
        self.write(|state| state.insert_category(category))?;
        Ok(category.uuid)
    }

    fn update_category(&self, category: &Category) -> RepoResult<()> {
        self.write(|state| state.update_category(category))
    }

    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        Ok(self.read(|state| state.get_category(id)))
    }

    fn list_categories(&self) -> RepoResult<Vec<Category>> {
        Ok(self.read(Snapshot::list_categories))
    }

    fn delete_category(&self, id: CategoryId) -> RepoResult<()> {
        self.write(|state| state.remove_category(id))
    }
}

impl ItemRepository for MemoryRepository {
    fn create_item(&self, item: &Item) -> RepoResult<ItemId> {
        self.write(|state| state.insert_item(item))?;
        Ok(item.uuid)
    }

    fn update_item(&self, item: &Item) -> RepoResult<()> {
        self.write(|state| state.update_item(item))
    }

    fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>> {
        Ok(self.read(|state| state.get_item(id)))
    }

    fn list_items(&self, query: &ItemQuery) -> RepoResult<Vec<Item>> {
        Ok(self.read(|state| state.list_items(query)))
    }

    fn delete_item(&self, id: ItemId) -> RepoResult<()> {
        self.write(|state| state.remove_item(id))
    }

    fn category_exists(&self, id: CategoryId) -> RepoResult<bool> {
        Ok(self.read(|state| state.contains_category(id)))
    }
}

