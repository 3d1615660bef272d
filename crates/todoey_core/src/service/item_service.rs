//! Item store: items scoped to one category.
//!
//! # Invariants
//! - Every operation that names a category fails with `CategoryNotFound`
//!   when it does not exist, including reads.
//! - `toggle_done` flips the flag unconditionally; two calls restore it.
//! - Search with blank text is the unfiltered category listing.

use super::{log_outcome, StoreError, StoreResult};
use crate::model::category::CategoryId;
use crate::model::item::{Item, ItemId};
use crate::query::item_query::{ItemOrder, ItemQuery};
use crate::repo::ItemRepository;

/// Item use-case facade over a repository implementation.
pub struct ItemService<R: ItemRepository> {
    repo: R,
}

impl<R: ItemRepository> ItemService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists items of one category in the requested order.
    pub fn list_items(&self, category_id: CategoryId, order: ItemOrder) -> StoreResult<Vec<Item>> {
        self.query_category(ItemQuery::in_category(category_id).ordered_by(order))
    }

    /// Case-insensitive title search inside one category, insertion order.
    pub fn search_items(&self, category_id: CategoryId, text: &str) -> StoreResult<Vec<Item>> {
        self.query_category(ItemQuery::in_category(category_id).with_title_containing(text))
    }

    pub fn get_item(&self, id: ItemId) -> StoreResult<Option<Item>> {
        self.repo.get_item(id).map_err(Into::into)
    }

    /// Creates an open item titled `title` (trimmed) in `category_id`.
    ///
    /// # Errors
    /// - `Validation` for blank titles; storage is not touched.
    /// - `CategoryNotFound` when the category is missing.
    pub fn add_item(&self, category_id: CategoryId, title: &str) -> StoreResult<Item> {
        log_outcome("item_add", self.add_item_inner(category_id, title))
    }

    /// Flips `done` and returns the persisted item.
    pub fn toggle_done(&self, id: ItemId) -> StoreResult<Item> {
        log_outcome("item_toggle", self.toggle_done_inner(id))
    }

    /// Deletes one item. A second call for the same id fails with
    /// `ItemNotFound`.
    pub fn delete_item(&self, id: ItemId) -> StoreResult<()> {
        log_outcome("item_delete", self.repo.delete_item(id).map_err(Into::into))
    }

    fn query_category(&self, query: ItemQuery) -> StoreResult<Vec<Item>> {
        if let Some(category_id) = query.category_uuid {
            self.ensure_category_exists(category_id)?;
        }
        self.repo.list_items(&query).map_err(Into::into)
    }

    fn add_item_inner(&self, category_id: CategoryId, title: &str) -> StoreResult<Item> {
        let item = Item::new(category_id, title)?;
        self.ensure_category_exists(category_id)?;
        let id = self.repo.create_item(&item)?;
        self.read_back(id, "created item not found in read-back")
    }

    fn toggle_done_inner(&self, id: ItemId) -> StoreResult<Item> {
        let mut item = self.repo.get_item(id)?.ok_or(StoreError::ItemNotFound(id))?;
        item.toggle_done();
        self.repo.update_item(&item)?;
        self.read_back(id, "toggled item not found in read-back")
    }

    fn ensure_category_exists(&self, category_id: CategoryId) -> StoreResult<()> {
        if !self.repo.category_exists(category_id)? {
            return Err(StoreError::CategoryNotFound(category_id));
        }
        Ok(())
    }

    fn read_back(&self, id: ItemId, details: &'static str) -> StoreResult<Item> {
        self.repo
            .get_item(id)?
            .ok_or(StoreError::InconsistentState(details))
    }
}
