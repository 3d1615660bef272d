//! Item screen rows for one selected category.

use super::{note_stale_rows, row_id, DeletableRows, ListingResult};
use crate::model::category::CategoryId;
use crate::model::item::{Item, ItemId};
use crate::query::item_query::ItemOrder;
use crate::repo::ItemRepository;
use crate::service::item_service::ItemService;

/// Mirror of one category's items, with optional search text.
pub struct ItemList<R: ItemRepository> {
    service: ItemService<R>,
    category_uuid: CategoryId,
    search: Option<String>,
    order: ItemOrder,
    rows: Vec<Item>,
}

impl<R: ItemRepository> ItemList<R> {
    /// Builds the mirror for `category_uuid` and performs the initial load.
    ///
    /// Fails with `CategoryNotFound` when the category does not exist.
    pub fn load(repo: R, category_uuid: CategoryId) -> ListingResult<Self> {
        let mut list = Self {
            service: ItemService::new(repo),
            category_uuid,
            search: None,
            order: ItemOrder::Insertion,
            rows: Vec::new(),
        };
        list.reload()?;
        Ok(list)
    }

    pub fn category_uuid(&self) -> CategoryId {
        self.category_uuid
    }

    pub fn rows(&self) -> &[Item] {
        &self.rows
    }

    pub fn item_at(&self, row: usize) -> Option<&Item> {
        self.rows.get(row)
    }

    /// Active search text, if any.
    pub fn search_text(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn service(&self) -> &ItemService<R> {
        &self.service
    }

    /// Re-queries storage using the current search text and order.
    pub fn reload(&mut self) -> ListingResult<()> {
        self.rows = self.fetch(self.search.as_deref(), self.order)?;
        Ok(())
    }

    /// Pull-to-refresh: reloads, then runs `on_complete` whatever the
    /// outcome, before returning.
    pub fn refresh(&mut self, on_complete: impl FnOnce()) -> ListingResult<()> {
        let result = self.reload();
        on_complete();
        result
    }

    /// Applies search text as typed. Blank text clears the search and
    /// restores the full listing.
    pub fn set_search(&mut self, text: &str) -> ListingResult<()> {
        let search = (!text.trim().is_empty()).then(|| text.to_string());
        self.rows = self.fetch(search.as_deref(), self.order)?;
        self.search = search;
        Ok(())
    }

    /// Changes ordering of the unfiltered listing. Search results always
    /// use insertion order.
    pub fn set_order(&mut self, order: ItemOrder) -> ListingResult<()> {
        self.rows = self.fetch(self.search.as_deref(), order)?;
        self.order = order;
        Ok(())
    }

    pub fn add(&mut self, title: &str) -> ListingResult<Item> {
        let item = self.service.add_item(self.category_uuid, title)?;
        note_stale_rows("item_add", self.reload());
        Ok(item)
    }

    /// Selecting a row toggles its completion flag.
    pub fn toggle_row(&mut self, row: usize) -> ListingResult<Item> {
        let id = self.id_at(row)?;
        let item = self.service.toggle_done(id)?;
        note_stale_rows("item_toggle", self.reload());
        Ok(item)
    }

    fn fetch(&self, search: Option<&str>, order: ItemOrder) -> ListingResult<Vec<Item>> {
        let rows = match search {
            Some(text) => self.service.search_items(self.category_uuid, text)?,
            None => self.service.list_items(self.category_uuid, order)?,
        };
        Ok(rows)
    }

    fn id_at(&self, row: usize) -> ListingResult<ItemId> {
        row_id(&self.rows, row, |item| item.uuid)
    }
}

impl<R: ItemRepository> DeletableRows for ItemList<R> {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn delete_row(&mut self, row: usize) -> ListingResult<()> {
        let id = self.id_at(row)?;
        self.service.delete_item(id)?;
        note_stale_rows("item_delete", self.reload());
        Ok(())
    }
}
