//! Category screen rows.

use super::{note_stale_rows, row_id, DeletableRows, ListingResult};
use crate::model::category::{Category, CategoryId};
use crate::repo::CategoryRepository;
use crate::service::category_service::CategoryService;

/// Mirror of the category listing.
pub struct CategoryList<R: CategoryRepository> {
    service: CategoryService<R>,
    rows: Vec<Category>,
}

impl<R: CategoryRepository> CategoryList<R> {
    /// Builds the mirror and performs the initial load.
    pub fn load(repo: R) -> ListingResult<Self> {
        let mut list = Self {
            service: CategoryService::new(repo),
            rows: Vec::new(),
        };
        list.reload()?;
        Ok(list)
    }

    pub fn rows(&self) -> &[Category] {
        &self.rows
    }

    pub fn category_at(&self, row: usize) -> Option<&Category> {
        self.rows.get(row)
    }

    pub fn service(&self) -> &CategoryService<R> {
        &self.service
    }

    /// Re-queries storage and replaces the rows.
    pub fn reload(&mut self) -> ListingResult<()> {
        self.rows = self.service.list_categories()?;
        Ok(())
    }

    /// Pull-to-refresh: reloads, then runs `on_complete` whatever the
    /// outcome, before returning.
    pub fn refresh(&mut self, on_complete: impl FnOnce()) -> ListingResult<()> {
        let result = self.reload();
        on_complete();
        result
    }

    pub fn add(&mut self, name: &str) -> ListingResult<Category> {
        let category = self.service.add_category(name)?;
        note_stale_rows("category_add", self.reload());
        Ok(category)
    }

    pub fn set_colour(&mut self, row: usize, colour: Option<&str>) -> ListingResult<Category> {
        let id = self.id_at(row)?;
        let category = self.service.set_category_colour(id, colour)?;
        note_stale_rows("category_colour", self.reload());
        Ok(category)
    }

    fn id_at(&self, row: usize) -> ListingResult<CategoryId> {
        row_id(&self.rows, row, |category| category.uuid)
    }
}

impl<R: CategoryRepository> DeletableRows for CategoryList<R> {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn delete_row(&mut self, row: usize) -> ListingResult<()> {
        let id = self.id_at(row)?;
        self.service.delete_category(id)?;
        note_stale_rows("category_delete", self.reload());
        Ok(())
    }
}
