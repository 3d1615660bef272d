//! Category store.
//!
//! # Invariants
//! - Names are trimmed and non-empty before reaching the repository.
//! - Deleting a category cascades to every item it owns.

use super::{log_outcome, StoreError, StoreResult};
use crate::model::category::{Category, CategoryId};
use crate::repo::CategoryRepository;

/// Category use-case facade over a repository implementation.
pub struct CategoryService<R: CategoryRepository> {
    repo: R,
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists all categories in insertion order.
    pub fn list_categories(&self) -> StoreResult<Vec<Category>> {
        self.repo.list_categories().map_err(Into::into)
    }

    pub fn get_category(&self, id: CategoryId) -> StoreResult<Option<Category>> {
        self.repo.get_category(id).map_err(Into::into)
    }

    /// Creates and persists a category named `name` (trimmed).
    ///
    /// # Errors
    /// - `Validation` for blank names; storage is not touched.
    pub fn add_category(&self, name: &str) -> StoreResult<Category> {
        log_outcome("category_add", self.add_category_inner(name))
    }

    /// Deletes a category together with its items.
    pub fn delete_category(&self, id: CategoryId) -> StoreResult<()> {
        log_outcome(
            "category_delete",
            self.repo.delete_category(id).map_err(Into::into),
        )
    }

    /// Sets or clears the category background colour (`#RRGGBB`).
    pub fn set_category_colour(
        &self,
        id: CategoryId,
        colour: Option<&str>,
    ) -> StoreResult<Category> {
        log_outcome("category_colour", self.set_colour_inner(id, colour))
    }

    fn add_category_inner(&self, name: &str) -> StoreResult<Category> {
        let category = Category::new(name)?;
        let id = self.repo.create_category(&category)?;
        self.repo
            .get_category(id)?
            .ok_or(StoreError::InconsistentState(
                "created category not found in read-back",
            ))
    }

    fn set_colour_inner(&self, id: CategoryId, colour: Option<&str>) -> StoreResult<Category> {
        let mut category = self
            .repo
            .get_category(id)?
            .ok_or(StoreError::CategoryNotFound(id))?;
        category.set_colour(colour)?;
        self.repo.update_category(&category)?;
        self.repo
            .get_category(id)?
            .ok_or(StoreError::InconsistentState(
                "updated category not found in read-back",
            ))
    }
}
