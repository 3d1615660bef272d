//! To-do item domain model.
//!
//! # Invariants
//! - `title` is non-empty and already trimmed.
//! - `category_uuid` is a lookup back-reference; ownership lives with the
//!   repository's category scoping.
//! - `done` is a plain two-state flag toggled by the item service.

use super::category::CategoryId;
use super::now_epoch_ms;
use super::validation::{normalize_title, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for an item.
pub type ItemId = Uuid;

/// One to-do entry inside a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub uuid: ItemId,
    pub category_uuid: CategoryId,
    pub title: String,
    pub done: bool,
    /// Unix epoch milliseconds. `None` for records written by older builds
    /// that did not track creation time.
    #[serde(default)]
    pub created_at: Option<i64>,
}

impl Item {
    /// Creates an open item stamped with the current time.
    ///
    /// # Errors
    /// - [`ValidationError::EmptyTitle`] when `title` is blank after trim.
    pub fn new(category_uuid: CategoryId, title: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            uuid: Uuid::new_v4(),
            category_uuid,
            title: normalize_title(title)?,
            done: false,
            created_at: Some(now_epoch_ms()),
        })
    }

    /// Flips `done`.
    pub fn toggle_done(&mut self) {
        self.done = !self.done;
    }

    /// Re-checks invariants on a record read back from storage.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(())
    }
}
