//! Category domain model.
//!
//! # Responsibility
//! - Define the grouping record that owns to-do items.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another category.
//! - `name` is non-empty and already trimmed.
//! - `colour`, when set, is an upper-case `#RRGGBB` string.

use super::now_epoch_ms;
use super::validation::{normalize_colour, normalize_name, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a category.
pub type CategoryId = Uuid;

/// A named list of to-do items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub uuid: CategoryId,
    /// User-facing label.
    pub name: String,
    /// Optional background colour for the category row.
    #[serde(default)]
    pub colour: Option<String>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl Category {
    /// Creates a category with a generated id.
    ///
    /// # Errors
    /// - [`ValidationError::EmptyName`] when `name` is blank after trim.
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        Self::with_id(Uuid::new_v4(), name)
    }

    /// Creates a category with a caller-provided id.
    pub fn with_id(uuid: CategoryId, name: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            uuid,
            name: normalize_name(name)?,
            colour: None,
            created_at: now_epoch_ms(),
        })
    }

    /// Replaces the colour, validating the hex format.
    pub fn set_colour(&mut self, colour: Option<&str>) -> Result<(), ValidationError> {
        self.colour = colour.map(normalize_colour).transpose()?;
        Ok(())
    }

    /// Re-checks invariants on a record read back from storage.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if let Some(colour) = self.colour.as_deref() {
            normalize_colour(colour)?;
        }
        Ok(())
    }
}
