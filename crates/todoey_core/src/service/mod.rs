//! Use-case services: the category store and the item store.
//!
//! # Responsibility
//! - Validate user input before any repository call.
//! - Translate repository failures into the caller-facing `StoreError`.
//! - Read records back after writes so callers see persisted state.
//!
//! # Invariants
//! - Services never bypass repository contracts.
//! - A service call reports success only after the repository committed.

pub mod category_service;
pub mod item_service;

use crate::model::category::CategoryId;
use crate::model::item::ItemId;
use crate::model::validation::ValidationError;
use crate::repo::RepoError;
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Caller-facing error for category and item use-cases.
#[derive(Debug)]
pub enum StoreError {
    /// Blank name/title or malformed colour. No storage call was made.
    Validation(ValidationError),
    CategoryNotFound(CategoryId),
    ItemNotFound(ItemId),
    /// Backend failed to fetch, save, or delete.
    Persistence(RepoError),
    /// Write succeeded but read-back disagreed.
    InconsistentState(&'static str),
}

impl StoreError {
    /// Validation failures are expected to be silent no-ops in the UI.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::CategoryNotFound(_) | Self::ItemNotFound(_))
    }

    /// Stable short code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::CategoryNotFound(_) => "category_not_found",
            Self::ItemNotFound(_) => "item_not_found",
            Self::Persistence(_) => "persistence",
            Self::InconsistentState(_) => "inconsistent_state",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::CategoryNotFound(id) => write!(f, "category not found: {id}"),
            Self::ItemNotFound(id) => write!(f, "item not found: {id}"),
            Self::Persistence(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent store state: {details}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Persistence(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::CategoryNotFound(id) => Self::CategoryNotFound(id),
            RepoError::ItemNotFound(id) => Self::ItemNotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Persistence(other),
        }
    }
}

/// Emits one metadata-only log line for a finished use-case call.
fn log_outcome<T>(event: &'static str, result: StoreResult<T>) -> StoreResult<T> {
    match &result {
        Ok(_) => debug!("event={event} module=service status=ok"),
        Err(err) if err.is_validation() => {
            debug!("event={event} module=service status=rejected error_code=validation")
        }
        Err(err) => warn!(
            "event={event} module=service status=error error_code={} error={err}",
            err.code()
        ),
    }
    result
}
