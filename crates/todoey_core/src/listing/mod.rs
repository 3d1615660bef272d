//! Row mirrors that a host list screen renders.
//!
//! # Responsibility
//! - Hold the current rows of a category or item screen.
//! - Resolve row positions to stable ids before calling the stores.
//! - Recompute rows from storage after every confirmed mutation.
//!
//! # Invariants
//! - Row positions never reach the service layer.
//! - Rows are replaced only by a successful re-query; a failed call leaves
//!   them untouched.
//! - A committed mutation reports its committed result even when the
//!   follow-up re-query fails; rows stay stale until the next reload.

pub mod category_list;
pub mod item_list;

use crate::service::StoreError;
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ListingResult<T> = Result<T, ListingError>;

/// Errors surfaced to the host screen.
#[derive(Debug)]
pub enum ListingError {
    /// Row index does not exist in the current rows.
    RowOutOfRange { row: usize, len: usize },
    Store(StoreError),
}

impl ListingError {
    /// Mirrors [`StoreError::is_validation`] so hosts can stay silent.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Store(err) if err.is_validation())
    }
}

impl Display for ListingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RowOutOfRange { row, len } => {
                write!(f, "row {row} out of range for {len} rows")
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ListingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::RowOutOfRange { .. } => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for ListingError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Swipe-to-delete capability a host invokes on a list screen.
pub trait DeletableRows {
    fn row_count(&self) -> usize;
    /// Deletes the record currently shown at `row`.
    fn delete_row(&mut self, row: usize) -> ListingResult<()>;
}

fn row_id<T, Id: Copy>(rows: &[T], row: usize, id: impl Fn(&T) -> Id) -> ListingResult<Id> {
    rows.get(row).map(id).ok_or(ListingError::RowOutOfRange {
        row,
        len: rows.len(),
    })
}

/// Logs a failed post-commit re-query without failing the mutation.
fn note_stale_rows(event: &'static str, reload: ListingResult<()>) {
    if let Err(err) = reload {
        warn!("event={event} module=listing status=stale_rows error={err}");
    }
}
