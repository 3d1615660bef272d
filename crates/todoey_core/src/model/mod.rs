//! Domain model for categories and the to-do items they own.
//!
//! # Responsibility
//! - Define canonical records shared by every persistence backend.
//! - Normalize and validate user-entered names/titles before persistence.
//!
//! # Invariants
//! - Every record is identified by a stable UUID that is never reused.
//! - An item belongs to exactly one category via `category_uuid`.

pub mod category;
pub mod item;
pub mod validation;

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time as Unix epoch milliseconds.
///
/// Falls back to `0` if the system clock is set before the epoch.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
