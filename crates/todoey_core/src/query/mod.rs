//! Item filtering and ordering.
//!
//! # Responsibility
//! - Compose the category scope and title predicate into one query value.
//! - Evaluate queries in memory for backends without native predicates.
//! - Render SQL fragments for the relational backend.
//!
//! # Invariants
//! - Predicates are conjunctive.
//! - Ordering is stable: ties keep insertion order.

pub mod item_query;
