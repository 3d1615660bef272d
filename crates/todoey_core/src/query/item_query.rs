//! Item query value and its in-memory evaluator.

use crate::model::category::CategoryId;
use crate::model::item::Item;
use std::cmp::Ordering;

/// Requested ordering for item listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ItemOrder {
    /// Persistence-native insertion order.
    #[default]
    Insertion,
    /// `created_at` ascending. Items without a timestamp keep their relative
    /// insertion order and sort after dated ones.
    CreatedAt,
}

/// Conjunctive filter over items plus an ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemQuery {
    /// Only items owned by this category.
    pub category_uuid: Option<CategoryId>,
    /// Case-insensitive substring that `title` must contain.
    pub title_contains: Option<String>,
    pub order: ItemOrder,
}

impl ItemQuery {
    /// Matches every item in insertion order.
    pub fn all() -> Self {
        Self::default()
    }

    /// Matches items owned by one category.
    pub fn in_category(category_uuid: CategoryId) -> Self {
        Self {
            category_uuid: Some(category_uuid),
            ..Self::default()
        }
    }

    /// Adds a title containment predicate. Blank text leaves the query
    /// unfiltered; any other text is matched as given, spaces included.
    pub fn with_title_containing(mut self, text: &str) -> Self {
        self.title_contains = (!text.trim().is_empty()).then(|| text.to_string());
        self
    }

    pub fn ordered_by(mut self, order: ItemOrder) -> Self {
        self.order = order;
        self
    }

    /// Returns whether `item` satisfies every predicate.
    pub fn matches(&self, item: &Item) -> bool {
        if let Some(category_uuid) = self.category_uuid {
            if item.category_uuid != category_uuid {
                return false;
            }
        }
        self.matches_title(&item.title)
    }

    /// Title predicate alone, with Unicode lower-case folding.
    pub fn matches_title(&self, title: &str) -> bool {
        match self.title_contains.as_deref() {
            Some(needle) => title.to_lowercase().contains(&needle.to_lowercase()),
            None => true,
        }
    }

    /// Filters `items` (given in insertion order) and applies the ordering.
    pub fn apply(&self, items: impl IntoIterator<Item = Item>) -> Vec<Item> {
        let mut matched: Vec<Item> = items.into_iter().filter(|item| self.matches(item)).collect();
        if self.order == ItemOrder::CreatedAt {
            // `sort_by` is stable, so equal keys keep insertion order.
            matched.sort_by(|left, right| compare_created_at(left.created_at, right.created_at));
        }
        matched
    }
}

fn compare_created_at(left: Option<i64>, right: Option<i64>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::{ItemOrder, ItemQuery};
    use crate::model::item::Item;
    use uuid::Uuid;

    fn item(category: Uuid, title: &str, created_at: Option<i64>) -> Item {
        let mut item = Item::new(category, title).unwrap();
        item.created_at = created_at;
        item
    }

    #[test]
    fn title_predicate_is_case_insensitive() {
        let category = Uuid::new_v4();
        let query = ItemQuery::in_category(category).with_title_containing("EGG");
        assert!(query.matches(&item(category, "Buy Eggos", None)));
        assert!(!query.matches(&item(category, "Find Mike", None)));
    }

    #[test]
    fn category_scope_excludes_other_categories() {
        let home = Uuid::new_v4();
        let work = Uuid::new_v4();
        let query = ItemQuery::in_category(home);
        assert!(!query.matches(&item(work, "Buy Eggos", None)));
    }

    #[test]
    fn blank_text_clears_predicate() {
        let query = ItemQuery::all().with_title_containing("   ");
        assert_eq!(query.title_contains, None);
    }

    #[test]
    fn created_at_order_is_stable_and_puts_undated_last() {
        let category = Uuid::new_v4();
        let items = vec![
            item(category, "undated-a", None),
            item(category, "late", Some(30)),
            item(category, "tie-first", Some(10)),
            item(category, "undated-b", None),
            item(category, "tie-second", Some(10)),
        ];

        let titles: Vec<String> = ItemQuery::in_category(category)
            .ordered_by(ItemOrder::CreatedAt)
            .apply(items)
            .into_iter()
            .map(|item| item.title)
            .collect();

        assert_eq!(
            titles,
            ["tie-first", "tie-second", "late", "undated-a", "undated-b"]
        );
    }

    #[test]
    fn title_predicate_folds_unicode_case() {
        let query = ItemQuery::all().with_title_containing("ÄRGER");
        assert!(query.matches_title("Ärger klären"));
        assert!(ItemQuery::all()
            .with_title_containing("éclair")
            .matches_title("Éclair kaufen"));
    }

    #[test]
    fn surrounding_spaces_are_part_of_the_needle() {
        let query = ItemQuery::all().with_title_containing("Milk ");
        assert_eq!(query.title_contains.as_deref(), Some("Milk "));
        assert!(!query.matches_title("Milkshake"));
        assert!(query.matches_title("Oat milk carton"));
    }
}
