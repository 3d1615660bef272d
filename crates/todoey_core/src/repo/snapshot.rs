//! Whole-dataset document shared by the memory and JSON file backends.
//!
//! # Invariants
//! - Categories and each category's items are kept in insertion order.
//! - Items are nested under their owning category; `category_uuid` is
//!   derived from the nesting on read and never stored.
//! - Every mutator checks its preconditions before changing anything.

use super::{RepoError, RepoResult};
use crate::model::category::{Category, CategoryId};
use crate::model::item::{Item, ItemId};
use crate::query::item_query::ItemQuery;
use serde::{Deserialize, Serialize};

pub(crate) const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Snapshot {
    version: u32,
    #[serde(default)]
    categories: Vec<StoredCategory>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StoredCategory {
    #[serde(flatten)]
    category: Category,
    #[serde(default)]
    items: Vec<StoredItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StoredItem {
    uuid: ItemId,
    title: String,
    done: bool,
    #[serde(default)]
    created_at: Option<i64>,
}

impl StoredItem {
    fn from_item(item: &Item) -> Self {
        Self {
            uuid: item.uuid,
            title: item.title.clone(),
            done: item.done,
            created_at: item.created_at,
        }
    }

    fn to_item(&self, category_uuid: CategoryId) -> Item {
        Item {
            uuid: self.uuid,
            category_uuid,
            title: self.title.clone(),
            done: self.done,
            created_at: self.created_at,
        }
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            categories: Vec::new(),
        }
    }
}

impl Snapshot {
    /// Decodes a snapshot and re-validates every record.
    pub(crate) fn from_json(bytes: &[u8]) -> RepoResult<Self> {
        let snapshot: Self = serde_json::from_slice(bytes)?;
        if snapshot.version > SNAPSHOT_VERSION {
            return Err(RepoError::InvalidData(format!(
                "snapshot version {} is newer than supported {SNAPSHOT_VERSION}",
                snapshot.version
            )));
        }
        for stored in &snapshot.categories {
            stored.category.validate()?;
            for item in &stored.items {
                item.to_item(stored.category.uuid).validate()?;
            }
        }
        Ok(snapshot)
    }

    pub(crate) fn to_json(&self) -> RepoResult<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    pub(crate) fn list_categories(&self) -> Vec<Category> {
        self.categories
            .iter()
            .map(|stored| stored.category.clone())
            .collect()
    }

    pub(crate) fn get_category(&self, id: CategoryId) -> Option<Category> {
        self.find_category(id).map(|stored| stored.category.clone())
    }

    pub(crate) fn contains_category(&self, id: CategoryId) -> bool {
        self.find_category(id).is_some()
    }

    pub(crate) fn insert_category(&mut self, category: &Category) -> RepoResult<()> {
        category.validate()?;
        if self.contains_category(category.uuid) {
            return Err(RepoError::InvalidData(format!(
                "duplicate category uuid {}",
                category.uuid
            )));
        }
        self.categories.push(StoredCategory {
            category: category.clone(),
            items: Vec::new(),
        });
        Ok(())
    }

    pub(crate) fn update_category(&mut self, category: &Category) -> RepoResult<()> {
        category.validate()?;
        let stored = self
            .categories
            .iter_mut()
            .find(|stored| stored.category.uuid == category.uuid)
            .ok_or(RepoError::CategoryNotFound(category.uuid))?;
        stored.category = category.clone();
        Ok(())
    }

    /// Removes the category together with its nested items.
    pub(crate) fn remove_category(&mut self, id: CategoryId) -> RepoResult<()> {
        let index = self
            .categories
            .iter()
            .position(|stored| stored.category.uuid == id)
            .ok_or(RepoError::CategoryNotFound(id))?;
        self.categories.remove(index);
        Ok(())
    }

    pub(crate) fn list_items(&self, query: &ItemQuery) -> Vec<Item> {
        let items = self
            .categories
            .iter()
            .filter(|stored| {
                query
                    .category_uuid
                    .map_or(true, |id| stored.category.uuid == id)
            })
            .flat_map(|stored| {
                stored
                    .items
                    .iter()
                    .map(|item| item.to_item(stored.category.uuid))
            });
        query.apply(items)
    }

    pub(crate) fn get_item(&self, id: ItemId) -> Option<Item> {
        self.categories.iter().find_map(|stored| {
            stored
                .items
                .iter()
                .find(|item| item.uuid == id)
                .map(|item| item.to_item(stored.category.uuid))
        })
    }

    pub(crate) fn insert_item(&mut self, item: &Item) -> RepoResult<()> {
        item.validate()?;
        if self.get_item(item.uuid).is_some() {
            return Err(RepoError::InvalidData(format!(
                "duplicate item uuid {}",
                item.uuid
            )));
        }
        let owner = self
            .find_category_mut(item.category_uuid)
            .ok_or(RepoError::CategoryNotFound(item.category_uuid))?;
        owner.items.push(StoredItem::from_item(item));
        Ok(())
    }

    /// Replaces an item in place, or moves it to the end of another
    /// category when `category_uuid` changed.
    pub(crate) fn update_item(&mut self, item: &Item) -> RepoResult<()> {
        item.validate()?;
        let current = self
            .get_item(item.uuid)
            .ok_or(RepoError::ItemNotFound(item.uuid))?;

        if current.category_uuid == item.category_uuid {
            if let Some(stored) = self
                .find_category_mut(item.category_uuid)
                .and_then(|owner| owner.items.iter_mut().find(|stored| stored.uuid == item.uuid))
            {
                *stored = StoredItem::from_item(item);
            }
            return Ok(());
        }

        if !self.contains_category(item.category_uuid) {
            return Err(RepoError::CategoryNotFound(item.category_uuid));
        }
        self.remove_item(item.uuid)?;
        self.insert_item(item)
    }

    pub(crate) fn remove_item(&mut self, id: ItemId) -> RepoResult<()> {
        for stored in &mut self.categories {
            if let Some(index) = stored.items.iter().position(|item| item.uuid == id) {
                stored.items.remove(index);
                return Ok(());
            }
        }
        Err(RepoError::ItemNotFound(id))
    }

    fn find_category(&self, id: CategoryId) -> Option<&StoredCategory> {
        self.categories
            .iter()
            .find(|stored| stored.category.uuid == id)
    }

    fn find_category_mut(&mut self, id: CategoryId) -> Option<&mut StoredCategory> {
        self.categories
            .iter_mut()
            .find(|stored| stored.category.uuid == id)
    }
}

#[cfg(test)]
mod tests {
    use super::Snapshot;
    use crate::model::category::Category;
    use crate::model::item::Item;
    use crate::query::item_query::ItemQuery;
    use crate::repo::RepoError;

    #[test]
    fn json_layout_nests_items_under_categories() {
        let mut snapshot = Snapshot::default();
        let work = Category::new("Work").unwrap();
        snapshot.insert_category(&work).unwrap();
        let item = Item::new(work.uuid, "Find Mike").unwrap();
        snapshot.insert_item(&item).unwrap();

        let value: serde_json::Value =
            serde_json::from_slice(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["categories"][0]["name"], "Work");
        assert_eq!(value["categories"][0]["items"][0]["title"], "Find Mike");
        assert!(value["categories"][0]["items"][0]
            .get("category_uuid")
            .is_none());
    }

    #[test]
    fn legacy_items_without_timestamp_decode() {
        let json = r#"{
            "version": 1,
            "categories": [{
                "uuid": "00000000-0000-4000-8000-000000000001",
                "name": "Home",
                "created_at": 0,
                "items": [{
                    "uuid": "00000000-0000-4000-8000-000000000002",
                    "title": "Destroy Demogorgon",
                    "done": false
                }]
            }]
        }"#;

        let snapshot = Snapshot::from_json(json.as_bytes()).unwrap();
        let items = snapshot.list_items(&ItemQuery::all());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].created_at, None);
        assert_eq!(snapshot.list_categories()[0].colour, None);
    }

    #[test]
    fn newer_snapshot_version_is_rejected() {
        let err = Snapshot::from_json(br#"{"version": 99, "categories": []}"#).unwrap_err();
        assert!(matches!(err, RepoError::InvalidData(_)));
    }

    #[test]
    fn blank_title_in_stored_data_is_rejected() {
        let json = r#"{
            "version": 1,
            "categories": [{
                "uuid": "00000000-0000-4000-8000-000000000001",
                "name": "Home",
                "created_at": 0,
                "items": [{
                    "uuid": "00000000-0000-4000-8000-000000000002",
                    "title": "  ",
                    "done": false
                }]
            }]
        }"#;
        let err = Snapshot::from_json(json.as_bytes()).unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[test]
    fn moving_item_between_categories_appends_to_target() {
        let mut snapshot = Snapshot::default();
        let home = Category::new("Home").unwrap();
        let work = Category::new("Work").unwrap();
        snapshot.insert_category(&home).unwrap();
        snapshot.insert_category(&work).unwrap();
        let existing = Item::new(work.uuid, "Standup").unwrap();
        snapshot.insert_item(&existing).unwrap();
        let mut moving = Item::new(home.uuid, "Buy Eggos").unwrap();
        snapshot.insert_item(&moving).unwrap();

        moving.category_uuid = work.uuid;
        snapshot.update_item(&moving).unwrap();

        assert!(snapshot
            .list_items(&ItemQuery::in_category(home.uuid))
            .is_empty());
        let work_titles: Vec<String> = snapshot
            .list_items(&ItemQuery::in_category(work.uuid))
            .into_iter()
            .map(|item| item.title)
            .collect();
        assert_eq!(work_titles, ["Standup", "Buy Eggos"]);
    }
}
