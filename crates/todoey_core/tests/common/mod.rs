#![allow(dead_code)]

use std::cell::Cell;
use todoey_core::{
    open_store, Category, CategoryId, CategoryRepository, Item, ItemId, ItemQuery,
    ItemRepository, MemoryRepository, RepoError, RepoResult, StoreConfig, StoreHandle,
};

/// Runs `test` once per backend, each against a fresh empty store.
pub fn each_backend(test: impl Fn(&str, &StoreHandle)) {
    let dir = tempfile::tempdir().unwrap();
    let configs = [
        ("sqlite", StoreConfig::SqliteInMemory),
        ("memory", StoreConfig::Memory),
        (
            "json_file",
            StoreConfig::JsonFile {
                path: dir.path().join("todoey.json"),
            },
        ),
    ];
    for (name, config) in configs {
        let store = open_store(&config).unwrap();
        test(name, &store);
    }
}

/// Memory repository whose writes, or listings after a write, can be
/// switched to fail.
#[derive(Default)]
pub struct FlakyRepository {
    inner: MemoryRepository,
    fail_writes: Cell<bool>,
    fail_listing_after_write: Cell<bool>,
    listing_failing: Cell<bool>,
}

impl FlakyRepository {
    pub fn set_failing(&self, failing: bool) {
        self.fail_writes.set(failing);
    }

    /// The next successful write makes every later listing call fail.
    pub fn fail_listing_after_next_write(&self) {
        self.fail_listing_after_write.set(true);
    }

    pub fn restore_listing(&self) {
        self.fail_listing_after_write.set(false);
        self.listing_failing.set(false);
    }

    fn check(&self) -> RepoResult<()> {
        if self.fail_writes.get() {
            return Err(RepoError::Io(std::io::Error::other("disk full")));
        }
        Ok(())
    }

    fn wrote<T>(&self, result: RepoResult<T>) -> RepoResult<T> {
        if result.is_ok() && self.fail_listing_after_write.get() {
            self.listing_failing.set(true);
        }
        result
    }

    fn check_listing(&self) -> RepoResult<()> {
        if self.listing_failing.get() {
            return Err(RepoError::Io(std::io::Error::other("read interrupted")));
        }
        Ok(())
    }
}

impl CategoryRepository for FlakyRepository {
    fn create_category(&self, category: &Category) -> RepoResult<CategoryId> {
        self.check()?;
        self.wrote(self.inner.create_category(category))
    }

    fn update_category(&self, category: &Category) -> RepoResult<()> {
        self.check()?;
        self.wrote(self.inner.update_category(category))
    }

    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        self.inner.get_category(id)
    }

    fn list_categories(&self) -> RepoResult<Vec<Category>> {
        self.check_listing()?;
        self.inner.list_categories()
    }

    fn delete_category(&self, id: CategoryId) -> RepoResult<()> {
        self.check()?;
        self.wrote(self.inner.delete_category(id))
    }
}

impl ItemRepository for FlakyRepository {
    fn create_item(&self, item: &Item) -> RepoResult<ItemId> {
        self.check()?;
        self.wrote(self.inner.create_item(item))
    }

    fn update_item(&self, item: &Item) -> RepoResult<()> {
        self.check()?;
        self.wrote(self.inner.update_item(item))
    }

    fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>> {
        self.inner.get_item(id)
    }

    fn list_items(&self, query: &ItemQuery) -> RepoResult<Vec<Item>> {
        self.check_listing()?;
        self.inner.list_items(query)
    }

    fn delete_item(&self, id: ItemId) -> RepoResult<()> {
        self.check()?;
        self.wrote(self.inner.delete_item(id))
    }

    fn category_exists(&self, id: CategoryId) -> RepoResult<bool> {
        self.inner.category_exists(id)
    }
}

pub fn titles(items: &[Item]) -> Vec<&str> {
    items.iter().map(|item| item.title.as_str()).collect()
}
