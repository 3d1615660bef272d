//! Flat key-value blob backend: the whole dataset as one JSON document.
//!
//! # Responsibility
//! - Load the document once at open and serve reads from memory.
//! - Rewrite the document on every mutation.
//!
//! # Invariants
//! - In-memory state is replaced only after the new document is durably on
//!   disk (write to `<file>.tmp`, fsync, rename).
//! - A missing file opens as an empty store; the parent directory is never
//!   created implicitly.

use super::snapshot::Snapshot;
use super::{CategoryRepository, ItemRepository, RepoResult};
use crate::model::category::{Category, CategoryId};
use crate::model::item::{Item, ItemId};
use crate::query::item_query::ItemQuery;
use log::{error, info};
use std::cell::RefCell;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Repository persisting to a single JSON file.
#[derive(Debug)]
pub struct JsonFileRepository {
    path: PathBuf,
    state: RefCell<Snapshot>,
}

impl JsonFileRepository {
    /// Opens the store at `path`, loading existing contents if present.
    ///
    /// # Errors
    /// - `Io` when the file exists but cannot be read.
    /// - `Serialization` / `Validation` / `InvalidData` for corrupt contents.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        let path = path.as_ref().to_path_buf();
        let started_at = Instant::now();

        let state = match fs::read(&path) {
            Ok(bytes) => Snapshot::from_json(&bytes),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Snapshot::default()),
            Err(err) => Err(err.into()),
        };
        let state = state.map_err(|err| {
            error!(
                "event=store_open module=repo status=error backend=json_file duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            );
            err
        })?;

        info!(
            "event=store_open module=repo status=ok backend=json_file duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(Self {
            path,
            state: RefCell::new(state),
        })
    }

    /// Backing file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read<T>(&self, f: impl FnOnce(&Snapshot) -> T) -> T {
        f(&*self.state.borrow())
    }

    fn commit<T>(&self, f: impl FnOnce(&mut Snapshot) -> RepoResult<T>) -> RepoResult<T> {
        let mut next = self.state.borrow().clone();
        let value = f(&mut next)?;
        write_atomically(&self.path, &next.to_json()?)?;
        *self.state.borrow_mut() = next;
        Ok(value)
    }
}

impl CategoryRepository for JsonFileRepository {
    fn create_category(&self, category: &Category) -> RepoResult<CategoryId> {
        self.commit(|state| state.insert_category(category))?;
        Ok(category.uuid)
    }

    fn update_category(&self, category: &Category) -> RepoResult<()> {
        self.commit(|state| state.update_category(category))
    }

    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        Ok(self.read(|state| state.get_category(id)))
    }

    fn list_categories(&self) -> RepoResult<Vec<Category>> {
        Ok(self.read(Snapshot::list_categories))
    }

    fn delete_category(&self, id: CategoryId) -> RepoResult<()> {
        self.commit(|state| state.remove_category(id))
    }
}

impl ItemRepository for JsonFileRepository {
    fn create_item(&self, item: &Item) -> RepoResult<ItemId> {
        self.commit(|state| state.insert_item(item))?;
        Ok(item.uuid)
    }

    fn update_item(&self, item: &Item) -> RepoResult<()> {
        self.commit(|state| state.update_item(item))
    }

    fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>> {
        Ok(self.read(|state| state.get_item(id)))
    }

    fn list_items(&self, query: &ItemQuery) -> RepoResult<Vec<Item>> {
        Ok(self.read(|state| state.list_items(query)))
    }

    fn delete_item(&self, id: ItemId) -> RepoResult<()> {
        self.commit(|state| state.remove_item(id))
    }

    fn category_exists(&self, id: CategoryId) -> RepoResult<bool> {
        Ok(self.read(|state| state.contains_category(id)))
    }
}

fn write_atomically(path: &Path, bytes: &[u8]) -> RepoResult<()> {
    let tmp_path = temp_path_for(path);
    if let Err(err) = write_and_rename(&tmp_path, path, bytes) {
        let _ = fs::remove_file(&tmp_path);
        error!("event=store_write module=repo status=error backend=json_file error={err}");
        return Err(err.into());
    }
    Ok(())
}

fn write_and_rename(tmp_path: &Path, path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(tmp_path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    fs::rename(tmp_path, path)
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("todoey"));
    name.push(".tmp");
    path.with_file_name(name)
}
