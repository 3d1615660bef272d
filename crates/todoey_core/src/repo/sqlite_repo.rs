//! Relational backend over a migrated SQLite connection.
//!
//! # Responsibility
//! - Map category/item contracts onto the `categories` and `items` tables.
//! - Push item scope and ordering down to SQL (`WHERE` + `ORDER BY`); the
//!   title predicate is evaluated on decoded rows.
//!
//! # Invariants
//! - Listing order is insertion order (`rowid ASC`) unless `created_at`
//!   ordering is requested.
//! - Category deletion removes owned items in the same transaction.
//! - Title containment folds Unicode case, same as the snapshot backends.

use crate::db::migrations::latest_version;
use crate::model::category::{Category, CategoryId};
use crate::model::item::{Item, ItemId};
use crate::query::item_query::{ItemOrder, ItemQuery};
use crate::repo::{CategoryRepository, ItemRepository, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{
    params, params_from_iter, Connection, OptionalExtension, Row, Transaction,
    TransactionBehavior,
};
use uuid::Uuid;

const CATEGORY_SELECT_SQL: &str = "SELECT
    category_uuid,
    name,
    colour,
    created_at
FROM categories";

const ITEM_SELECT_SQL: &str = "SELECT
    item_uuid,
    category_uuid,
    title,
    done,
    created_at
FROM items";

const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    ("categories", &["category_uuid", "name", "colour", "created_at"]),
    (
        "items",
        &["item_uuid", "category_uuid", "title", "done", "created_at"],
    ),
];

/// SQLite-backed category and item repository.
pub struct SqliteTodoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTodoRepository<'conn> {
    /// Creates a repository after checking the connection is fully migrated.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    /// Wraps a connection already checked by [`Self::try_new`] or opened via
    /// `db::open_db*`.
    pub(crate) fn from_ready(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CategoryRepository for SqliteTodoRepository<'_> {
    fn create_category(&self, category: &Category) -> RepoResult<CategoryId> {
        category.validate()?;

        self.conn.execute(
            "INSERT INTO categories (
                category_uuid,
                name,
                colour,
                created_at
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                category.uuid.to_string(),
                category.name.as_str(),
                category.colour.as_deref(),
                category.created_at,
            ],
        )?;

        Ok(category.uuid)
    }

    fn update_category(&self, category: &Category) -> RepoResult<()> {
        category.validate()?;

        let changed = self.conn.execute(
            "UPDATE categories
             SET name = ?2,
                 colour = ?3
             WHERE category_uuid = ?1;",
            params![
                category.uuid.to_string(),
                category.name.as_str(),
                category.colour.as_deref(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::CategoryNotFound(category.uuid));
        }
        Ok(())
    }

    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CATEGORY_SELECT_SQL} WHERE category_uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_category_row(row)?));
        }
        Ok(None)
    }

    fn list_categories(&self) -> RepoResult<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CATEGORY_SELECT_SQL} ORDER BY rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next()? {
            categories.push(parse_category_row(row)?);
        }
        Ok(categories)
    }

    fn delete_category(&self, id: CategoryId) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !category_exists(&tx, id)? {
            return Err(RepoError::CategoryNotFound(id));
        }

        tx.execute(
            "DELETE FROM items WHERE category_uuid = ?1;",
            [id.to_string()],
        )?;
        tx.execute(
            "DELETE FROM categories WHERE category_uuid = ?1;",
            [id.to_string()],
        )?;

        tx.commit()?;
        Ok(())
    }
}

impl ItemRepository for SqliteTodoRepository<'_> {
    fn create_item(&self, item: &Item) -> RepoResult<ItemId> {
        item.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !category_exists(&tx, item.category_uuid)? {
            return Err(RepoError::CategoryNotFound(item.category_uuid));
        }

        tx.execute(
            "INSERT INTO items (
                item_uuid,
                category_uuid,
                title,
                done,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                item.uuid.to_string(),
                item.category_uuid.to_string(),
                item.title.as_str(),
                bool_to_int(item.done),
                item.created_at,
            ],
        )?;

        tx.commit()?;
        Ok(item.uuid)
    }

    fn update_item(&self, item: &Item) -> RepoResult<()> {
        item.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !category_exists(&tx, item.category_uuid)? {
            return Err(RepoError::CategoryNotFound(item.category_uuid));
        }

        let changed = tx.execute(
            "UPDATE items
             SET category_uuid = ?2,
                 title = ?3,
                 done = ?4,
                 created_at = ?5
             WHERE item_uuid = ?1;",
            params![
                item.uuid.to_string(),
                item.category_uuid.to_string(),
                item.title.as_str(),
                bool_to_int(item.done),
                item.created_at,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::ItemNotFound(item.uuid));
        }

        tx.commit()?;
        Ok(())
    }

    fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} WHERE item_uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_item_row(row)?));
        }
        Ok(None)
    }

    fn list_items(&self, query: &ItemQuery) -> RepoResult<Vec<Item>> {
        let mut sql = format!("{ITEM_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(category_uuid) = query.category_uuid {
            sql.push_str(" AND category_uuid = ?");
            bind_values.push(Value::Text(category_uuid.to_string()));
        }

        match query.order {
            ItemOrder::Insertion => sql.push_str(" ORDER BY rowid ASC"),
            ItemOrder::CreatedAt => {
                sql.push_str(" ORDER BY created_at IS NULL ASC, created_at ASC, rowid ASC")
            }
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            let item = parse_item_row(row)?;
            if query.matches_title(&item.title) {
                items.push(item);
            }
        }
        Ok(items)
    }

    fn delete_item(&self, id: ItemId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM items WHERE item_uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::ItemNotFound(id));
        }
        Ok(())
    }

    fn category_exists(&self, id: CategoryId) -> RepoResult<bool> {
        category_exists(self.conn, id)
    }
}

fn category_exists(conn: &Connection, id: CategoryId) -> RepoResult<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM categories WHERE category_uuid = ?1;",
            [id.to_string()],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

fn parse_category_row(row: &Row<'_>) -> RepoResult<Category> {
    let uuid_text: String = row.get("category_uuid")?;
    let category = Category {
        uuid: parse_uuid(&uuid_text, "categories.category_uuid")?,
        name: row.get("name")?,
        colour: row.get("colour")?,
        created_at: row.get("created_at")?,
    };
    category.validate()?;
    Ok(category)
}

fn parse_item_row(row: &Row<'_>) -> RepoResult<Item> {
    let uuid_text: String = row.get("item_uuid")?;
    let category_text: String = row.get("category_uuid")?;

    let done = match row.get::<_, i64>("done")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid done value `{other}` in items.done"
            )));
        }
    };

    let item = Item {
        uuid: parse_uuid(&uuid_text, "items.item_uuid")?,
        category_uuid: parse_uuid(&category_text, "items.category_uuid")?,
        title: row.get("title")?,
        done,
        created_at: row.get("created_at")?,
    };
    item.validate()?;
    Ok(item)
}

fn parse_uuid(value: &str, column: &'static str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

fn bool_to_int(value: bool) -> i64 {
    i64::from(value)
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &(table, columns) in REQUIRED_COLUMNS {
        let present = table_columns(conn, table)?;
        if present.is_empty() {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !present.iter().any(|name| name == column) {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

fn table_columns(conn: &Connection, table: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        columns.push(row.get::<_, String>(1)?);
    }
    Ok(columns)
}
