//! Category repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the `categories` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `name` lookups are exact and case-sensitive (BINARY collation).
//! - Unique-name violations surface as `RepoError::DuplicateName`, so the
//!   column constraint backstops the service-level pre-check under races.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::category::{Category, CategoryDraft, CategoryId, CategoryUpdate};
use crate::model::product::ProductId;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CATEGORY_SELECT_SQL: &str = "SELECT id, name, description FROM categories";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for catalogue persistence operations.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Referenced category does not exist.
    CategoryNotFound(CategoryId),
    /// Referenced product does not exist.
    ProductNotFound(ProductId),
    /// Another category already holds this name.
    DuplicateName(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::CategoryNotFound(id) => write!(f, "category not found: {id}"),
            Self::ProductNotFound(id) => write!(f, "product not found: {id}"),
            Self::DuplicateName(name) => write!(f, "category name already exists: `{name}`"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "catalogue repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "catalogue repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "catalogue repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for category persistence.
pub trait CategoryRepository {
    /// Inserts one category and returns it with the assigned id.
    fn insert(&self, draft: &CategoryDraft) -> RepoResult<Category>;
    /// Overwrites name and description of one category.
    fn update(&self, id: CategoryId, update: &CategoryUpdate) -> RepoResult<()>;
    /// Looks one category up by id.
    fn find_by_id(&self, id: CategoryId) -> RepoResult<Option<Category>>;
    /// Looks one category up by exact name.
    fn find_by_name(&self, name: &str) -> RepoResult<Option<Category>>;
    /// Lists all categories ordered by id.
    fn find_all(&self) -> RepoResult<Vec<Category>>;
    /// Returns whether a category with this id exists.
    fn exists_by_id(&self, id: CategoryId) -> RepoResult<bool>;
    /// Removes one category by id.
    fn delete_by_id(&self, id: CategoryId) -> RepoResult<()>;
}

/// SQLite-backed category repository.
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_category_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn insert(&self, draft: &CategoryDraft) -> RepoResult<Category> {
        self.conn
            .execute(
                "INSERT INTO categories (name, description) VALUES (?1, ?2);",
                params![draft.name.as_str(), draft.description.as_deref()],
            )
            .map_err(|err| map_category_write_error(err, draft.name.as_str()))?;

        load_required_category(self.conn, self.conn.last_insert_rowid())
    }

    fn update(&self, id: CategoryId, update: &CategoryUpdate) -> RepoResult<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE categories SET name = ?2, description = ?3 WHERE id = ?1;",
                params![id, update.name.as_str(), update.description.as_deref()],
            )
            .map_err(|err| map_category_write_error(err, update.name.as_str()))?;

        if changed == 0 {
            return Err(RepoError::CategoryNotFound(id));
        }

        Ok(())
    }

    fn find_by_id(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CATEGORY_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_category_row(row)?));
        }
        Ok(None)
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Option<Category>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CATEGORY_SELECT_SQL} WHERE name = ?1;"))?;
        let mut rows = stmt.query([name])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_category_row(row)?));
        }
        Ok(None)
    }

    fn find_all(&self) -> RepoResult<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CATEGORY_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next()? {
            categories.push(parse_category_row(row)?);
        }
        Ok(categories)
    }

    fn exists_by_id(&self, id: CategoryId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn delete_by_id(&self, id: CategoryId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM categories WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::CategoryNotFound(id));
        }

        Ok(())
    }
}

fn parse_category_row(row: &Row<'_>) -> RepoResult<Category> {
    Ok(Category {
        id: row.get("id")?,
        name: row.get("name")?,
        description: row.get("description")?,
    })
}

fn load_required_category(conn: &Connection, id: CategoryId) -> RepoResult<Category> {
    let mut stmt = conn.prepare(&format!("{CATEGORY_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        return parse_category_row(row);
    }
    Err(RepoError::CategoryNotFound(id))
}

fn map_category_write_error(err: rusqlite::Error, name: &str) -> RepoError {
    if is_unique_name_violation(&err) {
        return RepoError::DuplicateName(name.to_string());
    }
    RepoError::Db(DbError::Sqlite(err))
}

fn is_unique_name_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(failure, Some(message)) => {
            failure.code == rusqlite::ErrorCode::ConstraintViolation
                && message.contains("categories.name")
        }
        _ => false,
    }
}

fn ensure_category_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "categories")? {
        return Err(RepoError::MissingRequiredTable("categories"));
    }

    for column in ["id", "name", "description"] {
        if !table_has_column(conn, "categories", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "categories",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
