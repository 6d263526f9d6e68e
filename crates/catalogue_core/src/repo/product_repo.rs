//! Product repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and finder APIs over the `products` table.
//! - Join the owning category eagerly so read models are always complete.
//!
//! # Invariants
//! - Write paths take a `NewProduct` whose `category_id` was resolved by
//!   the caller; the foreign key rejects anything dangling.
//! - Category-name lookups are exact and case-sensitive; the `containing`
//!   finders lower-case both sides in SQL.

use crate::model::category::{Category, CategoryId};
use crate::model::product::{Product, ProductId};
use crate::repo::category_repo::{RepoError, RepoResult, SqliteCategoryRepository};
use rusqlite::{params, Connection, Params, Row};

const PRODUCT_SELECT_SQL: &str = "SELECT
    p.id AS id,
    p.name AS name,
    p.description AS description,
    p.price AS price,
    p.stock_quantity AS stock_quantity,
    p.image_url AS image_url,
    c.id AS category_id,
    c.name AS category_name,
    c.description AS category_description
 FROM products p
 INNER JOIN categories c ON c.id = p.category_id";

/// Write model for product inserts and updates.
///
/// Carries an already-resolved `category_id`; resolution from id-or-name
/// references happens in the service layer.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock_quantity: i64,
    pub image_url: Option<String>,
    pub category_id: CategoryId,
}

/// Repository interface for product persistence.
pub trait ProductRepository {
    /// Inserts one product and returns it with the assigned id.
    fn insert(&self, record: &NewProduct) -> RepoResult<Product>;
    /// Overwrites all mutable fields of one product.
    fn update(&self, id: ProductId, record: &NewProduct) -> RepoResult<()>;
    /// Looks one product up by id.
    fn find_by_id(&self, id: ProductId) -> RepoResult<Option<Product>>;
    /// Lists all products ordered by id.
    fn find_all(&self) -> RepoResult<Vec<Product>>;
    /// Lists products whose category name matches exactly.
    fn find_by_category_name(&self, category_name: &str) -> RepoResult<Vec<Product>>;
    /// Lists products whose name contains the fragment, ignoring case.
    fn find_by_name_containing(&self, fragment: &str) -> RepoResult<Vec<Product>>;
    /// Lists products whose description contains the fragment, ignoring
    /// case. Products without a description never match.
    fn find_by_description_containing(&self, fragment: &str) -> RepoResult<Vec<Product>>;
    /// Returns whether a product with this id exists.
    fn exists_by_id(&self, id: ProductId) -> RepoResult<bool>;
    /// Removes one product by id.
    fn delete_by_id(&self, id: ProductId) -> RepoResult<()>;
}

/// SQLite-backed product repository.
pub struct SqliteProductRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProductRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    ///
    /// Products reference categories, so category readiness is checked
    /// first and its schema errors are reported unchanged.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let _ = SqliteCategoryRepository::try_new(conn)?;
        ensure_product_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ProductRepository for SqliteProductRepository<'_> {
    fn insert(&self, record: &NewProduct) -> RepoResult<Product> {
        self.conn.execute(
            "INSERT INTO products (
                name,
                description,
                price,
                stock_quantity,
                image_url,
                category_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                record.name.as_str(),
                record.description.as_deref(),
                record.price,
                record.stock_quantity,
                record.image_url.as_deref(),
                record.category_id,
            ],
        )?;

        load_required_product(self.conn, self.conn.last_insert_rowid())
    }

    fn update(&self, id: ProductId, record: &NewProduct) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE products
             SET
                name = ?1,
                description = ?2,
                price = ?3,
                stock_quantity = ?4,
                image_url = ?5,
                category_id = ?6
             WHERE id = ?7;",
            params![
                record.name.as_str(),
                record.description.as_deref(),
                record.price,
                record.stock_quantity,
                record.image_url.as_deref(),
                record.category_id,
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::ProductNotFound(id));
        }

        Ok(())
    }

    fn find_by_id(&self, id: ProductId) -> RepoResult<Option<Product>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PRODUCT_SELECT_SQL} WHERE p.id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_product_row(row)?));
        }
        Ok(None)
    }

    fn find_all(&self) -> RepoResult<Vec<Product>> {
        fetch_products(
            self.conn,
            &format!("{PRODUCT_SELECT_SQL} ORDER BY p.id ASC;"),
            [],
        )
    }

    fn find_by_category_name(&self, category_name: &str) -> RepoResult<Vec<Product>> {
        fetch_products(
            self.conn,
            &format!("{PRODUCT_SELECT_SQL} WHERE c.name = ?1 ORDER BY p.id ASC;"),
            [category_name],
        )
    }

    fn find_by_name_containing(&self, fragment: &str) -> RepoResult<Vec<Product>> {
        fetch_products(
            self.conn,
            &format!(
                "{PRODUCT_SELECT_SQL}
                 WHERE INSTR(LOWER(p.name), LOWER(?1)) > 0
                 ORDER BY p.id ASC;"
            ),
            [fragment],
        )
    }

    fn find_by_description_containing(&self, fragment: &str) -> RepoResult<Vec<Product>> {
        fetch_products(
            self.conn,
            &format!(
                "{PRODUCT_SELECT_SQL}
                 WHERE p.description IS NOT NULL
                   AND INSTR(LOWER(p.description), LOWER(?1)) > 0
                 ORDER BY p.id ASC;"
            ),
            [fragment],
        )
    }

    fn exists_by_id(&self, id: ProductId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM products WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn delete_by_id(&self, id: ProductId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM products WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::ProductNotFound(id));
        }

        Ok(())
    }
}

fn fetch_products(conn: &Connection, sql: &str, params: impl Params) -> RepoResult<Vec<Product>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut products = Vec::new();
    while let Some(row) = rows.next()? {
        products.push(parse_product_row(row)?);
    }
    Ok(products)
}

fn parse_product_row(row: &Row<'_>) -> RepoResult<Product> {
    Ok(Product {
        id: row.get("id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        price: row.get("price")?,
        stock_quantity: row.get("stock_quantity")?,
        image_url: row.get("image_url")?,
        category: Category {
            id: row.get("category_id")?,
            name: row.get("category_name")?,
            description: row.get("category_description")?,
        },
    })
}

fn load_required_product(conn: &Connection, id: ProductId) -> RepoResult<Product> {
    let mut stmt = conn.prepare(&format!("{PRODUCT_SELECT_SQL} WHERE p.id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        return parse_product_row(row);
    }
    Err(RepoError::ProductNotFound(id))
}

fn ensure_product_connection_ready(conn: &Connection) -> RepoResult<()> {
    if !table_exists(conn, "products")? {
        return Err(RepoError::MissingRequiredTable("products"));
    }

    for column in [
        "id",
        "name",
        "description",
        "price",
        "stock_quantity",
        "image_url",
        "category_id",
    ] {
        if !table_has_column(conn, "products", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "products",
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
