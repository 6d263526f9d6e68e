use catalogue_core::db::migrations::latest_version;
use catalogue_core::db::open_db_in_memory;
use catalogue_core::{
    Category, CategoryDraft, CategoryRef, CategoryRepository, ProductDraft, ProductService,
    ProductServiceError, ProductUpdate, RepoError, SqliteCategoryRepository,
    SqliteProductRepository,
};
use rusqlite::Connection;

#[test]
fn create_with_category_id_attaches_existing_category() {
    let conn = open_db_in_memory().unwrap();
    let tools = seed_category(&conn, "Tools");
    let service = catalogue(&conn);

    let hammer = service
        .create_product(&ProductDraft {
            name: "Hammer".to_string(),
            description: Some("claw hammer".to_string()),
            price: 12.5,
            stock_quantity: 25,
            image_url: Some("https://img.example/hammer.png".to_string()),
            category: Some(CategoryRef::Id(tools.id)),
        })
        .unwrap();

    assert_eq!(hammer.id, 1);
    assert_eq!(hammer.name, "Hammer");
    assert_eq!(hammer.description.as_deref(), Some("claw hammer"));
    assert_eq!(hammer.price, 12.5);
    assert_eq!(hammer.stock_quantity, 25);
    assert_eq!(hammer.category, tools);
    assert_eq!(category_count(&conn), 1);
}

#[test]
fn create_with_missing_category_id_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = catalogue(&conn);

    let err = service
        .create_product(&ProductDraft::new("Hammer", 12.5, CategoryRef::Id(42)))
        .unwrap_err();
    assert!(matches!(err, ProductServiceError::CategoryNotFound(42)));
    assert!(service.list_products().unwrap().is_empty());
}

#[test]
fn create_with_existing_category_name_attaches_without_creating() {
    let conn = open_db_in_memory().unwrap();
    SqliteCategoryRepository::try_new(&conn)
        .unwrap()
        .insert(&CategoryDraft {
            name: "Tools".to_string(),
            description: Some("hardware".to_string()),
        })
        .unwrap();
    let service = catalogue(&conn);

    let hammer = service
        .create_product(&ProductDraft::new(
            "Hammer",
            12.5,
            CategoryRef::Name("Tools".to_string()),
        ))
        .unwrap();

    assert_eq!(hammer.id, 1);
    assert_eq!(hammer.category.id, 1);
    assert_eq!(hammer.category.name, "Tools");
    assert_eq!(hammer.category.description.as_deref(), Some("hardware"));
    assert_eq!(category_count(&conn), 1);
}

#[test]
fn create_with_new_category_name_creates_it_without_description() {
    let conn = open_db_in_memory().unwrap();
    let service = catalogue(&conn);

    let wrench = service
        .create_product(&ProductDraft::new(
            "Wrench",
            8.0,
            CategoryRef::Name("Tools".to_string()),
        ))
        .unwrap();
    assert_eq!(wrench.category.name, "Tools");
    assert_eq!(wrench.category.description, None);
    assert_eq!(category_count(&conn), 1);

    let hammer = service
        .create_product(&ProductDraft::new(
            "Hammer",
            12.5,
            CategoryRef::Name("Tools".to_string()),
        ))
        .unwrap();
    assert_eq!(hammer.category.id, wrench.category.id);
    assert_eq!(category_count(&conn), 1);
}

#[test]
fn create_without_category_reference_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = catalogue(&conn);

    let err = service
        .create_product(&ProductDraft {
            name: "Loose".to_string(),
            description: None,
            price: 1.0,
            stock_quantity: 0,
            image_url: None,
            category: None,
        })
        .unwrap_err();
    assert!(matches!(err, ProductServiceError::MissingCategoryRef));
}

#[test]
fn update_overwrites_all_fields_and_keeps_category_when_unset() {
    let conn = open_db_in_memory().unwrap();
    let tools = seed_category(&conn, "Tools");
    let service = catalogue(&conn);

    let hammer = service
        .create_product(&ProductDraft {
            name: "Hammer".to_string(),
            description: Some("claw hammer".to_string()),
            price: 12.5,
            stock_quantity: 25,
            image_url: Some("https://img.example/hammer.png".to_string()),
            category: Some(CategoryRef::Id(tools.id)),
        })
        .unwrap();

    let updated = service
        .update_product(
            hammer.id,
            &ProductUpdate {
                name: "Sledge Hammer".to_string(),
                description: None,
                price: 30.0,
                stock_quantity: 3,
                image_url: None,
                category_id: None,
            },
        )
        .unwrap();

    assert_eq!(updated.id, hammer.id);
    assert_eq!(updated.name, "Sledge Hammer");
    assert_eq!(updated.description, None);
    assert_eq!(updated.price, 30.0);
    assert_eq!(updated.stock_quantity, 3);
    assert_eq!(updated.image_url, None);
    assert_eq!(updated.category, tools);
}

#[test]
fn update_replaces_category_by_id() {
    let conn = open_db_in_memory().unwrap();
    let tools = seed_category(&conn, "Tools");
    let garden = seed_category(&conn, "Garden");
    let service = catalogue(&conn);

    let hose = service
        .create_product(&ProductDraft::new("Hose", 15.0, CategoryRef::Id(tools.id)))
        .unwrap();

    let updated = service
        .update_product(
            hose.id,
            &ProductUpdate {
                name: hose.name.clone(),
                description: None,
                price: hose.price,
                stock_quantity: hose.stock_quantity,
                image_url: None,
                category_id: Some(garden.id),
            },
        )
        .unwrap();

    assert_eq!(updated.category, garden);
}

#[test]
fn update_with_missing_category_leaves_product_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let tools = seed_category(&conn, "Tools");
    let service = catalogue(&conn);

    let hammer = service
        .create_product(&ProductDraft::new(
            "Hammer",
            12.5,
            CategoryRef::Id(tools.id),
        ))
        .unwrap();

    let err = service
        .update_product(
            hammer.id,
            &ProductUpdate {
                name: "Renamed".to_string(),
                description: None,
                price: 99.0,
                stock_quantity: 1,
                image_url: None,
                category_id: Some(404),
            },
        )
        .unwrap_err();
    assert!(matches!(err, ProductServiceError::CategoryNotFound(404)));

    let loaded = service.get_product(hammer.id).unwrap().unwrap();
    assert_eq!(loaded, hammer);
}

#[test]
fn update_missing_product_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = catalogue(&conn);

    let err = service
        .update_product(
            404,
            &ProductUpdate {
                name: "Ghost".to_string(),
                description: None,
                price: 1.0,
                stock_quantity: 0,
                image_url: None,
                category_id: None,
            },
        )
        .unwrap_err();
    assert!(matches!(err, ProductServiceError::ProductNotFound(404)));
}

#[test]
fn delete_removes_product_but_keeps_its_category() {
    let conn = open_db_in_memory().unwrap();
    let tools = seed_category(&conn, "Tools");
    let service = catalogue(&conn);

    let hammer = service
        .create_product(&ProductDraft::new(
            "Hammer",
            12.5,
            CategoryRef::Id(tools.id),
        ))
        .unwrap();

    service.delete_product(hammer.id).unwrap();

    assert!(service.get_product(hammer.id).unwrap().is_none());
    assert_eq!(category_count(&conn), 1);
}

#[test]
fn delete_missing_product_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = catalogue(&conn);

    let err = service.delete_product(404).unwrap_err();
    assert!(matches!(err, ProductServiceError::ProductNotFound(404)));
}

#[test]
fn list_products_returns_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let tools = seed_category(&conn, "Tools");
    let service = catalogue(&conn);

    for name in ["Hammer", "Wrench", "Pliers"] {
        service
            .create_product(&ProductDraft::new(name, 5.0, CategoryRef::Id(tools.id)))
            .unwrap();
    }

    let names: Vec<String> = service
        .list_products()
        .unwrap()
        .into_iter()
        .map(|product| product.name)
        .collect();
    assert_eq!(names, ["Hammer", "Wrench", "Pliers"]);
}

#[test]
fn list_by_category_matches_exact_name_only() {
    let conn = open_db_in_memory().unwrap();
    let tools = seed_category(&conn, "Tools");
    let garden = seed_category(&conn, "Garden");
    let service = catalogue(&conn);

    for name in ["Hammer", "Wrench"] {
        service
            .create_product(&ProductDraft::new(name, 5.0, CategoryRef::Id(tools.id)))
            .unwrap();
    }
    service
        .create_product(&ProductDraft::new("Hose", 15.0, CategoryRef::Id(garden.id)))
        .unwrap();

    let in_tools = service.list_by_category("Tools").unwrap();
    assert_eq!(in_tools.len(), 2);
    assert!(in_tools.iter().all(|product| product.category.id == tools.id));

    assert!(service.list_by_category("tools").unwrap().is_empty());
    assert!(service.list_by_category("Missing").unwrap().is_empty());
}

#[test]
fn repository_rejects_connection_without_products_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            description TEXT
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteProductRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("products"))
    ));
}

#[test]
fn repository_rejects_connection_missing_products_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            description TEXT
        );
        CREATE TABLE products (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT,
            price REAL NOT NULL,
            stock_quantity INTEGER NOT NULL DEFAULT 0
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteProductRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "products",
            column: "image_url"
        })
    ));
}

fn catalogue(
    conn: &Connection,
) -> ProductService<SqliteProductRepository<'_>, SqliteCategoryRepository<'_>> {
    let products = SqliteProductRepository::try_new(conn).unwrap();
    let categories = SqliteCategoryRepository::try_new(conn).unwrap();
    ProductService::new(products, categories)
}

fn seed_category(conn: &Connection, name: &str) -> Category {
    SqliteCategoryRepository::try_new(conn)
        .unwrap()
        .insert(&CategoryDraft::new(name))
        .unwrap()
}

fn category_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM categories;", [], |row| row.get(0))
        .unwrap()
}
