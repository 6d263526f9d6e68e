//! Core domain logic for the product catalogue.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::category::{Category, CategoryDraft, CategoryId, CategoryUpdate};
pub use model::product::{CategoryRef, Product, ProductDraft, ProductId, ProductUpdate};
pub use repo::category_repo::{
    CategoryRepository, RepoError, RepoResult, SqliteCategoryRepository,
};
pub use repo::product_repo::{NewProduct, ProductRepository, SqliteProductRepository};
pub use service::category_service::{CategoryService, CategoryServiceError};
pub use service::product_service::{ProductService, ProductServiceError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
