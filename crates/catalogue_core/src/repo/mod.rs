//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contracts consumed by the service layer.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`CategoryNotFound`,
//!   `ProductNotFound`, `DuplicateName`) in addition to DB transport
//!   errors.
//! - List queries use deterministic `id ASC` ordering.

pub mod category_repo;
pub mod product_repo;
