//! Domain model for the product catalogue.
//!
//! # Responsibility
//! - Define the canonical `Category` and `Product` records returned by
//!   repositories and services.
//! - Define the input models (`*Draft`, `*Update`, `CategoryRef`) accepted
//!   by the service layer.
//!
//! # Invariants
//! - Identifiers are store-assigned and never reused for another record.
//! - A persisted product always embeds the category row it references.

pub mod category;
pub mod product;
