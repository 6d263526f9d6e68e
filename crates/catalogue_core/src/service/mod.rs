//! Catalogue use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep transport layers (REST, CLI) decoupled from storage details.

pub mod category_service;
pub mod product_service;
