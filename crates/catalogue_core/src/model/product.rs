//! Product domain model.
//!
//! # Responsibility
//! - Define the product record and the input shapes for create/update.
//! - Express the create-time category reference (`CategoryRef`) as a sum
//!   type so a draft names its category by id or by name, never both.
//!
//! # Invariants
//! - `id` is assigned by the store and is stable for the record lifetime.
//! - A persisted product embeds exactly one existing category.
//! - `ProductUpdate` can replace the category association by id only;
//!   name-based replacement exists on the create path alone.

use crate::model::category::{Category, CategoryId};
use serde::{Deserialize, Serialize};

/// Stable store-assigned identifier for a product.
pub type ProductId = i64;

/// Persisted product record with its category eagerly embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Store-assigned identifier, monotonically increasing.
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    /// Unit price. The store keeps this as a REAL column.
    pub price: f64,
    /// Units on hand.
    pub stock_quantity: i64,
    /// Reference to a hosted product image.
    pub image_url: Option<String>,
    /// The category this product belongs to.
    pub category: Category,
}

/// Create-time reference to the product's category.
///
/// `Id` must point at an existing category. `Name` attaches the category of
/// that name, creating it first when absent. The enum encodes the
/// resolution precedence structurally: a single draft cannot carry both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryRef {
    Id(CategoryId),
    Name(String),
}

/// Input model for creating a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock_quantity: i64,
    pub image_url: Option<String>,
    /// Category reference. `None` is rejected by the service layer.
    pub category: Option<CategoryRef>,
}

impl ProductDraft {
    /// Creates a draft with the required fields and empty optional ones.
    pub fn new(name: impl Into<String>, price: f64, category: CategoryRef) -> Self {
        Self {
            name: name.into(),
            description: None,
            price,
            stock_quantity: 0,
            image_url: None,
            category: Some(category),
        }
    }
}

/// Input model for updating a product.
///
/// All scalar fields use full overwrite semantics. `category_id` replaces
/// the association when set and keeps the current one when `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock_quantity: i64,
    pub image_url: Option<String>,
    pub category_id: Option<CategoryId>,
}
