//! Category domain model.
//!
//! # Responsibility
//! - Define the category record and the input shapes for create/update.
//!
//! # Invariants
//! - `id` is assigned by the store and is stable for the record lifetime.
//! - `name` is the unique business key; no two categories share a name.

use serde::{Deserialize, Serialize};

/// Stable store-assigned identifier for a category.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type CategoryId = i64;

/// Persisted category record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Store-assigned identifier, monotonically increasing.
    pub id: CategoryId,
    /// Unique business key.
    pub name: String,
    /// Optional free-form description.
    pub description: Option<String>,
}

/// Input model for creating a category.
///
/// The identifier is assigned by the store on insert, so drafts carry the
/// business fields only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDraft {
    pub name: String,
    pub description: Option<String>,
}

impl CategoryDraft {
    /// Creates a draft with the given name and no description.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }
}

/// Input model for updating a category.
///
/// Updates use full overwrite semantics: both fields replace the persisted
/// values, including `description: None` clearing a stored description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryUpdate {
    pub name: String,
    pub description: Option<String>,
}
