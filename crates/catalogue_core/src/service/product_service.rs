//! Product use-case service.
//!
//! # Responsibility
//! - Provide product list/get/create/update/delete/search entry points.
//! - Resolve category references (by id, or by name with auto-create) on
//!   the create path.
//!
//! # Invariants
//! - A product is never written without a resolved, existing category.
//! - Updates replace the category association by id only; the name-based
//!   path exists on create alone.
//! - `search_products` scans all products in memory; it never touches an
//!   index and never paginates.

use crate::model::category::{Category, CategoryDraft, CategoryId};
use crate::model::product::{CategoryRef, Product, ProductDraft, ProductId, ProductUpdate};
use crate::repo::category_repo::{CategoryRepository, RepoError, RepoResult};
use crate::repo::product_repo::{NewProduct, ProductRepository};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for product use-cases.
#[derive(Debug)]
pub enum ProductServiceError {
    /// Target product does not exist.
    ProductNotFound(ProductId),
    /// Referenced category does not exist.
    CategoryNotFound(CategoryId),
    /// Create input carried no category reference at all.
    MissingCategoryRef,
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for ProductServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProductNotFound(id) => write!(f, "product not found: {id}"),
            Self::CategoryNotFound(id) => write!(f, "category not found: {id}"),
            Self::MissingCategoryRef => {
                write!(f, "product must reference a category (id or name)")
            }
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => {
                write!(f, "inconsistent product state: {details}")
            }
        }
    }
}

impl Error for ProductServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ProductServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::ProductNotFound(id) => Self::ProductNotFound(id),
            RepoError::CategoryNotFound(id) => Self::CategoryNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Product service facade over the product and category repositories.
pub struct ProductService<P: ProductRepository, C: CategoryRepository> {
    products: P,
    categories: C,
}

impl<P: ProductRepository, C: CategoryRepository> ProductService<P, C> {
    /// Creates a service using the provided repository implementations.
    pub fn new(products: P, categories: C) -> Self {
        Self {
            products,
            categories,
        }
    }

    /// Lists all products.
    pub fn list_products(&self) -> RepoResult<Vec<Product>> {
        self.products.find_all()
    }

    /// Lists products in the named category.
    ///
    /// Matching is exact and case-sensitive, per the store's collation.
    pub fn list_by_category(&self, category_name: &str) -> RepoResult<Vec<Product>> {
        self.products.find_by_category_name(category_name)
    }

    /// Gets one product by id. Absence is not an error.
    pub fn get_product(&self, id: ProductId) -> RepoResult<Option<Product>> {
        self.products.find_by_id(id)
    }

    /// Creates a product, resolving its category reference first.
    ///
    /// # Contract
    /// - `CategoryRef::Id` must name an existing category.
    /// - `CategoryRef::Name` attaches the existing category of that name,
    ///   or creates one (without description) when absent.
    /// - A draft without a reference is rejected.
    pub fn create_product(&self, draft: &ProductDraft) -> Result<Product, ProductServiceError> {
        let category = self.resolve_category_for_create(draft.category.as_ref())?;
        let record = NewProduct {
            name: draft.name.clone(),
            description: draft.description.clone(),
            price: draft.price,
            stock_quantity: draft.stock_quantity,
            image_url: draft.image_url.clone(),
            category_id: category.id,
        };
        Ok(self.products.insert(&record)?)
    }

    /// Overwrites all mutable fields of an existing product.
    ///
    /// When `update.category_id` is set, that category must exist and
    /// replaces the association; when unset the current association is
    /// kept unchanged.
    pub fn update_product(
        &self,
        id: ProductId,
        update: &ProductUpdate,
    ) -> Result<Product, ProductServiceError> {
        let current = self
            .products
            .find_by_id(id)?
            .ok_or(ProductServiceError::ProductNotFound(id))?;

        let category_id = match update.category_id {
            Some(category_id) => {
                if self.categories.find_by_id(category_id)?.is_none() {
                    return Err(ProductServiceError::CategoryNotFound(category_id));
                }
                category_id
            }
            None => current.category.id,
        };

        let record = NewProduct {
            name: update.name.clone(),
            description: update.description.clone(),
            price: update.price,
            stock_quantity: update.stock_quantity,
            image_url: update.image_url.clone(),
            category_id,
        };
        self.products.update(id, &record)?;
        self.products
            .find_by_id(id)?
            .ok_or(ProductServiceError::InconsistentState(
                "updated product not found in read-back",
            ))
    }

    /// Deletes one product by id.
    pub fn delete_product(&self, id: ProductId) -> Result<(), ProductServiceError> {
        if !self.products.exists_by_id(id)? {
            return Err(ProductServiceError::ProductNotFound(id));
        }
        self.products.delete_by_id(id)?;
        Ok(())
    }

    /// Case-insensitive keyword search over product name and description.
    ///
    /// Scans every product in memory on each call. Products without a
    /// description match on name only. An empty keyword matches every
    /// product.
    pub fn search_products(&self, keyword: &str) -> RepoResult<Vec<Product>> {
        let needle = keyword.to_lowercase();
        let products = self.products.find_all()?;
        Ok(products
            .into_iter()
            .filter(|product| product_matches_keyword(product, &needle))
            .collect())
    }

    fn resolve_category_for_create(
        &self,
        reference: Option<&CategoryRef>,
    ) -> Result<Category, ProductServiceError> {
        match reference {
            Some(CategoryRef::Id(id)) => self
                .categories
                .find_by_id(*id)?
                .ok_or(ProductServiceError::CategoryNotFound(*id)),
            Some(CategoryRef::Name(name)) => {
                if let Some(existing) = self.categories.find_by_name(name)? {
                    return Ok(existing);
                }
                Ok(self.categories.insert(&CategoryDraft::new(name.clone()))?)
            }
            None => Err(ProductServiceError::MissingCategoryRef),
        }
    }
}

fn product_matches_keyword(product: &Product, needle: &str) -> bool {
    if product.name.to_lowercase().contains(needle) {
        return true;
    }
    product
        .description
        .as_ref()
        .is_some_and(|description| description.to_lowercase().contains(needle))
}
